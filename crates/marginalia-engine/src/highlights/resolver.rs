use crate::editing::{BlockKey, ContentState, TextRange};

/// Does the collapsed `cursor` lie inside `range`?
///
/// - No cursor, or a cursor that is not collapsed, is never inside.
/// - Single-block ranges include both edges.
/// - Multi-block ranges exclude the start offset in the first block and the
///   end offset in the last block; any offset in a block strictly between
///   them is inside.
pub fn range_contains(content: &ContentState, cursor: Option<&TextRange>, range: &TextRange) -> bool {
    let Some(cursor) = cursor.filter(|cursor| cursor.is_collapsed()) else {
        return false;
    };
    let point = cursor.start;

    if range.is_single_block() {
        return point.block == range.start.block
            && (range.start.offset..=range.end.offset).contains(&point.offset);
    }

    if point.block == range.start.block {
        return point.offset > range.start.offset;
    }
    if point.block == range.end.block {
        return point.offset < range.end.offset;
    }
    lies_between(content, point.block, range.start.block, range.end.block)
}

/// Walk forward from `start` until `end`, looking for `target`
fn lies_between(content: &ContentState, target: BlockKey, start: BlockKey, end: BlockKey) -> bool {
    let mut current = start;
    while let Some(next) = content.block_after(current) {
        let key = next.key();
        if key == end {
            return false;
        }
        if key == target {
            return true;
        }
        current = key;
    }
    false
}
