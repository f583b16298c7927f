use std::collections::HashMap;
use std::ops::Range;
use std::sync::Arc;

use xi_rope::delta::Builder;
use xi_rope::{Delta, Rope, RopeInfo};

use crate::editing::{Block, BlockKey, InlineStyle, TextPoint, TextRange};
use crate::highlights::HighlightMap;

/// Errors surfaced by the document model boundary
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DocumentError {
    #[error("Unknown block: {0}")]
    UnknownBlock(BlockKey),
    #[error("Offset {offset} is out of bounds for block {key} (length {len})")]
    OffsetOutOfBounds {
        key: BlockKey,
        offset: usize,
        len: usize,
    },
    #[error("Range {0} ends before it starts")]
    ReversedRange(TextRange),
    #[error("Range {0} spans several blocks; text edits must stay within one block")]
    MultiBlockEdit(TextRange),
    #[error("Offset {offset} in block {key} falls inside a character")]
    NotCharBoundary { key: BlockKey, offset: usize },
    #[error("Duplicate block key: {0}")]
    DuplicateBlock(BlockKey),
    #[error("A document needs at least one block")]
    EmptyDocument,
    #[error("Cannot remove {0}: it is the last block in the document")]
    LastBlock(BlockKey),
}

/// Immutable snapshot of a document: ordered blocks plus the highlight store
///
/// Every mutating method returns a new snapshot and leaves `self` untouched.
/// Blocks are shared between snapshots and only cloned when written to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContentState {
    blocks: Arc<Vec<Arc<Block>>>,
    index: Arc<HashMap<BlockKey, usize>>,
    highlights: HighlightMap,
}

impl ContentState {
    /// Build a document with one block per line of `text`
    pub fn from_text(text: &str) -> Self {
        let blocks: Vec<Arc<Block>> = text
            .split('\n')
            .map(|line| Arc::new(Block::new(line)))
            .collect();
        let index = build_index(&blocks);
        Self {
            blocks: Arc::new(blocks),
            index: Arc::new(index),
            highlights: HighlightMap::new(),
        }
    }

    pub fn from_blocks(blocks: Vec<Block>) -> Result<Self, DocumentError> {
        if blocks.is_empty() {
            return Err(DocumentError::EmptyDocument);
        }

        let mut index = HashMap::with_capacity(blocks.len());
        for (position, block) in blocks.iter().enumerate() {
            if index.insert(block.key(), position).is_some() {
                return Err(DocumentError::DuplicateBlock(block.key()));
            }
        }

        Ok(Self {
            blocks: Arc::new(blocks.into_iter().map(Arc::new).collect()),
            index: Arc::new(index),
            highlights: HighlightMap::new(),
        })
    }

    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter().map(|block| block.as_ref())
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn keys(&self) -> Vec<BlockKey> {
        self.blocks().map(Block::key).collect()
    }

    pub fn block(&self, key: BlockKey) -> Option<&Block> {
        self.index.get(&key).map(|&position| self.blocks[position].as_ref())
    }

    pub fn require_block(&self, key: BlockKey) -> Result<&Block, DocumentError> {
        self.block(key).ok_or(DocumentError::UnknownBlock(key))
    }

    pub fn first_block(&self) -> &Block {
        // Construction guarantees at least one block
        &self.blocks[0]
    }

    /// The block following `key` in document order
    pub fn block_after(&self, key: BlockKey) -> Option<&Block> {
        let position = *self.index.get(&key)?;
        self.blocks.get(position + 1).map(|block| block.as_ref())
    }

    /// Document text with blocks joined by newlines
    pub fn plain_text(&self) -> String {
        self.blocks().map(Block::text).collect::<Vec<_>>().join("\n")
    }

    pub fn highlights(&self) -> &HighlightMap {
        &self.highlights
    }

    /// Same blocks, different highlight store
    pub fn with_highlights(&self, highlights: HighlightMap) -> Self {
        Self {
            blocks: Arc::clone(&self.blocks),
            index: Arc::clone(&self.index),
            highlights,
        }
    }

    pub fn validate_point(&self, point: &TextPoint) -> Result<(), DocumentError> {
        let block = self.require_block(point.block)?;
        if point.offset > block.len() {
            return Err(DocumentError::OffsetOutOfBounds {
                key: point.block,
                offset: point.offset,
                len: block.len(),
            });
        }
        if !block.is_char_boundary(point.offset) {
            return Err(DocumentError::NotCharBoundary {
                key: point.block,
                offset: point.offset,
            });
        }
        Ok(())
    }

    /// Check that both edges exist and that `start` does not come after `end`
    pub fn validate_range(&self, range: &TextRange) -> Result<(), DocumentError> {
        self.validate_point(&range.start)?;
        self.validate_point(&range.end)?;

        let start = self.index[&range.start.block];
        let end = self.index[&range.end.block];
        if start > end || (start == end && range.start.offset > range.end.offset) {
            return Err(DocumentError::ReversedRange(*range));
        }
        Ok(())
    }

    /// Per-block local spans covered by `range`, walking blocks from start to end
    pub(crate) fn range_segments(
        &self,
        range: &TextRange,
    ) -> Result<Vec<(BlockKey, Range<usize>)>, DocumentError> {
        self.validate_range(range)?;

        if range.is_single_block() {
            return Ok(vec![(
                range.start.block,
                range.start.offset..range.end.offset,
            )]);
        }

        let start_block = self.require_block(range.start.block)?;
        let mut segments = vec![(start_block.key(), range.start.offset..start_block.len())];
        let mut current = start_block.key();
        while let Some(next) = self.block_after(current) {
            if next.key() == range.end.block {
                segments.push((next.key(), 0..range.end.offset));
                break;
            }
            segments.push((next.key(), 0..next.len()));
            current = next.key();
        }
        Ok(segments)
    }

    /// Apply `style` over `range`
    pub fn add_style(&self, range: &TextRange, style: &InlineStyle) -> Result<Self, DocumentError> {
        let segments = self.range_segments(range)?;
        let mut next = self.clone();
        for (key, span) in segments {
            next.block_mut(key)?.add_style(style, span);
        }
        Ok(next)
    }

    /// Remove `style` from `range`
    pub fn remove_style(
        &self,
        range: &TextRange,
        style: &InlineStyle,
    ) -> Result<Self, DocumentError> {
        let segments = self.range_segments(range)?;
        let mut next = self.clone();
        for (key, span) in segments {
            next.block_mut(key)?.remove_style(style, span);
        }
        Ok(next)
    }

    /// Replace `range` of one block's text, returning the new snapshot and the delta applied
    ///
    /// Style spans in the block and stored highlight offsets are carried through
    /// the delta.
    pub(crate) fn edit_text(
        &self,
        key: BlockKey,
        range: Range<usize>,
        text: &str,
    ) -> Result<(Self, Delta<RopeInfo>), DocumentError> {
        let len = self.require_block(key)?.len();
        for offset in [range.start, range.end] {
            self.validate_point(&TextPoint::new(key, offset))?;
        }
        if range.start > range.end {
            return Err(DocumentError::ReversedRange(TextRange::within_block(
                key, range,
            )));
        }

        let mut builder = Builder::new(len);
        builder.replace(range, Rope::from(text));
        let delta = builder.build();

        let mut next = self.clone();
        next.block_mut(key)?.apply_delta(&delta);
        next.highlights = self.highlights.transform_block(key, &delta);
        Ok((next, delta))
    }

    /// Insert `block` directly after `after`
    pub(crate) fn insert_block_after(
        &self,
        after: BlockKey,
        block: Block,
    ) -> Result<Self, DocumentError> {
        let position = *self
            .index
            .get(&after)
            .ok_or(DocumentError::UnknownBlock(after))?;
        if self.index.contains_key(&block.key()) {
            return Err(DocumentError::DuplicateBlock(block.key()));
        }

        let mut blocks = self.blocks.as_ref().clone();
        blocks.insert(position + 1, Arc::new(block));
        let index = build_index(&blocks);
        Ok(Self {
            blocks: Arc::new(blocks),
            index: Arc::new(index),
            highlights: self.highlights.clone(),
        })
    }

    /// Remove a block; highlights anchored in it are dropped
    pub(crate) fn remove_block(&self, key: BlockKey) -> Result<Self, DocumentError> {
        let position = *self.index.get(&key).ok_or(DocumentError::UnknownBlock(key))?;
        if self.blocks.len() == 1 {
            return Err(DocumentError::LastBlock(key));
        }

        let mut blocks = self.blocks.as_ref().clone();
        blocks.remove(position);
        let index = build_index(&blocks);
        Ok(Self {
            blocks: Arc::new(blocks),
            index: Arc::new(index),
            highlights: self.highlights.without_block(key),
        })
    }

    /// Mutable access to one block, cloning it (and the block list) if shared
    pub(crate) fn block_mut(&mut self, key: BlockKey) -> Result<&mut Block, DocumentError> {
        let position = *self.index.get(&key).ok_or(DocumentError::UnknownBlock(key))?;
        let blocks = Arc::make_mut(&mut self.blocks);
        Ok(Arc::make_mut(&mut blocks[position]))
    }
}

impl Default for ContentState {
    fn default() -> Self {
        Self::from_text("")
    }
}

fn build_index(blocks: &[Arc<Block>]) -> HashMap<BlockKey, usize> {
    blocks
        .iter()
        .enumerate()
        .map(|(position, block)| (block.key(), position))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const BOLD: InlineStyle = InlineStyle::from_static("BOLD");

    fn three_blocks() -> (ContentState, [BlockKey; 3]) {
        let content = ContentState::from_text("alpha\nbravo\ncharlie");
        let keys = content.keys();
        (content, [keys[0], keys[1], keys[2]])
    }

    #[test]
    fn test_from_text_creates_one_block_per_line() {
        let (content, _) = three_blocks();
        assert_eq!(content.block_count(), 3);
        assert_eq!(content.plain_text(), "alpha\nbravo\ncharlie");
        assert!(content.highlights().is_empty());
    }

    #[test]
    fn test_empty_text_still_has_a_block() {
        let content = ContentState::default();
        assert_eq!(content.block_count(), 1);
        assert!(content.first_block().is_empty());
    }

    #[test]
    fn test_from_blocks_rejects_empty_and_duplicates() {
        assert_eq!(
            ContentState::from_blocks(Vec::new()),
            Err(DocumentError::EmptyDocument)
        );

        let key = BlockKey::generate();
        let result = ContentState::from_blocks(vec![
            Block::with_key(key, "one"),
            Block::with_key(key, "two"),
        ]);
        assert_eq!(result, Err(DocumentError::DuplicateBlock(key)));
    }

    #[test]
    fn test_block_traversal() {
        let (content, [a, b, c]) = three_blocks();

        assert_eq!(content.block_after(a).map(Block::key), Some(b));
        assert_eq!(content.block_after(b).map(Block::key), Some(c));
        assert_eq!(content.block_after(c).map(Block::key), None);
        assert!(content.block_after(BlockKey::generate()).is_none());
    }

    #[test]
    fn test_multi_block_style_covers_every_segment() {
        let (content, [a, b, c]) = three_blocks();
        let range = TextRange::new(TextPoint::new(a, 2), TextPoint::new(c, 3));

        let styled = content.add_style(&range, &BOLD).unwrap();

        assert_eq!(styled.block(a).unwrap().styles()[0].range, 2..5);
        assert_eq!(styled.block(b).unwrap().styles()[0].range, 0..5);
        assert_eq!(styled.block(c).unwrap().styles()[0].range, 0..3);
        // The original snapshot is untouched
        assert!(content.blocks().all(|block| block.styles().is_empty()));
    }

    #[test]
    fn test_unchanged_blocks_are_shared() {
        let (content, [a, b, _]) = three_blocks();
        let styled = content
            .add_style(&TextRange::within_block(a, 0..2), &BOLD)
            .unwrap();

        let before = content.blocks.iter().find(|block| block.key() == b).unwrap();
        let after = styled.blocks.iter().find(|block| block.key() == b).unwrap();
        assert!(Arc::ptr_eq(before, after));
    }

    #[test]
    fn test_remove_style_over_multi_block_range() {
        let (content, [a, b, c]) = three_blocks();
        let everything = TextRange::new(TextPoint::new(a, 0), TextPoint::new(c, 7));
        let styled = content.add_style(&everything, &BOLD).unwrap();

        let middle = TextRange::new(TextPoint::new(a, 3), TextPoint::new(b, 2));
        let cleared = styled.remove_style(&middle, &BOLD).unwrap();

        assert_eq!(cleared.block(a).unwrap().styles()[0].range, 0..3);
        assert_eq!(cleared.block(b).unwrap().styles()[0].range, 2..5);
        assert_eq!(cleared.block(c).unwrap().styles()[0].range, 0..7);
    }

    #[test]
    fn test_validate_range_errors() {
        let (content, [a, _, c]) = three_blocks();
        let stranger = BlockKey::generate();

        assert_eq!(
            content.validate_range(&TextRange::within_block(stranger, 0..1)),
            Err(DocumentError::UnknownBlock(stranger))
        );
        assert_eq!(
            content.validate_range(&TextRange::within_block(a, 0..9)),
            Err(DocumentError::OffsetOutOfBounds {
                key: a,
                offset: 9,
                len: 5
            })
        );
        let reversed = TextRange::new(TextPoint::new(c, 0), TextPoint::new(a, 1));
        assert_eq!(
            content.validate_range(&reversed),
            Err(DocumentError::ReversedRange(reversed))
        );
    }

    #[test]
    fn test_offsets_inside_a_character_are_rejected() {
        let content = ContentState::from_text("héllo");
        let key = content.first_block().key();
        let split = DocumentError::NotCharBoundary { key, offset: 2 };

        assert_eq!(
            content.validate_range(&TextRange::within_block(key, 2..4)),
            Err(split.clone())
        );
        assert_eq!(
            content
                .add_style(&TextRange::within_block(key, 0..2), &BOLD)
                .map(|_| ()),
            Err(split.clone())
        );
        assert_eq!(content.edit_text(key, 2..2, "x").map(|_| ()), Err(split));
        assert!(content.edit_text(key, 1..3, "e").is_ok());
    }

    #[test]
    fn test_insert_and_remove_blocks() {
        let (content, [a, b, _]) = three_blocks();
        let inserted = Block::new("inserted");
        let new_key = inserted.key();

        let grown = content.insert_block_after(a, inserted).unwrap();
        assert_eq!(grown.block_after(a).map(Block::key), Some(new_key));
        assert_eq!(grown.block_after(new_key).map(Block::key), Some(b));

        let shrunk = grown.remove_block(new_key).unwrap();
        assert_eq!(shrunk.plain_text(), content.plain_text());
    }

    #[test]
    fn test_cannot_remove_last_block() {
        let content = ContentState::from_text("only");
        let key = content.first_block().key();
        assert_eq!(content.remove_block(key), Err(DocumentError::LastBlock(key)));
    }
}
