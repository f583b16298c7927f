use xi_rope::delta::Transformer;
use xi_rope::{Delta, RopeInfo};

use crate::editing::{
    Block, BlockKey, ChangeKind, DocumentError, EditorState, Selection, TextPoint, TextRange,
};

/// Commands that can be applied to the document
#[derive(Debug, Clone, PartialEq)]
pub enum Cmd {
    InsertText {
        at: TextPoint,
        text: String,
    },
    /// Delete text inside a single block
    DeleteText {
        range: TextRange,
    },
    InsertBlock {
        after: BlockKey,
        key: BlockKey,
        text: String,
    },
    RemoveBlock {
        key: BlockKey,
    },
}

impl EditorState {
    /// Apply a command as one undoable revision
    pub fn apply(&self, cmd: Cmd) -> Result<Self, DocumentError> {
        apply_command(self, cmd)
    }
}

pub(crate) fn apply_command(state: &EditorState, cmd: Cmd) -> Result<EditorState, DocumentError> {
    let content = state.content();
    match cmd {
        Cmd::InsertText { at, text } => {
            let (next, delta) = content.edit_text(at.block, at.offset..at.offset, &text)?;
            let selection = transform_selection(state.selection(), at.block, &delta);
            Ok(state
                .push(next, ChangeKind::InsertCharacters)
                .restore_selection(selection))
        }
        Cmd::DeleteText { range } => {
            if !range.is_single_block() {
                return Err(DocumentError::MultiBlockEdit(range));
            }
            let key = range.start.block;
            let (next, delta) = content.edit_text(key, range.start.offset..range.end.offset, "")?;
            let selection = transform_selection(state.selection(), key, &delta);
            Ok(state
                .push(next, ChangeKind::RemoveRange)
                .restore_selection(selection))
        }
        Cmd::InsertBlock { after, key, text } => {
            let next = content.insert_block_after(after, Block::with_key(key, &text))?;
            Ok(state.push(next, ChangeKind::InsertBlock))
        }
        Cmd::RemoveBlock { key } => {
            let next = content.remove_block(key)?;
            log::debug!("Removed block {key}");
            Ok(state.push(next, ChangeKind::RemoveBlock))
        }
    }
}

/// Move selection edges that sit in the edited block
fn transform_selection(selection: &Selection, key: BlockKey, delta: &Delta<RopeInfo>) -> Selection {
    let mut transformer = Transformer::new(delta);
    let mut transform = |point: TextPoint| {
        if point.block == key {
            // A caret at the insertion point ends up after the inserted text
            TextPoint::new(key, transformer.transform(point.offset, true))
        } else {
            point
        }
    };
    let range = TextRange::new(
        transform(selection.range().start),
        transform(selection.range().end),
    );
    Selection::new(range).with_focus(selection.has_focus())
}
