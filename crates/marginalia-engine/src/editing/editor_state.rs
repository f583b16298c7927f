use crate::editing::{ContentState, Selection, TextPoint, TextRange};

pub const DEFAULT_UNDO_LIMIT: usize = 100;

/// What kind of change produced a revision
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    InsertCharacters,
    RemoveRange,
    InsertBlock,
    RemoveBlock,
    ChangeInlineStyle,
    ChangeBlockData,
    Undo,
    Redo,
}

/// Current document snapshot plus selection and undo history
///
/// Like [`ContentState`], an `EditorState` is a value: every operation returns
/// a new state and the previous one remains valid.
#[derive(Clone, Debug, PartialEq)]
pub struct EditorState {
    current: ContentState,
    selection: Selection,
    undo_stack: Vec<ContentState>,
    redo_stack: Vec<ContentState>,
    allow_undo: bool,
    selection_forced: bool,
    last_change: Option<ChangeKind>,
    undo_limit: usize,
}

impl EditorState {
    /// Fresh state with an unfocused caret at the start of the first block
    pub fn new(content: ContentState) -> Self {
        let caret = TextPoint::new(content.first_block().key(), 0);
        Self {
            current: content,
            selection: Selection::caret(caret),
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            allow_undo: true,
            selection_forced: false,
            last_change: None,
            undo_limit: DEFAULT_UNDO_LIMIT,
        }
    }

    pub fn with_undo_limit(mut self, undo_limit: usize) -> Self {
        self.undo_limit = undo_limit;
        self.trim_undo_stack();
        self
    }

    pub fn content(&self) -> &ContentState {
        &self.current
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn undo_stack(&self) -> &[ContentState] {
        &self.undo_stack
    }

    pub fn redo_stack(&self) -> &[ContentState] {
        &self.redo_stack
    }

    pub fn allows_undo(&self) -> bool {
        self.allow_undo
    }

    /// Whether the view must take focus and render the selection as-is
    pub fn must_force_selection(&self) -> bool {
        self.selection_forced
    }

    pub fn last_change(&self) -> Option<ChangeKind> {
        self.last_change
    }

    pub fn set_allow_undo(&self, allow_undo: bool) -> Self {
        let mut next = self.clone();
        next.allow_undo = allow_undo;
        next
    }

    /// Record `content` as the new current revision
    ///
    /// When undo recording is enabled the previous content goes onto the undo
    /// stack and the redo stack is cleared; otherwise both stacks are left alone.
    pub fn push(&self, content: ContentState, change: ChangeKind) -> Self {
        let mut next = self.clone();
        if self.allow_undo {
            next.undo_stack.push(self.current.clone());
            next.trim_undo_stack();
            next.redo_stack.clear();
        }
        next.current = content;
        next.last_change = Some(change);
        next.selection_forced = true;
        next.selection = next.reconciled_selection(next.selection.clone());
        next
    }

    /// Set the selection and force the view to focus it
    pub fn force_selection(&self, selection: Selection) -> Self {
        let mut next = self.clone();
        next.selection = next.reconciled_selection(selection.with_focus(true));
        next.selection_forced = true;
        next
    }

    /// Set the selection without taking focus
    pub fn accept_selection(&self, selection: Selection) -> Self {
        let mut next = self.clone();
        next.selection = next.reconciled_selection(selection);
        next.selection_forced = false;
        next
    }

    /// Put `selection` back after a mutation
    ///
    /// A focused selection is force-restored; an unfocused one is only
    /// accepted, so the editor never grabs focus it did not have.
    pub fn restore_selection(&self, selection: Selection) -> Self {
        if selection.has_focus() {
            self.force_selection(selection)
        } else {
            self.accept_selection(selection)
        }
    }

    pub fn undo(&self) -> Self {
        let mut next = self.clone();
        let Some(previous) = next.undo_stack.pop() else {
            return next;
        };
        next.redo_stack.push(std::mem::replace(&mut next.current, previous));
        next.last_change = Some(ChangeKind::Undo);
        next.selection_forced = true;
        next.selection = next.reconciled_selection(next.selection.clone());
        next
    }

    pub fn redo(&self) -> Self {
        let mut next = self.clone();
        let Some(following) = next.redo_stack.pop() else {
            return next;
        };
        next.undo_stack.push(std::mem::replace(&mut next.current, following));
        next.trim_undo_stack();
        next.last_change = Some(ChangeKind::Redo);
        next.selection_forced = true;
        next.selection = next.reconciled_selection(next.selection.clone());
        next
    }

    fn trim_undo_stack(&mut self) {
        if self.undo_stack.len() > self.undo_limit {
            let excess = self.undo_stack.len() - self.undo_limit;
            self.undo_stack.drain(..excess);
        }
    }

    /// Keep the selection pointing into the current content
    fn reconciled_selection(&self, selection: Selection) -> Selection {
        if self.current.validate_range(selection.range()).is_ok() {
            return selection;
        }
        let caret = TextPoint::new(self.current.first_block().key(), 0);
        Selection::new(TextRange::collapsed_at(caret)).with_focus(selection.has_focus())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::{InlineStyle, TextRange};
    use pretty_assertions::assert_eq;

    const BOLD: InlineStyle = InlineStyle::from_static("BOLD");

    fn bolded(state: &EditorState) -> ContentState {
        let key = state.content().first_block().key();
        state
            .content()
            .add_style(&TextRange::within_block(key, 0..2), &BOLD)
            .unwrap()
    }

    #[test]
    fn test_push_records_undo_step() {
        let state = EditorState::new(ContentState::from_text("hello"));
        let next = state.push(bolded(&state), ChangeKind::ChangeInlineStyle);

        assert_eq!(next.undo_stack(), &[state.content().clone()]);
        assert_eq!(next.last_change(), Some(ChangeKind::ChangeInlineStyle));
        assert!(next.must_force_selection());
    }

    #[test]
    fn test_push_without_undo_leaves_stacks_alone() {
        let state = EditorState::new(ContentState::from_text("hello"));
        let next = state
            .set_allow_undo(false)
            .push(bolded(&state), ChangeKind::ChangeInlineStyle)
            .set_allow_undo(true);

        assert!(next.undo_stack().is_empty());
        assert!(next.allows_undo());
        assert_ne!(next.content(), state.content());
    }

    #[test]
    fn test_undo_and_redo() {
        let state = EditorState::new(ContentState::from_text("hello"));
        let styled = state.push(bolded(&state), ChangeKind::ChangeInlineStyle);

        let undone = styled.undo();
        assert_eq!(undone.content(), state.content());
        assert_eq!(undone.redo_stack().len(), 1);
        assert_eq!(undone.last_change(), Some(ChangeKind::Undo));

        let redone = undone.redo();
        assert_eq!(redone.content(), styled.content());
        assert!(redone.redo_stack().is_empty());
    }

    #[test]
    fn test_undo_on_empty_history_is_noop() {
        let state = EditorState::new(ContentState::from_text("hello"));
        assert_eq!(state.undo(), state);
        assert_eq!(state.redo(), state);
    }

    #[test]
    fn test_undo_limit_drops_oldest() {
        let mut state = EditorState::new(ContentState::from_text("hello")).with_undo_limit(2);
        let first = state.content().clone();
        for _ in 0..3 {
            state = state.push(bolded(&state), ChangeKind::ChangeInlineStyle);
        }
        assert_eq!(state.undo_stack().len(), 2);
        assert!(state.undo_stack().iter().all(|content| *content != first));
    }

    #[test]
    fn test_force_versus_accept_selection() {
        let state = EditorState::new(ContentState::from_text("hello"));
        let key = state.content().first_block().key();
        let caret = Selection::caret(TextPoint::new(key, 3));

        let forced = state.force_selection(caret.clone());
        assert!(forced.must_force_selection());
        assert!(forced.selection().has_focus());

        let accepted = state.accept_selection(caret.clone());
        assert!(!accepted.must_force_selection());
        assert!(!accepted.selection().has_focus());
        assert_eq!(accepted.selection(), &caret);
    }

    #[test]
    fn test_selection_in_missing_block_is_reset() {
        let state = EditorState::new(ContentState::from_text("hello"));
        let stray = Selection::caret(TextPoint::new(crate::editing::BlockKey::generate(), 0));

        let accepted = state.accept_selection(stray);
        assert_eq!(
            accepted.selection().range().start.block,
            state.content().first_block().key()
        );
    }
}
