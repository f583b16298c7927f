use crate::editing::{TextPoint, TextRange};

/// The user's selection and whether the editor currently holds input focus
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selection {
    range: TextRange,
    has_focus: bool,
}

impl Selection {
    /// Unfocused selection over `range`
    pub fn new(range: TextRange) -> Self {
        Self {
            range,
            has_focus: false,
        }
    }

    /// Unfocused caret at `point`
    pub fn caret(point: TextPoint) -> Self {
        Self::new(TextRange::collapsed_at(point))
    }

    pub fn with_focus(mut self, has_focus: bool) -> Self {
        self.has_focus = has_focus;
        self
    }

    pub fn range(&self) -> &TextRange {
        &self.range
    }

    pub fn has_focus(&self) -> bool {
        self.has_focus
    }

    pub fn is_collapsed(&self) -> bool {
        self.range.is_collapsed()
    }

    /// The caret, if the selection is collapsed
    pub fn cursor(&self) -> Option<&TextRange> {
        self.is_collapsed().then_some(&self.range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::BlockKey;

    #[test]
    fn test_cursor_only_for_collapsed_selection() {
        let key = BlockKey::generate();
        let caret = Selection::caret(TextPoint::new(key, 3));
        assert_eq!(caret.cursor(), Some(&TextRange::collapsed_at(TextPoint::new(key, 3))));

        let span = Selection::new(TextRange::within_block(key, 1..4));
        assert_eq!(span.cursor(), None);
    }

    #[test]
    fn test_focus_flag() {
        let key = BlockKey::generate();
        let caret = Selection::caret(TextPoint::new(key, 0));
        assert!(!caret.has_focus());
        assert!(caret.with_focus(true).has_focus());
    }
}
