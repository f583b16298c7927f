use std::fmt;

use serde::{Deserialize, Serialize};

use crate::editing::InlineStyle;

/// The fixed set of highlight types
///
/// A kind doubles as the name of the inline style that paints it, and
/// `<NAME>_SELECTED` paints the active highlight of that kind.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HighlightKind {
    Comment,
    Annotation,
}

impl HighlightKind {
    pub const ALL: [HighlightKind; 2] = [HighlightKind::Comment, HighlightKind::Annotation];

    pub const fn style_name(self) -> &'static str {
        match self {
            HighlightKind::Comment => "COMMENT",
            HighlightKind::Annotation => "ANNOTATION",
        }
    }

    pub const fn selected_style_name(self) -> &'static str {
        match self {
            HighlightKind::Comment => "COMMENT_SELECTED",
            HighlightKind::Annotation => "ANNOTATION_SELECTED",
        }
    }

    pub const fn style(self) -> InlineStyle {
        InlineStyle::from_static(self.style_name())
    }

    pub const fn selected_style(self) -> InlineStyle {
        InlineStyle::from_static(self.selected_style_name())
    }

    /// Every style owned by highlights, base and selected
    pub fn recognized_styles() -> impl Iterator<Item = InlineStyle> {
        Self::ALL
            .into_iter()
            .flat_map(|kind| [kind.style(), kind.selected_style()])
    }

    pub fn is_highlight_style(style: &InlineStyle) -> bool {
        Self::ALL.into_iter().any(|kind| {
            style.name() == kind.style_name() || style.name() == kind.selected_style_name()
        })
    }
}

impl fmt::Display for HighlightKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.style_name())
    }
}
