//! Highlight overlays: comments and annotations bound to text ranges.
//!
//! The store ([`HighlightMap`]) lives on every [`ContentState`] snapshot. The
//! inline styles that make highlights visible are derived from it: callers
//! change the store through [`add_highlight`] / [`replace_highlights`] and then
//! call [`redraw_highlights`] to bring the styling back in line and find the
//! highlight under the caret.
//!
//! [`ContentState`]: crate::editing::ContentState

pub mod kind;
pub mod map;
pub mod record;
pub mod redraw;
pub mod resolver;
pub mod store;

pub use kind::HighlightKind;
pub use map::{HighlightEntry, HighlightMap};
pub use record::Highlight;
pub use redraw::{ActiveHighlight, Redraw, redraw_highlights, strip_highlight_styles};
pub use resolver::range_contains;
pub use store::{add_highlight, get_highlights, replace_highlights};
