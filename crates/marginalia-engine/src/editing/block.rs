use std::collections::BTreeSet;
use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use xi_rope::delta::Transformer;
use xi_rope::{Delta, Rope, RopeInfo};

use crate::editing::style::{self, InlineStyle, StyleRun, StyleSpan};

/// Opaque block identifier, stable for the lifetime of the block
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockKey(pub Uuid);

impl BlockKey {
    /// Generate a fresh random key
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for BlockKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for BlockKey {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Atomic unit of document content
///
/// A block owns its text (an `xi_rope::Rope`) and the inline style spans laid
/// over it. Offsets are byte offsets into the block's UTF-8 text.
#[derive(Clone)]
pub struct Block {
    key: BlockKey,
    text: Rope,
    styles: Vec<StyleSpan>,
}

impl Block {
    /// Create a block with a freshly generated key
    pub fn new(text: &str) -> Self {
        Self::with_key(BlockKey::generate(), text)
    }

    pub fn with_key(key: BlockKey, text: &str) -> Self {
        Self {
            key,
            text: Rope::from(text),
            styles: Vec::new(),
        }
    }

    pub fn key(&self) -> BlockKey {
        self.key
    }

    pub fn text(&self) -> String {
        self.text.to_string()
    }

    /// Whether `offset` falls between two characters of the text
    pub fn is_char_boundary(&self, offset: usize) -> bool {
        let len = self.len();
        offset == 0 || offset == len || (offset < len && self.text.is_codepoint_boundary(offset))
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.len() == 0
    }

    pub fn styles(&self) -> &[StyleSpan] {
        &self.styles
    }

    /// Styles covering the character starting at `offset`
    pub fn styles_at(&self, offset: usize) -> BTreeSet<InlineStyle> {
        style::styles_at(&self.styles, offset)
    }

    /// Maximal runs of identical style sets covering the whole block
    pub fn style_runs(&self) -> Vec<StyleRun> {
        style::style_runs(&self.styles, self.len())
    }

    /// Slice of the block text
    pub fn slice(&self, range: Range<usize>) -> String {
        let len = self.len();
        let start = range.start.min(len);
        let end = range.end.min(len).max(start);
        self.text.slice_to_cow(start..end).into_owned()
    }

    pub(crate) fn add_style(&mut self, style: &InlineStyle, range: Range<usize>) {
        style::add_span(&mut self.styles, style, range);
    }

    pub(crate) fn remove_style(&mut self, style: &InlineStyle, range: Range<usize>) {
        style::remove_span(&mut self.styles, style, range);
    }

    /// Apply a text delta, carrying style spans along with the text they cover
    pub(crate) fn apply_delta(&mut self, delta: &Delta<RopeInfo>) {
        self.text = delta.apply(&self.text);

        let mut transformer = Transformer::new(delta);
        let spans = std::mem::take(&mut self.styles);
        for span in spans {
            // Text typed at either edge of a span stays outside it
            let start = transformer.transform(span.range.start, true);
            let end = transformer.transform(span.range.end, false);
            if start < end {
                style::add_span(&mut self.styles, &span.style, start..end);
            }
        }
    }
}

impl PartialEq for Block {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
            && self.styles == other.styles
            && self.text.to_string() == other.text.to_string()
    }
}

impl Eq for Block {}

impl fmt::Debug for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Block")
            .field("key", &self.key)
            .field("text", &self.text.to_string())
            .field("styles", &self.styles)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use xi_rope::delta::Builder;

    const BOLD: InlineStyle = InlineStyle::from_static("BOLD");

    fn insert_delta(block: &Block, at: usize, text: &str) -> Delta<RopeInfo> {
        let mut builder = Builder::new(block.len());
        builder.replace(at..at, Rope::from(text));
        builder.build()
    }

    #[test]
    fn test_block_key_display_roundtrip() {
        let key = BlockKey::generate();
        let parsed: BlockKey = key.to_string().parse().unwrap();
        assert_eq!(parsed, key);
    }

    #[test]
    fn test_new_blocks_get_distinct_keys() {
        assert_ne!(Block::new("a").key(), Block::new("a").key());
    }

    #[test]
    fn test_insert_before_span_shifts_it() {
        let mut block = Block::new("hello world");
        block.add_style(&BOLD, 6..11);

        let delta = insert_delta(&block, 0, ">> ");
        block.apply_delta(&delta);

        assert_eq!(block.text(), ">> hello world");
        assert_eq!(block.styles()[0].range, 9..14);
        assert_eq!(block.slice(9..14), "world");
    }

    #[test]
    fn test_insert_at_span_edges_does_not_grow_it() {
        let mut block = Block::new("abcdef");
        block.add_style(&BOLD, 2..4);

        let delta = insert_delta(&block, 4, "XX");
        block.apply_delta(&delta);
        let delta = insert_delta(&block, 2, "YY");
        block.apply_delta(&delta);

        assert_eq!(block.text(), "abYYcdXXef");
        assert_eq!(block.styles()[0].range, 4..6);
    }

    #[test]
    fn test_deleting_styled_text_drops_span() {
        let mut block = Block::new("abcdef");
        block.add_style(&BOLD, 2..4);

        let mut builder = Builder::new(block.len());
        builder.delete(1..5);
        block.apply_delta(&builder.build());

        assert_eq!(block.text(), "af");
        assert!(block.styles().is_empty());
    }

    #[test]
    fn test_char_boundaries_follow_utf8() {
        let block = Block::new("héllo");
        assert!(block.is_char_boundary(0));
        assert!(block.is_char_boundary(1));
        assert!(!block.is_char_boundary(2));
        assert!(block.is_char_boundary(3));
        assert!(block.is_char_boundary(6));
        assert!(!block.is_char_boundary(7));
    }

    #[test]
    fn test_slice_clamps_to_text() {
        let block = Block::new("short");
        assert_eq!(block.slice(2..100), "ort");
        assert_eq!(block.slice(50..60), "");
    }
}
