use std::fmt;
use std::ops::Range;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::editing::BlockKey;

/// Position inside a block: block key plus byte offset into its text
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextPoint {
    pub block: BlockKey,
    pub offset: usize,
}

impl TextPoint {
    pub fn new(block: BlockKey, offset: usize) -> Self {
        Self { block, offset }
    }
}

impl fmt::Display for TextPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.block, self.offset)
    }
}

/// Span of text from `start` to `end`, in document order
///
/// A range is also the key of the highlight store. Its canonical string form,
/// `<start-key>:<start-offset>..<end-key>:<end-offset>`, is only used where a
/// range crosses a serialization boundary.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TextRange {
    pub start: TextPoint,
    pub end: TextPoint,
}

impl TextRange {
    pub fn new(start: TextPoint, end: TextPoint) -> Self {
        Self { start, end }
    }

    /// Collapsed range (a caret) at `point`
    pub fn collapsed_at(point: TextPoint) -> Self {
        Self::new(point, point)
    }

    /// Range confined to a single block
    pub fn within_block(block: BlockKey, offsets: Range<usize>) -> Self {
        Self::new(
            TextPoint::new(block, offsets.start),
            TextPoint::new(block, offsets.end),
        )
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    pub fn is_single_block(&self) -> bool {
        self.start.block == self.end.block
    }

    /// True when either edge lies in `block`
    pub fn touches_block(&self, block: BlockKey) -> bool {
        self.start.block == block || self.end.block == block
    }
}

impl fmt::Display for TextRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RangeParseError {
    #[error("Malformed range key: {0}")]
    Malformed(String),
    #[error("Invalid block key in range {range}: {source}")]
    InvalidBlockKey { range: String, source: uuid::Error },
    #[error("Invalid offset in range {range}: {source}")]
    InvalidOffset {
        range: String,
        source: std::num::ParseIntError,
    },
}

fn range_key_regex() -> &'static Regex {
    static RANGE_KEY_REGEX: OnceLock<Regex> = OnceLock::new();
    RANGE_KEY_REGEX.get_or_init(|| {
        Regex::new(r"^([0-9A-Fa-f-]+):(\d+)\.\.([0-9A-Fa-f-]+):(\d+)$")
            .expect("Invalid range key regex")
    })
}

impl FromStr for TextRange {
    type Err = RangeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let captures = range_key_regex()
            .captures(s.trim())
            .ok_or_else(|| RangeParseError::Malformed(s.to_string()))?;

        let key = |index: usize| {
            captures[index]
                .parse::<BlockKey>()
                .map_err(|source| RangeParseError::InvalidBlockKey {
                    range: s.to_string(),
                    source,
                })
        };
        let offset = |index: usize| {
            captures[index]
                .parse::<usize>()
                .map_err(|source| RangeParseError::InvalidOffset {
                    range: s.to_string(),
                    source,
                })
        };

        Ok(Self::new(
            TextPoint::new(key(1)?, offset(2)?),
            TextPoint::new(key(3)?, offset(4)?),
        ))
    }
}

impl TryFrom<String> for TextRange {
    type Error = RangeParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TextRange> for String {
    fn from(range: TextRange) -> Self {
        range.to_string()
    }
}
