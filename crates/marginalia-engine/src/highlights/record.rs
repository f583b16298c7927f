use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::highlights::HighlightKind;

/// A comment or annotation attached to a range
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Highlight {
    #[serde(rename = "type")]
    pub kind: HighlightKind,
    pub author: String,
    pub email: String,
    /// Milliseconds since the Unix epoch
    pub timestamp: u64,
    pub message: String,
}

impl Highlight {
    /// New highlight stamped with the current time
    pub fn new(
        kind: HighlightKind,
        author: impl Into<String>,
        email: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            author: author.into(),
            email: email.into(),
            timestamp: now_millis(),
            message: message.into(),
        }
    }

    pub fn with_timestamp(mut self, timestamp: u64) -> Self {
        self.timestamp = timestamp;
        self
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_highlight_is_timestamped() {
        let highlight = Highlight::new(HighlightKind::Comment, "Ada", "ada@example.com", "Typo");
        assert!(highlight.timestamp > 0);
        assert_eq!(highlight.with_timestamp(42).timestamp, 42);
    }
}
