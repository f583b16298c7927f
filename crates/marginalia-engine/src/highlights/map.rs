use serde::{Deserialize, Serialize};
use xi_rope::delta::Transformer;
use xi_rope::{Delta, RopeInfo};

use crate::editing::{BlockKey, TextPoint, TextRange};
use crate::highlights::Highlight;

/// Insertion-ordered mapping from range to highlight
///
/// Iteration yields entries in the order they were first inserted. Inserting
/// over an existing range replaces its highlight in place, keeping the
/// original position. Redraw picks the active highlight by this order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<HighlightEntry>", into = "Vec<HighlightEntry>")]
pub struct HighlightMap {
    entries: Vec<(TextRange, Highlight)>,
}

/// One stored highlight as it appears in serialized documents
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightEntry {
    pub range: TextRange,
    #[serde(flatten)]
    pub highlight: Highlight,
}

impl HighlightMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, range: &TextRange) -> Option<&Highlight> {
        self.position(range).map(|index| &self.entries[index].1)
    }

    pub fn contains_range(&self, range: &TextRange) -> bool {
        self.position(range).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TextRange, &Highlight)> {
        self.entries.iter().map(|(range, highlight)| (range, highlight))
    }

    pub fn ranges(&self) -> impl Iterator<Item = &TextRange> {
        self.entries.iter().map(|(range, _)| range)
    }

    /// Insert or replace; returns the previous highlight for `range`
    pub fn insert(&mut self, range: TextRange, highlight: Highlight) -> Option<Highlight> {
        match self.position(&range) {
            Some(index) => Some(std::mem::replace(&mut self.entries[index].1, highlight)),
            None => {
                self.entries.push((range, highlight));
                None
            }
        }
    }

    pub fn remove(&mut self, range: &TextRange) -> Option<Highlight> {
        let index = self.position(range)?;
        Some(self.entries.remove(index).1)
    }

    /// Merge `other` into `self`; entries of `other` win on conflicting ranges
    pub fn merge(&mut self, other: HighlightMap) {
        for (range, highlight) in other.entries {
            self.insert(range, highlight);
        }
    }

    /// Carry ranges anchored in `key` through a text delta on that block
    ///
    /// Ranges whose text is deleted entirely are dropped; collapsed ranges
    /// move as a caret would. When two ranges land on the same key, the one
    /// inserted first is kept.
    pub(crate) fn transform_block(&self, key: BlockKey, delta: &Delta<RopeInfo>) -> Self {
        let mut transformer = Transformer::new(delta);
        let mut next = HighlightMap::new();

        for (range, highlight) in &self.entries {
            if !range.touches_block(key) {
                next.insert_if_absent(*range, highlight.clone());
                continue;
            }

            let collapsed = range.is_collapsed();
            let mut moved = *range;
            if range.start.block == key {
                moved.start = TextPoint::new(key, transformer.transform(range.start.offset, true));
            }
            if range.end.block == key {
                // A collapsed end takes the start's bias so the range never reverses
                moved.end = TextPoint::new(key, transformer.transform(range.end.offset, collapsed));
            }

            if !collapsed && moved.is_single_block() && moved.start.offset >= moved.end.offset {
                log::warn!("Dropping highlight on {range}: its text was deleted");
                continue;
            }
            if !next.insert_if_absent(moved, highlight.clone()) {
                log::warn!("Dropping highlight on {range}: it now coincides with an earlier one");
            }
        }
        next
    }

    /// Drop every highlight with an edge in `key`
    pub(crate) fn without_block(&self, key: BlockKey) -> Self {
        self.entries
            .iter()
            .filter(|(range, _)| !range.touches_block(key))
            .cloned()
            .collect()
    }

    fn insert_if_absent(&mut self, range: TextRange, highlight: Highlight) -> bool {
        if self.contains_range(&range) {
            return false;
        }
        self.entries.push((range, highlight));
        true
    }

    fn position(&self, range: &TextRange) -> Option<usize> {
        self.entries.iter().position(|(stored, _)| stored == range)
    }
}

impl FromIterator<(TextRange, Highlight)> for HighlightMap {
    fn from_iter<I: IntoIterator<Item = (TextRange, Highlight)>>(iter: I) -> Self {
        let mut map = HighlightMap::new();
        for (range, highlight) in iter {
            map.insert(range, highlight);
        }
        map
    }
}

impl From<Vec<HighlightEntry>> for HighlightMap {
    fn from(entries: Vec<HighlightEntry>) -> Self {
        entries
            .into_iter()
            .map(|entry| (entry.range, entry.highlight))
            .collect()
    }
}

impl From<HighlightMap> for Vec<HighlightEntry> {
    fn from(map: HighlightMap) -> Self {
        map.entries
            .into_iter()
            .map(|(range, highlight)| HighlightEntry { range, highlight })
            .collect()
    }
}
