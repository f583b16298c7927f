use std::borrow::Cow;
use std::collections::BTreeSet;
use std::fmt;
use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Name of an inline style (e.g. `BOLD`, `COMMENT`)
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InlineStyle(Cow<'static, str>);

impl InlineStyle {
    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    pub fn new(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InlineStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A style applied over a byte range of one block's text
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct StyleSpan {
    pub style: InlineStyle,
    pub range: Range<usize>,
}

/// Maximal run of text sharing exactly the same set of styles
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StyleRun {
    pub range: Range<usize>,
    pub styles: BTreeSet<InlineStyle>,
}

impl StyleRun {
    pub fn has_style(&self, style: &InlineStyle) -> bool {
        self.styles.contains(style)
    }
}

/// Add `style` over `range`, merging with overlapping or touching spans of the same style
pub(crate) fn add_span(spans: &mut Vec<StyleSpan>, style: &InlineStyle, range: Range<usize>) {
    if range.is_empty() {
        return;
    }

    let mut ranges: Vec<Range<usize>> = spans
        .iter()
        .filter(|span| span.style == *style)
        .map(|span| span.range.clone())
        .collect();
    ranges.push(range);
    ranges.sort_by_key(|r| (r.start, r.end));

    let mut merged: Vec<Range<usize>> = Vec::with_capacity(ranges.len());
    for r in ranges {
        match merged.last_mut() {
            // Touching spans merge too, so a style never splits into two adjacent spans
            Some(last) if r.start <= last.end => last.end = last.end.max(r.end),
            _ => merged.push(r),
        }
    }

    spans.retain(|span| span.style != *style);
    spans.extend(merged.into_iter().map(|range| StyleSpan {
        style: style.clone(),
        range,
    }));
    sort_spans(spans);
}

/// Remove `style` from `range`, splitting spans that extend past either edge
pub(crate) fn remove_span(spans: &mut Vec<StyleSpan>, style: &InlineStyle, range: Range<usize>) {
    if range.is_empty() {
        return;
    }

    let mut kept = Vec::with_capacity(spans.len());
    for span in spans.drain(..) {
        let overlaps = span.range.start < range.end && range.start < span.range.end;
        if span.style != *style || !overlaps {
            kept.push(span);
            continue;
        }
        if span.range.start < range.start {
            kept.push(StyleSpan {
                style: span.style.clone(),
                range: span.range.start..range.start,
            });
        }
        if range.end < span.range.end {
            kept.push(StyleSpan {
                style: span.style,
                range: range.end..span.range.end,
            });
        }
    }
    *spans = kept;
    sort_spans(spans);
}

/// Styles covering the character starting at `offset`
pub(crate) fn styles_at(spans: &[StyleSpan], offset: usize) -> BTreeSet<InlineStyle> {
    spans
        .iter()
        .filter(|span| span.range.contains(&offset))
        .map(|span| span.style.clone())
        .collect()
}

/// Split `0..len` into maximal runs of identical style sets
pub(crate) fn style_runs(spans: &[StyleSpan], len: usize) -> Vec<StyleRun> {
    if len == 0 {
        return Vec::new();
    }

    let mut boundaries: BTreeSet<usize> = BTreeSet::from([0, len]);
    for span in spans {
        boundaries.insert(span.range.start.min(len));
        boundaries.insert(span.range.end.min(len));
    }

    let points: Vec<usize> = boundaries.into_iter().collect();
    let mut runs: Vec<StyleRun> = Vec::new();
    for window in points.windows(2) {
        let (start, end) = (window[0], window[1]);
        if start == end {
            continue;
        }
        let styles = styles_at(spans, start);
        match runs.last_mut() {
            Some(last) if last.styles == styles => last.range.end = end,
            _ => runs.push(StyleRun {
                range: start..end,
                styles,
            }),
        }
    }
    runs
}

fn sort_spans(spans: &mut [StyleSpan]) {
    spans.sort_by(|a, b| {
        (a.range.start, a.range.end, &a.style).cmp(&(b.range.start, b.range.end, &b.style))
    });
}
