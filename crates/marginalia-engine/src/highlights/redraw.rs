use std::ops::Range;

use crate::editing::{ChangeKind, ContentState, DocumentError, EditorState, TextRange};
use crate::highlights::{Highlight, HighlightKind, range_contains};

/// The highlight under the caret
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActiveHighlight {
    pub range: TextRange,
    pub highlight: Highlight,
}

/// Result of a redraw: the resynchronized state and the active highlight, if any
#[derive(Clone, Debug, PartialEq)]
pub struct Redraw {
    pub state: EditorState,
    pub active: Option<ActiveHighlight>,
}

/// Resynchronize highlight styling with the store
///
/// ## Pipeline
///
/// 1. **Strip**: remove every highlight style from every block
/// 2. **Reapply**: paint each stored range with its kind's style, in store
///    order, and pick the first range containing the caret as active
/// 3. **Active layer**: paint `<KIND>_SELECTED` over the active range after
///    all base styles, so no later base style covers it
/// 4. **Selection restore**: force a focused selection back, accept an
///    unfocused one
///
/// Steps 1-3 run on a private snapshot; only the finished content is pushed,
/// with undo recording switched off so the redraw never shows up in the
/// user's undo history.
pub fn redraw_highlights(state: &EditorState) -> Result<Redraw, DocumentError> {
    let selection = state.selection().clone();

    let stripped = strip_highlight_styles(state.content());
    let (content, active) = reapply_highlight_styles(stripped, selection.cursor())?;

    if let Some(active) = &active {
        log::debug!(
            "Active {} highlight on {}",
            active.highlight.kind,
            active.range
        );
    }

    let next = state
        .set_allow_undo(false)
        .push(content, ChangeKind::ChangeInlineStyle)
        .set_allow_undo(true)
        .restore_selection(selection);

    Ok(Redraw {
        state: next,
        active,
    })
}

/// Remove all highlight styles (base and selected) from every block
///
/// Blocks without highlight styling are left shared with `content`.
pub fn strip_highlight_styles(content: &ContentState) -> ContentState {
    let mut next = content.clone();
    let recognized: Vec<_> = HighlightKind::recognized_styles().collect();

    for block in content.blocks() {
        let runs = highlight_runs(block);
        if runs.is_empty() {
            continue;
        }
        log::trace!("Stripping {} highlight runs from {}", runs.len(), block.key());

        // The block came from `content`, so the key is always present
        if let Ok(target) = next.block_mut(block.key()) {
            for run in runs {
                for style in &recognized {
                    target.remove_style(style, run.clone());
                }
            }
        }
    }
    next
}

/// Maximal contiguous runs carrying any highlight style
fn highlight_runs(block: &crate::editing::Block) -> Vec<Range<usize>> {
    let mut runs: Vec<Range<usize>> = Vec::new();
    for run in block.style_runs() {
        if !run.styles.iter().any(HighlightKind::is_highlight_style) {
            continue;
        }
        match runs.last_mut() {
            Some(last) if last.end == run.range.start => last.end = run.range.end,
            _ => runs.push(run.range),
        }
    }
    runs
}

fn reapply_highlight_styles(
    content: ContentState,
    cursor: Option<&TextRange>,
) -> Result<(ContentState, Option<ActiveHighlight>), DocumentError> {
    if content.highlights().is_empty() {
        return Ok((content, None));
    }

    let mut styled = content.clone();
    let mut active: Option<ActiveHighlight> = None;

    for (range, highlight) in content.highlights().iter() {
        log::trace!("Painting {} over {range}", highlight.kind);
        styled = styled.add_style(range, &highlight.kind.style())?;

        if active.is_none() && range_contains(&styled, cursor, range) {
            active = Some(ActiveHighlight {
                range: *range,
                highlight: highlight.clone(),
            });
        }
    }

    if let Some(active) = &active {
        styled = styled.add_style(&active.range, &active.highlight.kind.selected_style())?;
    }

    Ok((styled, active))
}
