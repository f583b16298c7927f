use crate::editing::{ChangeKind, DocumentError, EditorState, TextRange};
use crate::highlights::{Highlight, HighlightMap};

/// The highlight store of the current snapshot (empty if nothing was ever stored)
pub fn get_highlights(state: &EditorState) -> &HighlightMap {
    state.content().highlights()
}

/// Store `highlight` over `range` and paint its style, as one undoable revision
///
/// Existing entries are kept; an entry already stored for `range` is replaced
/// in place. Fails if `range` does not fit the document.
pub fn add_highlight(
    state: &EditorState,
    range: TextRange,
    highlight: Highlight,
) -> Result<EditorState, DocumentError> {
    let styled = state.content().add_style(&range, &highlight.kind.style())?;

    let mut highlights = styled.highlights().clone();
    log::debug!("Adding {} highlight on {range}", highlight.kind);
    if highlights.insert(range, highlight).is_some() {
        log::debug!("Replaced existing highlight on {range}");
    }

    Ok(state.push(
        styled.with_highlights(highlights),
        ChangeKind::ChangeInlineStyle,
    ))
}

/// Swap the whole store for `highlights`
///
/// The selection is restored afterwards without taking focus.
pub fn replace_highlights(state: &EditorState, highlights: HighlightMap) -> EditorState {
    let selection = state.selection().clone();
    log::debug!("Replacing highlight store with {} entries", highlights.len());

    let content = state.content().with_highlights(highlights);
    state
        .push(content, ChangeKind::ChangeBlockData)
        .accept_selection(selection)
}
