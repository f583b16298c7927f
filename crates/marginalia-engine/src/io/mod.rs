use relative_path::RelativePath;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::editing::{
    Block, BlockKey, ContentState, DocumentError, EditorState, Selection, TextPoint,
};
use crate::highlights::HighlightMap;

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid document file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Failed to serialize document: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Inconsistent document: {0}")]
    Document(#[from] DocumentError),
}

/// On-disk layout of a document with its highlight store
///
/// ```toml
/// [[blocks]]
/// key = "6f1c0e5a-..."
/// text = "hello world"
///
/// [[highlights]]
/// range = "6f1c0e5a-...:6..6f1c0e5a-...:11"
/// type = "COMMENT"
/// author = "Ada"
/// email = "ada@example.com"
/// timestamp = 1700000000000
/// message = "Nice"
///
/// [cursor]
/// block = "6f1c0e5a-..."
/// offset = 8
/// focused = true
/// ```
///
/// Only text and the store are persisted; highlight styling is rebuilt by a
/// redraw after loading.
#[derive(Debug, Serialize, Deserialize)]
struct DocumentFile {
    blocks: Vec<BlockEntry>,
    #[serde(default, skip_serializing_if = "HighlightMap::is_empty")]
    highlights: HighlightMap,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cursor: Option<CursorEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
struct BlockEntry {
    key: BlockKey,
    text: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct CursorEntry {
    block: BlockKey,
    offset: usize,
    #[serde(default)]
    focused: bool,
}

/// Build an editor state from the TOML document format
///
/// Every stored range and the cursor must point into the loaded blocks.
pub fn parse_document(source: &str) -> Result<EditorState, IoError> {
    let file: DocumentFile = toml::from_str(source)?;

    let blocks = file
        .blocks
        .iter()
        .map(|entry| Block::with_key(entry.key, &entry.text))
        .collect();
    let content = ContentState::from_blocks(blocks)?;
    for range in file.highlights.ranges() {
        content.validate_range(range)?;
    }
    let content = content.with_highlights(file.highlights);

    let state = EditorState::new(content);
    match file.cursor {
        Some(cursor) => {
            let point = TextPoint::new(cursor.block, cursor.offset);
            state.content().validate_point(&point)?;
            let selection = Selection::caret(point).with_focus(cursor.focused);
            Ok(state.restore_selection(selection))
        }
        None => Ok(state),
    }
}

/// Serialize the current snapshot, its store and a collapsed cursor
pub fn to_toml_string(state: &EditorState) -> Result<String, IoError> {
    let content = state.content();
    let file = DocumentFile {
        blocks: content
            .blocks()
            .map(|block| BlockEntry {
                key: block.key(),
                text: block.text(),
            })
            .collect(),
        highlights: content.highlights().clone(),
        cursor: state.selection().cursor().map(|cursor| CursorEntry {
            block: cursor.start.block,
            offset: cursor.start.offset,
            focused: state.selection().has_focus(),
        }),
    };
    Ok(toml::to_string(&file)?)
}

/// Read a document file below `root`
pub fn load_document(relative_path: &RelativePath, root: &Path) -> Result<EditorState, IoError> {
    let absolute_path = relative_path.to_path(root);
    if !absolute_path.exists() {
        return Err(IoError::NotFound(absolute_path));
    }
    let source = fs::read_to_string(&absolute_path)?;
    let state = parse_document(&source)?;
    log::info!(
        "Loaded {} with {} blocks and {} highlights",
        absolute_path.display(),
        state.content().block_count(),
        state.content().highlights().len()
    );
    Ok(state)
}

/// Write `state` to a document file below `root`
pub fn save_document(
    relative_path: &RelativePath,
    root: &Path,
    state: &EditorState,
) -> Result<(), IoError> {
    let absolute_path = relative_path.to_path(root);

    // Create parent directories if they don't exist
    if let Some(parent) = absolute_path.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(&absolute_path, to_toml_string(state)?)?;
    log::info!("Saved {}", absolute_path.display());
    Ok(())
}
