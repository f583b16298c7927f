/*!
 * # Editing Core Module
 *
 * The document model the highlight overlays sit on top of.
 *
 * ## Architecture Overview
 *
 * ### 1. Blocks with stable keys
 * - A document is an ordered list of **blocks**, each addressed by a [`BlockKey`]
 * - Keys are opaque (UUID v4) and survive every edit to the block's text
 * - Block text lives in an **`xi_rope::Rope`**; offsets are UTF-8 byte offsets
 *
 * ### 2. Inline styles
 * - Each block carries a set of [`StyleSpan`]s: a named [`InlineStyle`] over a byte range
 * - Spans of the same style never overlap; adjacent spans are merged
 * - Styles this crate does not know about are carried through untouched
 *
 * ### 3. Immutable snapshots
 * - [`ContentState`] is an immutable value; every operation returns a new one
 * - Blocks are shared between snapshots via `Arc` and cloned on write
 * - The highlight store is a sibling field of the blocks, so one snapshot
 *   holds text, styles and highlights together
 *
 * ### 4. Revisions and undo
 * - [`EditorState`] wraps the current snapshot with the selection, the undo and
 *   redo stacks and the focus flags
 * - `push` records a new revision tagged with a [`ChangeKind`]; recording can be
 *   switched off for bookkeeping mutations such as highlight redraws
 *
 * ### 5. Command-based editing
 * - Text edits are expressed as [`Cmd`]s that compile to xi-rope **Deltas**
 * - Style spans, stored highlight ranges and the selection are transformed
 *   through the same delta, so overlays follow the text they annotate
 *
 * ## Module Structure
 *
 * - **`block`**: `BlockKey` and `Block`
 * - **`style`**: `InlineStyle`, span set operations and style runs
 * - **`range`**: `TextPoint` / `TextRange` and their canonical string form
 * - **`content`**: `ContentState` snapshots and `DocumentError`
 * - **`selection`**: `Selection` with its focus flag
 * - **`editor_state`**: `EditorState`, revisions and undo/redo
 * - **`commands`**: `Cmd` and delta compilation
 *
 * ## Usage Pattern
 *
 * ```rust
 * use marginalia_engine::editing::*;
 *
 * let content = ContentState::from_text("First block\nSecond block");
 * let first = content.first_block().key();
 * let state = EditorState::new(content);
 *
 * let state = state
 *     .apply(Cmd::InsertText {
 *         at: TextPoint::new(first, 0),
 *         text: "Our ".to_string(),
 *     })
 *     .unwrap();
 *
 * assert_eq!(state.content().plain_text(), "Our First block\nSecond block");
 * assert_eq!(state.undo().content().plain_text(), "First block\nSecond block");
 * ```
 */

pub mod block;
pub mod commands;
pub mod content;
pub mod editor_state;
pub mod range;
pub mod selection;
pub mod style;

pub use block::{Block, BlockKey};
pub use commands::Cmd;
pub use content::{ContentState, DocumentError};
pub use editor_state::{ChangeKind, DEFAULT_UNDO_LIMIT, EditorState};
pub use range::{RangeParseError, TextPoint, TextRange};
pub use selection::Selection;
pub use style::{InlineStyle, StyleRun, StyleSpan};
