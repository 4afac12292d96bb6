//! Support layer for the rich-text page editor
//!
//! The editor itself lives in the host UI. This module keeps its undo
//! history and turns toolbar actions into edits on an [`EditorSurface`].

mod commands;
mod history;
pub mod markup;

pub use commands::{
    Alignment, BlockTag, EditorCommands, EditorSurface, ListKind, NativeCommand, SelectionRange,
    TableCell,
};
pub use history::{DEFAULT_DEBOUNCE, EditorHistory};
