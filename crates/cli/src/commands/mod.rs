//! Command handlers for the narrative CLI.

pub mod chunk;
pub mod index;
pub mod preprocess;
pub mod search;

pub use chunk::ChunkCommand;
pub use index::IndexCommand;
pub use preprocess::PreprocessCommand;
pub use search::SearchCommand;

use narrative_core::config::AppConfig;
use std::path::{Path, PathBuf};

/// Resolve a command path against the configured workspace.
pub(crate) fn resolve(config: &AppConfig, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        config.workspace.join(path)
    }
}
