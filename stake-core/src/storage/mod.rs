pub mod export;
pub mod leaderboard_store;
pub mod session_store;

pub use export::{export_history, ExportFormat};
pub use leaderboard_store::LeaderboardStore;
pub use session_store::SessionStore;

use crate::error::{StakeError, Result};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Replace `path` with `bytes` so readers see either the old or the new file.
///
/// The data goes to a temporary file in the same directory first and is then
/// renamed over the destination.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    std::fs::create_dir_all(parent)
        .map_err(|e| StakeError::internal(format!("Failed to create directory: {}", e)))?;

    let mut file = NamedTempFile::new_in(parent)?;
    file.write_all(bytes)?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| StakeError::Io(e.error))?;

    Ok(())
}
