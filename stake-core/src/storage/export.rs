use crate::error::Result;
use crate::types::RoundRecord;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

const EXPORT_PREFIX: &str = "stake_guesser_history";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportFormat {
    Text,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Text => "txt",
            ExportFormat::Json => "json",
        }
    }
}

/// Dump the history into a new timestamped file under `dir`.
///
/// Existing exports are never touched: a name collision gets a numeric suffix.
pub fn export_history(history: &[RoundRecord], dir: &Path, format: ExportFormat) -> Result<PathBuf> {
    let content = match format {
        ExportFormat::Text => history
            .iter()
            .map(|record| format!("{}\n", record))
            .collect::<String>(),
        ExportFormat::Json => serde_json::to_string_pretty(history)?,
    };

    std::fs::create_dir_all(dir)?;

    let stamp = Utc::now().timestamp();
    let mut attempt = 0u32;
    loop {
        let name = if attempt == 0 {
            format!("{}_{}.{}", EXPORT_PREFIX, stamp, format.extension())
        } else {
            format!("{}_{}_{}.{}", EXPORT_PREFIX, stamp, attempt, format.extension())
        };
        let path = dir.join(name);

        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(mut file) => {
                file.write_all(content.as_bytes())?;
                tracing::info!("Exported {} rounds to {}", history.len(), path.display());
                return Ok(path);
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => attempt += 1,
            Err(e) => return Err(e.into()),
        }
    }
}
