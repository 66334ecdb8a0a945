//! File-backed memory document.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::record::MemoryRecord;
use crate::error::Result;

/// A [`MemoryRecord`] bound to a JSON file.
#[derive(Clone, Debug)]
pub struct MemoryStore {
    path: PathBuf,
    pub record: MemoryRecord,
}

impl MemoryStore {
    /// Open the document at `path`.
    ///
    /// Never fails: a missing file gives an empty record, invalid UTF-8 is
    /// decoded lossily, and unparseable or misshapen content falls back to
    /// defaults field by field.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let record = match fs::read(&path) {
            Ok(bytes) => {
                let text = String::from_utf8_lossy(&bytes);
                match serde_json::from_str(&text) {
                    Ok(value) => MemoryRecord::from_value_lenient(value),
                    Err(e) => {
                        warn!(path = %path.display(), error = %e, "memory file unreadable, starting empty");
                        MemoryRecord::default()
                    }
                }
            }
            Err(e) => {
                debug!(path = %path.display(), error = %e, "no memory file, starting empty");
                MemoryRecord::default()
            }
        };
        Self { path, record }
    }

    /// Backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the sanitized record as pretty JSON.
    ///
    /// The text goes to a sibling temporary file first and is then renamed
    /// over the target, so a reader never sees a partial document.
    ///
    /// # Errors
    /// Returns [`MafiaError::Io`](crate::MafiaError::Io) if the file cannot
    /// be written, or [`MafiaError::Json`](crate::MafiaError::Json) if the
    /// record cannot be encoded.
    pub fn save(&self) -> Result<()> {
        let text = serde_json::to_string_pretty(&self.record.to_sanitized_value()?)?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, text.as_bytes())?;
        if let Err(e) = fs::rename(&tmp, &self.path) {
            let _ = fs::remove_file(&tmp);
            warn!(path = %self.path.display(), error = %e, "memory save failed");
            return Err(e.into());
        }
        info!(
            path = %self.path.display(),
            lines = self.record.dialogue_history.len(),
            "memory saved"
        );
        Ok(())
    }
}
