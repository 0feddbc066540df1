//! Snapshot persistence shared by the address book and the notebook.
//!
//! Each store is one JSON file wrapped in a schema-version envelope:
//!
//! ```text
//! {"version": 1, "data": { ... }}
//! ```
//!
//! Files are replaced wholesale via write-temp-then-rename, so a crash
//! mid-save leaves the previous file intact. An unknown version fails the
//! load instead of guessing.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::Path;

use crate::error::{CarnetError, Result};

pub(crate) const SCHEMA_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct Envelope<T> {
    version: u32,
    data: T,
}

/// What a load found on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The file existed and was read in full.
    Loaded,
    /// No file at the path; the store keeps its (empty) state.
    MissingFile,
}

/// Reads and unwraps a snapshot. `Ok(None)` when the file does not exist.
pub(crate) fn read_snapshot<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(CarnetError::Io(err)),
    };
    let envelope: Envelope<T> = serde_json::from_str(&contents)?;
    if envelope.version != SCHEMA_VERSION {
        return Err(CarnetError::Store(format!(
            "unsupported data file version {} (expected {})",
            envelope.version, SCHEMA_VERSION
        )));
    }
    Ok(Some(envelope.data))
}

/// Writes a snapshot atomically: temp file + fsync + rename.
pub(crate) fn write_snapshot<T: Serialize>(path: &Path, data: &T) -> Result<()> {
    let envelope = Envelope {
        version: SCHEMA_VERSION,
        data,
    };
    let json = serde_json::to_string_pretty(&envelope)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let tmp_path = path.with_extension("tmp");
    {
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;
    }
    fs::rename(&tmp_path, path)?;
    Ok(())
}
