use std::{fs, path::Path};

use crate::{domain::ClosingSnapshot, errors::ClosingError};

/// Writes the provided snapshot to disk atomically by staging to a temporary file.
pub fn save_snapshot_to_file(snapshot: &ClosingSnapshot, path: &Path) -> Result<(), ClosingError> {
    if let Some(parent) = path.parent() {
        super::paths::ensure_dir(parent)?;
    }
    let tmp = path.with_extension("tmp");
    let json = serde_json::to_string_pretty(snapshot)?;
    fs::write(&tmp, json)?;
    fs::rename(tmp, path)?;
    Ok(())
}

/// Loads a snapshot from disk, returning structured errors on failure.
pub fn load_snapshot_from_file(path: &Path) -> Result<ClosingSnapshot, ClosingError> {
    let data = fs::read_to_string(path)?;
    let snapshot: ClosingSnapshot = serde_json::from_str(&data)?;
    if snapshot.schema_version > ClosingSnapshot::current_schema_version() {
        return Err(ClosingError::StorageError(format!(
            "snapshot schema v{} is newer than supported v{}",
            snapshot.schema_version,
            ClosingSnapshot::current_schema_version()
        )));
    }
    Ok(snapshot)
}
