//! Output tree cleaner.

use std::path::Path;

use crate::error::{io_err, PublishError};

/// Entry kept across rebuilds (custom domain file for the static host).
pub const RESERVED_FILE: &str = "CNAME";

/// Remove every entry of `output_dir` except [`RESERVED_FILE`].
///
/// The directory itself must exist. Symlinks are unlinked, never followed.
pub fn clean_output_dir(output_dir: &Path) -> Result<usize, PublishError> {
    let entries = std::fs::read_dir(output_dir).map_err(|e| io_err(output_dir, e))?;
    let mut removed = 0;
    for entry in entries {
        let entry = entry.map_err(|e| io_err(output_dir, e))?;
        if entry.file_name() == RESERVED_FILE {
            continue;
        }
        let path = entry.path();
        let file_type = entry.file_type().map_err(|e| io_err(&path, e))?;
        if file_type.is_dir() {
            std::fs::remove_dir_all(&path).map_err(|e| io_err(&path, e))?;
        } else {
            std::fs::remove_file(&path).map_err(|e| io_err(&path, e))?;
        }
        removed += 1;
    }
    tracing::debug!("cleaned {removed} entries from {}", output_dir.display());
    Ok(removed)
}
