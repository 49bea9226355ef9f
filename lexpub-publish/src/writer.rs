//! File and symlink writers for the output tree.
//!
//! ## `write_file`: atomic protocol
//!
//! 1. Normalise line endings to LF.
//! 2. Ensure the parent directory exists.
//! 3. Write to `<path>.lexpub.tmp`.
//! 4. Rename to the final path (atomic on POSIX).

use std::path::{Path, PathBuf};

use crate::error::{io_err, PublishError};

/// Atomically write `content` to `<output_dir>/<relpath>`.
///
/// Returns the absolute path written.
pub fn write_file(output_dir: &Path, relpath: &Path, content: &str) -> Result<PathBuf, PublishError> {
    let path = output_dir.join(relpath);
    let tmp = PathBuf::from(format!("{}.lexpub.tmp", path.display()));
    write_with_tmp(&path, content, &tmp)?;
    Ok(path)
}

fn write_with_tmp(path: &Path, content: &str, tmp: &Path) -> Result<(), PublishError> {
    let normalized = content.replace("\r\n", "\n");

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }
    std::fs::write(tmp, normalized).map_err(|e| io_err(tmp, e))?;

    if let Err(e) = std::fs::rename(tmp, path) {
        let _ = std::fs::remove_file(tmp);
        return Err(io_err(path, e));
    }
    tracing::debug!("    {}", path.display());
    Ok(())
}

/// Copy `src` to `dest`, creating the destination's parent directories.
pub fn copy_file(src: &Path, dest: &Path) -> Result<(), PublishError> {
    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }
    std::fs::copy(src, dest).map_err(|e| io_err(src, e))?;
    Ok(())
}

/// Create `<output_dir>/<dir of relpath>/<name>` pointing at the file name of
/// `relpath`, i.e. a sibling link such as `deed.html -> deed.en.html`.
pub fn relative_symlink(output_dir: &Path, relpath: &Path, name: &str) -> Result<PathBuf, PublishError> {
    let target = relpath
        .file_name()
        .map(PathBuf::from)
        .ok_or_else(|| {
            io_err(
                relpath,
                std::io::Error::new(std::io::ErrorKind::InvalidInput, "path has no file name"),
            )
        })?;
    let link = match relpath.parent() {
        Some(parent) => output_dir.join(parent).join(name),
        None => output_dir.join(name),
    };
    symlink(&target, &link)?;
    Ok(link)
}

/// Create the symlink `link -> target`, with `target` taken literally.
pub fn symlink(target: &Path, link: &Path) -> Result<(), PublishError> {
    if let Some(parent) = link.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }
    platform_symlink(target, link).map_err(|e| io_err(link, e))?;
    tracing::debug!("   ^{}", link.display());
    Ok(())
}

#[cfg(unix)]
fn platform_symlink(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn platform_symlink(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::windows::fs::symlink_file(target, link)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
