//! `publish.yaml`: locations of the data repository, output tree, legacy
//! assets and catalog.
//!
//! Relative paths in the file are resolved against the directory holding the
//! file. Loading validates that the output tree sits inside the data
//! repository; nothing is rendered with an invalid configuration.

use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// File name looked up in the working directory and the user config dir.
pub const CONFIG_FILE_NAME: &str = "publish.yaml";

/// On-disk shape of `publish.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigFile {
    pub data_repository_dir: PathBuf,
    pub distill_dir: PathBuf,
    pub legacy_dir: PathBuf,
    pub static_root: PathBuf,
    pub catalog: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub templates_dir: Option<PathBuf>,
    #[serde(default = "default_remote")]
    pub remote: String,
    #[serde(default = "default_branch")]
    pub default_branch: String,
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_branch() -> String {
    "main".to_string()
}

/// Validated configuration with absolute, normalised paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishConfig {
    pub repository_dir: PathBuf,
    pub output_dir: PathBuf,
    pub legacy_dir: PathBuf,
    pub static_root: PathBuf,
    pub catalog_path: PathBuf,
    pub templates_dir: Option<PathBuf>,
    pub remote: String,
    pub default_branch: String,
}

impl PublishConfig {
    /// Resolve `file` against `base_dir` and validate it.
    pub fn from_file(file: ConfigFile, base_dir: &Path) -> Result<Self, ConfigError> {
        let resolve = |p: &Path| normalize(&base_dir.join(p));
        let config = PublishConfig {
            repository_dir: resolve(&file.data_repository_dir),
            output_dir: resolve(&file.distill_dir),
            legacy_dir: resolve(&file.legacy_dir),
            static_root: resolve(&file.static_root),
            catalog_path: resolve(&file.catalog),
            templates_dir: file.templates_dir.as_deref().map(resolve),
            remote: file.remote,
            default_branch: file.default_branch,
        };
        config.ensure_output_inside_repository()?;
        Ok(config)
    }

    /// Fails with [`ConfigError::OutputOutsideRepository`] unless the output
    /// directory equals or descends from the repository root.
    ///
    /// Comparison is per path component, so `/data2` is not inside `/data`.
    pub fn ensure_output_inside_repository(&self) -> Result<(), ConfigError> {
        if self.output_dir.starts_with(&self.repository_dir) {
            return Ok(());
        }
        Err(ConfigError::OutputOutsideRepository {
            output_dir: self.output_dir.clone(),
            repository_dir: self.repository_dir.clone(),
        })
    }

    /// Output directory relative to the repository root (`.` when equal).
    pub fn output_relpath(&self) -> PathBuf {
        match self.output_dir.strip_prefix(&self.repository_dir) {
            Ok(rel) if rel.as_os_str().is_empty() => PathBuf::from("."),
            Ok(rel) => rel.to_path_buf(),
            Err(_) => self.output_dir.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Load and validate the configuration at `path`.
pub fn load_at(path: &Path) -> Result<PublishConfig, ConfigError> {
    let path = absolute(path)?;
    let contents = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
        path: path.clone(),
        source,
    })?;
    let file: ConfigFile = serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.clone(),
        source,
    })?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("/"));
    PublishConfig::from_file(file, base_dir)
}

/// Pick the configuration file: an explicit path wins, then
/// `<cwd>/publish.yaml`, then `<config dir>/lexpub/publish.yaml`.
pub fn locate_at(
    explicit: Option<&Path>,
    cwd: &Path,
    config_dir: Option<&Path>,
) -> Result<PathBuf, ConfigError> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    let mut searched = vec![cwd.join(CONFIG_FILE_NAME)];
    if let Some(dir) = config_dir {
        searched.push(dir.join("lexpub").join(CONFIG_FILE_NAME));
    }
    match searched.iter().find(|p| p.is_file()) {
        Some(found) => Ok(found.clone()),
        None => Err(ConfigError::NotFound { searched }),
    }
}

/// `locate_at` using the process working directory and `dirs::config_dir()`.
pub fn locate(explicit: Option<&Path>) -> Result<PathBuf, ConfigError> {
    let cwd = std::env::current_dir().map_err(ConfigError::CurrentDir)?;
    locate_at(explicit, &cwd, dirs::config_dir().as_deref())
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn absolute(path: &Path) -> Result<PathBuf, ConfigError> {
    if path.is_absolute() {
        return Ok(normalize(path));
    }
    let cwd = std::env::current_dir().map_err(ConfigError::CurrentDir)?;
    Ok(normalize(&cwd.join(path)))
}

/// Lexically resolve `.` and `..` without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
