//! Legacy asset copier: RDF and plaintext files that are not rendered but
//! copied verbatim from the legacy tree.
//!
//! ```text
//! <legacy>/rdf-licenses/by-sa_3.0_xu.rdf  ->  <out>/by-sa/3.0/rdf
//! <legacy>/rdf-meta/ns.html               ->  <out>/rdf/ns.html   (+ <out>/ns.html symlink)
//! <legacy>/legalcode/by_4.0.txt           ->  <out>/licenses/by/4.0/legalcode.txt
//! ```

use std::path::{Path, PathBuf};

use crate::error::{io_err, PublishError};
use crate::writer::{copy_file, symlink};

/// User-assigned ISO 3166 code meaning "unported"; dropped from paths.
pub const UNPORTED_REGION: &str = "xu";

/// Meta files that also get a well-known symlink: `(file, link, target)`,
/// link and target relative to the output tree / link directory.
const META_SYMLINKS: &[(&str, &str, &str)] = &[
    ("index.rdf", "licenses/index.rdf", "../rdf/index.rdf"),
    ("ns.html", "ns.html", "rdf/ns.html"),
    ("schema.rdf", "schema.rdf", "rdf/schema.rdf"),
];

// ---------------------------------------------------------------------------
// Path transforms
// ---------------------------------------------------------------------------

/// `by_4.0.rdf` → `by/4.0/rdf`; `by_3.0_xu.rdf` → `by/3.0/rdf`.
///
/// Returns `None` for files without the `.rdf` suffix.
pub fn license_rdf_relpath(file_name: &str) -> Option<PathBuf> {
    let stem = file_name.strip_suffix(".rdf")?;
    let mut path: PathBuf = stem
        .split('_')
        .filter(|segment| *segment != UNPORTED_REGION)
        .collect();
    path.push("rdf");
    Some(path)
}

/// `by-nc_4.0.txt` → `licenses/by-nc/4.0/legalcode.txt`;
/// `zero_1.0.txt` → `publicdomain/zero/1.0/legalcode.txt`.
///
/// Returns `None` for files without the `.txt` suffix.
pub fn plaintext_relpath(file_name: &str) -> Option<PathBuf> {
    let stem = file_name.strip_suffix(".txt")?;
    let context = if file_name.starts_with("by") {
        "licenses"
    } else {
        "publicdomain"
    };
    let mut path = PathBuf::from(context);
    path.extend(stem.split('_'));
    path.push("legalcode.txt");
    Some(path)
}

// ---------------------------------------------------------------------------
// Copiers
// ---------------------------------------------------------------------------

/// Counts reported by the copiers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyReport {
    pub files: usize,
    pub symlinks: usize,
}

impl CopyReport {
    fn add(&mut self, other: CopyReport) {
        self.files += other.files;
        self.symlinks += other.symlinks;
    }
}

/// Run all three copiers.
pub fn copy_all(legacy_dir: &Path, output_dir: &Path) -> Result<CopyReport, PublishError> {
    let mut report = CopyReport::default();
    report.add(copy_license_rdfs(legacy_dir, output_dir)?);
    report.add(copy_meta_rdfs(legacy_dir, output_dir)?);
    report.add(copy_legal_code_plaintext(legacy_dir, output_dir)?);
    Ok(report)
}

/// `<legacy>/rdf-licenses/*.rdf` into per-license `rdf` files.
pub fn copy_license_rdfs(legacy_dir: &Path, output_dir: &Path) -> Result<CopyReport, PublishError> {
    let source_dir = legacy_dir.join("rdf-licenses");
    tracing::info!("Publishing legal code RDFs");
    let mut report = CopyReport::default();
    for name in sorted_file_names(&source_dir)? {
        let Some(relpath) = license_rdf_relpath(&name) else {
            continue;
        };
        copy_file(&source_dir.join(&name), &output_dir.join(&relpath))?;
        tracing::debug!("    {}", relpath.display());
        report.files += 1;
    }
    Ok(report)
}

/// `<legacy>/rdf-meta/*` into `rdf/`, plus the well-known symlinks.
pub fn copy_meta_rdfs(legacy_dir: &Path, output_dir: &Path) -> Result<CopyReport, PublishError> {
    let source_dir = legacy_dir.join("rdf-meta");
    let dest_dir = output_dir.join("rdf");
    std::fs::create_dir_all(&dest_dir).map_err(|e| io_err(&dest_dir, e))?;
    tracing::info!("Publishing RDF information and metadata");

    let mut report = CopyReport::default();
    for name in sorted_file_names(&source_dir)? {
        copy_file(&source_dir.join(&name), &dest_dir.join(&name))?;
        tracing::debug!("    rdf/{name}");
        report.files += 1;

        if let Some((_, link, target)) = META_SYMLINKS.iter().find(|(file, _, _)| *file == name) {
            symlink(Path::new(target), &output_dir.join(link))?;
            report.symlinks += 1;
        }
    }
    Ok(report)
}

/// `<legacy>/legalcode/*.txt` into `<context>/…/legalcode.txt`.
pub fn copy_legal_code_plaintext(
    legacy_dir: &Path,
    output_dir: &Path,
) -> Result<CopyReport, PublishError> {
    let source_dir = legacy_dir.join("legalcode");
    tracing::info!("Publishing plaintext legal code");
    let mut report = CopyReport::default();
    for name in sorted_file_names(&source_dir)? {
        let Some(relpath) = plaintext_relpath(&name) else {
            continue;
        };
        copy_file(&source_dir.join(&name), &output_dir.join(&relpath))?;
        tracing::debug!("    {}", relpath.display());
        report.files += 1;
    }
    Ok(report)
}

/// Regular files directly inside `dir`, sorted by name.
fn sorted_file_names(dir: &Path) -> Result<Vec<String>, PublishError> {
    let entries = std::fs::read_dir(dir).map_err(|e| io_err(dir, e))?;
    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| io_err(dir, e))?;
        let path = entry.path();
        if path.is_file() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();
    Ok(names)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
