//! Distill: render every catalog document into the output tree.

use std::path::Path;

use lexpub_core::{catalog, types::Catalog};
use lexpub_renderer::{Document, RenderedDocument, Renderer};

use crate::error::PublishError;
use crate::writer::{relative_symlink, write_file};

/// Counts of what a distill (plus legacy copy) produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DistillReport {
    pub files_written: usize,
    pub symlinks_created: usize,
    /// Deeds skipped for lack of a translation.
    pub deeds_skipped: usize,
    pub legacy_files_copied: usize,
}

/// Render status pages, deeds, legal codes and metadata under `output_dir`.
///
/// A deed without a translation is skipped; any other render failure aborts.
pub fn distill(
    renderer: &Renderer,
    catalog: &Catalog,
    output_dir: &Path,
) -> Result<DistillReport, PublishError> {
    let mut report = DistillReport::default();
    tracing::debug!("distilling into {}", output_dir.display());

    save(renderer, catalog, output_dir, &Document::StatusIndex, &mut report)?;
    for branch in catalog::open_branches(catalog) {
        save(renderer, catalog, output_dir, &Document::BranchStatus(branch), &mut report)?;
    }

    for (group, legal_codes) in catalog::valid_groups(catalog) {
        tracing::info!("Publishing {group}");
        for legal_code in legal_codes {
            match save(renderer, catalog, output_dir, &Document::Deed(legal_code), &mut report) {
                Ok(()) => {}
                Err(PublishError::Render(e)) if e.is_missing_translation() => {
                    tracing::debug!("    skipped: {e}");
                    report.deeds_skipped += 1;
                }
                Err(e) => return Err(e),
            }
            save(renderer, catalog, output_dir, &Document::LegalCode(legal_code), &mut report)?;
        }
    }

    save(renderer, catalog, output_dir, &Document::Metadata, &mut report)?;
    Ok(report)
}

fn save(
    renderer: &Renderer,
    catalog: &Catalog,
    output_dir: &Path,
    doc: &Document<'_>,
    report: &mut DistillReport,
) -> Result<(), PublishError> {
    let RenderedDocument {
        relpath,
        symlinks,
        content,
        ..
    } = renderer.render(catalog, doc)?;
    write_file(output_dir, &relpath, &content)?;
    report.files_written += 1;
    for name in &symlinks {
        relative_symlink(output_dir, &relpath, name)?;
        report.symlinks_created += 1;
    }
    Ok(())
}
