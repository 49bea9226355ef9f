//! Tera rendering engine: [`Renderer`] turns a [`Document`] into file content.
//!
//! Embedded templates are baked into the binary; a user template directory
//! may override any of them by relative name (e.g. `licenses/deed.html`).

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tera::Tera;

use lexpub_core::types::Catalog;

use crate::context::{
    to_tera_context, BranchStatusCtx, LegalCodeCtx, MetadataDoc, StatusIndexCtx,
};
use crate::error::RenderError;
use crate::routes::{Document, RenderFn};

// ---------------------------------------------------------------------------
// Embedded templates: baked into the binary at compile time via include_str!
// ---------------------------------------------------------------------------

const TPLS: &[(&str, &str)] = &[
    ("base.html", include_str!("templates/base.html")),
    ("status/index.html", include_str!("templates/status/index.html")),
    ("status/branch.html", include_str!("templates/status/branch.html")),
    ("licenses/deed.html", include_str!("templates/licenses/deed.html")),
    (
        "licenses/legalcode.html",
        include_str!("templates/licenses/legalcode.html"),
    ),
];

/// Extensions picked up from a user template directory.
const TEMPLATE_EXTENSIONS: &[&str] = &["html", "htm", "xml"];

// ---------------------------------------------------------------------------
// Template loading helpers
// ---------------------------------------------------------------------------

fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> RenderError {
    RenderError::Io { path: path.into(), source }
}

fn normalize_template_name(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

fn collect_template_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), RenderError> {
    let entries = std::fs::read_dir(dir).map_err(|e| io_err(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| io_err(dir, e))?;
        let path = entry.path();
        let meta = entry.metadata().map_err(|e| io_err(&path, e))?;
        if meta.is_dir() {
            collect_template_files(&path, out)?;
        } else if meta.is_file() {
            out.push(path);
        }
    }
    Ok(())
}

/// Templates under `dir` with an html, htm or xml extension, named by their
/// path relative to `dir`; they replace embedded templates of the same name.
fn load_user_templates(dir: &Path) -> Result<Vec<(String, String)>, RenderError> {
    if !dir.exists() {
        return Ok(vec![]);
    }
    let mut files = Vec::new();
    collect_template_files(dir, &mut files)?;
    let mut templates = Vec::new();
    for path in files {
        let is_template = path
            .extension()
            .and_then(|s| s.to_str())
            .is_some_and(|ext| TEMPLATE_EXTENSIONS.contains(&ext));
        if !is_template {
            continue;
        }
        let rel = path.strip_prefix(dir).unwrap_or(path.as_path());
        let name = normalize_template_name(rel);
        let contents = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
        templates.push((name, contents));
    }
    Ok(templates)
}

fn build_tera(user_template_dir: Option<&Path>) -> Result<Tera, RenderError> {
    let mut templates: HashMap<String, String> = HashMap::new();
    for (name, content) in TPLS {
        templates.insert((*name).to_string(), (*content).to_string());
    }
    if let Some(dir) = user_template_dir {
        for (name, content) in load_user_templates(dir)? {
            templates.insert(name, content);
        }
    }

    // Autoescaping is keyed on the `.html` suffix of each template name.
    let mut tera = Tera::default();
    let items: Vec<(String, String)> = templates.into_iter().collect();
    tera.add_raw_templates(items)?;
    Ok(tera)
}

// ---------------------------------------------------------------------------
// Renderer
// ---------------------------------------------------------------------------

/// A rendered document ready to be written under the output tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    pub url: String,
    /// Path relative to the output tree.
    pub relpath: PathBuf,
    /// Symlink names to create in the same directory, pointing at `relpath`.
    pub symlinks: Vec<String>,
    pub content: String,
}

/// Renders every [`Document`] kind. Create once and reuse.
pub struct Renderer {
    tera: Tera,
}

impl Renderer {
    /// Construct a [`Renderer`] with embedded templates only.
    pub fn new() -> Result<Self, RenderError> {
        Self::with_templates(None)
    }

    /// Construct a [`Renderer`], letting templates in `user_template_dir`
    /// override the embedded ones.
    pub fn with_templates(user_template_dir: Option<&Path>) -> Result<Self, RenderError> {
        let tera = build_tera(user_template_dir)?;
        Ok(Renderer { tera })
    }

    /// Render `doc` from `catalog`.
    ///
    /// Returns [`RenderError::MissingTranslation`] for deeds in a language the
    /// catalog has no deed translation for.
    pub fn render(
        &self,
        catalog: &Catalog,
        doc: &Document<'_>,
    ) -> Result<RenderedDocument, RenderError> {
        let url = doc.url();
        if let Document::Deed(lc) = doc {
            if !catalog.has_deed_translation(&lc.language_code) {
                return Err(RenderError::MissingTranslation {
                    language: lc.language_code.clone(),
                    url,
                });
            }
        }

        let content = match doc.render_fn() {
            RenderFn::Template(name) => {
                let ctx = match doc {
                    Document::StatusIndex => to_tera_context(&StatusIndexCtx::from_catalog(catalog))?,
                    Document::BranchStatus(branch) => {
                        to_tera_context(&BranchStatusCtx::new(catalog, branch))?
                    }
                    Document::Deed(lc) | Document::LegalCode(lc) => {
                        to_tera_context(&LegalCodeCtx::new(catalog, lc))?
                    }
                    Document::Metadata => tera::Context::new(),
                };
                self.tera.render(name, &ctx)?
            }
            RenderFn::MetadataYaml => serde_yaml::to_string(&MetadataDoc::from_catalog(catalog))?,
        };

        let (relpath, symlinks) = doc.file_and_links(catalog);
        Ok(RenderedDocument {
            url,
            relpath,
            symlinks,
            content,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
