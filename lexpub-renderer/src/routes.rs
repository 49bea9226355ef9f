//! Route table: logical documents, their URLs and their output paths.
//!
//! | Document       | URL                       | Output path                                   |
//! |----------------|---------------------------|-----------------------------------------------|
//! | StatusIndex    | `/dev/status/`            | `status/index.html`                           |
//! | BranchStatus   | `/status/<id>/`           | `status/<id>.html`                            |
//! | Deed           | `<base>/deed.<lang>`      | `<base>/deed.<lang>.html`                     |
//! | LegalCode      | `<base>/legalcode.<lang>` | `<base>/legalcode.<lang>.html`                |
//! | Metadata       | `/licenses/metadata.yaml` | `licenses/metadata.yaml`                      |
//!
//! `<base>` is `<category>/<unit>/<version>[/<jurisdiction>]`.

use std::path::PathBuf;

use lexpub_core::types::{Catalog, DocumentKind, LegalCode, TranslationBranch};

/// One publishable document.
#[derive(Debug, Clone, Copy)]
pub enum Document<'a> {
    StatusIndex,
    BranchStatus(&'a TranslationBranch),
    Deed(&'a LegalCode),
    LegalCode(&'a LegalCode),
    Metadata,
}

/// How a document's content is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderFn {
    /// Render the named tera template.
    Template(&'static str),
    /// Serialize the catalog metadata as YAML.
    MetadataYaml,
}

impl<'a> Document<'a> {
    /// URL the document would be served under.
    pub fn url(&self) -> String {
        match self {
            Document::StatusIndex => "/dev/status/".to_string(),
            Document::BranchStatus(branch) => format!("/status/{}/", branch.id),
            Document::Deed(lc) => lc.deed_url(),
            Document::LegalCode(lc) => lc.legal_code_url(),
            Document::Metadata => "/licenses/metadata.yaml".to_string(),
        }
    }

    pub fn render_fn(&self) -> RenderFn {
        match self {
            Document::StatusIndex => RenderFn::Template("status/index.html"),
            Document::BranchStatus(_) => RenderFn::Template("status/branch.html"),
            Document::Deed(_) => RenderFn::Template("licenses/deed.html"),
            Document::LegalCode(_) => RenderFn::Template("licenses/legalcode.html"),
            Document::Metadata => RenderFn::MetadataYaml,
        }
    }

    /// Output path relative to the output tree, plus symlink names to create
    /// next to it.
    pub fn file_and_links(&self, catalog: &Catalog) -> (PathBuf, Vec<String>) {
        match self {
            Document::StatusIndex => (PathBuf::from("status/index.html"), vec![]),
            Document::BranchStatus(branch) => {
                (PathBuf::from(format!("status/{}.html", branch.id)), vec![])
            }
            Document::Deed(lc) => legal_code_file_and_links(catalog, lc, DocumentKind::Deed),
            Document::LegalCode(lc) => {
                legal_code_file_and_links(catalog, lc, DocumentKind::LegalCode)
            }
            Document::Metadata => (PathBuf::from("licenses/metadata.yaml"), vec![]),
        }
    }
}

/// `<base>/<kind>.<lang>.html`; the default language of the jurisdiction also
/// gets `<kind>.html` (and `index.html` for deeds).
pub fn legal_code_file_and_links(
    catalog: &Catalog,
    legal_code: &LegalCode,
    kind: DocumentKind,
) -> (PathBuf, Vec<String>) {
    let filename = format!("{}.{}.html", kind.as_str(), legal_code.language_code);
    let relpath = PathBuf::from(legal_code.base_path()).join(filename);

    let mut symlinks = Vec::new();
    let default_language = catalog.default_language(legal_code.jurisdiction_code.as_deref());
    if legal_code.language_code == default_language {
        symlinks.push(format!("{}.html", kind.as_str()));
        if kind == DocumentKind::Deed {
            symlinks.push("index.html".to_string());
        }
    }
    (relpath, symlinks)
}
