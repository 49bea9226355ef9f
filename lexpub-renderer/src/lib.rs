//! # lexpub-renderer
//!
//! Renders catalog documents (status pages, deeds, legal codes, metadata) to
//! strings, together with the output path and symlinks each one gets.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use lexpub_core::Catalog;
//! use lexpub_renderer::{Document, Renderer};
//!
//! fn render_legal_codes(catalog: &Catalog) {
//!     if let Ok(renderer) = Renderer::new() {
//!         for lc in &catalog.legal_codes {
//!             if let Ok(doc) = renderer.render(catalog, &Document::LegalCode(lc)) {
//!                 println!("{}: {} bytes", doc.relpath.display(), doc.content.len());
//!             }
//!         }
//!     }
//! }
//! ```

pub mod context;
pub mod engine;
pub mod error;
pub mod routes;

pub use engine::{RenderedDocument, Renderer};
pub use error::RenderError;
pub use routes::{Document, RenderFn};
