//! # lexpub-publish
//!
//! Output tree rebuild and git publication.
//!
//! Call [`pipeline::run`] with a [`PublishScope`] to rebuild the output tree
//! and commit it to every open translation branch, a single branch, or
//! nowhere (local-only rebuild).

pub mod cleaner;
pub mod distill;
pub mod error;
pub mod legacy;
pub mod pipeline;
pub mod publisher;
pub mod sink;
pub mod writer;

pub use distill::DistillReport;
pub use error::PublishError;
pub use pipeline::PublishScope;
pub use publisher::{BranchOutcome, BranchReport, Publisher, COMMIT_MESSAGE};
pub use sink::{GitSink, OutputSink};
