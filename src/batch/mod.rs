//! Batch document generation pipeline.
//!
//! One submission renders many data rows against a single template, each row
//! into one or more output formats. Rows are isolated units of work: a failed
//! row is recorded and the rest of the batch keeps going. Rendered files are
//! staged under a job-scoped directory, zipped into a single archive, and the
//! aggregated result is kept in an in-memory store keyed by job id for later
//! progress polls and a one-shot download.

pub mod archive;
pub mod handlers;
pub mod models;
pub mod processor;
pub mod service;
pub mod store;


use thiserror::Error;
use uuid::Uuid;

pub use models::{BatchGenerationRequest, BatchGenerationResult, BatchItemResult, BatchRowError};
pub use service::BatchDocumentService;
pub use store::JobStore;

/// Errors raised inside the batch pipeline.
///
/// Row-level failures are caught by the processor and turned into
/// `BatchRowError` entries; only `TemplateNotFound` and staging-setup
/// failures abort a submission outright.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("template {0} not found")]
    TemplateNotFound(Uuid),
    #[error(transparent)]
    Render(#[from] crate::render::RenderError),
    #[error("document name {0:?} is not a safe file name")]
    UnsafeDocumentName(String),
    #[error("I/O failure in staging directory: {0}")]
    Staging(#[source] std::io::Error),
    #[error(transparent)]
    Archive(#[from] archive::ArchiveError),
}
