//! Generated documents - persistence, single-document generation and export.

pub mod handlers;
pub mod model;
pub mod store;

pub use model::{Document, DocumentDto};
pub use store::DocumentStore;
