//! Output format renderers.
//!
//! Turns a template plus one data row into the final bytes for a requested
//! format. DOCX and PDF have dedicated renderers; everything else falls back
//! to the substituted text itself.

pub mod docx;
pub mod pdf;

#[cfg(test)]
mod tests;

use std::collections::HashMap;
use thiserror::Error;

use crate::engine;
use crate::template::model::Template;

/// Errors that can occur while rendering a document.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to load PDF font family from {dir}: {message}")]
    FontLoad { dir: String, message: String },
    #[error("PDF rendering failed: {0}")]
    Pdf(#[source] genpdf::error::Error),
    #[error("DOCX template payload is not a valid package: {0}")]
    DocxRead(#[source] zip::result::ZipError),
    #[error("failed to assemble DOCX package: {0}")]
    DocxZip(#[source] zip::result::ZipError),
    #[error("failed to write DOCX entry: {0}")]
    DocxIo(#[source] std::io::Error),
    #[error("word/document.xml is missing from the DOCX template")]
    DocxMissingDocumentXml,
}

/// Render one data row against `template` in the requested `format`.
///
/// Formats are matched case-insensitively. `docx` prefers the template's
/// binary payload when one was uploaded; `pdf` always goes through text
/// substitution first; any other format yields the substituted text's raw
/// bytes. A row requested in N formats is rendered N independent times.
pub fn render_row(
    template: &Template,
    data: &HashMap<String, String>,
    format: &str,
) -> Result<Vec<u8>, RenderError> {
    match format.to_ascii_lowercase().as_str() {
        "docx" => match &template.docx_file {
            Some(payload) => docx::render_binary_template(payload, data),
            None => docx::from_text(&engine::substitute(&template.content, data)),
        },
        "pdf" => pdf::from_text(&engine::substitute(&template.content, data)),
        _ => Ok(engine::substitute(&template.content, data).into_bytes()),
    }
}
