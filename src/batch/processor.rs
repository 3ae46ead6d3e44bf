//! Row-by-row batch processing with per-row failure isolation.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use super::models::{BatchGenerationRequest, BatchItemResult, BatchRowError, ItemStatus};
use super::BatchError;
use crate::auth::model::User;
use crate::document::store::DocumentStore;
use crate::engine;
use crate::render;
use crate::template::model::Template;

pub const DEFAULT_FORMAT: &str = "txt";

/// Resolve the document name for one row: substitute `${key}` placeholders
/// from the row (unknown keys stay verbatim) and append the 1-based row
/// number. An empty base name yields `document_<n>`.
pub fn resolve_document_name(
    base: &str,
    row: &HashMap<String, String>,
    index: usize,
) -> String {
    if base.is_empty() {
        return format!("document_{}", index + 1);
    }
    format!("{}_{}", engine::substitute(base, row), index + 1)
}

/// The formats a request actually renders: the requested list, or plain text
/// when none were given.
pub fn effective_formats(formats: &[String]) -> Vec<String> {
    if formats.is_empty() {
        vec![DEFAULT_FORMAT.to_string()]
    } else {
        formats.to_vec()
    }
}

/// Process every row of the request in submission order.
///
/// Each row is an independent unit of work: any failure is recorded as a
/// `BatchRowError` carrying the row's index and original data, and the
/// remaining rows still run. Returns the success count plus the ordered
/// outcome and error lists.
pub fn process_rows(
    request: &BatchGenerationRequest,
    template: &Template,
    actor: Option<&User>,
    staging_dir: &Path,
    documents: &DocumentStore,
) -> (usize, Vec<BatchItemResult>, Vec<BatchRowError>) {
    let formats = effective_formats(&request.formats);
    let mut outcomes = Vec::with_capacity(request.data_rows.len());
    let mut errors = Vec::new();
    let mut success_count = 0;

    for (index, row) in request.data_rows.iter().enumerate() {
        let mut item = BatchItemResult {
            row_index: index,
            document_name: resolve_document_name(&request.name, row, index),
            status: ItemStatus::Failed,
            document_id: None,
        };

        match process_row(
            &mut item,
            row,
            template,
            actor,
            request.guest_mode,
            &formats,
            staging_dir,
            documents,
        ) {
            Ok(()) => {
                item.status = ItemStatus::Success;
                success_count += 1;
            }
            Err(err) => {
                log::warn!("batch row {} failed: {}", index, err);
                // A failed row leaves no trace in the archive, including
                // formats it managed to stage before the failure.
                for format in &formats {
                    let file_name = format!("{}.{}", item.document_name, format);
                    if sanitize_filename::sanitize(&file_name) == file_name {
                        let _ = fs::remove_file(staging_dir.join(&file_name));
                    }
                }
                errors.push(BatchRowError {
                    row_index: index as i32,
                    error_message: err.to_string(),
                    data: row.clone(),
                });
            }
        }

        outcomes.push(item);
    }

    (success_count, outcomes, errors)
}

/// Run one row through persistence and every requested format.
///
/// The persisted document id is written onto `item` as soon as it exists, so
/// a later render failure still reports which record was created.
#[allow(clippy::too_many_arguments)]
fn process_row(
    item: &mut BatchItemResult,
    row: &HashMap<String, String>,
    template: &Template,
    actor: Option<&User>,
    guest_mode: bool,
    formats: &[String],
    staging_dir: &Path,
    documents: &DocumentStore,
) -> Result<(), BatchError> {
    if !guest_mode {
        if let Some(user) = actor {
            let document = documents.create(&item.document_name, template, user.id, row);
            item.document_id = Some(document.id);
        }
    }

    for format in formats {
        let bytes = render::render_row(template, row, format)?;
        let file_name = format!("{}.{}", item.document_name, format);
        // Row data flows into the file name; reject anything that would
        // resolve outside the staging directory.
        if sanitize_filename::sanitize(&file_name) != file_name {
            return Err(BatchError::UnsafeDocumentName(file_name));
        }
        fs::write(staging_dir.join(&file_name), bytes).map_err(BatchError::Staging)?;
    }

    Ok(())
}
