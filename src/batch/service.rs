//! Batch orchestrator: job id allocation, staging, processing, archiving and
//! result storage.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use uuid::Uuid;

use super::models::{BatchGenerationRequest, BatchGenerationResult, BatchRowError};
use super::store::JobStore;
use super::{archive, processor, BatchError};
use crate::auth::model::User;
use crate::document::store::DocumentStore;
use crate::state::AppState;
use crate::template::store::TemplateStore;

/// Row index used for errors not attributable to any row.
pub const ARCHIVE_ERROR_ROW_INDEX: i32 = -1;

/// Drives one batch submission end to end. The whole pipeline is synchronous;
/// callers on the async side run it through `web::block`.
pub struct BatchDocumentService {
    templates: Arc<TemplateStore>,
    documents: Arc<DocumentStore>,
    jobs: Arc<JobStore>,
    temp_root: PathBuf,
}

impl BatchDocumentService {
    pub fn new(
        templates: Arc<TemplateStore>,
        documents: Arc<DocumentStore>,
        jobs: Arc<JobStore>,
        temp_root: PathBuf,
    ) -> Self {
        Self {
            templates,
            documents,
            jobs,
            temp_root,
        }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(
            state.templates.clone(),
            state.documents.clone(),
            state.jobs.clone(),
            state.temp_root.clone(),
        )
    }

    /// Run a whole batch and return its final result.
    ///
    /// A missing template aborts the submission before any row is processed
    /// and no job record is stored. An archive failure does not: the result
    /// is still returned with the per-row outcomes, annotated with a
    /// synthetic row `-1` error, and the staging directory is preserved.
    pub fn generate_batch(
        &self,
        request: &BatchGenerationRequest,
        actor: Option<&User>,
    ) -> Result<BatchGenerationResult, BatchError> {
        let template = self
            .templates
            .get(&request.template_id)
            .ok_or(BatchError::TemplateNotFound(request.template_id))?;

        let batch_id = Uuid::new_v4();
        let staging_dir = self.temp_root.join(batch_id.to_string());
        fs::create_dir_all(&staging_dir).map_err(BatchError::Staging)?;

        log::info!(
            "batch {}: processing {} rows into {:?}",
            batch_id,
            request.data_rows.len(),
            processor::effective_formats(&request.formats)
        );

        let (success_count, results, mut errors) =
            processor::process_rows(request, &template, actor, &staging_dir, &self.documents);

        let zip_file_name = format!("{}.zip", batch_id);
        let archive_path = self.temp_root.join(&zip_file_name);
        if let Err(err) = archive::create_zip_archive(&staging_dir, &archive_path) {
            log::error!("batch {}: archive failed: {}", batch_id, err);
            errors.push(BatchRowError {
                row_index: ARCHIVE_ERROR_ROW_INDEX,
                error_message: format!("Failed to create ZIP archive: {}", err),
                data: HashMap::new(),
            });
        }

        let total = request.data_rows.len();
        let result = BatchGenerationResult {
            batch_id,
            total_documents: total,
            successful_documents: success_count,
            failed_documents: total - success_count,
            zip_file_name,
            results,
            errors,
        };

        self.jobs.insert(result.clone());
        log::info!(
            "batch {}: done, {}/{} rows succeeded",
            batch_id,
            success_count,
            total
        );
        Ok(result)
    }

    /// Stored result for a finished job, if the id is known.
    pub fn get_progress(&self, id: &Uuid) -> Option<BatchGenerationResult> {
        self.jobs.get(id)
    }

    /// Read the job's archive and delete it from disk: downloads are
    /// one-shot, a second call for the same id returns `None`.
    pub fn take_archive(&self, id: &Uuid) -> Option<(String, Vec<u8>)> {
        let zip_file_name = format!("{}.zip", id);
        let archive_path = self.temp_root.join(&zip_file_name);
        let bytes = fs::read(&archive_path).ok()?;
        if let Err(err) = fs::remove_file(&archive_path) {
            log::warn!(
                "failed to delete served archive {}: {}",
                archive_path.display(),
                err
            );
        }
        Some((zip_file_name, bytes))
    }
}
