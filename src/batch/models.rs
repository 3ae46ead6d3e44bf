use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use utoipa::ToSchema;
use uuid::Uuid;

/// One batch submission: many data rows against one template.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct BatchGenerationRequest {
    /// Base document name; may contain `${key}` placeholders resolved per
    /// row. Empty means `document_<n>`.
    #[serde(default)]
    #[schema(example = "report_${id}")]
    pub name: String,
    pub template_id: Uuid,
    /// Ordered data rows, one generated document (per format) each.
    pub data_rows: Vec<HashMap<String, String>>,
    /// Requested output formats; defaults to plain text when empty.
    #[serde(default)]
    pub formats: Vec<String>,
    /// When set, no Document records are persisted for the rows.
    #[serde(default)]
    pub guest_mode: bool,
}

/// Final state of one batch job, stored for the process lifetime.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BatchGenerationResult {
    pub batch_id: Uuid,
    pub total_documents: usize,
    pub successful_documents: usize,
    pub failed_documents: usize,
    #[schema(example = "8e2c5cb2-48c8-4f4e-b7ad-0a4c3f4ce9f1.zip")]
    pub zip_file_name: String,
    pub results: Vec<BatchItemResult>,
    pub errors: Vec<BatchRowError>,
}

/// Per-row outcome status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum ItemStatus {
    #[serde(rename = "SUCCESS")]
    Success,
    #[serde(rename = "FAILED")]
    Failed,
}

/// Outcome of one row of a batch.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BatchItemResult {
    pub row_index: usize,
    #[schema(example = "report_7_1")]
    pub document_name: String,
    pub status: ItemStatus,
    /// Identifier of the persisted Document record, when one was created.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_id: Option<Uuid>,
}

/// One recorded failure. Row index -1 marks an archive-level failure that is
/// not attributable to any row.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BatchRowError {
    pub row_index: i32,
    pub error_message: String,
    /// The original data row, preserved for client-side diagnosis and retry.
    pub data: HashMap<String, String>,
}
