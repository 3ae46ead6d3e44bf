use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use utoipa::ToSchema;
use uuid::Uuid;

/// A document generated from a template for one data mapping, owned by the
/// user who generated it.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Document {
    pub id: Uuid,
    #[schema(example = "report_7_1")]
    pub name: String,
    pub template_id: Uuid,
    /// The data row the document was generated from.
    pub data: HashMap<String, String>,
    pub generated_content: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Listing view of a document, without the rendered body.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DocumentDto {
    pub id: Uuid,
    pub name: String,
    pub template_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<&Document> for DocumentDto {
    fn from(document: &Document) -> Self {
        Self {
            id: document.id,
            name: document.name.clone(),
            template_id: document.template_id,
            created_at: document.created_at,
        }
    }
}

/// Single-document generation request.
#[derive(Debug, Deserialize, ToSchema)]
pub struct GenerateDocumentRequest {
    #[schema(example = "offer-letter")]
    pub name: String,
    pub template_id: Uuid,
    pub data: HashMap<String, String>,
}
