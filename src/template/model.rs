use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// A document template: a plain-text body with `${key}` placeholders and,
/// optionally, an uploaded DOCX file used as the binary render template.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Template {
    #[schema(example = "f1e2d3c4-b5a6-7890-1234-567890abcdef")]
    pub id: Uuid,
    #[schema(example = "Monthly report")]
    pub name: String,
    #[schema(example = "Hello ${name}, your total is ${total}.")]
    pub content: String,
    /// Raw bytes of the uploaded DOCX template; never serialized back out.
    #[serde(skip)]
    pub docx_file: Option<Vec<u8>>,
    #[schema(example = "report-template.docx")]
    pub original_file_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Template {
    pub fn new(name: String, content: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            content,
            docx_file: None,
            original_file_name: None,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTemplateRequest {
    #[schema(example = "Monthly report")]
    pub name: String,
    #[schema(example = "Hello ${name}, your total is ${total}.")]
    pub content: String,
    /// Base64-encoded DOCX file to use as the binary render template.
    pub docx_file: Option<String>,
    pub original_file_name: Option<String>,
}
