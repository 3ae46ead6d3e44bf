use chrono::Utc;
use parking_lot::RwLock;
use std::collections::HashMap;
use uuid::Uuid;

use super::model::Document;
use crate::engine;
use crate::template::model::Template;

/// In-memory document store. Doubles as the document persistence service:
/// `create` runs the placeholder substitution and stores the result.
#[derive(Default)]
pub struct DocumentStore {
    documents: RwLock<HashMap<Uuid, Document>>,
}

impl DocumentStore {
    /// Generate and persist a document for one data mapping.
    pub fn create(
        &self,
        name: &str,
        template: &Template,
        user_id: Uuid,
        data: &HashMap<String, String>,
    ) -> Document {
        let document = Document {
            id: Uuid::new_v4(),
            name: name.to_string(),
            template_id: template.id,
            data: data.clone(),
            generated_content: engine::substitute(&template.content, data),
            user_id,
            created_at: Utc::now(),
        };
        self.documents.write().insert(document.id, document.clone());
        document
    }

    pub fn get(&self, id: &Uuid) -> Option<Document> {
        self.documents.read().get(id).cloned()
    }

    pub fn remove(&self, id: &Uuid) -> Option<Document> {
        self.documents.write().remove(id)
    }

    pub fn list_by_user(&self, user_id: &Uuid) -> Vec<Document> {
        let mut own: Vec<Document> = self
            .documents
            .read()
            .values()
            .filter(|document| document.user_id == *user_id)
            .cloned()
            .collect();
        own.sort_by_key(|document| document.created_at);
        own
    }
}
