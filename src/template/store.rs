use parking_lot::RwLock;
use std::collections::HashMap;
use uuid::Uuid;

use super::model::Template;

/// In-memory template store. Empty at startup, lives for the process.
#[derive(Default)]
pub struct TemplateStore {
    templates: RwLock<HashMap<Uuid, Template>>,
}

impl TemplateStore {
    pub fn insert(&self, template: Template) {
        self.templates.write().insert(template.id, template);
    }

    pub fn get(&self, id: &Uuid) -> Option<Template> {
        self.templates.read().get(id).cloned()
    }

    pub fn list(&self) -> Vec<Template> {
        let mut all: Vec<Template> = self.templates.read().values().cloned().collect();
        all.sort_by_key(|t| t.created_at);
        all
    }
}
