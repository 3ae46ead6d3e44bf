use parking_lot::RwLock;
use std::collections::HashMap;
use uuid::Uuid;

use super::models::BatchGenerationResult;

/// In-memory job result store.
///
/// Entries live for the process lifetime; no eviction, no TTL. Lookups for
/// unknown ids simply return `None`. Not persisted and not shared across
/// service instances.
#[derive(Default)]
pub struct JobStore {
    jobs: RwLock<HashMap<Uuid, BatchGenerationResult>>,
}

impl JobStore {
    pub fn insert(&self, result: BatchGenerationResult) {
        self.jobs.write().insert(result.batch_id, result);
    }

    pub fn get(&self, id: &Uuid) -> Option<BatchGenerationResult> {
        self.jobs.read().get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.jobs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.read().is_empty()
    }
}
