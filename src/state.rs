//! Shared application state.
//!
//! All stores are in-memory: they start empty, live for the process lifetime
//! and are not shared across service instances. A clustered deployment would
//! need an external store, which is out of scope here.

use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use crate::auth::store::UserStore;
use crate::batch::store::JobStore;
use crate::document::store::DocumentStore;
use crate::guest::GuestLimiter;
use crate::template::store::TemplateStore;

const DEFAULT_TEMP_DIR: &str = "./temp";

#[derive(Clone)]
pub struct AppState {
    pub templates: Arc<TemplateStore>,
    pub documents: Arc<DocumentStore>,
    pub users: Arc<UserStore>,
    pub jobs: Arc<JobStore>,
    pub guest_limiter: Arc<GuestLimiter>,
    /// Root for per-job staging directories and finished archives.
    pub temp_root: PathBuf,
}

impl AppState {
    pub fn new() -> Self {
        dotenvy::dotenv().ok();
        let temp_root = env::var("TEMP_DIR").unwrap_or_else(|_| {
            log::info!("TEMP_DIR not set, using default: {}", DEFAULT_TEMP_DIR);
            DEFAULT_TEMP_DIR.to_string()
        });
        Self::with_temp_root(PathBuf::from(temp_root))
    }

    pub fn with_temp_root(temp_root: PathBuf) -> Self {
        Self {
            templates: Arc::new(TemplateStore::default()),
            documents: Arc::new(DocumentStore::default()),
            users: Arc::new(UserStore::default()),
            jobs: Arc::new(JobStore::default()),
            guest_limiter: Arc::new(GuestLimiter::default()),
            temp_root,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
