//! API route handlers.
//!
//! - `analyze`: clone + full analysis (POST /api/analyze)
//! - `file_content`: before/after text of one file (POST /api/file-content)
//! - `render_diff`: segmented line diff for playback (POST /api/render-diff)
//! - `repositories`: previously analysed repositories (GET /api/repositories)

pub mod analyze;
pub mod file_content;
pub mod render_diff;
pub mod repositories;

use std::sync::Arc;

use axum::Router;

use crate::analysis::ContentCache;
use crate::config::Config;
use crate::store::{MemoryStore, RepositoryStore};

/// Shared by every handler. Cloning only bumps reference counts.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn RepositoryStore>,
    pub content_cache: Arc<ContentCache>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self::with_store(config, Arc::new(MemoryStore::new()))
    }

    pub fn with_store(config: Config, store: Arc<dyn RepositoryStore>) -> Self {
        Self {
            config: Arc::new(config),
            store,
            content_cache: Arc::new(ContentCache::new()),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(analyze::routes(state.clone()))
        .merge(file_content::routes(state.clone()))
        .merge(render_diff::routes(state.clone()))
        .merge(repositories::routes(state))
}
