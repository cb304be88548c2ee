//! git-timelapse: clones a repository, walks a commit range and reports how
//! its file tree and file contents changed along the way.

pub mod analysis;
pub mod config;
pub mod error;
pub mod git;
pub mod models;
pub mod routes;
pub mod store;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use config::Config;
pub use routes::AppState;

/// The full HTTP application with CORS and request tracing.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    routes::create_router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
