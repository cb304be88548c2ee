use axum::{extract::State, routing::get, Json, Router};

use crate::error::Result;
use crate::models::RepositoryListResponse;
use crate::routes::AppState;

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/repositories", get(list_repositories))
        .with_state(state)
}

async fn list_repositories(State(state): State<AppState>) -> Result<Json<RepositoryListResponse>> {
    let repositories = state.store.list()?;
    Ok(Json(RepositoryListResponse { repositories }))
}
