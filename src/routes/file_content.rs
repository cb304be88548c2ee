use std::sync::Arc;

use axum::{extract::rejection::JsonRejection, extract::State, routing::post, Json, Router};

use crate::analysis::pipeline::{non_empty, validate_repo_url};
use crate::analysis::{ContentFetcher, ContentKey};
use crate::error::{AppError, Result};
use crate::git::{clone_bounded, create_clone_dir, BoundedGit};
use crate::models::{FileContentRequest, FileContents};
use crate::routes::AppState;

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/file-content", post(get_file_content))
        .with_state(state)
}

async fn get_file_content(
    State(state): State<AppState>,
    payload: std::result::Result<Json<FileContentRequest>, JsonRejection>,
) -> Result<Json<FileContents>> {
    let Json(request) = payload?;
    let (Some(repo_url), Some(file_path)) = (
        non_empty(request.repo_url.as_deref()),
        non_empty(request.file_path.as_deref()),
    ) else {
        return Err(AppError::BadRequest(
            "Repository URL and file path are required".to_string(),
        ));
    };
    let repo_url = validate_repo_url(Some(repo_url))?;

    let key = ContentKey::new(
        &repo_url,
        file_path,
        non_empty(request.from_commit.as_deref()),
        non_empty(request.to_commit.as_deref()),
    );
    let fetcher = ContentFetcher::new(&state.content_cache);
    if let Some(hit) = fetcher.cached(&key) {
        return Ok(Json(hit));
    }

    let repo = clone_bounded(&repo_url, create_clone_dir()?, &state.config.clone_options()).await?;
    let git = BoundedGit::new(Arc::new(repo), state.config.git_timeout);

    let contents = fetcher.fetch(&git, key).await?;
    Ok(Json(contents))
}
