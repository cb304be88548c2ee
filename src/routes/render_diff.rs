use axum::{extract::rejection::JsonRejection, routing::post, Json, Router};

use crate::analysis::DiffView;
use crate::error::Result;
use crate::models::{RenderDiffRequest, RenderDiffResponse};
use crate::routes::AppState;

/// Playback position used when the client sends none: the finished change.
const DEFAULT_PROGRESS: f32 = 1.0;

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/render-diff", post(render_diff))
        .with_state(state)
}

async fn render_diff(
    payload: std::result::Result<Json<RenderDiffRequest>, JsonRejection>,
) -> Result<Json<RenderDiffResponse>> {
    let Json(request) = payload?;
    let view = DiffView::new(
        &request.before,
        &request.after,
        request.progress.unwrap_or(DEFAULT_PROGRESS),
    );
    Ok(Json(view.into_response()))
}
