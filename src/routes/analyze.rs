use axum::{extract::rejection::JsonRejection, extract::State, routing::post, Json, Router};

use crate::analysis::Analyzer;
use crate::error::Result;
use crate::models::{AnalysisResponse, AnalyzeRequest};
use crate::routes::AppState;

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/analyze", post(analyze))
        .with_state(state)
}

async fn analyze(
    State(state): State<AppState>,
    payload: std::result::Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalysisResponse>> {
    let Json(request) = payload?;
    let analyzer = Analyzer::new(&state.config, state.store.as_ref(), &state.content_cache);
    let response = analyzer.analyze(request).await?;
    Ok(Json(response))
}
