//! Survey submission endpoint.

use axum::{Json, Router, extract::State, routing::post};
use serde::Serialize;
use serde_json::Value;
use survey_common::AppResult;

use crate::state::AppState;

/// Submission response.
#[derive(Serialize)]
pub struct SubmitResponse {
    pub success: bool,
    pub response_id: String,
    pub message: &'static str,
}

/// Record a survey submission.
///
/// The payload is taken as arbitrary JSON; the recorder validates shape,
/// size and the optional `survey_token` before anything is persisted.
async fn submit(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> AppResult<Json<SubmitResponse>> {
    let response_id = state.submission_service.record(&payload).await?;

    Ok(Json(SubmitResponse {
        success: true,
        response_id,
        message: "調査回答を正常に保存しました",
    }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/submit", post(submit))
}
