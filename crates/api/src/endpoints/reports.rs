//! Reporting endpoints for the admin dashboard.

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;
use survey_common::AppResult;
use survey_core::{FreeTextAnalysis, Statistics, StoredResponse};

use crate::state::AppState;

/// Aggregate statistics.
async fn statistics(State(state): State<AppState>) -> AppResult<Json<Statistics>> {
    Ok(Json(state.report_service.statistics().await?))
}

/// All stored responses with decoded payloads.
async fn responses(State(state): State<AppState>) -> AppResult<Json<Vec<StoredResponse>>> {
    Ok(Json(state.report_service.responses().await?))
}

/// Free-text statistics and recent entries.
async fn free_text_analysis(State(state): State<AppState>) -> AppResult<Json<FreeTextAnalysis>> {
    Ok(Json(state.report_service.free_text_analysis().await?))
}

/// CSV export response.
#[derive(Serialize)]
pub struct ExportResponse {
    pub success: bool,
    pub data: String,
    pub count: usize,
}

/// Export all responses as CSV.
async fn export(State(state): State<AppState>) -> AppResult<Json<ExportResponse>> {
    let export = state.report_service.export().await?;

    Ok(Json(ExportResponse {
        success: true,
        data: export.data,
        count: export.count,
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/statistics", get(statistics))
        .route("/responses", get(responses))
        .route("/free-text-analysis", get(free_text_analysis))
        .route("/export", get(export))
}
