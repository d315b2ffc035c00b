//! Tenant-facing endpoints: login, dashboard summary, and URL lifecycle.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get, post},
};
use serde::{Deserialize, Serialize};
use survey_common::AppResult;
use survey_core::{CompanySummary, IssueTokenInput, TokenScope};
use validator::Validate;

use super::tokens::{CreatedTokenResponse, TokenInfo};
use crate::{extractors::TenantAuth, state::AppState};

/// Login request.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub company_id: String,
    pub access_key: String,
}

/// Login response with the tenant bearer token.
#[derive(Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub token: String,
    pub company_id: String,
    pub company_name: String,
}

/// Authenticate a tenant and issue a bearer token.
async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let login = state
        .company_service
        .login(&req.company_id, &req.access_key)
        .await?;

    Ok(Json(LoginResponse {
        success: true,
        token: login.bearer_token,
        company_id: login.company.company_id,
        company_name: login.company.company_name,
    }))
}

/// Tenant dashboard roll-up.
async fn summary(
    TenantAuth(company): TenantAuth,
    State(state): State<AppState>,
) -> AppResult<Json<CompanySummary>> {
    Ok(Json(
        state
            .report_service
            .company_summary(&company.company_id)
            .await?,
    ))
}

/// URL listing response.
#[derive(Serialize)]
pub struct UrlListResponse {
    pub urls: Vec<TokenInfo>,
}

/// List the tenant's survey URLs, newest first.
async fn list_urls(
    TenantAuth(company): TenantAuth,
    State(state): State<AppState>,
) -> AppResult<Json<UrlListResponse>> {
    let tokens = state
        .token_service
        .list_for_company(&company.company_id)
        .await?;

    Ok(Json(UrlListResponse {
        urls: tokens.into_iter().map(TokenInfo::from).collect(),
    }))
}

/// Create URL request.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUrlRequest {
    #[validate(length(min = 1, message = "調査名・説明を入力してください"))]
    pub description: String,

    #[validate(range(
        min = 1,
        max = 1000,
        message = "最大回答数は1〜1000の範囲で設定してください"
    ))]
    #[serde(default = "default_max_responses")]
    pub max_responses: i32,

    #[serde(default = "default_expires_hours")]
    pub expires_hours: i64,
}

const fn default_max_responses() -> i32 {
    50
}

// 30 days
const fn default_expires_hours() -> i64 {
    720
}

/// Issue a tenant-owned survey URL.
///
/// The tenant's live-URL cap and per-URL quota ceiling are enforced by the
/// token service.
async fn create_url(
    TenantAuth(company): TenantAuth,
    State(state): State<AppState>,
    Json(req): Json<CreateUrlRequest>,
) -> AppResult<Json<CreatedTokenResponse>> {
    req.validate()?;

    let issued = state
        .token_service
        .issue(
            TokenScope::Tenant(company.company_id),
            IssueTokenInput {
                max_responses: req.max_responses,
                expires_hours: req.expires_hours,
                description: req.description,
            },
        )
        .await?;

    Ok(Json(CreatedTokenResponse {
        success: true,
        token: issued.token.token.clone(),
        survey_url: issued.survey_url,
        max_responses: issued.token.max_responses,
        expires_at: issued.token.expires_at.to_rfc3339(),
    }))
}

/// Revoke response.
#[derive(Serialize)]
pub struct RevokedResponse {
    pub success: bool,
}

/// Revoke one of the tenant's survey URLs.
async fn disable_url(
    TenantAuth(company): TenantAuth,
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> AppResult<Json<RevokedResponse>> {
    state
        .token_service
        .disable_for_company(&company.company_id, &token)
        .await?;

    Ok(Json(RevokedResponse { success: true }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/summary", get(summary))
        .route("/urls", get(list_urls).post(create_url))
        .route("/urls/{token}", delete(disable_url))
}
