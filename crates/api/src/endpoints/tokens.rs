//! Admin token lifecycle endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get},
};
use serde::{Deserialize, Serialize};
use survey_common::AppResult;
use survey_core::{IssueTokenInput, TokenScope};
use survey_db::entities::survey_token;

use crate::state::AppState;

/// Create token request.
#[derive(Debug, Deserialize)]
pub struct CreateTokenRequest {
    #[serde(default = "default_max_responses")]
    pub max_responses: i32,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_expires_hours")]
    pub expires_hours: i64,
}

const fn default_max_responses() -> i32 {
    1
}

const fn default_expires_hours() -> i64 {
    24
}

/// Created token response.
#[derive(Serialize)]
pub struct CreatedTokenResponse {
    pub success: bool,
    pub token: String,
    pub survey_url: String,
    pub max_responses: i32,
    pub expires_at: String,
}

/// One token in a listing.
#[derive(Serialize)]
pub struct TokenInfo {
    pub token: String,
    pub created_at: String,
    pub expires_at: String,
    pub max_responses: i32,
    pub current_responses: i32,
    pub is_active: bool,
    pub description: Option<String>,
}

impl From<survey_token::Model> for TokenInfo {
    fn from(model: survey_token::Model) -> Self {
        Self {
            token: model.token,
            created_at: model.created_at.to_rfc3339(),
            expires_at: model.expires_at.to_rfc3339(),
            max_responses: model.max_responses,
            current_responses: model.current_responses,
            is_active: model.is_active,
            description: model.description,
        }
    }
}

/// Token listing response.
#[derive(Serialize)]
pub struct TokenListResponse {
    pub success: bool,
    pub tokens: Vec<TokenInfo>,
}

/// Issue an admin-scoped token.
async fn create_token(
    State(state): State<AppState>,
    Json(req): Json<CreateTokenRequest>,
) -> AppResult<Json<CreatedTokenResponse>> {
    let issued = state
        .token_service
        .issue(
            TokenScope::Admin,
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

/// List all tokens, newest first.
async fn list_tokens(State(state): State<AppState>) -> AppResult<Json<TokenListResponse>> {
    let tokens = state.token_service.list().await?;

    Ok(Json(TokenListResponse {
        success: true,
        tokens: tokens.into_iter().map(TokenInfo::from).collect(),
    }))
}

/// Disable response.
#[derive(Serialize)]
pub struct DisabledResponse {
    pub success: bool,
}

/// Disable a token.
async fn disable_token(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> AppResult<Json<DisabledResponse>> {
    state.token_service.disable(&token).await?;

    Ok(Json(DisabledResponse { success: true }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_tokens).post(create_token))
        .route("/{token}", delete(disable_token))
}
