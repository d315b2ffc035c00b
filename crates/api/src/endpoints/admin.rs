//! Tenant account management endpoints.
//!
//! These carry no authentication, matching the system this one replaces; a
//! deployment exposing them publicly should front them with the admin scope
//! of the shared [`survey_common::Authenticator`].

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, put},
};
use serde::{Deserialize, Serialize};
use survey_common::AppResult;
use survey_core::{CreateCompanyInput, UpdateCompanyInput};
use survey_db::entities::company_account;

use crate::state::AppState;

/// One tenant account in a listing.
#[derive(Serialize)]
pub struct CompanyInfo {
    pub company_id: String,
    pub company_name: String,
    pub access_key: String,
    pub is_active: bool,
    pub max_urls: i32,
    pub max_responses_per_url: i32,
    pub created_at: String,
}

impl From<company_account::Model> for CompanyInfo {
    fn from(model: company_account::Model) -> Self {
        Self {
            company_id: model.company_id,
            company_name: model.company_name,
            access_key: model.access_key,
            is_active: model.is_active,
            max_urls: model.max_urls,
            max_responses_per_url: model.max_responses_per_url,
            created_at: model.created_at.to_rfc3339(),
        }
    }
}

/// Tenant listing response.
#[derive(Serialize)]
pub struct CompanyListResponse {
    pub success: bool,
    pub companies: Vec<CompanyInfo>,
}

/// List all tenant accounts.
async fn list_companies(State(state): State<AppState>) -> AppResult<Json<CompanyListResponse>> {
    let companies = state.company_service.list().await?;

    Ok(Json(CompanyListResponse {
        success: true,
        companies: companies.into_iter().map(CompanyInfo::from).collect(),
    }))
}

/// Create company request.
#[derive(Debug, Deserialize)]
pub struct CreateCompanyRequest {
    pub company_id: String,
    pub company_name: String,
    pub access_key: String,
    pub max_urls: i32,
    pub max_responses_per_url: i32,
}

/// Mutation acknowledgement.
#[derive(Serialize)]
pub struct AckResponse {
    pub success: bool,
}

/// Create a tenant account.
async fn create_company(
    State(state): State<AppState>,
    Json(req): Json<CreateCompanyRequest>,
) -> AppResult<Json<AckResponse>> {
    state
        .company_service
        .create(CreateCompanyInput {
            company_id: req.company_id,
            company_name: req.company_name,
            access_key: req.access_key,
            max_urls: req.max_urls,
            max_responses_per_url: req.max_responses_per_url,
        })
        .await?;

    Ok(Json(AckResponse { success: true }))
}

/// Update company request.
#[derive(Debug, Deserialize)]
pub struct UpdateCompanyRequest {
    pub company_name: String,
    pub access_key: String,
    pub max_urls: i32,
    pub max_responses_per_url: i32,
    pub is_active: bool,
}

/// Update a tenant account.
async fn update_company(
    State(state): State<AppState>,
    Path(company_id): Path<String>,
    Json(req): Json<UpdateCompanyRequest>,
) -> AppResult<Json<AckResponse>> {
    state
        .company_service
        .update(
            &company_id,
            UpdateCompanyInput {
                company_name: req.company_name,
                access_key: req.access_key,
                max_urls: req.max_urls,
                max_responses_per_url: req.max_responses_per_url,
                is_active: req.is_active,
            },
        )
        .await?;

    Ok(Json(AckResponse { success: true }))
}

/// Delete a tenant account and everything it owns.
async fn delete_company(
    State(state): State<AppState>,
    Path(company_id): Path<String>,
) -> AppResult<Json<AckResponse>> {
    state.company_service.delete(&company_id).await?;

    Ok(Json(AckResponse { success: true }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/companies", get(list_companies).post(create_company))
        .route("/companies/{id}", put(update_company).delete(delete_company))
}
