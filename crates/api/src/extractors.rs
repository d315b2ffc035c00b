//! Request extractors.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use survey_common::{AppError, AuthScope};
use survey_db::entities::company_account;

use crate::state::AppState;

/// Authenticated tenant extractor.
///
/// Verifies the `Authorization: Bearer` token against the signing secret and
/// loads the tenant account, which must still exist and be active. An
/// explicit guard at the top of each tenant handler, rather than a wrapping
/// middleware.
#[derive(Debug, Clone)]
pub struct TenantAuth(pub company_account::Model);

impl FromRequestParts<AppState> for TenantAuth {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let bearer = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or(AppError::Unauthorized)?;

        let AuthScope::Tenant(company_id) = state.authenticator.verify(bearer)? else {
            return Err(AppError::Unauthorized);
        };

        // A deleted account must look the same as a bad token
        let company = state
            .company_service
            .get_active(&company_id)
            .await
            .map_err(|_| AppError::Unauthorized)?;

        Ok(Self(company))
    }
}
