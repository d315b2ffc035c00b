//! API endpoints.

mod admin;
mod company;
mod reports;
mod submit;
pub mod survey_page;
mod tokens;

use axum::Router;

use crate::state::AppState;

/// Create the `/api` router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(submit::router())
        .merge(reports::router())
        .nest("/tokens", tokens::router())
        .nest("/company", company::router())
        .nest("/admin", admin::router())
}
