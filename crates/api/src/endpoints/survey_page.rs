//! Token-qualified survey page.
//!
//! Serves the survey form as HTML with the token injected for client-side
//! use. Unlike the rest of the API this endpoint speaks plain text on
//! errors: the reader is a respondent following a link, not a JS client.

use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
};

use crate::state::AppState;

/// Render the survey form for a live token.
///
/// The token is validated before the form is shown, so an exhausted or
/// expired link is rejected without a pointless form render; the same
/// validation runs again when the submission is recorded, closing the race
/// between two respondents holding the last slot.
async fn show(State(state): State<AppState>, Path(token): Path<String>) -> Response {
    if let Err(err) = state.token_service.validate(&token).await {
        return (err.status_code(), err.client_message()).into_response();
    }

    match tokio::fs::read_to_string(&state.form_template).await {
        Ok(html) => {
            // The token passed validation, so it is a stored value our own
            // generator produced; safe to inline.
            let injected = html.replace(
                "<body>",
                &format!("<body><script>window.SURVEY_TOKEN = \"{token}\";</script>"),
            );
            Html(injected).into_response()
        }
        Err(err) => {
            tracing::error!(error = %err, "Failed to read survey form template");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "サーバーエラーが発生しました",
            )
                .into_response()
        }
    }
}

/// Router for the root-level survey page (not nested under `/api`).
pub fn router() -> Router<AppState> {
    Router::new().route("/survey/{token}", get(show))
}
