//! Application state shared across handlers.

#![allow(missing_docs)]

use std::path::PathBuf;
use std::sync::Arc;

use survey_common::Authenticator;
use survey_core::{CompanyService, ReportService, SubmissionService, TokenService};

/// Application state.
///
/// Everything a handler touches is carried here explicitly; there is no
/// module-global configuration or connection.
#[derive(Clone)]
pub struct AppState {
    pub token_service: TokenService,
    pub submission_service: SubmissionService,
    pub report_service: ReportService,
    pub company_service: CompanyService,
    pub authenticator: Arc<dyn Authenticator>,
    /// Survey form template served at `/survey/{token}`.
    pub form_template: PathBuf,
}
