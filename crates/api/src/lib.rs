//! HTTP API layer for survey-rs.
//!
//! This crate provides the REST API:
//!
//! - **Endpoints**: submission intake, reporting, token lifecycle, tenant
//!   and admin management, and the token-qualified survey page
//! - **Extractors**: tenant bearer authentication
//! - **State**: service handles shared across handlers
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod state;

pub use endpoints::router;
pub use state::AppState;
