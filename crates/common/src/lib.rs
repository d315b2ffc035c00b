//! Common utilities and shared types for survey-rs.
//!
//! This crate provides foundational components used across all survey-rs crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **ID Generation**: Response ids and survey tokens via [`IdGenerator`]
//! - **Authentication**: HMAC-signed bearer tokens via [`Authenticator`]
//!
//! # Example
//!
//! ```no_run
//! use survey_common::{Config, IdGenerator, AppResult};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     let id_gen = IdGenerator::new();
//!     let token = id_gen.generate_token();
//!     println!("Issued survey token: {}", token);
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod id;

pub use auth::{AuthScope, Authenticator, HmacAuthenticator};
pub use config::Config;
pub use error::{AppError, AppResult};
pub use id::IdGenerator;
