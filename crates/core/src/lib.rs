//! Core business logic for survey-rs.

pub mod services;

pub use services::*;
