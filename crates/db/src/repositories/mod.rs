//! Database repositories.

mod company;
mod response;
mod token;

pub use company::CompanyRepository;
pub use response::{FreeTextRepository, SurveyResponseRepository};
pub use token::SurveyTokenRepository;
