//! Database entities.

pub mod company_account;
pub mod company_token_link;
pub mod free_text_response;
pub mod survey_response;
pub mod survey_token;

pub use company_account::Entity as CompanyAccount;
pub use company_token_link::Entity as CompanyTokenLink;
pub use free_text_response::Entity as FreeTextResponse;
pub use survey_response::Entity as SurveyResponse;
pub use survey_token::Entity as SurveyToken;
