//! Business services.

pub mod company;
pub mod report;
pub mod submission;
pub mod token;

pub use company::{CompanyLogin, CompanyService, CreateCompanyInput, UpdateCompanyInput};
pub use report::{
    CompanySummary, FreeTextAnalysis, ReportService, ResponseExport, Statistics, StoredResponse,
};
pub use submission::SubmissionService;
pub use token::{IssueTokenInput, IssuedToken, TokenScope, TokenService};
