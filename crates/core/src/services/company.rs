//! Company (tenant) account service.

use std::sync::Arc;

use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use sea_orm::{DatabaseConnection, Set, TransactionTrait};
use survey_common::{AppError, AppResult, AuthScope, Authenticator};
use survey_db::{
    entities::company_account,
    repositories::{
        CompanyRepository, FreeTextRepository, SurveyResponseRepository, SurveyTokenRepository,
    },
};

/// Allowed shape of a tenant id.
static COMPANY_ID_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9-]+$").expect("id pattern is valid"));

/// Bounds on a tenant's concurrently-active token cap.
const MAX_URLS_RANGE: std::ops::RangeInclusive<i32> = 1..=100;

/// Input for creating a tenant account.
#[derive(Debug, Clone)]
pub struct CreateCompanyInput {
    pub company_id: String,
    pub company_name: String,
    pub access_key: String,
    pub max_urls: i32,
    pub max_responses_per_url: i32,
}

/// Input for updating a tenant account.
#[derive(Debug, Clone)]
pub struct UpdateCompanyInput {
    pub company_name: String,
    pub access_key: String,
    pub max_urls: i32,
    pub max_responses_per_url: i32,
    pub is_active: bool,
}

/// A successful tenant login.
#[derive(Debug, Clone)]
pub struct CompanyLogin {
    /// The authenticated account.
    pub company: company_account::Model,
    /// Bearer token for subsequent tenant requests.
    pub bearer_token: String,
}

/// Tenant account management service.
#[derive(Clone)]
pub struct CompanyService {
    db: Arc<DatabaseConnection>,
    company_repo: CompanyRepository,
    authenticator: Arc<dyn Authenticator>,
}

impl CompanyService {
    /// Create a new company service.
    #[must_use]
    pub fn new(
        db: Arc<DatabaseConnection>,
        company_repo: CompanyRepository,
        authenticator: Arc<dyn Authenticator>,
    ) -> Self {
        Self {
            db,
            company_repo,
            authenticator,
        }
    }

    /// Authenticate a tenant with its access key.
    ///
    /// Keys are stored and compared in plaintext, matching the system this
    /// one replaces. Inactive accounts cannot log in.
    pub async fn login(&self, company_id: &str, access_key: &str) -> AppResult<CompanyLogin> {
        let company = self
            .company_repo
            .find(company_id)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if !company.is_active || company.access_key != access_key {
            return Err(AppError::Unauthorized);
        }

        let bearer_token = self
            .authenticator
            .issue(&AuthScope::Tenant(company.company_id.clone()))?;

        Ok(CompanyLogin {
            company,
            bearer_token,
        })
    }

    /// Load an account, requiring it to be active.
    pub async fn get_active(&self, company_id: &str) -> AppResult<company_account::Model> {
        let company = self.company_repo.get(company_id).await?;
        if !company.is_active {
            return Err(AppError::Unauthorized);
        }
        Ok(company)
    }

    /// List all accounts, newest first.
    pub async fn list(&self) -> AppResult<Vec<company_account::Model>> {
        self.company_repo.list().await
    }

    /// Create a tenant account.
    pub async fn create(&self, input: CreateCompanyInput) -> AppResult<company_account::Model> {
        Self::validate_fields(
            &input.company_name,
            &input.access_key,
            input.max_urls,
            input.max_responses_per_url,
        )?;
        if !COMPANY_ID_PATTERN.is_match(&input.company_id) {
            return Err(AppError::Validation(
                "企業IDは英数字とハイフンのみ使用可能です".to_string(),
            ));
        }

        if self.company_repo.find(&input.company_id).await?.is_some() {
            return Err(AppError::Conflict(
                "企業IDは既に使用されています".to_string(),
            ));
        }

        let model = company_account::ActiveModel {
            company_id: Set(input.company_id),
            company_name: Set(input.company_name),
            access_key: Set(input.access_key),
            is_active: Set(true),
            max_urls: Set(input.max_urls),
            max_responses_per_url: Set(input.max_responses_per_url),
            created_at: Set(Utc::now().into()),
        };

        self.company_repo.create(model).await
    }

    /// Update a tenant account.
    pub async fn update(
        &self,
        company_id: &str,
        input: UpdateCompanyInput,
    ) -> AppResult<company_account::Model> {
        Self::validate_fields(
            &input.company_name,
            &input.access_key,
            input.max_urls,
            input.max_responses_per_url,
        )?;

        let company = self.company_repo.get(company_id).await?;

        let mut active: company_account::ActiveModel = company.into();
        active.company_name = Set(input.company_name);
        active.access_key = Set(input.access_key);
        active.max_urls = Set(input.max_urls);
        active.max_responses_per_url = Set(input.max_responses_per_url);
        active.is_active = Set(input.is_active);

        self.company_repo.update(active).await
    }

    /// Delete a tenant and everything it owns.
    ///
    /// Cascade order respects referential dependencies: free-text rows of
    /// the tenant's responses, the responses themselves, the tokens, the
    /// ownership links, then the account. Runs in one transaction.
    pub async fn delete(&self, company_id: &str) -> AppResult<()> {
        // Fail early on unknown tenants
        self.company_repo.get(company_id).await?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let tokens = CompanyRepository::tokens_of_on(&txn, company_id).await?;
        let response_ids = SurveyResponseRepository::ids_by_tokens_on(&txn, &tokens).await?;

        FreeTextRepository::delete_by_response_ids_on(&txn, &response_ids).await?;
        SurveyResponseRepository::delete_by_tokens_on(&txn, &tokens).await?;
        SurveyTokenRepository::delete_by_tokens_on(&txn, &tokens).await?;
        CompanyRepository::delete_links_on(&txn, company_id).await?;
        CompanyRepository::delete_on(&txn, company_id).await?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        tracing::info!(company_id = %company_id, tokens = tokens.len(), "Deleted tenant");

        Ok(())
    }

    fn validate_fields(
        company_name: &str,
        access_key: &str,
        max_urls: i32,
        max_responses_per_url: i32,
    ) -> AppResult<()> {
        if company_name.trim().is_empty() || access_key.trim().is_empty() {
            return Err(AppError::Validation(
                "必須項目を入力してください".to_string(),
            ));
        }
        if !MAX_URLS_RANGE.contains(&max_urls) {
            return Err(AppError::Validation(
                "URL発行上限は1〜100の範囲で設定してください".to_string(),
            ));
        }
        if max_responses_per_url < 1 {
            return Err(AppError::Validation(
                "URLあたりの回答上限は1以上で設定してください".to_string(),
            ));
        }
        Ok(())
    }
}
