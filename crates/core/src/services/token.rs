//! Survey token service.

use std::sync::Arc;

use chrono::{Duration, Utc};
use sea_orm::{DatabaseConnection, Set, TransactionTrait};
use survey_common::{AppError, AppResult, IdGenerator};
use survey_db::{
    entities::survey_token,
    repositories::{CompanyRepository, SurveyTokenRepository},
};

/// Who a token is issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenScope {
    /// Administrator-issued, owned by no tenant.
    Admin,
    /// Issued by and owned by one tenant.
    Tenant(String),
}

/// Input for issuing a token.
#[derive(Debug, Clone)]
pub struct IssueTokenInput {
    /// Maximum number of accepted submissions.
    pub max_responses: i32,
    /// Hours until the token expires.
    pub expires_hours: i64,
    /// Free-text description shown in listings.
    pub description: String,
}

/// A freshly issued token with its access path.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// The persisted token row.
    pub token: survey_token::Model,
    /// Path a respondent uses to reach the survey.
    pub survey_url: String,
}

/// Token issuance and validation service.
#[derive(Clone)]
pub struct TokenService {
    db: Arc<DatabaseConnection>,
    token_repo: SurveyTokenRepository,
    company_repo: CompanyRepository,
    id_gen: IdGenerator,
}

impl TokenService {
    /// Create a new token service.
    #[must_use]
    pub const fn new(
        db: Arc<DatabaseConnection>,
        token_repo: SurveyTokenRepository,
        company_repo: CompanyRepository,
    ) -> Self {
        Self {
            db,
            token_repo,
            company_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Issue a new token.
    ///
    /// For tenant scope the tenant's live-token cap is enforced (strictly
    /// below `max_urls`) and the requested quota is clamped to the tenant's
    /// `max_responses_per_url` ceiling. Token and ownership link are
    /// persisted together.
    pub async fn issue(&self, scope: TokenScope, input: IssueTokenInput) -> AppResult<IssuedToken> {
        if input.max_responses < 1 {
            return Err(AppError::BadRequest(
                "最大回答数は1以上で設定してください".to_string(),
            ));
        }
        if input.expires_hours < 1 {
            return Err(AppError::BadRequest(
                "有効期限は1時間以上で設定してください".to_string(),
            ));
        }

        let now = Utc::now();
        let mut max_responses = input.max_responses;

        let owner = match &scope {
            TokenScope::Admin => None,
            TokenScope::Tenant(company_id) => {
                let company = self.company_repo.get(company_id).await?;

                let owned = self.company_repo.tokens_of(company_id).await?;
                let live = self.token_repo.count_live(&owned, now).await?;
                if live >= u64::try_from(company.max_urls).unwrap_or(0) {
                    return Err(AppError::Forbidden(
                        "URL発行上限に達しています".to_string(),
                    ));
                }

                max_responses = max_responses.min(company.max_responses_per_url);
                Some(company.company_id)
            }
        };

        let token_value = self.id_gen.generate_token();
        let model = survey_token::ActiveModel {
            token: Set(token_value.clone()),
            created_at: Set(now.into()),
            expires_at: Set((now + Duration::hours(input.expires_hours)).into()),
            max_responses: Set(max_responses),
            current_responses: Set(0),
            is_active: Set(true),
            description: Set(Some(input.description)),
        };

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        use sea_orm::ActiveModelTrait;
        let token = model
            .insert(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if let Some(company_id) = owner {
            CompanyRepository::link_token_on(&txn, &company_id, &token_value).await?;
        }

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        tracing::info!(token = %token_value, "Issued survey token");

        Ok(IssuedToken {
            survey_url: format!("/survey/{token_value}"),
            token,
        })
    }

    /// Validate a token's liveness, returning the row on success.
    ///
    /// Checks compose in a fixed order: unknown token, then disabled, then
    /// expired, then quota. Callers run this both before rendering the form
    /// and again when recording a submission.
    pub async fn validate(&self, token: &str) -> AppResult<survey_token::Model> {
        let row = self.token_repo.get(token).await?;

        if !row.is_active {
            return Err(AppError::TokenDisabled);
        }
        if Utc::now() > row.expires_at {
            return Err(AppError::TokenExpired);
        }
        if row.current_responses >= row.max_responses {
            return Err(AppError::TokenQuotaExhausted);
        }

        Ok(row)
    }

    /// Disable a token. Repeated disables succeed; unknown tokens fail.
    pub async fn disable(&self, token: &str) -> AppResult<()> {
        if self.token_repo.disable(token).await? {
            Ok(())
        } else {
            Err(AppError::TokenNotFound)
        }
    }

    /// Disable a token owned by the given tenant.
    ///
    /// Tokens the tenant does not own are reported as not found rather than
    /// forbidden, so ownership cannot be probed.
    pub async fn disable_for_company(&self, company_id: &str, token: &str) -> AppResult<()> {
        if !self.company_repo.owns_token(company_id, token).await? {
            return Err(AppError::TokenNotFound);
        }
        self.disable(token).await
    }

    /// List all tokens, newest first.
    pub async fn list(&self) -> AppResult<Vec<survey_token::Model>> {
        self.token_repo.list().await
    }

    /// List a tenant's tokens, newest first.
    pub async fn list_for_company(&self, company_id: &str) -> AppResult<Vec<survey_token::Model>> {
        let owned = self.company_repo.tokens_of(company_id).await?;
        self.token_repo.list_by_tokens(&owned).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn service_with(db: MockDatabase) -> TokenService {
        let conn = Arc::new(db.into_connection());
        TokenService::new(
            Arc::clone(&conn),
            SurveyTokenRepository::new(Arc::clone(&conn)),
            CompanyRepository::new(conn),
        )
    }

    fn token_row(active: bool, expired: bool, current: i32, max: i32) -> survey_token::Model {
        let now = Utc::now();
        let expires_at = if expired {
            now - Duration::hours(1)
        } else {
            now + Duration::hours(1)
        };
        survey_token::Model {
            token: "tok1".to_string(),
            created_at: now.into(),
            expires_at: expires_at.into(),
            max_responses: max,
            current_responses: current,
            is_active: active,
            description: None,
        }
    }

    #[tokio::test]
    async fn test_validate_unknown_token() {
        let service = service_with(
            MockDatabase::new(DatabaseBackend::Sqlite)
                .append_query_results([Vec::<survey_token::Model>::new()]),
        );

        let result = service.validate("missing").await;
        assert!(matches!(result, Err(AppError::TokenNotFound)));
    }

    #[tokio::test]
    async fn test_validate_disabled_before_expired() {
        // A disabled token that is also expired reports disabled first.
        let service = service_with(
            MockDatabase::new(DatabaseBackend::Sqlite)
                .append_query_results([[token_row(false, true, 0, 5)]]),
        );

        let result = service.validate("tok1").await;
        assert!(matches!(result, Err(AppError::TokenDisabled)));
    }

    #[tokio::test]
    async fn test_validate_expired() {
        let service = service_with(
            MockDatabase::new(DatabaseBackend::Sqlite)
                .append_query_results([[token_row(true, true, 0, 5)]]),
        );

        let result = service.validate("tok1").await;
        assert!(matches!(result, Err(AppError::TokenExpired)));
    }

    #[tokio::test]
    async fn test_validate_quota_exhausted() {
        let service = service_with(
            MockDatabase::new(DatabaseBackend::Sqlite)
                .append_query_results([[token_row(true, false, 5, 5)]]),
        );

        let result = service.validate("tok1").await;
        assert!(matches!(result, Err(AppError::TokenQuotaExhausted)));
    }

    #[tokio::test]
    async fn test_validate_live_token() {
        let service = service_with(
            MockDatabase::new(DatabaseBackend::Sqlite)
                .append_query_results([[token_row(true, false, 2, 5)]]),
        );

        let row = service.validate("tok1").await.unwrap();
        assert_eq!(row.remaining_responses(), 3);
    }

    #[tokio::test]
    async fn test_issue_rejects_zero_quota() {
        let service = service_with(MockDatabase::new(DatabaseBackend::Sqlite));

        let result = service
            .issue(
                TokenScope::Admin,
                IssueTokenInput {
                    max_responses: 0,
                    expires_hours: 24,
                    description: String::new(),
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }
}
