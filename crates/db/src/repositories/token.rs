//! Survey token repository.

use std::sync::Arc;

use crate::entities::{SurveyToken, survey_token};
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder,
};
use survey_common::{AppError, AppResult};

/// Survey token repository for database operations.
#[derive(Clone)]
pub struct SurveyTokenRepository {
    db: Arc<DatabaseConnection>,
}

impl SurveyTokenRepository {
    /// Create a new survey token repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a token by its value.
    pub async fn find(&self, token: &str) -> AppResult<Option<survey_token::Model>> {
        SurveyToken::find_by_id(token)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a token by its value, failing when unknown.
    pub async fn get(&self, token: &str) -> AppResult<survey_token::Model> {
        self.find(token).await?.ok_or(AppError::TokenNotFound)
    }

    /// Create a new token.
    pub async fn create(&self, model: survey_token::ActiveModel) -> AppResult<survey_token::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List all tokens, newest first.
    pub async fn list(&self) -> AppResult<Vec<survey_token::Model>> {
        SurveyToken::find()
            .order_by_desc(survey_token::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List the given tokens, newest first.
    pub async fn list_by_tokens(&self, tokens: &[String]) -> AppResult<Vec<survey_token::Model>> {
        if tokens.is_empty() {
            return Ok(Vec::new());
        }
        SurveyToken::find()
            .filter(survey_token::Column::Token.is_in(tokens.iter().map(String::as_str)))
            .order_by_desc(survey_token::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count tokens from the given set that are still live (active and
    /// unexpired) at `now`.
    pub async fn count_live(&self, tokens: &[String], now: DateTime<Utc>) -> AppResult<u64> {
        if tokens.is_empty() {
            return Ok(0);
        }
        SurveyToken::find()
            .filter(survey_token::Column::Token.is_in(tokens.iter().map(String::as_str)))
            .filter(survey_token::Column::IsActive.eq(true))
            .filter(survey_token::Column::ExpiresAt.gt(now))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Disable a token. Returns false when no such token exists.
    ///
    /// Disabling an already-disabled token succeeds (idempotent).
    pub async fn disable(&self, token: &str) -> AppResult<bool> {
        let result = SurveyToken::update_many()
            .col_expr(survey_token::Column::IsActive, Expr::value(false))
            .filter(survey_token::Column::Token.eq(token))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected > 0)
    }

    /// Atomically consume one response slot: a single conditional
    /// read-check-increment executed by the store.
    ///
    /// ```sql
    /// UPDATE survey_token
    ///    SET current_responses = current_responses + 1
    ///  WHERE token = ? AND is_active AND current_responses < max_responses
    /// ```
    ///
    /// Returns true when exactly one row changed. This is the only write
    /// that advances the counter, so two racing submissions against the last
    /// slot cannot both succeed.
    pub async fn try_consume_on<C: ConnectionTrait>(conn: &C, token: &str) -> AppResult<bool> {
        let result = SurveyToken::update_many()
            .col_expr(
                survey_token::Column::CurrentResponses,
                Expr::col(survey_token::Column::CurrentResponses).add(1),
            )
            .filter(survey_token::Column::Token.eq(token))
            .filter(survey_token::Column::IsActive.eq(true))
            .filter(
                Expr::col(survey_token::Column::CurrentResponses)
                    .lt(Expr::col(survey_token::Column::MaxResponses)),
            )
            .exec(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected == 1)
    }

    /// Atomically consume one response slot on the repository's connection.
    pub async fn try_consume(&self, token: &str) -> AppResult<bool> {
        Self::try_consume_on(self.db.as_ref(), token).await
    }

    /// Delete the given tokens. Used only by tenant cascade deletion.
    pub async fn delete_by_tokens_on<C: ConnectionTrait>(
        conn: &C,
        tokens: &[String],
    ) -> AppResult<u64> {
        if tokens.is_empty() {
            return Ok(0);
        }
        let result = SurveyToken::delete_many()
            .filter(survey_token::Column::Token.is_in(tokens.iter().map(String::as_str)))
            .exec(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn test_token(token: &str, current: i32, max: i32) -> survey_token::Model {
        survey_token::Model {
            token: token.to_string(),
            created_at: Utc::now().into(),
            expires_at: (Utc::now() + Duration::hours(24)).into(),
            max_responses: max,
            current_responses: current,
            is_active: true,
            description: Some("test link".to_string()),
        }
    }

    #[tokio::test]
    async fn test_find_found() {
        let token = test_token("tok1", 0, 5);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Sqlite)
                .append_query_results([[token.clone()]])
                .into_connection(),
        );

        let repo = SurveyTokenRepository::new(db);
        let found = repo.find("tok1").await.unwrap();

        assert_eq!(found.unwrap().token, "tok1");
    }

    #[tokio::test]
    async fn test_get_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Sqlite)
                .append_query_results([Vec::<survey_token::Model>::new()])
                .into_connection(),
        );

        let repo = SurveyTokenRepository::new(db);
        let result = repo.get("missing").await;

        assert!(matches!(result, Err(AppError::TokenNotFound)));
    }

    #[tokio::test]
    async fn test_try_consume_succeeds_when_row_updated() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Sqlite)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = SurveyTokenRepository::new(db);
        assert!(repo.try_consume("tok1").await.unwrap());
    }

    #[tokio::test]
    async fn test_try_consume_fails_when_no_slot_left() {
        // The conditional update matches no row once the quota is spent,
        // which is how the losing side of a race observes exhaustion.
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Sqlite)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );

        let repo = SurveyTokenRepository::new(db);
        assert!(!repo.try_consume("tok1").await.unwrap());
    }

    #[tokio::test]
    async fn test_disable_unknown_token() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Sqlite)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );

        let repo = SurveyTokenRepository::new(db);
        assert!(!repo.disable("missing").await.unwrap());
    }

    #[test]
    fn test_remaining_responses() {
        assert_eq!(test_token("t", 2, 5).remaining_responses(), 3);
        assert_eq!(test_token("t", 5, 5).remaining_responses(), 0);
    }
}
