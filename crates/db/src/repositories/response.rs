//! Survey response and free-text response repositories.

use std::sync::Arc;

use crate::entities::{FreeTextResponse, SurveyResponse, free_text_response, survey_response};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};
use survey_common::{AppError, AppResult};

/// Survey response repository for database operations.
#[derive(Clone)]
pub struct SurveyResponseRepository {
    db: Arc<DatabaseConnection>,
}

impl SurveyResponseRepository {
    /// Create a new survey response repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Insert a response within the given connection or transaction.
    pub async fn insert_on<C: ConnectionTrait>(
        conn: &C,
        model: survey_response::ActiveModel,
    ) -> AppResult<survey_response::Model> {
        model
            .insert(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count all responses.
    pub async fn count(&self) -> AppResult<u64> {
        SurveyResponse::find()
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List all responses, newest first.
    pub async fn list(&self) -> AppResult<Vec<survey_response::Model>> {
        SurveyResponse::find()
            .order_by_desc(survey_response::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List responses recorded against any of the given tokens.
    pub async fn list_by_tokens(
        &self,
        tokens: &[String],
    ) -> AppResult<Vec<survey_response::Model>> {
        if tokens.is_empty() {
            return Ok(Vec::new());
        }
        SurveyResponse::find()
            .filter(survey_response::Column::SurveyToken.is_in(tokens.iter().map(String::as_str)))
            .order_by_desc(survey_response::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Collect the ids of responses recorded against any of the given
    /// tokens. Used by tenant cascade deletion.
    pub async fn ids_by_tokens_on<C: ConnectionTrait>(
        conn: &C,
        tokens: &[String],
    ) -> AppResult<Vec<String>> {
        if tokens.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<String> = SurveyResponse::find()
            .select_only()
            .column(survey_response::Column::Id)
            .filter(survey_response::Column::SurveyToken.is_in(tokens.iter().map(String::as_str)))
            .into_tuple()
            .all(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(ids)
    }

    /// Delete responses recorded against any of the given tokens.
    pub async fn delete_by_tokens_on<C: ConnectionTrait>(
        conn: &C,
        tokens: &[String],
    ) -> AppResult<u64> {
        if tokens.is_empty() {
            return Ok(0);
        }
        let result = SurveyResponse::delete_many()
            .filter(survey_response::Column::SurveyToken.is_in(tokens.iter().map(String::as_str)))
            .exec(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected)
    }
}

/// Free-text response repository for database operations.
#[derive(Clone)]
pub struct FreeTextRepository {
    db: Arc<DatabaseConnection>,
}

impl FreeTextRepository {
    /// Create a new free-text response repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Insert a free-text row within the given connection or transaction.
    pub async fn insert_on<C: ConnectionTrait>(
        conn: &C,
        model: free_text_response::ActiveModel,
    ) -> AppResult<free_text_response::Model> {
        model
            .insert(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List all free-text rows.
    pub async fn list(&self) -> AppResult<Vec<free_text_response::Model>> {
        FreeTextResponse::find()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List the most recent free-text rows.
    pub async fn recent(&self, limit: u64) -> AppResult<Vec<free_text_response::Model>> {
        FreeTextResponse::find()
            .order_by_desc(free_text_response::Column::ResponseTime)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete free-text rows owned by any of the given responses.
    pub async fn delete_by_response_ids_on<C: ConnectionTrait>(
        conn: &C,
        response_ids: &[String],
    ) -> AppResult<u64> {
        if response_ids.is_empty() {
            return Ok(0);
        }
        let result = FreeTextResponse::delete_many()
            .filter(
                free_text_response::Column::ResponseId
                    .is_in(response_ids.iter().map(String::as_str)),
            )
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
    use crate::entities::free_text_response::QuestionType;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn test_response(id: &str, token: Option<&str>) -> survey_response::Model {
        survey_response::Model {
            id: id.to_string(),
            submission_time: "2025-06-01T12:00:00Z".to_string(),
            user_agent: Some("Mozilla/5.0".to_string()),
            page_load_time: Some(1200),
            response_data: r#"{"submission_time":"2025-06-01T12:00:00Z"}"#.to_string(),
            survey_token: token.map(ToString::to_string),
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_list_newest_first_passthrough() {
        let rows = vec![test_response("b", None), test_response("a", None)];
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Sqlite)
                .append_query_results([rows.clone()])
                .into_connection(),
        );

        let repo = SurveyResponseRepository::new(db);
        let listed = repo.list().await.unwrap();

        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, "b");
    }

    #[tokio::test]
    async fn test_list_by_tokens_empty_short_circuits() {
        // No query should be issued at all; an empty mock would otherwise panic.
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Sqlite).into_connection());

        let repo = SurveyResponseRepository::new(db);
        assert!(repo.list_by_tokens(&[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_recent_free_text() {
        let row = free_text_response::Model {
            id: 1,
            response_id: "r1".to_string(),
            question_type: QuestionType::OtherComments,
            question_label: Some("その他ご意見・ご要望".to_string()),
            response_text: "とても良い".to_string(),
            character_count: 5,
            response_time: Utc::now().into(),
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Sqlite)
                .append_query_results([[row]])
                .into_connection(),
        );

        let repo = FreeTextRepository::new(db);
        let recent = repo.recent(10).await.unwrap();

        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].character_count, 5);
    }
}
