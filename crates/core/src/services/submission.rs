//! Submission recording service.

use std::sync::Arc;

use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use sea_orm::{DatabaseConnection, Set, TransactionTrait};
use serde_json::Value;
use survey_common::{AppError, AppResult, IdGenerator};
use survey_db::{
    entities::{free_text_response, free_text_response::QuestionType, survey_response},
    repositories::{FreeTextRepository, SurveyResponseRepository, SurveyTokenRepository},
};

use super::token::TokenService;

/// Ceiling on the serialized payload size in bytes.
const MAX_PAYLOAD_BYTES: usize = 100_000;

/// Maximum length of a sanitized free-text field, in characters.
const MAX_FIELD_CHARS: usize = 1000;

/// The free-text questions extracted into their own table, with display
/// labels.
const FREE_TEXT_FIELDS: [(QuestionType, &str, &str); 4] = [
    (
        QuestionType::MostSatisfied,
        "most_satisfied",
        "最も満足度が高い項目について",
    ),
    (
        QuestionType::LeastSatisfied,
        "least_satisfied",
        "最も満足度が低い項目について",
    ),
    (
        QuestionType::MostExpected,
        "most_expected",
        "最も期待度が高い項目について",
    ),
    (
        QuestionType::OtherComments,
        "other_comments",
        "その他ご意見・ご要望",
    ),
];

static MARKUP_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<[^>]+>").expect("markup pattern is valid"));

/// Strip markup-like angle-bracket sequences and truncate.
fn sanitize_text(text: &str) -> String {
    let stripped = MARKUP_TAG.replace_all(text, "");
    stripped.chars().take(MAX_FIELD_CHARS).collect()
}

/// Submission recording service.
///
/// Persisting the response row, its free-text rows, and the token counter
/// increment happens in one transaction: either all land or none do.
#[derive(Clone)]
pub struct SubmissionService {
    db: Arc<DatabaseConnection>,
    token_service: TokenService,
    id_gen: IdGenerator,
}

impl SubmissionService {
    /// Create a new submission service.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>, token_service: TokenService) -> Self {
        Self {
            db,
            token_service,
            id_gen: IdGenerator::new(),
        }
    }

    /// Validate, sanitize and persist a submission. Returns the new
    /// response id.
    pub async fn record(&self, payload: &Value) -> AppResult<String> {
        let Some(fields) = payload.as_object() else {
            return Err(AppError::Validation("無効なデータ形式です".to_string()));
        };

        if !fields.contains_key("submission_time") {
            return Err(AppError::Validation(
                "必須フィールド 'submission_time' が不足しています".to_string(),
            ));
        }

        let serialized = serde_json::to_string(payload)
            .map_err(|e| AppError::Internal(format!("Failed to serialize payload: {e}")))?;
        if serialized.len() > MAX_PAYLOAD_BYTES {
            return Err(AppError::Validation(
                "データサイズが大きすぎます".to_string(),
            ));
        }

        let survey_token = fields
            .get("survey_token")
            .and_then(Value::as_str)
            .map(ToString::to_string);

        // Early rejection with a specific message; the conditional increment
        // below remains the authority under races.
        if let Some(ref token) = survey_token {
            self.token_service.validate(token).await?;
        }

        let mut sanitized = fields.clone();
        for key in std::iter::once("user_agent")
            .chain(FREE_TEXT_FIELDS.iter().map(|(_, key, _)| *key))
        {
            if let Some(Value::String(text)) = sanitized.get_mut(key) {
                *text = sanitize_text(text);
            }
        }

        let response_id = self.id_gen.generate();
        let now = Utc::now();

        let submission_time = match sanitized.get("submission_time") {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => String::new(),
        };
        let user_agent = sanitized
            .get("user_agent")
            .and_then(Value::as_str)
            .map(ToString::to_string);
        let page_load_time = sanitized.get("page_load_time").and_then(Value::as_i64);

        let response_data = serde_json::to_string(&Value::Object(sanitized.clone()))
            .map_err(|e| AppError::Internal(format!("Failed to serialize payload: {e}")))?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let response = survey_response::ActiveModel {
            id: Set(response_id.clone()),
            submission_time: Set(submission_time),
            user_agent: Set(user_agent),
            page_load_time: Set(page_load_time),
            response_data: Set(response_data),
            survey_token: Set(survey_token.clone()),
            created_at: Set(now.into()),
        };
        SurveyResponseRepository::insert_on(&txn, response).await?;

        for (question_type, key, label) in &FREE_TEXT_FIELDS {
            let Some(Value::String(text)) = sanitized.get(*key) else {
                continue;
            };
            if text.is_empty() {
                continue;
            }

            let free_text = free_text_response::ActiveModel {
                response_id: Set(response_id.clone()),
                question_type: Set(question_type.clone()),
                question_label: Set(Some((*label).to_string())),
                response_text: Set(text.clone()),
                character_count: Set(text.chars().count() as i32),
                response_time: Set(now.into()),
                ..Default::default()
            };
            FreeTextRepository::insert_on(&txn, free_text).await?;
        }

        if let Some(ref token) = survey_token {
            // Single conditional read-check-increment; losing the race for
            // the last slot drops the transaction, rolling everything back.
            let consumed = SurveyTokenRepository::try_consume_on(&txn, token).await?;
            if !consumed {
                return Err(AppError::TokenQuotaExhausted);
            }
        }

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        tracing::info!(response_id = %response_id, "Recorded survey response");

        Ok(response_id)
    }
}
