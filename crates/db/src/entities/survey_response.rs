//! Survey response entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A recorded survey submission.
///
/// The full answer payload is kept as an opaque JSON string in
/// `response_data`; a handful of top-level fields are extracted into columns
/// for listing and aggregation. Rows are never mutated after insert.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "survey_response")]
pub struct Model {
    /// Generated UUID.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Client-reported submission timestamp (ISO 8601 string).
    pub submission_time: String,

    /// Sanitized client user agent.
    #[sea_orm(nullable)]
    pub user_agent: Option<String>,

    /// Client-reported page load time in milliseconds.
    #[sea_orm(nullable)]
    pub page_load_time: Option<i64>,

    /// Full answer payload as serialized JSON.
    ///
    /// Stored as text rather than a JSON column so a malformed row can be
    /// skipped during listing/aggregation instead of failing the query.
    #[sea_orm(column_type = "Text")]
    pub response_data: String,

    /// Token the submission was made against, if any.
    #[sea_orm(nullable)]
    pub survey_token: Option<String>,

    /// When the row was created.
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::free_text_response::Entity")]
    FreeTextResponse,
}

impl Related<super::free_text_response::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FreeTextResponse.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
