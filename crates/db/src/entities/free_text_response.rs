//! Free-text response entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Free-text question key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum QuestionType {
    #[sea_orm(string_value = "most_satisfied")]
    MostSatisfied,
    #[sea_orm(string_value = "least_satisfied")]
    LeastSatisfied,
    #[sea_orm(string_value = "most_expected")]
    MostExpected,
    #[sea_orm(string_value = "other_comments")]
    OtherComments,
}

/// One free-text answer extracted from a submission.
///
/// `character_count` is the length of `response_text` at insert time and is
/// never recomputed.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "free_text_response")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Owning survey response.
    pub response_id: String,

    /// Which free-text question this answers.
    pub question_type: QuestionType,

    /// Display label of the question.
    #[sea_orm(nullable)]
    pub question_label: Option<String>,

    /// The answer text, sanitized.
    #[sea_orm(column_type = "Text")]
    pub response_text: String,

    /// Length of `response_text` at insert time.
    pub character_count: i32,

    /// When the row was created.
    pub response_time: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::survey_response::Entity",
        from = "Column::ResponseId",
        to = "super::survey_response::Column::Id",
        on_delete = "Cascade"
    )]
    SurveyResponse,
}

impl Related<super::survey_response::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SurveyResponse.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
