//! Survey access token entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A tokenized survey link.
///
/// Liveness is checked at validation time against `is_active`, `expires_at`
/// and the response counters; there is no background sweep. The counter is
/// only advanced through a conditional update so `current_responses` can
/// never pass `max_responses` for an accepted submission.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "survey_token")]
pub struct Model {
    /// Opaque random token string.
    #[sea_orm(primary_key, auto_increment = false)]
    pub token: String,

    /// When the token was created.
    pub created_at: DateTimeWithTimeZone,

    /// Absolute expiry.
    pub expires_at: DateTimeWithTimeZone,

    /// Maximum number of accepted submissions.
    pub max_responses: i32,

    /// Number of accepted submissions so far.
    pub current_responses: i32,

    /// Cleared on explicit disable; never set back.
    pub is_active: bool,

    /// Free-text description shown in listings.
    #[sea_orm(nullable)]
    pub description: Option<String>,
}

impl Model {
    /// Remaining submission quota.
    #[must_use]
    pub fn remaining_responses(&self) -> i32 {
        (self.max_responses - self.current_responses).max(0)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::company_token_link::Entity")]
    CompanyTokenLink,
}

impl Related<super::company_token_link::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CompanyTokenLink.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
