//! Company (tenant) account entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A tenant account that owns survey tokens.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "company_account")]
pub struct Model {
    /// Chosen tenant id (alphanumeric and hyphens).
    #[sea_orm(primary_key, auto_increment = false)]
    pub company_id: String,

    /// Display name.
    pub company_name: String,

    /// Login credential, stored in plaintext.
    pub access_key: String,

    /// Inactive accounts cannot log in.
    pub is_active: bool,

    /// Cap on concurrently-active owned tokens.
    pub max_urls: i32,

    /// Per-token response quota ceiling.
    pub max_responses_per_url: i32,

    /// When the account was created.
    pub created_at: DateTimeWithTimeZone,
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
