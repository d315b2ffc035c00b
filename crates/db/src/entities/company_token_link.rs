//! Company to token ownership link entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Association between a tenant and a token it issued.
///
/// A token is owned by at most one tenant; admin-issued tokens have no row
/// here.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "company_token_link")]
pub struct Model {
    /// Owning tenant.
    #[sea_orm(primary_key, auto_increment = false)]
    pub company_id: String,

    /// Owned token.
    #[sea_orm(primary_key, auto_increment = false)]
    pub token: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::company_account::Entity",
        from = "Column::CompanyId",
        to = "super::company_account::Column::CompanyId",
        on_delete = "Cascade"
    )]
    CompanyAccount,
    #[sea_orm(
        belongs_to = "super::survey_token::Entity",
        from = "Column::Token",
        to = "super::survey_token::Column::Token",
        on_delete = "Cascade"
    )]
    SurveyToken,
}

impl Related<super::company_account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CompanyAccount.def()
    }
}

impl Related<super::survey_token::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SurveyToken.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
