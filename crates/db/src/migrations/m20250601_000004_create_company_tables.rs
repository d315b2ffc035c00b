//! Create the company account and token ownership tables.

use sea_orm_migration::prelude::*;

use super::m20250601_000002_create_survey_token_table::SurveyToken;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CompanyAccount::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CompanyAccount::CompanyId)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CompanyAccount::CompanyName)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CompanyAccount::AccessKey).string().not_null())
                    .col(
                        ColumnDef::new(CompanyAccount::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(CompanyAccount::MaxUrls).integer().not_null())
                    .col(
                        ColumnDef::new(CompanyAccount::MaxResponsesPerUrl)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CompanyAccount::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CompanyTokenLink::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CompanyTokenLink::CompanyId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CompanyTokenLink::Token).string().not_null())
                    .primary_key(
                        Index::create()
                            .col(CompanyTokenLink::CompanyId)
                            .col(CompanyTokenLink::Token),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_company_token_link_company")
                            .from(CompanyTokenLink::Table, CompanyTokenLink::CompanyId)
                            .to(CompanyAccount::Table, CompanyAccount::CompanyId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_company_token_link_token")
                            .from(CompanyTokenLink::Table, CompanyTokenLink::Token)
                            .to(SurveyToken::Table, SurveyToken::Token)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index on token for reverse ownership lookups
        manager
            .create_index(
                Index::create()
                    .name("idx_company_token_link_token")
                    .table(CompanyTokenLink::Table)
                    .col(CompanyTokenLink::Token)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CompanyTokenLink::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(CompanyAccount::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum CompanyAccount {
    Table,
    CompanyId,
    CompanyName,
    AccessKey,
    IsActive,
    MaxUrls,
    MaxResponsesPerUrl,
    CreatedAt,
}

#[derive(Iden)]
pub enum CompanyTokenLink {
    Table,
    CompanyId,
    Token,
}
