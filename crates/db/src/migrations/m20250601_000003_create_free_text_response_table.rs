//! Create the free-text response table.

use sea_orm_migration::prelude::*;

use super::m20250601_000001_create_survey_response_table::SurveyResponse;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(FreeTextResponse::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FreeTextResponse::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(FreeTextResponse::ResponseId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FreeTextResponse::QuestionType)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FreeTextResponse::QuestionLabel)
                            .string()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(FreeTextResponse::ResponseText)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FreeTextResponse::CharacterCount)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FreeTextResponse::ResponseTime)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_free_text_response_response")
                            .from(FreeTextResponse::Table, FreeTextResponse::ResponseId)
                            .to(SurveyResponse::Table, SurveyResponse::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index on response_id for per-submission lookups
        manager
            .create_index(
                Index::create()
                    .name("idx_free_text_response_response_id")
                    .table(FreeTextResponse::Table)
                    .col(FreeTextResponse::ResponseId)
                    .to_owned(),
            )
            .await?;

        // Index on response_time for recent-entries queries
        manager
            .create_index(
                Index::create()
                    .name("idx_free_text_response_time")
                    .table(FreeTextResponse::Table)
                    .col(FreeTextResponse::ResponseTime)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FreeTextResponse::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum FreeTextResponse {
    Table,
    Id,
    ResponseId,
    QuestionType,
    QuestionLabel,
    ResponseText,
    CharacterCount,
    ResponseTime,
}
