//! Create the survey token table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SurveyToken::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SurveyToken::Token)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SurveyToken::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(SurveyToken::ExpiresAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SurveyToken::MaxResponses)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(SurveyToken::CurrentResponses)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(SurveyToken::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(SurveyToken::Description).text().null())
                    .to_owned(),
            )
            .await?;

        // Index on expires_at for liveness filtering
        manager
            .create_index(
                Index::create()
                    .name("idx_survey_token_expires_at")
                    .table(SurveyToken::Table)
                    .col(SurveyToken::ExpiresAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SurveyToken::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum SurveyToken {
    Table,
    Token,
    CreatedAt,
    ExpiresAt,
    MaxResponses,
    CurrentResponses,
    IsActive,
    Description,
}
