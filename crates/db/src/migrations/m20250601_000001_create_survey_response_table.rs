//! Create the survey response table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SurveyResponse::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SurveyResponse::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SurveyResponse::SubmissionTime)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(SurveyResponse::UserAgent).text().null())
                    .col(
                        ColumnDef::new(SurveyResponse::PageLoadTime)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(SurveyResponse::ResponseData)
                            .text()
                            .not_null(),
                    )
                    // No foreign key: admin-issued tokens and their responses
                    // have independent lifecycles.
                    .col(ColumnDef::new(SurveyResponse::SurveyToken).string().null())
                    .col(
                        ColumnDef::new(SurveyResponse::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Index on survey_token for per-token aggregation
        manager
            .create_index(
                Index::create()
                    .name("idx_survey_response_token")
                    .table(SurveyResponse::Table)
                    .col(SurveyResponse::SurveyToken)
                    .to_owned(),
            )
            .await?;

        // Index on created_at for newest-first listings
        manager
            .create_index(
                Index::create()
                    .name("idx_survey_response_created_at")
                    .table(SurveyResponse::Table)
                    .col(SurveyResponse::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SurveyResponse::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum SurveyResponse {
    Table,
    Id,
    SubmissionTime,
    UserAgent,
    PageLoadTime,
    ResponseData,
    SurveyToken,
    CreatedAt,
}
