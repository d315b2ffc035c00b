//! Database migrations.
//!
//! Schema migrations for the database.

#![allow(missing_docs)]

use sea_orm_migration::prelude::*;

mod m20250601_000001_create_survey_response_table;
mod m20250601_000002_create_survey_token_table;
mod m20250601_000003_create_free_text_response_table;
mod m20250601_000004_create_company_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250601_000001_create_survey_response_table::Migration),
            Box::new(m20250601_000002_create_survey_token_table::Migration),
            Box::new(m20250601_000003_create_free_text_response_table::Migration),
            Box::new(m20250601_000004_create_company_tables::Migration),
        ]
    }
}
