//! Company account and token ownership repositories.

use std::sync::Arc;

use crate::entities::{CompanyAccount, CompanyTokenLink, company_account, company_token_link};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect,
};
use survey_common::{AppError, AppResult};

/// Company account repository for database operations.
#[derive(Clone)]
pub struct CompanyRepository {
    db: Arc<DatabaseConnection>,
}

impl CompanyRepository {
    /// Create a new company repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find an account by company id.
    pub async fn find(&self, company_id: &str) -> AppResult<Option<company_account::Model>> {
        CompanyAccount::find_by_id(company_id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get an account by company id, failing when unknown.
    pub async fn get(&self, company_id: &str) -> AppResult<company_account::Model> {
        self.find(company_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Company not found: {company_id}")))
    }

    /// Create a new account.
    pub async fn create(
        &self,
        model: company_account::ActiveModel,
    ) -> AppResult<company_account::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update an account.
    pub async fn update(
        &self,
        model: company_account::ActiveModel,
    ) -> AppResult<company_account::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List all accounts, newest first.
    pub async fn list(&self) -> AppResult<Vec<company_account::Model>> {
        CompanyAccount::find()
            .order_by_desc(company_account::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete an account within the given connection or transaction.
    pub async fn delete_on<C: ConnectionTrait>(conn: &C, company_id: &str) -> AppResult<u64> {
        let result = CompanyAccount::delete_by_id(company_id)
            .exec(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected)
    }

    /// Record token ownership for a tenant.
    pub async fn link_token_on<C: ConnectionTrait>(
        conn: &C,
        company_id: &str,
        token: &str,
    ) -> AppResult<company_token_link::Model> {
        use sea_orm::Set;
        let link = company_token_link::ActiveModel {
            company_id: Set(company_id.to_string()),
            token: Set(token.to_string()),
        };
        link.insert(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Check whether a tenant owns the given token.
    pub async fn owns_token(&self, company_id: &str, token: &str) -> AppResult<bool> {
        let link = CompanyTokenLink::find_by_id((company_id.to_string(), token.to_string()))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(link.is_some())
    }

    /// List the tokens owned by a tenant.
    pub async fn tokens_of(&self, company_id: &str) -> AppResult<Vec<String>> {
        Self::tokens_of_on(self.db.as_ref(), company_id).await
    }

    /// List the tokens owned by a tenant, on an explicit connection.
    pub async fn tokens_of_on<C: ConnectionTrait>(
        conn: &C,
        company_id: &str,
    ) -> AppResult<Vec<String>> {
        let tokens: Vec<String> = CompanyTokenLink::find()
            .select_only()
            .column(company_token_link::Column::Token)
            .filter(company_token_link::Column::CompanyId.eq(company_id))
            .into_tuple()
            .all(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(tokens)
    }

    /// Delete all ownership links of a tenant.
    pub async fn delete_links_on<C: ConnectionTrait>(
        conn: &C,
        company_id: &str,
    ) -> AppResult<u64> {
        let result = CompanyTokenLink::delete_many()
            .filter(company_token_link::Column::CompanyId.eq(company_id))
            .exec(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected)
    }
}
