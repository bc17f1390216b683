//! Domain service for the title catalog.
//!
//! Covers filtered listing, single-title reads, the create/update/soft-delete
//! pipeline and the aggregate summary.

use crate::db::InsertExhausted;
use crate::domain::TitleId;
use crate::models::{Projection, SummaryReport, TitleFields, TitleInput, TitleQuery, TitleRecord};
use crate::parser::alias::{AliasError, Category};
use crate::parser::FilterError;
use thiserror::Error;

/// Errors specific to catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Unknown {category} value: '{value}'")]
    UnknownAlias { category: Category, value: String },

    #[error("Title not found: {0}")]
    NotFound(TitleId),

    #[error("Failed to insert {entity} after {attempts} attempts")]
    InsertExhausted { entity: &'static str, attempts: u32 },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for CatalogError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for CatalogError {
    fn from(err: anyhow::Error) -> Self {
        let err = match err.downcast::<InsertExhausted>() {
            Ok(exhausted) => {
                return Self::InsertExhausted {
                    entity: exhausted.entity,
                    attempts: exhausted.attempts,
                };
            }
            Err(err) => err,
        };

        match err.downcast::<sea_orm::DbErr>() {
            Ok(db) => db.into(),
            Err(err) => Self::Internal(err.to_string()),
        }
    }
}

impl From<FilterError> for CatalogError {
    fn from(err: FilterError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<AliasError> for CatalogError {
    fn from(err: AliasError) -> Self {
        match err {
            AliasError::Unknown { category, value } => Self::UnknownAlias { category, value },
        }
    }
}

/// Domain service trait for the catalog.
#[async_trait::async_trait]
pub trait CatalogService: Send + Sync {
    /// One page of active titles, projected. Read-side filter problems such
    /// as unknown aliases yield an empty page rather than an error.
    async fn list_titles(
        &self,
        query: &TitleQuery,
        projection: &Projection,
    ) -> Result<Vec<TitleFields>, CatalogError>;

    /// Gets an active title by id.
    async fn get_title(&self, id: TitleId) -> Result<TitleRecord, CatalogError>;

    /// Creates a title, get-or-creating every related name.
    async fn create_title(&self, input: TitleInput) -> Result<TitleRecord, CatalogError>;

    /// Replaces every field and relation of an active title.
    async fn update_title(
        &self,
        id: TitleId,
        input: TitleInput,
    ) -> Result<TitleRecord, CatalogError>;

    /// Soft-deletes an active title and returns its final state.
    async fn delete_title(&self, id: TitleId) -> Result<TitleRecord, CatalogError>;

    /// Aggregate statistics over active titles.
    async fn summary(&self) -> Result<SummaryReport, CatalogError>;

    /// Drops every memoized read result.
    async fn invalidate_cache(&self);
}
