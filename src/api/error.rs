use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;

use super::ApiResponse;
use super::observability::ErrorKind;
use crate::services::CatalogError;

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),

    DatabaseError(String),

    ValidationError(String),

    /// Well-formed write payload the catalog cannot accept.
    Unprocessable(String),

    InternalError(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(msg) => write!(f, "Not found: {msg}"),
            Self::DatabaseError(msg) => write!(f, "Database error: {msg}"),
            Self::ValidationError(msg) => write!(f, "Validation error: {msg}"),
            Self::Unprocessable(msg) => write!(f, "Unprocessable: {msg}"),
            Self::InternalError(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            Self::DatabaseError(msg) => {
                tracing::error!("Database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "A database error occurred".to_string(),
                )
            }
            Self::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Self::Unprocessable(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.clone()),
            Self::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        let kind = self.kind();
        let body = ApiResponse::<()>::error(error_message);
        let mut response = (status, Json(body)).into_response();
        response.extensions_mut().insert(ErrorKind(kind));
        response
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self::InternalError(err.to_string())
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Validation(msg) => Self::ValidationError(msg),
            CatalogError::UnknownAlias { .. } => Self::Unprocessable(err.to_string()),
            CatalogError::NotFound(id) => Self::not_found("Title", id),
            CatalogError::Database(msg) => Self::DatabaseError(msg),
            CatalogError::InsertExhausted { .. } | CatalogError::Internal(_) => {
                Self::InternalError(err.to_string())
            }
        }
    }
}

impl ApiError {
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::DatabaseError(_) => "database",
            Self::ValidationError(_) => "validation",
            Self::Unprocessable(_) => "unprocessable",
            Self::InternalError(_) => "internal",
        }
    }

    pub fn not_found(resource: &str, id: impl fmt::Display) -> Self {
        Self::NotFound(format!("{resource} {id} not found"))
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::InternalError(msg.into())
    }

    /// Mapping for create and update, where every payload problem is a 422.
    #[must_use]
    pub fn from_write(err: CatalogError) -> Self {
        match err {
            CatalogError::Validation(msg) => Self::Unprocessable(msg),
            other => other.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TitleId;
    use crate::parser::alias::Category;

    fn status(err: ApiError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_catalog_error_status_codes() {
        assert_eq!(
            status(CatalogError::Validation("bad".into()).into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status(CatalogError::NotFound(TitleId::new(1)).into()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status(
                CatalogError::UnknownAlias {
                    category: Category::Genre,
                    value: "x".into()
                }
                .into()
            ),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status(
                CatalogError::InsertExhausted {
                    entity: "title",
                    attempts: 10
                }
                .into()
            ),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_kind_is_attached_to_response() {
        let response = ApiError::from_write(CatalogError::Validation("bad".into())).into_response();
        assert_eq!(
            response.extensions().get::<ErrorKind>(),
            Some(&ErrorKind("unprocessable"))
        );
    }

    #[test]
    fn test_write_validation_is_unprocessable() {
        assert_eq!(
            status(ApiError::from_write(CatalogError::Validation("bad".into()))),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status(ApiError::from_write(CatalogError::NotFound(TitleId::new(1)))),
            StatusCode::NOT_FOUND
        );
    }
}
