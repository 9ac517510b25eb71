//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AdminError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return
//! `Result<T, AdminError>`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::editor::ValidationError;
use crate::storage::StorageError;
use crate::tablestore::TableStoreError;
use crate::upload::UploadError;

/// Application-level error type for the back-office.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Table-storage gateway call failed.
    #[error("Table store error: {0}")]
    TableStore(#[from] TableStoreError),

    /// Object-storage call failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Draft or form validation failed.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// An uploaded file was rejected before reaching storage.
    #[error("Upload rejected: {0}")]
    Upload(#[from] UploadError),

    /// Session read/write failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Not logged in (or session expired).
    #[error("Unauthorized")]
    Unauthorized,

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AdminError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(
            self,
            Self::TableStore(_) | Self::Storage(_) | Self::Session(_) | Self::Internal(_)
        ) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Session(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::TableStore(err) => match err {
                TableStoreError::NotFound(_) => StatusCode::NOT_FOUND,
                _ => StatusCode::BAD_GATEWAY,
            },
            Self::Storage(err) => match err {
                StorageError::SizeExceeded { .. } => StatusCode::PAYLOAD_TOO_LARGE,
                StorageError::PermissionDenied(_) => StatusCode::FORBIDDEN,
                StorageError::Conflict(_) => StatusCode::CONFLICT,
                _ => StatusCode::BAD_GATEWAY,
            },
            Self::Upload(UploadError::TooLarge { .. }) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Validation(_) | Self::Upload(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Session(_) | Self::Internal(_) => "Internal server error".to_string(),
            Self::TableStore(err) => match err {
                TableStoreError::NotFound(what) => format!("Not found: {what}"),
                _ => "External service error".to_string(),
            },
            Self::Storage(err) => match err {
                StorageError::SizeExceeded { .. }
                | StorageError::PermissionDenied(_)
                | StorageError::Conflict(_) => err.to_string(),
                _ => "Storage service error".to_string(),
            },
            _ => self.to_string(),
        };

        (status, message).into_response()
    }
}

impl From<crate::editor::EditorError> for AdminError {
    fn from(err: crate::editor::EditorError) -> Self {
        use crate::editor::EditorError;
        match err {
            EditorError::Closed => Self::BadRequest("editor session is closed".to_string()),
            EditorError::Validation(e) => Self::Validation(e),
            EditorError::Save(e) => Self::TableStore(e),
        }
    }
}

/// Result type alias for `AdminError`.
pub type Result<T> = std::result::Result<T, AdminError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn get_status(err: AdminError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_admin_error_status_codes() {
        assert_eq!(get_status(AdminError::Unauthorized), StatusCode::UNAUTHORIZED);
        assert_eq!(
            get_status(AdminError::NotFound("order".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AdminError::BadRequest("bad".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AdminError::Storage(StorageError::SizeExceeded {
                size: 6_000_000,
                limit: 5_242_880,
            })),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            get_status(AdminError::Storage(StorageError::PermissionDenied(
                "images".to_string()
            ))),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            get_status(AdminError::TableStore(TableStoreError::NotFound(
                "product".to_string()
            ))),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_storage_errors_keep_actionable_messages() {
        let err = AdminError::Storage(StorageError::SizeExceeded {
            size: 6_000_000,
            limit: 5_242_880,
        });
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
