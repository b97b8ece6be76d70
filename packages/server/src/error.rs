use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::chain::ChainError;
use common::storage::StorageError;
use common::store::StoreError;
use serde::Serialize;

/// Structured error response returned by all endpoints on failure.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Machine-readable error code. One of: `VALIDATION_ERROR`, `NOT_FOUND`,
    /// `CONFLICT`, `CONFIGURATION_ERROR`, `STORAGE_ERROR`, `CHAIN_ERROR`,
    /// `INTERNAL_ERROR`.
    #[schema(example = "VALIDATION_ERROR")]
    pub code: &'static str,
    /// Human-readable error description.
    #[schema(example = "Content is required.")]
    pub message: String,
    /// Underlying error text for storage and chain failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    Validation(String),
    NotFound(String),
    Conflict(String),
    /// A credential or collaborator needed by the operation is not configured.
    Configuration(String),
    Storage {
        message: String,
        error: String,
    },
    Chain {
        message: String,
        error: String,
    },
    Internal(String),
}

impl AppError {
    pub fn storage(message: impl Into<String>, error: impl ToString) -> Self {
        AppError::Storage {
            message: message.into(),
            error: error.to_string(),
        }
    }

    fn status_and_body(self) -> (StatusCode, ErrorBody) {
        match self {
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    code: "VALIDATION_ERROR",
                    message: msg,
                    error: None,
                },
            ),
            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    code: "NOT_FOUND",
                    message: msg,
                    error: None,
                },
            ),
            AppError::Conflict(msg) => (
                StatusCode::CONFLICT,
                ErrorBody {
                    code: "CONFLICT",
                    message: msg,
                    error: None,
                },
            ),
            AppError::Configuration(msg) => {
                tracing::error!("Configuration error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        code: "CONFIGURATION_ERROR",
                        message: msg,
                        error: None,
                    },
                )
            }
            AppError::Storage { message, error } => {
                tracing::error!(%error, "{}", message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        code: "STORAGE_ERROR",
                        message,
                        error: Some(error),
                    },
                )
            }
            AppError::Chain { message, error } => {
                tracing::error!(%error, "{}", message);
                (
                    StatusCode::BAD_GATEWAY,
                    ErrorBody {
                        code: "CHAIN_ERROR",
                        message,
                        error: Some(error),
                    },
                )
            }
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        code: "INTERNAL_ERROR",
                        message: "An internal server error occurred.".into(),
                        error: None,
                    },
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate(hash) => {
                AppError::Conflict(format!("Content '{hash}' has already been monetized"))
            }
            other => AppError::storage("Failed to access the content store.", other),
        }
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(hash) => AppError::NotFound(format!("Content '{hash}' not found")),
            StorageError::InvalidHash(detail) => AppError::Validation(detail),
            StorageError::SizeLimitExceeded { actual, limit } => AppError::Validation(format!(
                "Content is {actual} bytes; the limit is {limit} bytes"
            )),
            other => AppError::storage("Failed to access content storage.", other),
        }
    }
}

impl From<ChainError> for AppError {
    fn from(err: ChainError) -> Self {
        match err {
            ChainError::MissingConfig(_) | ChainError::InvalidKey(_) | ChainError::Artifact(_) => {
                AppError::Configuration(err.to_string())
            }
            ChainError::InvalidAmount { .. } | ChainError::InvalidAddress(_) => {
                AppError::Validation(err.to_string())
            }
            other => AppError::Chain {
                message: "Failed to deploy the purchase contract.".into(),
                error: other.to_string(),
            },
        }
    }
}
