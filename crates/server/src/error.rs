use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use shared::error::{ApiError, ErrorCode};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("validation failed: {message}")]
    Validation { message: String },

    #[error("invalid email format: {email}")]
    InvalidEmail { email: String },

    #[error("{resource} not found")]
    NotFound { resource: String },

    #[error("conflict: {message}")]
    Conflict { message: String },

    #[error("password hashing failed")]
    PasswordHashing(#[from] bcrypt::BcryptError),

    #[error("storage error: {0}")]
    Storage(anyhow::Error),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn invalid_email(email: impl Into<String>) -> Self {
        Self::InvalidEmail {
            email: email.into(),
        }
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    fn from_storage_error(err: anyhow::Error) -> Self {
        match err.downcast_ref::<sqlx::Error>() {
            Some(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                AppError::Conflict {
                    message: "Email address already exists".to_string(),
                }
            }
            Some(sqlx::Error::RowNotFound) => AppError::NotFound {
                resource: "Credentials".to_string(),
            },
            _ => AppError::Storage(err),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::from_storage_error(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Validation { message } => (
                StatusCode::BAD_REQUEST,
                ApiError::new(ErrorCode::Validation, message),
            ),
            AppError::InvalidEmail { email } => (
                StatusCode::BAD_REQUEST,
                ApiError::with_details(
                    ErrorCode::Validation,
                    "Invalid email format",
                    serde_json::json!({ "email": email }),
                ),
            ),
            AppError::NotFound { resource } => (
                StatusCode::NOT_FOUND,
                ApiError::new(ErrorCode::NotFound, format!("{resource} not found")),
            ),
            AppError::Conflict { message } => (
                StatusCode::CONFLICT,
                ApiError::new(ErrorCode::Conflict, message),
            ),
            AppError::PasswordHashing(err) => {
                tracing::error!("password hashing error: {err:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiError::new(ErrorCode::Internal, "Password processing failed"),
                )
            }
            AppError::Storage(err) => {
                tracing::error!("storage error: {err:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiError::new(ErrorCode::Internal, "A database error occurred"),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
