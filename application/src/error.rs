use thiserror::Error;

use domain::error::DomainError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("{message}")]
    ValidationError { message: String },

    #[error("{message}")]
    NotFound { message: String },

    #[error("unauthorized")]
    Unauthorized,

    #[error("permission denied")]
    PermissionDenied,

    #[error("Database error: {message}")]
    DatabaseError { message: String },

    #[error("Notification error: {message}")]
    NotificationError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Internal server error")]
    InternalServerError,
}

impl AppError {
    pub fn user_not_found(email: &str) -> Self {
        AppError::NotFound {
            message: format!("user {email} not found"),
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
