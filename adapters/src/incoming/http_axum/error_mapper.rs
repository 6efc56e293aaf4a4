use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{debug, error};

use cake_api_application::error::AppError;

pub struct HttpError(pub AppError);

impl HttpError {
    pub fn status_code(&self) -> StatusCode {
        match &self.0 {
            AppError::ValidationError { .. }
            | AppError::NotFound { .. }
            | AppError::DatabaseError { .. } => StatusCode::UNPROCESSABLE_ENTITY,

            AppError::Unauthorized | AppError::PermissionDenied => StatusCode::UNAUTHORIZED,

            AppError::Domain(_)
            | AppError::NotificationError { .. }
            | AppError::ConfigError { .. }
            | AppError::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let app_error = &self.0;
        let status_code = self.status_code();

        if status_code.is_server_error() || matches!(app_error, AppError::DatabaseError { .. }) {
            error!("Server error response generated: {}", app_error);
        } else {
            debug!("Client error response generated: {}", app_error);
        }

        let message = match app_error {
            AppError::Domain(_) | AppError::InternalServerError => {
                "Internal server error".to_string()
            }
            AppError::ConfigError { .. } => "Configuration error".to_string(),
            AppError::NotificationError { .. } => "Notification error".to_string(),
            other => other.to_string(),
        };

        (status_code, message).into_response()
    }
}

impl From<AppError> for HttpError {
    fn from(app_error: AppError) -> Self {
        HttpError(app_error)
    }
}
