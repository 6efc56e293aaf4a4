use axum::{extract::Request, middleware::Next, response::Response};

use crate::incoming::http_axum::{core::extractors::AuthenticatedExecutor, error_mapper::HttpError};
use cake_api_application::error::AppError;

pub async fn require_admin_role(request: Request, next: Next) -> Result<Response, HttpError> {
    let AuthenticatedExecutor(executor) = AuthenticatedExecutor::from_headers(request.headers())?;

    if !executor.is_admin() {
        tracing::debug!(executor = %executor.email, role = %executor.role, "Admin route denied");
        return Err(HttpError(AppError::PermissionDenied));
    }

    Ok(next.run(request).await)
}
