use axum::extract::State;
use tracing::instrument;

use crate::incoming::http_axum::{
    core::extractors::{AuthenticatedExecutor, JsonParams},
    dto::requests::RoleChangeRequest,
    error_mapper::HttpError,
};
use crate::shared::app_state::AppState;

#[cfg_attr(feature = "docs", utoipa::path(
    post,
    path = "/admin/promote",
    tag = "admin",
    request_body = RoleChangeRequest,
    responses(
        (status = 200, description = "User role set to admin", body = String, example = "user moderator@example.com promoted to admin"),
        (status = 401, description = "Missing executor"),
        (status = 422, description = "Malformed body, unknown user or failed write")
    )
))]
#[instrument(skip(state, executor), fields(executor = %executor.0.email))]
pub async fn promote_user(
    State(state): State<AppState>,
    executor: AuthenticatedExecutor,
    JsonParams(request): JsonParams<RoleChangeRequest>,
) -> Result<String, HttpError> {
    let user = state
        .admin_use_case
        .promote_user(&executor.0, &request.email)
        .await?;

    Ok(format!("user {} promoted to admin", user.email))
}

#[cfg_attr(feature = "docs", utoipa::path(
    post,
    path = "/admin/fire",
    tag = "admin",
    request_body = RoleChangeRequest,
    responses(
        (status = 200, description = "User role set to user", body = String, example = "admin moderator@example.com downgraded to user"),
        (status = 401, description = "Missing executor"),
        (status = 422, description = "Malformed body, unknown user or failed write")
    )
))]
#[instrument(skip(state, executor), fields(executor = %executor.0.email))]
pub async fn fire_user(
    State(state): State<AppState>,
    executor: AuthenticatedExecutor,
    JsonParams(request): JsonParams<RoleChangeRequest>,
) -> Result<String, HttpError> {
    let user = state
        .admin_use_case
        .fire_user(&executor.0, &request.email)
        .await?;

    Ok(format!("admin {} downgraded to user", user.email))
}
