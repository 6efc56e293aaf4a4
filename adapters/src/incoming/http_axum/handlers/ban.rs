use axum::extract::State;
use tracing::instrument;

use crate::incoming::http_axum::{
    core::extractors::{AuthenticatedExecutor, JsonParams, QueryParams},
    dto::requests::{BanUserRequest, InspectQuery, UnbanUserRequest},
    error_mapper::HttpError,
};
use crate::shared::app_state::AppState;

#[cfg_attr(feature = "docs", utoipa::path(
    post,
    path = "/admin/ban",
    tag = "admin",
    request_body = BanUserRequest,
    responses(
        (status = 200, description = "User banned", body = String, example = "user spammer@example.com banned"),
        (status = 401, description = "Missing executor or insufficient role"),
        (status = 422, description = "Malformed body, invalid email, unknown user or failed write")
    )
))]
#[instrument(skip(state, executor), fields(executor = %executor.0.email))]
pub async fn ban_user(
    State(state): State<AppState>,
    executor: AuthenticatedExecutor,
    JsonParams(request): JsonParams<BanUserRequest>,
) -> Result<String, HttpError> {
    let user = state
        .ban_use_case
        .ban_user(
            &executor.0,
            &request.email,
            &request.reason.unwrap_or_default(),
        )
        .await?;

    Ok(format!("user {} banned", user.email))
}

#[cfg_attr(feature = "docs", utoipa::path(
    post,
    path = "/admin/unban",
    tag = "admin",
    request_body = UnbanUserRequest,
    responses(
        (status = 200, description = "User unbanned", body = String, example = "user spammer@example.com unbanned"),
        (status = 401, description = "Missing executor or insufficient role"),
        (status = 422, description = "Malformed body, invalid email, unknown user or failed write")
    )
))]
#[instrument(skip(state, executor), fields(executor = %executor.0.email))]
pub async fn unban_user(
    State(state): State<AppState>,
    executor: AuthenticatedExecutor,
    JsonParams(request): JsonParams<UnbanUserRequest>,
) -> Result<String, HttpError> {
    let user = state
        .ban_use_case
        .unban_user(&executor.0, &request.email)
        .await?;

    Ok(format!("user {} unbanned", user.email))
}

#[cfg_attr(feature = "docs", utoipa::path(
    get,
    path = "/admin/inspect",
    tag = "admin",
    params(InspectQuery),
    responses(
        (status = 200, description = "Ban history, one line per event, oldest first", body = String),
        (status = 401, description = "Missing executor"),
        (status = 422, description = "Malformed query or unknown user")
    )
))]
#[instrument(skip(state, executor), fields(executor = %executor.0.email))]
pub async fn inspect_ban_history(
    State(state): State<AppState>,
    executor: AuthenticatedExecutor,
    QueryParams(query): QueryParams<InspectQuery>,
) -> Result<String, HttpError> {
    let user = state
        .ban_use_case
        .inspect_ban_history(&executor.0, &query.email)
        .await?;

    Ok(format!("user {}:\n{}", user.email, user.ban_history.render()))
}
