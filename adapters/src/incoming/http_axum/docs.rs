use crate::incoming::http_axum::{dto, handlers};
use dto::requests::{BanUserRequest, RoleChangeRequest, UnbanUserRequest};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health::health_check,
        handlers::ban::ban_user,
        handlers::ban::unban_user,
        handlers::ban::inspect_ban_history,
        handlers::admin::promote_user,
        handlers::admin::fire_user,
    ),
    components(schemas(BanUserRequest, UnbanUserRequest, RoleChangeRequest)),
    tags(
        (name = "admin", description = "Account moderation. Executor identity is read from the X-Executor-Email and X-Executor-Role headers."),
        (name = "system", description = "Service health")
    ),
    info(
        title = "Cake API admin endpoints",
        description = "Ban, unban, inspect, promote and fire user accounts"
    )
)]
pub struct ApiDoc;
