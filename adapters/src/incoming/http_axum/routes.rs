use axum::{
    Router,
    routing::{get, post},
};
#[cfg(feature = "docs")]
use utoipa::OpenApi;
#[cfg(feature = "docs")]
use utoipa_swagger_ui::SwaggerUi;

use crate::incoming::http_axum::{
    handlers::{
        admin::{fire_user, promote_user},
        ban::{ban_user, inspect_ban_history, unban_user},
        health::health_check,
    },
    router_ext::RouterExt,
};
use crate::shared::app_state::AppState;

#[cfg(feature = "docs")]
use crate::incoming::http_axum::docs::ApiDoc;

pub fn build_application_router(state: &AppState) -> Router<AppState> {
    build_core_routes()
        .merge(build_admin_routes(state.config.admin.require_admin_role))
        .merge(build_inspect_routes())
        .with_request_id()
}

fn build_core_routes() -> Router<AppState> {
    let router = Router::new().route("/health", get(health_check));

    #[cfg(feature = "docs")]
    {
        router.merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
    }

    #[cfg(not(feature = "docs"))]
    {
        router
    }
}

fn build_admin_routes(require_admin_role: bool) -> Router<AppState> {
    Router::new()
        .route("/admin/ban", post(ban_user))
        .route("/admin/unban", post(unban_user))
        .route("/admin/promote", post(promote_user))
        .route("/admin/fire", post(fire_user))
        .with_admin_gate(require_admin_role)
}

/// Any authenticated executor may read a ban history, so inspect stays
/// outside the admin gate.
fn build_inspect_routes() -> Router<AppState> {
    Router::new().route("/admin/inspect", get(inspect_ban_history))
}
