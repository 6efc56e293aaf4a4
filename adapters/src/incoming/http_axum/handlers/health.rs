#[cfg_attr(feature = "docs", utoipa::path(
    get,
    path = "/health",
    tag = "system",
    responses((status = 200, description = "Service is up", body = String, example = "ok")),
    operation_id = "health_check"
))]
pub async fn health_check() -> &'static str {
    "ok"
}
