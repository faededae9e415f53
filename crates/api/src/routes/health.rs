/// 健康检查
#[utoipa::path(
    get,
    path = "/api/v1/health",
    tag = "系统 (System)",
    responses(
        (status = 200, description = "服务存活", body = String)
    )
)]
pub async fn health() -> &'static str {
    "ok"
}
