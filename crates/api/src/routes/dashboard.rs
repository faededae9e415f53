//! # 看板控制器
//!
//! 查询接口每次调用都会完整跑一遍编排流程 (行情、AI 搜索、分析、兜底)，
//! 因此响应时间取决于上游数据源与模型服务。

use axum::Json;
use axum::extract::{Path, State};
use quantflow_core::analysis::entity::Dashboard;

use crate::error::ApiError;
use crate::server::AppState;
use crate::types::{ApiErrorResponse, ApiResponse, QueryResponse};

/// 查询个股看板
///
/// 结果若在返回前已被更新的查询取代，`applied` 为 false，当前看板保持更新查询的结果。
#[utoipa::path(
    get,
    path = "/api/v1/dashboard/{symbol}",
    tag = "看板 (Dashboard)",
    params(
        ("symbol" = String, Path, description = "股票代码 (如 600519、sh600519)")
    ),
    responses(
        (status = 200, description = "查询完成", body = ApiResponse<QueryResponse>),
        (status = 400, description = "股票代码为空", body = ApiErrorResponse)
    )
)]
pub async fn query_dashboard(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<ApiResponse<QueryResponse>>, ApiError> {
    let outcome = state.session.submit(&symbol).await?;
    let applied = outcome.is_applied();
    if !applied {
        tracing::debug!(symbol = %symbol, "query result superseded");
    }

    Ok(Json(ApiResponse::ok(QueryResponse {
        applied,
        dashboard: outcome.into_dashboard(),
    })))
}

/// 读取当前看板
#[utoipa::path(
    get,
    path = "/api/v1/dashboard",
    tag = "看板 (Dashboard)",
    responses(
        (status = 200, description = "当前看板", body = ApiResponse<Dashboard>),
        (status = 404, description = "尚未完成任何查询", body = ApiErrorResponse)
    )
)]
pub async fn current_dashboard(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Dashboard>>, ApiError> {
    let dashboard = state
        .session
        .current()
        .ok_or_else(|| ApiError::NotFound("尚无看板，请先查询股票代码".to_string()))?;
    Ok(Json(ApiResponse::ok(dashboard)))
}
