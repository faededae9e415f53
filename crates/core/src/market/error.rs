use thiserror::Error;

/// # Summary
/// 上游行情接口的失败分类。
///
/// # Invariants
/// - 业务层面的 "无数据" (如散户量化 `ret ≠ 200`) 不是错误，由端口返回 `Ok(None)` / 空集合表达。
/// - 编排层把任何变体都当作数据源缺失处理，错误信息只进日志。
#[derive(Error, Debug)]
pub enum MarketError {
    // 传输失败、超时或非 2xx 状态码
    #[error("Upstream request failed: {0}")]
    Network(String),
    // 响应体不是预期的 JSON 结构
    #[error("Malformed upstream payload: {0}")]
    Parse(String),
    // 上游返回 404，携带请求路径
    #[error("Upstream resource not found: {0}")]
    NotFound(String),
    #[error("Market adapter error: {0}")]
    Unknown(String),
}
