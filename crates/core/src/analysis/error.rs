use thiserror::Error;

/// # Summary
/// 生成式 AI 协作方错误枚举。
///
/// # Invariants
/// - 必须通过 `thiserror` 派生 `Error` trait。
/// - 编排层将任何变体都转换为降级分析结果，而非向调用方抛出。
#[derive(Error, Debug)]
pub enum AiError {
    /// 配置错误 (如缺少 API Key)
    #[error("Configuration error: {0}")]
    Config(String),

    /// 网络连接或传输错误
    #[error("Network error: {0}")]
    Network(String),

    /// 调用配额耗尽 (HTTP 429 / RESOURCE_EXHAUSTED)
    #[error("Quota exceeded: {0}")]
    Quota(String),

    /// 平台返回的其他错误
    #[error("Platform error: {0}")]
    Platform(String),

    /// 返回内容无法解析为约定结构
    #[error("Parse error: {0}")]
    Parse(String),
}

impl AiError {
    /// 是否为配额类错误
    pub fn is_quota(&self) -> bool {
        matches!(self, AiError::Quota(_))
    }
}
