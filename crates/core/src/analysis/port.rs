use crate::analysis::entity::GroundedText;
use crate::analysis::error::AiError;
use async_trait::async_trait;

/// # Summary
/// 生成式 AI 协作方接口。
///
/// # Invariants
/// - 实现必须是 `Send` 和 `Sync` 以支持并发调用。
/// - 不做自动重试，失败一次即返回错误。
#[async_trait]
pub trait AiAnalyst: Send + Sync {
    /// # Summary
    /// 启用联网搜索的自由文本查询。
    ///
    /// # Arguments
    /// * `query` - 查询提示词。
    ///
    /// # Returns
    /// * 成功返回正文与引用网页列表。
    /// * 失败返回 `Err(AiError)`。
    async fn search(&self, query: &str) -> Result<GroundedText, AiError>;

    /// # Summary
    /// 受 JSON Schema 约束的结构化生成。
    ///
    /// # Logic
    /// 返回模型输出的原始文本，可能包含代码围栏等格式噪声，由调用方清洗后解析。
    ///
    /// # Arguments
    /// * `prompt` - 提示词。
    /// * `schema` - 期望的响应结构。
    ///
    /// # Returns
    /// * 成功返回原始文本。
    /// * 失败返回 `Err(AiError)`。
    async fn generate_json(
        &self,
        prompt: &str,
        schema: &serde_json::Value,
    ) -> Result<String, AiError>;
}
