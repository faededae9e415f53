use crate::common::Symbol;
use crate::market::entity::RawSnapshot;
use crate::market::error::MarketError;
use crate::market::profile::SourceProfile;
use async_trait::async_trait;

/// # Summary
/// 上游行情数据提供者接口 (实时快照 + 日 K 线)。
///
/// # Invariants
/// - 实现者只负责传输与信封解析，字段映射和缩放统一交给归一化器按 `profile()` 处理。
/// - 两个抓取方法互不依赖，可被并发调用。
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// # Summary
    /// 返回该数据源的字段映射与缩放配置。
    fn profile(&self) -> &'static SourceProfile;

    /// # Summary
    /// 获取实时行情快照。
    ///
    /// # Logic
    /// 1. 构建数据源请求并发起网络调用。
    /// 2. 解析信封；业务码失败或无数据时返回 `Ok(None)`。
    ///
    /// # Arguments
    /// * `symbol`: 证券代码。
    ///
    /// # Returns
    /// 成功返回原始快照 (可能为空)，传输或解析失败返回 MarketError。
    async fn fetch_snapshot(&self, symbol: &Symbol) -> Result<Option<RawSnapshot>, MarketError>;

    /// # Summary
    /// 获取日 K 线原始记录。
    ///
    /// # Logic
    /// 1. 构建数据源请求并发起网络调用。
    /// 2. 解析信封并返回原始行数组，不保证顺序。
    ///
    /// # Arguments
    /// * `symbol`: 证券代码。
    ///
    /// # Returns
    /// 成功返回原始行列表 (可能为空)。
    async fn fetch_candle_rows(&self, symbol: &Symbol)
    -> Result<Vec<serde_json::Value>, MarketError>;
}
