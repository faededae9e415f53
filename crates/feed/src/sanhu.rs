use crate::http::{build_client, get_json, last_record, trim_base};
use async_trait::async_trait;
use quantflow_core::common::Symbol;
use quantflow_core::market::entity::RawSnapshot;
use quantflow_core::market::error::MarketError;
use quantflow_core::market::port::QuoteProvider;
use quantflow_core::market::profile::{SANHU_PROFILE, SourceProfile};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

// 业务成功码
const RET_OK: i64 = 200;

/// # Summary
/// 散户量化 (sanhulianghua) 行情提供者实现。
///
/// # Invariants
/// - 所有请求均携带 token 查询参数。
/// - 价格类字段保持上游的千分之一定点整数，由归一化器按 `SANHU_PROFILE` 缩放。
#[derive(Clone)]
pub struct SanhuProvider {
    // HTTP 客户端
    client: Client,
    // 直连地址或反向代理前缀
    base_url: String,
    // 接口令牌
    token: String,
}

impl SanhuProvider {
    /// # Summary
    /// 创建一个新的 SanhuProvider 实例。
    ///
    /// # Arguments
    /// * `base_url`: 接口根地址 (直连或代理前缀)。
    /// * `token`: 接口令牌。
    /// * `timeout`: 单次请求超时。
    ///
    /// # Returns
    /// 成功返回 Provider，HTTP 客户端构建失败返回 MarketError。
    pub fn new(base_url: &str, token: &str, timeout: Duration) -> Result<Self, MarketError> {
        Ok(Self {
            client: build_client(timeout)?,
            base_url: trim_base(base_url),
            token: token.to_string(),
        })
    }
}

/// # Summary
/// 散户量化接口的通用响应信封。
#[derive(Deserialize, Debug)]
struct SanhuEnvelope {
    // 业务码，200 表示成功
    #[serde(default)]
    ret: Option<Value>,
    // 证券名称，仅实时接口返回
    #[serde(default)]
    stock_name: Option<String>,
    #[serde(default)]
    data: Option<Value>,
}

impl SanhuEnvelope {
    fn is_ok(&self) -> bool {
        let code = match &self.ret {
            Some(Value::Number(n)) => n.as_i64(),
            Some(Value::String(s)) => s.trim().parse().ok(),
            _ => None,
        };
        code == Some(RET_OK)
    }
}

fn decode_envelope(body: Value) -> Result<SanhuEnvelope, MarketError> {
    serde_json::from_value(body).map_err(|e| MarketError::Parse(e.to_string()))
}

/// # Summary
/// 解析实时接口信封。
///
/// # Logic
/// 1. 业务码非 200 视为无数据。
/// 2. `data` 为数组时取最后一条，为对象时直接使用。
/// 3. 名称取信封的 `stock_name`，空串视为缺失。
///
/// # Returns
/// 有数据时返回原始快照，否则返回 None。
pub fn parse_snapshot_envelope(body: Value) -> Result<Option<RawSnapshot>, MarketError> {
    let envelope = decode_envelope(body)?;
    if !envelope.is_ok() {
        warn!(ret = ?envelope.ret, "Sanhu realtime API returned a failure code");
        return Ok(None);
    }

    let name = envelope.stock_name.filter(|n| !n.trim().is_empty());
    Ok(envelope
        .data
        .and_then(last_record)
        .map(|record| RawSnapshot { name, record }))
}

/// # Summary
/// 解析日 K 线接口信封。
///
/// # Returns
/// 业务码为 200 且 `data` 为数组时返回原始行，否则返回空列表。
pub fn parse_candle_envelope(body: Value) -> Result<Vec<Value>, MarketError> {
    let envelope = decode_envelope(body)?;
    if !envelope.is_ok() {
        warn!(ret = ?envelope.ret, "Sanhu kline API returned a failure code");
        return Ok(Vec::new());
    }

    match envelope.data {
        Some(Value::Array(rows)) => Ok(rows),
        other => {
            warn!(data = ?other, "Sanhu kline API returned no row array");
            Ok(Vec::new())
        }
    }
}

#[async_trait]
impl QuoteProvider for SanhuProvider {
    fn profile(&self) -> &'static SourceProfile {
        &SANHU_PROFILE
    }

    /// # Summary
    /// 从 `/v1/hsa_fenshi` 抓取实时快照。
    async fn fetch_snapshot(&self, symbol: &Symbol) -> Result<Option<RawSnapshot>, MarketError> {
        let url = format!("{}/v1/hsa_fenshi", self.base_url);
        let body = get_json(
            &self.client,
            &url,
            &[
                ("token", self.token.as_str()),
                ("code", symbol.as_str()),
                ("all", "1"),
                ("simple", "1"),
            ],
        )
        .await?;

        let snapshot = parse_snapshot_envelope(body)?;
        debug!(%symbol, found = snapshot.is_some(), "Sanhu snapshot fetched");
        Ok(snapshot)
    }

    /// # Summary
    /// 从 `/v1/hsa_rixian` 抓取日 K 线原始行。
    async fn fetch_candle_rows(&self, symbol: &Symbol) -> Result<Vec<Value>, MarketError> {
        let url = format!("{}/v1/hsa_rixian", self.base_url);
        let body = get_json(
            &self.client,
            &url,
            &[
                ("token", self.token.as_str()),
                ("code", symbol.as_str()),
                ("all", "0"),
            ],
        )
        .await?;

        let rows = parse_candle_envelope(body)?;
        debug!(%symbol, rows = rows.len(), "Sanhu candles fetched");
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_snapshot_envelope_failure_code() {
        let body = json!({"ret": 401, "msg": "token invalid", "data": {"JiaGe": 1}});
        assert!(parse_snapshot_envelope(body).unwrap().is_none());
    }

    #[test]
    fn test_snapshot_envelope_array_takes_last() {
        let body = json!({
            "ret": 200,
            "stock_name": "平安银行",
            "data": [{"JiaGe": 10000}, {"JiaGe": 10500}]
        });
        let raw = parse_snapshot_envelope(body).unwrap().unwrap();
        assert_eq!(raw.name.as_deref(), Some("平安银行"));
        assert_eq!(raw.record, json!({"JiaGe": 10500}));
    }

    #[test]
    fn test_snapshot_envelope_object_and_string_code() {
        let body = json!({"ret": "200", "stock_name": "", "data": {"JiaGe": 9000}});
        let raw = parse_snapshot_envelope(body).unwrap().unwrap();
        assert!(raw.name.is_none());
        assert_eq!(raw.record, json!({"JiaGe": 9000}));
    }

    #[test]
    fn test_snapshot_envelope_empty_data() {
        assert!(parse_snapshot_envelope(json!({"ret": 200, "data": []})).unwrap().is_none());
        assert!(parse_snapshot_envelope(json!({"ret": 200})).unwrap().is_none());
    }

    #[test]
    fn test_candle_envelope() {
        let rows = parse_candle_envelope(json!({"ret": 200, "data": [{"RiQi": "2024-03-08"}]})).unwrap();
        assert_eq!(rows.len(), 1);

        assert!(parse_candle_envelope(json!({"ret": 500, "data": [{}]})).unwrap().is_empty());
        assert!(parse_candle_envelope(json!({"ret": 200, "data": {"RiQi": "x"}})).unwrap().is_empty());
    }

    #[test]
    fn test_envelope_not_an_object() {
        let err = parse_candle_envelope(json!([1, 2, 3])).unwrap_err();
        assert!(matches!(err, MarketError::Parse(_)));
    }
}
