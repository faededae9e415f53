use crate::http::{build_client, get_json, last_record, trim_base};
use async_trait::async_trait;
use quantflow_core::common::Symbol;
use quantflow_core::market::entity::RawSnapshot;
use quantflow_core::market::error::MarketError;
use quantflow_core::market::port::QuoteProvider;
use quantflow_core::market::profile::{MAIRUI_PROFILE, SourceProfile};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// # Summary
/// 麦蕊 (mairui) 行情提供者实现。
///
/// # Invariants
/// - 证书 (licence) 作为 URL 最后一段路径传递。
/// - 上游直接返回裸对象或裸数组，没有业务信封；数值为普通小数。
#[derive(Clone)]
pub struct MairuiProvider {
    client: Client,
    base_url: String,
    licence: String,
}

impl MairuiProvider {
    /// # Summary
    /// 创建一个新的 MairuiProvider 实例。
    ///
    /// # Arguments
    /// * `base_url`: 接口根地址。
    /// * `licence`: 接口证书。
    /// * `timeout`: 单次请求超时。
    pub fn new(base_url: &str, licence: &str, timeout: Duration) -> Result<Self, MarketError> {
        Ok(Self {
            client: build_client(timeout)?,
            base_url: trim_base(base_url),
            licence: licence.to_string(),
        })
    }
}

#[async_trait]
impl QuoteProvider for MairuiProvider {
    fn profile(&self) -> &'static SourceProfile {
        &MAIRUI_PROFILE
    }

    /// # Summary
    /// 从 `/hsrl/ssjy/{code}/{licence}` 抓取实时快照。
    ///
    /// # Logic
    /// 1. 对象直接作为快照；数组取最后一条。
    /// 2. 上游不返回名称，名称交由归一化器回退为代码。
    async fn fetch_snapshot(&self, symbol: &Symbol) -> Result<Option<RawSnapshot>, MarketError> {
        let url = format!("{}/hsrl/ssjy/{}/{}", self.base_url, symbol, self.licence);
        let body = get_json(&self.client, &url, &[]).await?;

        let snapshot = last_record(body).map(|record| RawSnapshot { name: None, record });
        debug!(%symbol, found = snapshot.is_some(), "Mairui snapshot fetched");
        Ok(snapshot)
    }

    /// # Summary
    /// 从 `/hszbl/fsjy/{code}/dn/{licence}` 抓取日 K 线原始行。
    async fn fetch_candle_rows(&self, symbol: &Symbol) -> Result<Vec<Value>, MarketError> {
        let url = format!("{}/hszbl/fsjy/{}/dn/{}", self.base_url, symbol, self.licence);
        let body = get_json(&self.client, &url, &[]).await?;

        match body {
            Value::Array(rows) => {
                debug!(%symbol, rows = rows.len(), "Mairui candles fetched");
                Ok(rows)
            }
            other => Err(MarketError::Parse(format!(
                "Expected a row array, got {}",
                json_kind(&other)
            ))),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
