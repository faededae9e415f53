use quantflow_core::common::tls::ensure_crypto_provider;
use quantflow_core::market::error::MarketError;
use reqwest::{Client, StatusCode};
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// # Summary
/// 构建带超时与默认请求头的 HTTP 客户端。
///
/// # Arguments
/// * `timeout`: 单次请求总超时。
///
/// # Returns
/// 成功返回客户端；TLS 后端初始化失败时返回 `MarketError::Unknown`。
pub(crate) fn build_client(timeout: Duration) -> Result<Client, MarketError> {
    ensure_crypto_provider();

    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static("quantflow/0.1"));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    Client::builder()
        .timeout(timeout)
        .default_headers(headers)
        .build()
        .map_err(|e| MarketError::Unknown(format!("Failed to build HTTP client: {e}")))
}

/// # Summary
/// 发起 GET 请求并将响应体解析为 JSON。
///
/// # Logic
/// 1. 传输失败或非 2xx 状态码映射为 `MarketError::Network`，404 单独映射为 `NotFound`。
/// 2. 响应体不是合法 JSON 映射为 `MarketError::Parse`。
pub(crate) async fn get_json(
    client: &Client,
    url: &str,
    query: &[(&str, &str)],
) -> Result<Value, MarketError> {
    debug!(url, "Requesting upstream market data");

    let resp = client
        .get(url)
        .query(query)
        .send()
        .await
        .map_err(|e| MarketError::Network(e.to_string()))?;

    if resp.status() == StatusCode::NOT_FOUND {
        return Err(MarketError::NotFound(url.to_string()));
    }
    if !resp.status().is_success() {
        return Err(MarketError::Network(format!("HTTP {}", resp.status())));
    }

    resp.json::<Value>()
        .await
        .map_err(|e| MarketError::Parse(e.to_string()))
}

/// 数据为数组时取最后一个元素，为对象时原样返回，其余情况视为无数据
pub(crate) fn last_record(data: Value) -> Option<Value> {
    match data {
        Value::Array(mut items) => items.pop(),
        Value::Object(_) => Some(data),
        _ => None,
    }
}

/// 去除基础地址末尾的斜杠
pub(crate) fn trim_base(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}
