use async_trait::async_trait;
use chrono::{Days, NaiveDate, TimeZone, Utc};
use quantflow_api::server::{AppState, build_router};
use quantflow_core::analysis::entity::GroundedText;
use quantflow_core::analysis::error::AiError;
use quantflow_core::analysis::port::AiAnalyst;
use quantflow_core::common::Symbol;
use quantflow_core::common::time::FakeClockProvider;
use quantflow_core::common::tls::ensure_crypto_provider;
use quantflow_core::config::DashboardConfig;
use quantflow_core::market::entity::RawSnapshot;
use quantflow_core::market::error::MarketError;
use quantflow_core::market::port::QuoteProvider;
use quantflow_core::market::profile::{MAIRUI_PROFILE, SourceProfile};
use quantflow_manager::orchestrator::DashboardService;
use quantflow_manager::session::QuerySession;
use serde_json::{Value, json};
use std::sync::Arc;

/// 固定返回价格 100 快照与 20 根日线的行情源
struct StaticProvider;

#[async_trait]
impl QuoteProvider for StaticProvider {
    fn profile(&self) -> &'static SourceProfile {
        &MAIRUI_PROFILE
    }

    async fn fetch_snapshot(&self, _symbol: &Symbol) -> Result<Option<RawSnapshot>, MarketError> {
        Ok(Some(RawSnapshot {
            name: Some("测试股份".to_string()),
            record: json!({"p": 100.0, "pc": 1.5, "o": 99.0, "h": 101.0, "l": 98.5, "v": 120000}),
        }))
    }

    async fn fetch_candle_rows(&self, _symbol: &Symbol) -> Result<Vec<Value>, MarketError> {
        let last = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        Ok((0..20u32)
            .map(|i| {
                let date = last.checked_sub_days(Days::new(u64::from(19 - i))).unwrap();
                let close = 90.0 + f64::from(i) * 0.5;
                json!({"d": date.format("%Y-%m-%d").to_string(), "o": close, "h": close + 1.0, "l": close - 1.0, "c": close, "v": 1000})
            })
            .collect())
    }
}

/// 配额耗尽的 AI
struct ExhaustedAnalyst;

#[async_trait]
impl AiAnalyst for ExhaustedAnalyst {
    async fn search(&self, _query: &str) -> Result<GroundedText, AiError> {
        Err(AiError::Quota("RESOURCE_EXHAUSTED".into()))
    }

    async fn generate_json(&self, _prompt: &str, _schema: &Value) -> Result<String, AiError> {
        Err(AiError::Quota("RESOURCE_EXHAUSTED".into()))
    }
}

/// # Summary
/// 在随机端口启动完整路由，返回基础 URL。
async fn spawn_server() -> String {
    let service = DashboardService::new(
        Arc::new(StaticProvider),
        Arc::new(ExhaustedAnalyst),
        Arc::new(FakeClockProvider::new(
            Utc.with_ymd_and_hms(2024, 3, 8, 10, 0, 0).unwrap(),
        )),
        DashboardConfig {
            rng_seed: Some(7),
            ..DashboardConfig::default()
        },
    );
    let state = AppState {
        session: Arc::new(QuerySession::new(Arc::new(service))),
    };

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, build_router(state)).await.unwrap();
    });
    format!("http://{}", addr)
}

fn client() -> reqwest::Client {
    ensure_crypto_provider();
    reqwest::Client::new()
}

/// # Summary
/// 查询 -> 读取当前看板的完整 HTTP 流程。
///
/// # Logic
/// 1. 查询前读取当前看板返回 404。
/// 2. 查询成功，AI 配额耗尽时仍返回权威行情与提示。
/// 3. 之后读取当前看板与查询结果一致。
#[tokio::test]
async fn test_dashboard_workflow() {
    let base = spawn_server().await;
    let http = client();

    let resp = http.get(format!("{}/api/v1/dashboard", base)).send().await.unwrap();
    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);

    let resp = http
        .get(format!("{}/api/v1/dashboard/600519", base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["applied"], true);

    let dashboard = &body["data"]["dashboard"];
    assert_eq!(dashboard["dataMode"], "primary");
    assert_eq!(dashboard["result"]["stock"]["symbol"], "600519");
    assert_eq!(dashboard["result"]["stock"]["price"], 100.0);
    assert_eq!(dashboard["series"].as_array().unwrap().len(), 20);
    assert_eq!(dashboard["result"]["analysis"]["action"], "HOLD");
    assert!(dashboard.get("error").is_none());

    let resp = http.get(format!("{}/api/v1/dashboard", base)).send().await.unwrap();
    assert_eq!(resp.status(), 200);
    let current: Value = resp.json().await.unwrap();
    assert_eq!(&current["data"], dashboard);
}

#[tokio::test]
async fn test_blank_symbol_is_bad_request() {
    let base = spawn_server().await;
    let resp = client()
        .get(format!("{}/api/v1/dashboard/%20%20", base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_health_and_openapi_document() {
    let base = spawn_server().await;
    let http = client();

    let resp = http.get(format!("{}/api/v1/health", base)).send().await.unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "ok");

    let doc: Value = http
        .get(format!("{}/api-docs/openapi.json", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(doc["paths"]["/api/v1/dashboard/{symbol}"]["get"].is_object());
    assert!(doc["paths"]["/api/v1/dashboard"]["get"].is_object());
}
