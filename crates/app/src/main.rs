mod settings;

use std::sync::Arc;
use std::time::Duration;

use quantflow_ai::gemini::GeminiAnalyst;
use quantflow_api::server::{AppState, start_server};
use quantflow_core::common::time::RealTimeProvider;
use quantflow_core::config::{MarketConfig, ProviderKind};
use quantflow_core::market::error::MarketError;
use quantflow_core::market::port::QuoteProvider;
use quantflow_feed::mairui::MairuiProvider;
use quantflow_feed::sanhu::SanhuProvider;
use quantflow_manager::orchestrator::DashboardService;
use quantflow_manager::session::QuerySession;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// # Summary
/// 按配置选择行情数据源实现。
fn build_provider(market: &MarketConfig) -> Result<Arc<dyn QuoteProvider>, MarketError> {
    let timeout = Duration::from_secs(market.timeout_secs);
    let base_url = market.base_url();
    info!(provider = ?market.provider, deployment = ?market.deployment, %base_url, "market provider selected");

    Ok(match market.provider {
        ProviderKind::Sanhu => Arc::new(SanhuProvider::new(base_url, &market.token, timeout)?),
        ProviderKind::Mairui => Arc::new(MairuiProvider::new(base_url, &market.token, timeout)?),
    })
}

/// # Summary
/// 应用启动入口，纯粹的 DI 容器。
/// 负责加载配置、实例化适配器并通过 Arc<dyn Trait> 注入到 DashboardService。
///
/// # Logic
/// 1. 初始化全局日志。
/// 2. 加载分层配置。
/// 3. 实例化基础设施层（行情源、AI）。
/// 4. 构造应用服务层（DashboardService、QuerySession）。
/// 5. 启动 HTTP 服务，直到收到退出信号。
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. 初始化日志
    let (writer, _guard) = tracing_appender::non_blocking(std::io::stdout());
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(writer)
        .init();
    info!("QuantFlow starting...");

    // 2. 加载配置
    let config_path = std::env::var("QUANTFLOW_CONFIG").ok();
    let config = settings::load(config_path.as_deref())?;
    if config.market.token.is_empty() {
        warn!("market token is empty, upstream requests will be rejected");
    }
    if config.ai.api_key.is_empty() {
        warn!("AI api key is empty, analysis will be degraded");
    }

    // 3. 实例化基础设施层
    let provider = build_provider(&config.market)?;
    let analyst = Arc::new(GeminiAnalyst::new(&config.ai)?);

    // 4. 构造应用服务层
    let service = DashboardService::new(
        provider,
        analyst,
        Arc::new(RealTimeProvider),
        config.dashboard.clone(),
    );
    let state = AppState {
        session: Arc::new(QuerySession::new(Arc::new(service))),
    };

    // 5. 启动服务，等待外部退出信号
    let bind_addr = config.server.bind_addr();
    tokio::select! {
        result = start_server(state, &bind_addr) => result?,
        signal = tokio::signal::ctrl_c() => {
            signal?;
            info!("Shutdown signal received. Exiting...");
        }
    }

    Ok(())
}
