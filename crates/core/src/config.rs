use serde::{Deserialize, Serialize};

/// 全局应用配置，进程启动时加载一次后以只读方式注入各组件
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub market: MarketConfig,
    pub ai: AiConfig,
    pub dashboard: DashboardConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl ServerConfig {
    /// 监听地址，如 `0.0.0.0:8080`
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 行情数据源类型
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Sanhu,
    Mairui,
}

/// 部署模式：直连上游，或经由反向代理转发
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentMode {
    #[default]
    Direct,
    Proxied,
}

/// # Summary
/// 上游行情接口配置。
///
/// # Invariants
/// - `token` 为空时请求仍会发出，由上游返回业务错误。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketConfig {
    pub provider: ProviderKind,
    pub deployment: DeploymentMode,
    pub direct_base_url: String,
    pub proxy_base_url: String,
    pub token: String,
    pub timeout_secs: u64,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Sanhu,
            deployment: DeploymentMode::Direct,
            direct_base_url: "http://www.sanhulianghua.com:2008".to_string(),
            proxy_base_url: "http://127.0.0.1/api/proxy".to_string(),
            token: String::new(),
            timeout_secs: 10,
        }
    }
}

impl MarketConfig {
    /// # Summary
    /// 按部署模式选择上游基础地址。
    ///
    /// # Returns
    /// 去除末尾斜杠的基础 URL。
    pub fn base_url(&self) -> &str {
        let url = match self.deployment {
            DeploymentMode::Direct => &self.direct_base_url,
            DeploymentMode::Proxied => &self.proxy_base_url,
        };
        url.trim_end_matches('/')
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: "gemini-2.5-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            timeout_secs: 60,
        }
    }
}

/// # Summary
/// 编排层参数。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    // 无历史数据时全合成 K 线的天数
    pub synthetic_days: usize,
    // AI 历史收盘价达到该数量才用于绘图
    pub min_history_points: usize,
    // 固定随机种子 (仅用于演示与排查，生产环境留空)
    pub rng_seed: Option<u64>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            synthetic_days: 60,
            min_history_points: 5,
            rng_seed: None,
        }
    }
}
