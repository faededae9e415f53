use config::{Config, ConfigError, Environment, File};
use quantflow_core::config::AppConfig;

// 未指定路径时尝试加载的默认配置文件 (扩展名由 config 自动探测)
const DEFAULT_CONFIG_FILE: &str = "config/quantflow";

/// # Summary
/// 分层加载应用配置。
///
/// # Logic
/// 1. 以 `AppConfig::default()` 为底。
/// 2. 叠加配置文件：显式路径必须存在，默认路径可缺省。
/// 3. 叠加 `QUANTFLOW__SECTION__KEY` 形式的环境变量。
///
/// # Arguments
/// * `path` - 配置文件路径 (通常来自 `QUANTFLOW_CONFIG`)。
pub fn load(path: Option<&str>) -> Result<AppConfig, ConfigError> {
    let file = match path {
        Some(path) => File::with_name(path).required(true),
        None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
    };

    Config::builder()
        .add_source(Config::try_from(&AppConfig::default())?)
        .add_source(file)
        .add_source(
            Environment::with_prefix("QUANTFLOW")
                .separator("__")
                .try_parsing(true),
        )
        .build()?
        .try_deserialize()
}
