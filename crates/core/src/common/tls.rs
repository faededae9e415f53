use tracing::debug;

/// # Summary
/// 确保进程级 rustls 加密提供者已安装。
///
/// # Logic
/// 1. 尝试将 `ring` 提供者注册为进程默认值。
/// 2. 若已有提供者 (重复调用或其他组件先行安装)，忽略本次注册。
///
/// 所有构造 `reqwest::Client` 的适配器都必须在构造前调用本函数。
pub fn ensure_crypto_provider() {
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        debug!("rustls crypto provider already installed");
    }
}
