//! # `quantflow-core` - 领域核心
//!
//! 定义行情、分析两个领域的实体、端口 (Trait) 与错误类型，以及全局配置和时钟抽象。
//! 本 crate 不包含任何具体的网络实现，所有适配器均依赖此处的契约。

pub mod analysis;
pub mod common;
pub mod config;
pub mod market;
