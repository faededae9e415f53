//! # `quantflow-feed` - 上游行情接口适配器
//!
//! 每个数据源只负责 HTTP 传输与信封解析，字段映射与缩放由
//! `quantflow-market` 的归一化器按 `QuoteProvider::profile()` 统一处理。

mod http;
pub mod mairui;
pub mod sanhu;
