//! # `quantflow-api` - HTTP API 网关
//!
//! 本 crate 是 QuantFlow 行情看板的 HTTP/REST 服务入口。
//! 使用 `axum` 构建路由与控制器，通过 `utoipa` 自动生成 OpenAPI 3.0 Swagger 文档。
//!
//! ## 架构职责
//! - 接收浏览器前端的看板查询请求
//! - 调用下层 `QuerySession` 完成编排，并保证旧查询结果不会覆盖新结果
//! - 将领域错误映射为 HTTP 状态码

pub mod error;
pub mod routes;
pub mod server;
pub mod types;
