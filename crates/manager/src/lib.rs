//! # `quantflow-manager` - 应用服务层
//!
//! 编排一次看板查询：并发拉取行情 → 选择权威数据或 AI 搜索分支 → 与 AI 点评合并，
//! 任何失败都收敛为结构完整的降级结果。所有外部协作方均通过 core 中的端口注入。

pub mod orchestrator;
pub mod prompt;
pub mod reconcile;
pub mod session;
