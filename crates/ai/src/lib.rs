//! # `quantflow-ai` - 生成式 AI 适配器
//!
//! 通过 Gemini `generateContent` REST 接口实现 `AiAnalyst` 端口：
//! 联网搜索的自由文本，以及受 JSON Schema 约束的结构化输出。

pub mod gemini;
