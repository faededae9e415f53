//! # `quantflow-market` - 行情数据管道
//!
//! 归一化 → 排序 → 合成缺失 OHLC → 计算 MA/KDJ/RSI。
//! 本 crate 只包含纯计算，不做任何 I/O；随机数源与 "今天" 均由调用方注入。

pub mod indicator;
pub mod normalize;
pub mod series;
