//! # 宽松数值解析
//!
//! 上游行情接口与 AI 返回的数值字段可能是数字、字符串、null 或缺失。
//! 管道中任何数值解析失败都必须归零，绝不允许 NaN 或无穷大向下游传播。

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// # Summary
/// 将任意 JSON 值解析为有限浮点数。
///
/// # Logic
/// 1. 数字直接取值；字符串去空白后尝试解析。
/// 2. 其他类型、解析失败、NaN、无穷大一律返回 0。
pub fn safe_float(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite()).unwrap_or(0.0)
}

/// 从 JSON 对象中按字段名读取并宽松解析，字段缺失时返回 0
pub fn field_float(record: &Value, field: &str) -> f64 {
    record.get(field).map(safe_float).unwrap_or(0.0)
}

/// 缩放等运算溢出为 NaN 或无穷大时归零
pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

/// 四舍五入保留两位小数
pub fn round2(value: f64) -> f64 {
    if value.is_finite() {
        (value * 100.0).round() / 100.0
    } else {
        0.0
    }
}

/// # Summary
/// 将浮点数截断为非负整数成交量。
///
/// # Logic
/// 负数、NaN 视为 0；小数部分直接截断。
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn to_volume(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        value.trunc() as u64
    } else {
        0
    }
}

/// serde 反序列化钩子：宽松读取浮点数 (数字/字符串/null 均可)
pub fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map(safe_float).unwrap_or(0.0))
}

/// serde 反序列化钩子：宽松读取可选浮点数，无法解析时视为缺失
pub fn lenient_opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64().filter(|v| v.is_finite()),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    })
}

/// serde 反序列化钩子：宽松读取字符串，null 或非字符串值视为空串
pub fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    })
}
