use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub mod num;
pub mod time;
pub mod tls;

/// # Summary
/// 证券代码值对象，代表一次查询所针对的标的。
///
/// # Invariants
/// - 内部字符串已去除首尾空白且非空。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Symbol(String);

impl Symbol {
    /// # Summary
    /// 从用户输入构造证券代码。
    ///
    /// # Logic
    /// 1. 去除首尾空白。
    /// 2. 若结果为空则拒绝。
    ///
    /// # Arguments
    /// * `raw`: 用户输入的原始代码。
    ///
    /// # Returns
    /// 合法时返回 `Some(Symbol)`，空输入返回 `None`。
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// 以字符串切片形式访问代码
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Symbol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| "Symbol must not be empty".to_string())
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
