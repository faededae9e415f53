use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// # Summary
/// 单根日 K 线实体 (OHLCV)，附带指标引擎原地写入的技术指标。
///
/// # Invariants
/// - 合成数据必须满足 `high >= max(open, close)` 且 `low <= min(open, close)`。
/// - `ma5`/`ma10`/`ma20` 为 0 表示历史长度不足、尚未定义，而不是价格为 0。
/// - `k`/`d`/`j`/`rsi` 仅在计算后出现。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct KLinePoint {
    // 交易日 (序列化为 YYYY-MM-DD)
    #[schema(value_type = String, example = "2024-03-08")]
    pub date: NaiveDate,
    // 开盘价
    pub open: f64,
    // 最高价
    pub high: f64,
    // 最低价
    pub low: f64,
    // 收盘价
    pub close: f64,
    // 成交量
    pub volume: u64,
    // 5 日均线
    #[serde(default)]
    pub ma5: f64,
    // 10 日均线
    #[serde(default)]
    pub ma10: f64,
    // 20 日均线
    #[serde(default)]
    pub ma20: f64,
    // KDJ 之 K
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub k: Option<f64>,
    // KDJ 之 D
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub d: Option<f64>,
    // KDJ 之 J
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub j: Option<f64>,
    // RSI(14)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rsi: Option<f64>,
}

impl KLinePoint {
    /// # Summary
    /// 构造一根尚未计算任何指标的 K 线。
    ///
    /// # Arguments
    /// * `date`: 交易日。
    /// * `open`/`high`/`low`/`close`: 价格。
    /// * `volume`: 成交量。
    ///
    /// # Returns
    /// 指标字段均为默认值的 K 线。
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: u64) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
            ma5: 0.0,
            ma10: 0.0,
            ma20: 0.0,
            k: None,
            d: None,
            j: None,
            rsi: None,
        }
    }
}

/// # Summary
/// 单只证券的实时行情快照。
///
/// # Invariants
/// - 所有数值字段默认为 0，且永不为 NaN 或无穷大。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuoteSnapshot {
    // 证券代码
    #[schema(example = "600519")]
    pub symbol: String,
    // 证券名称
    #[schema(example = "贵州茅台")]
    pub name: String,
    // 最新价
    pub price: f64,
    // 涨跌额
    pub change: f64,
    // 涨跌幅 (%)
    pub change_percent: f64,
    // 今开
    pub open: f64,
    // 最高
    pub high: f64,
    // 最低
    pub low: f64,
    // 成交量
    pub volume: f64,
    // 换手率 (%)
    pub turnover_rate: f64,
    // 市盈率
    pub pe: f64,
    // 总市值
    pub market_cap: f64,
}

impl QuoteSnapshot {
    /// # Summary
    /// 构造全零占位快照，名称与代码均取自查询代码。
    ///
    /// # Arguments
    /// * `symbol`: 查询代码。
    ///
    /// # Returns
    /// 价格等数值全部为 0 的快照。
    pub fn placeholder(symbol: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            name: symbol.to_string(),
            ..Self::default()
        }
    }

    /// 快照是否含有可用价格
    pub fn is_usable(&self) -> bool {
        self.price > 0.0
    }
}

/// # Summary
/// 上游接口返回的原始快照记录，尚未经过字段映射与缩放。
#[derive(Debug, Clone)]
pub struct RawSnapshot {
    // 信封中附带的证券名称 (部分数据源不提供)
    pub name: Option<String>,
    // 单条原始快照
    pub record: serde_json::Value,
}
