use chrono::NaiveDate;
use quantflow_core::common::Symbol;
use quantflow_core::common::num::{field_float, finite_or_zero, round2, to_volume};
use quantflow_core::market::entity::{KLinePoint, QuoteSnapshot, RawSnapshot};
use quantflow_core::market::profile::SourceProfile;
use serde_json::Value;
use tracing::warn;

/// # Summary
/// 上游原始记录归一化器，按数据源的字段映射与缩放产出标准实体。
///
/// # Invariants
/// - 纯函数：不持有可变状态，同一记录多次归一化结果完全相同。
/// - 数值字段解析失败一律归零，绝不输出 NaN。
#[derive(Debug, Clone, Copy)]
pub struct Normalizer {
    // 数据源描述
    profile: &'static SourceProfile,
}

impl Normalizer {
    /// 使用指定数据源描述创建归一化器
    pub fn new(profile: &'static SourceProfile) -> Self {
        Self { profile }
    }

    /// 当前使用的数据源描述
    pub fn profile(&self) -> &'static SourceProfile {
        self.profile
    }

    /// # Summary
    /// 将一条原始 K 线记录转换为标准 K 线。
    ///
    /// # Logic
    /// 1. 按映射读取日期字段并解析。
    /// 2. 价格字段乘以缩放系数后保留两位小数。
    /// 3. 成交量乘以缩放系数后截断为整数。
    ///
    /// # Arguments
    /// * `record`: 单条原始记录。
    ///
    /// # Returns
    /// 日期可解析时返回 K 线；日期缺失或非法时返回 None (无法参与排序)。
    pub fn candle(&self, record: &Value) -> Option<KLinePoint> {
        let fields = &self.profile.candle;
        let date = record.get(fields.date).and_then(parse_date_value)?;
        let price = |name: &str| round2(field_float(record, name) * fields.price_scale);

        Some(KLinePoint::new(
            date,
            price(fields.open),
            price(fields.high),
            price(fields.low),
            price(fields.close),
            to_volume(field_float(record, fields.volume) * fields.volume_scale),
        ))
    }

    /// # Summary
    /// 将原始快照转换为标准行情快照。
    ///
    /// # Logic
    /// 1. 按映射读取各字段并缩放，价格与比率类字段保留两位小数。
    /// 2. 涨跌额由 `价格 × 涨跌幅 / 100` 推导。
    /// 3. 若上游自带涨跌额且与推导值偏差超过 0.01，记录告警，仍采用推导值。
    /// 4. 名称取信封中的名称，缺失时回退为代码。
    ///
    /// # Arguments
    /// * `symbol`: 查询代码。
    /// * `raw`: 原始快照。
    ///
    /// # Returns
    /// 数值字段全部有限的快照。
    pub fn snapshot(&self, symbol: &Symbol, raw: &RawSnapshot) -> QuoteSnapshot {
        let fields = &self.profile.snapshot;
        let record = &raw.record;

        let price = field_float(record, fields.price) * fields.price_scale;
        let change_percent = field_float(record, fields.change_percent) * fields.percent_scale;
        let change = round2(price * (change_percent / 100.0));

        if let Some(change_field) = fields.change
            && record.get(change_field).is_some()
        {
            let reported = round2(field_float(record, change_field) * fields.price_scale);
            if (reported - change).abs() > 0.01 {
                warn!(
                    source = self.profile.name,
                    %symbol,
                    derived = change,
                    reported,
                    "Upstream change amount disagrees with price × percent, keeping derived value"
                );
            }
        }

        let name = raw
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(symbol.as_str())
            .to_string();

        QuoteSnapshot {
            symbol: symbol.to_string(),
            name,
            price: round2(price),
            change,
            change_percent: round2(change_percent),
            open: round2(field_float(record, fields.open) * fields.price_scale),
            high: round2(field_float(record, fields.high) * fields.price_scale),
            low: round2(field_float(record, fields.low) * fields.price_scale),
            volume: finite_or_zero(field_float(record, fields.volume) * fields.volume_scale),
            turnover_rate: round2(field_float(record, fields.turnover_rate) * fields.turnover_scale),
            pe: round2(field_float(record, fields.pe) * fields.pe_scale),
            market_cap: finite_or_zero(
                field_float(record, fields.market_cap) * fields.market_cap_scale,
            ),
        }
    }
}

/// # Summary
/// 解析上游或 AI 给出的日期字符串。
///
/// # Logic
/// 依次尝试 `YYYY-MM-DD`、`YYYYMMDD`、`YYYY/MM/DD`；
/// 带时间部分的字符串只取前 10 个字符再试一次。
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    const FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y%m%d", "%Y/%m/%d"];

    FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            let head = raw.get(..10)?;
            FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(head, fmt).ok())
        })
}

// 日期字段可能是字符串，也可能是 20240105 这样的整数
fn parse_date_value(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::String(s) => parse_date(s),
        Value::Number(n) => parse_date(&n.to_string()),
        _ => None,
    }
}
