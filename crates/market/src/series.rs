//! # 序列合成器
//!
//! 三条路径产出按日期严格升序、无重复日期的 K 线序列：
//! - 真实原始行：归一化后排序去重，计算全部指标；
//! - 仅有收盘价的历史：补齐开高低与成交量，仅计算均线；
//! - 完全合成：从当前价向过去随机游走，仅计算均线。

use crate::indicator::{compute_all, compute_moving_averages};
use crate::normalize::{Normalizer, parse_date};
use chrono::NaiveDate;
use quantflow_core::analysis::entity::{HistoricalPrice, Trend};
use quantflow_core::common::num::{round2, to_volume};
use quantflow_core::market::entity::KLinePoint;
use rand::Rng;
use serde_json::Value;
use tracing::{debug, warn};

/// 历史点不足两个时退化为合成序列的天数
pub const SHORT_HISTORY_DAYS: usize = 30;

// 当前价无效时的合成基准价
const DEFAULT_END_PRICE: f64 = 100.0;

/// # Summary
/// 由上游真实 K 线原始行构造标准序列。
///
/// # Logic
/// 1. 逐行归一化，日期无法解析的行丢弃并告警。
/// 2. 按日期稳定排序，同一日期保留最后出现的一行。
/// 3. 计算 MA、KDJ、RSI。
///
/// # Arguments
/// * `normalizer`: 数据源对应的归一化器。
/// * `rows`: 原始行，顺序不限。
///
/// # Returns
/// 升序且日期唯一的序列；不做任何合成。
pub fn from_rows(normalizer: &Normalizer, rows: &[Value]) -> Vec<KLinePoint> {
    let mut points: Vec<KLinePoint> = rows
        .iter()
        .filter_map(|row| {
            let point = normalizer.candle(row);
            if point.is_none() {
                warn!(source = normalizer.profile().name, "Dropping candle row without a parsable date");
            }
            point
        })
        .collect();

    points.sort_by_key(|p| p.date);
    let mut series = dedup_keep_last(points, |p| p.date);
    compute_all(&mut series);

    debug!(rows = rows.len(), points = series.len(), "Built series from raw rows");
    series
}

/// # Summary
/// 由仅含收盘价的历史点构造可绘制的 K 线序列。
///
/// # Logic
/// 1. 解析日期并升序排列，同日保留最后一条；不足 2 个有效点时改为 30 天中性合成序列。
/// 2. 若最后一点不是今天、当前价为正且与最后收盘价相差超过 0.01，则追加今天的点。
/// 3. 开盘价取前一日收盘价 (首点取收盘价的 99%)。
/// 4. 高低点在实体外随机扩展至多收盘价的 1.5%，成交量随机。
/// 5. 仅计算均线。
///
/// # Arguments
/// * `history`: AI 搜索得到的历史收盘价。
/// * `current_price`: 当前价。
/// * `today`: 当前交易日。
/// * `rng`: 随机数源。
///
/// # Returns
/// 升序序列，满足 `high >= max(open, close)` 与 `low <= min(open, close)`。
pub fn from_close_history<R: Rng>(
    history: &[HistoricalPrice],
    current_price: f64,
    today: NaiveDate,
    rng: &mut R,
) -> Vec<KLinePoint> {
    let mut closes: Vec<(NaiveDate, f64)> = history
        .iter()
        .filter_map(|h| match parse_date(&h.date) {
            Some(date) => Some((date, h.close)),
            None => {
                warn!(date = %h.date, "Dropping history point with unparsable date");
                None
            }
        })
        .collect();
    closes.sort_by_key(|(date, _)| *date);
    let mut closes = dedup_keep_last(closes, |(date, _)| *date);

    if closes.len() < 2 {
        debug!(points = closes.len(), "History too short, synthesizing neutral series");
        return synthetic(SHORT_HISTORY_DAYS, current_price, Trend::Neutral, today, rng);
    }

    if let Some(&(last_date, last_close)) = closes.last()
        && last_date != today
        && current_price > 0.0
        && (last_close - current_price).abs() > 0.01
    {
        closes.push((today, current_price));
    }

    let mut series = Vec::with_capacity(closes.len());
    let mut prev_close: Option<f64> = None;
    for (date, close) in closes {
        let open = prev_close.unwrap_or(close * 0.99);
        let slack = close * 0.015;
        let high = open.max(close) + uniform(rng, 0.0, slack);
        let low = open.min(close) - uniform(rng, 0.0, slack);
        let volume = to_volume(uniform(rng, 100_000.0, 5_000_000.0));

        series.push(KLinePoint::new(
            date,
            round2(open),
            round2(high),
            round2(low),
            round2(close),
            volume,
        ));
        prev_close = Some(close);
    }

    compute_moving_averages(&mut series);
    series
}

/// # Summary
/// 从今天起向过去随机游走，生成完全合成的 K 线序列。
///
/// # Logic
/// 1. 基准价取 `end_price`，非正时取 100。
/// 2. 每步波动率为当前收盘价的 2.5%，看多偏置 -0.002、看空 +0.002 (乘以当前收盘价)。
/// 3. 前一日收盘 = 当前收盘 - 涨跌；开盘在前收盘附近随机；高低在实体外随机扩展至多波动率的 80%。
/// 4. 日期每步减一个自然日，最终按升序输出并计算均线。
///
/// # Arguments
/// * `days`: 天数，0 得到空序列。
/// * `end_price`: 序列最后一日的收盘价。
/// * `trend`: 走势偏好。
/// * `today`: 最后一日的日期。
/// * `rng`: 随机数源。
///
/// # Returns
/// 升序序列，最后一点收盘价为基准价。
pub fn synthetic<R: Rng>(
    days: usize,
    end_price: f64,
    trend: Trend,
    today: NaiveDate,
    rng: &mut R,
) -> Vec<KLinePoint> {
    let mut current_close = if end_price > 0.0 { end_price } else { DEFAULT_END_PRICE };
    let bias = match trend {
        Trend::Bullish => -0.002,
        Trend::Bearish => 0.002,
        Trend::Neutral => 0.0,
    };

    let mut series = Vec::with_capacity(days);
    let mut date = today;
    for step in 0..days {
        if step > 0 {
            match date.pred_opt() {
                Some(prev) => date = prev,
                None => break,
            }
        }

        let volatility = current_close * 0.025;
        let change = uniform(rng, -volatility, volatility) + current_close * bias;
        let prev_close = current_close - change;

        let open = prev_close + uniform(rng, -volatility * 0.5, volatility * 0.5);
        let close = current_close;
        let high = open.max(close) + uniform(rng, 0.0, volatility * 0.8);
        let low = open.min(close) - uniform(rng, 0.0, volatility * 0.8);
        let volume = to_volume(uniform(rng, 50_000.0, 1_000_000.0));

        series.push(KLinePoint::new(
            date,
            round2(open),
            round2(high),
            round2(low),
            round2(close),
            volume,
        ));
        current_close = prev_close;
    }

    series.reverse();
    compute_moving_averages(&mut series);
    series
}

/// 半开区间均匀分布采样；区间退化时返回下界
fn uniform<R: Rng>(rng: &mut R, low: f64, high: f64) -> f64 {
    if high > low { rng.random_range(low..high) } else { low }
}

/// 对已排序序列去重，相同键保留最后一项
fn dedup_keep_last<T, K, F>(items: Vec<T>, key: F) -> Vec<T>
where
    K: PartialEq,
    F: Fn(&T) -> K,
{
    let mut out: Vec<T> = Vec::with_capacity(items.len());
    for item in items {
        match out.last_mut() {
            Some(last) if key(last) == key(&item) => *last = item,
            _ => out.push(item),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use quantflow_core::market::profile::SANHU_PROFILE;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use serde_json::json;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn hist(date: &str, close: f64) -> HistoricalPrice {
        HistoricalPrice { date: date.to_string(), close }
    }

    fn assert_strictly_ascending(series: &[KLinePoint]) {
        assert!(series.windows(2).all(|w| w[0].date < w[1].date));
    }

    fn assert_body_bounds(series: &[KLinePoint]) {
        for p in series {
            assert!(p.high >= p.open.max(p.close), "high below body on {}", p.date);
            assert!(p.low <= p.open.min(p.close), "low above body on {}", p.date);
        }
    }

    #[test]
    fn test_from_rows_sorts_dedups_and_drops_bad_dates() {
        let normalizer = Normalizer::new(&SANHU_PROFILE);
        let rows = vec![
            json!({"RiQi": "2024-03-08", "KaiPan": 10000, "ZuiGao": 11000, "ZuiDi": 9000, "ShouPan": 10500, "ZongLiang": 100}),
            json!({"RiQi": "2024-03-06", "KaiPan": 10000, "ZuiGao": 11000, "ZuiDi": 9000, "ShouPan": 10100, "ZongLiang": 100}),
            json!({"RiQi": "garbage", "ShouPan": 1}),
            json!({"RiQi": "2024-03-08", "KaiPan": 10000, "ZuiGao": 11000, "ZuiDi": 9000, "ShouPan": 10800, "ZongLiang": 100}),
        ];

        let series = from_rows(&normalizer, &rows);

        assert_eq!(series.len(), 2);
        assert_strictly_ascending(&series);
        assert_eq!(series[0].date, day("2024-03-06"));
        assert_eq!(series[1].close, 10.8);
        assert!(series.iter().all(|p| p.k.is_some()));
    }

    #[test]
    fn test_close_history_bounds_and_open_anchor() {
        let history: Vec<_> = (1..=9)
            .map(|d| hist(&format!("2024-03-0{d}"), 10.0 + f64::from(d)))
            .collect();
        let mut rng = StdRng::seed_from_u64(7);

        let series = from_close_history(&history, 25.0, day("2024-03-20"), &mut rng);

        assert_eq!(series.len(), 10);
        assert_strictly_ascending(&series);
        assert_body_bounds(&series);
        assert_eq!(series[0].open, 10.89);
        for w in series.windows(2) {
            assert_eq!(w[1].open, w[0].close);
        }
        let last = series.last().unwrap();
        assert_eq!(last.date, day("2024-03-20"));
        assert_eq!(last.close, 25.0);
        assert!(series.iter().all(|p| (100_000..5_000_000).contains(&p.volume)));
        assert!(series[4].ma5 > 0.0);
        assert_eq!(series[3].ma5, 0.0);
        assert!(series.iter().all(|p| p.k.is_none() && p.rsi.is_none()));
    }

    #[test]
    fn test_close_history_skips_append_when_close_matches() {
        let history = vec![hist("2024-03-02", 11.0), hist("2024-03-01", 10.0)];
        let mut rng = StdRng::seed_from_u64(1);

        let series = from_close_history(&history, 11.005, day("2024-03-05"), &mut rng);

        assert_eq!(series.len(), 2);
        assert_eq!(series[0].date, day("2024-03-01"));

        let on_today = from_close_history(&history, 50.0, day("2024-03-02"), &mut rng);
        assert_eq!(on_today.len(), 2);
    }

    #[test]
    fn test_short_history_falls_back_to_synthetic() {
        let mut rng = StdRng::seed_from_u64(3);
        let series = from_close_history(&[hist("2024-03-01", 10.0)], 42.0, day("2024-03-30"), &mut rng);

        assert_eq!(series.len(), SHORT_HISTORY_DAYS);
        assert_eq!(series.last().unwrap().close, 42.0);
        assert_eq!(series.last().unwrap().date, day("2024-03-30"));
    }

    #[test]
    fn test_synthetic_shape() {
        let mut rng = StdRng::seed_from_u64(42);
        let series = synthetic(60, 20.0, Trend::Bullish, day("2024-06-30"), &mut rng);

        assert_eq!(series.len(), 60);
        assert_strictly_ascending(&series);
        assert_body_bounds(&series);
        assert_eq!(series[0].date, day("2024-05-02"));
        assert_eq!(series[59].close, 20.0);
        assert!(series.iter().all(|p| (50_000..1_000_000).contains(&p.volume)));
        assert!(series[19].ma20 > 0.0);
    }

    #[test]
    fn test_synthetic_is_reproducible_with_seed() {
        let today = day("2024-06-30");
        let a = synthetic(20, 15.0, Trend::Neutral, today, &mut StdRng::seed_from_u64(9));
        let b = synthetic(20, 15.0, Trend::Neutral, today, &mut StdRng::seed_from_u64(9));
        assert_eq!(a, b);
    }

    #[test]
    fn test_synthetic_degenerate_inputs() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(synthetic(0, 10.0, Trend::Neutral, day("2024-01-01"), &mut rng).is_empty());

        let series = synthetic(5, -3.0, Trend::Bearish, day("2024-01-01"), &mut rng);
        assert_eq!(series.last().unwrap().close, 100.0);
        assert_body_bounds(&series);
    }
}
