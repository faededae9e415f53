//! # 技术指标引擎
//!
//! 在已按日期升序排列的序列上原地计算 MA5/10/20、KDJ(9,3,3) 与 RSI(14)。
//! 计算完全确定，不含随机性；序列过短时相关字段保持未定义，不报错。

use quantflow_core::common::num::round2;
use quantflow_core::market::entity::KLinePoint;

/// KDJ 的 RSV 窗口长度
pub const KDJ_PERIOD: usize = 9;
/// RSI 回看周期
pub const RSI_PERIOD: usize = 14;

// K、D 在首根 K 线之前的初值
const KDJ_SEED: f64 = 50.0;
// Wilder 平滑分母
const RSI_PERIOD_F: f64 = 14.0;

/// # Summary
/// 依次计算均线、KDJ、RSI。
///
/// # Arguments
/// * `series`: 升序序列，原地写入。
pub fn compute_all(series: &mut [KLinePoint]) {
    compute_moving_averages(series);
    compute_kdj(series);
    compute_rsi(series);
}

/// # Summary
/// 计算 5/10/20 日简单移动平均。
///
/// # Logic
/// 1. 对下标 i，仅当 `i >= period - 1` 时取收盘价 `[i-period+1, i]` 的算术平均。
/// 2. 历史不足的位置保持默认值 0。
///
/// # Arguments
/// * `series`: 升序序列，原地写入。
pub fn compute_moving_averages(series: &mut [KLinePoint]) {
    for i in 0..series.len() {
        if let Some(ma) = trailing_mean(series, i, 5) {
            series[i].ma5 = ma;
        }
        if let Some(ma) = trailing_mean(series, i, 10) {
            series[i].ma10 = ma;
        }
        if let Some(ma) = trailing_mean(series, i, 20) {
            series[i].ma20 = ma;
        }
    }
}

fn trailing_mean(series: &[KLinePoint], end: usize, period: usize) -> Option<f64> {
    let start = (end + 1).checked_sub(period)?;
    let count = f64::from(u32::try_from(period).ok()?);
    let sum: f64 = series[start..=end].iter().map(|p| p.close).sum();
    Some(sum / count)
}

/// # Summary
/// 计算 KDJ(9,3,3)。
///
/// # Logic
/// 1. K、D 初值为 50。
/// 2. 每根 K 线取窗口 `[max(0, i-8), i]` 的最低价与最高价计算 RSV；窗口无波动时 RSV 取 50。
/// 3. `K = 2/3·K + 1/3·RSV`，`D = 2/3·D + 1/3·K`，`J = 3K - 2D`。
/// 4. 递推使用未舍入的 K、D，写入时保留两位小数。
///
/// # Arguments
/// * `series`: 升序序列，原地写入。
pub fn compute_kdj(series: &mut [KLinePoint]) {
    let mut k = KDJ_SEED;
    let mut d = KDJ_SEED;

    for i in 0..series.len() {
        let start = i.saturating_sub(KDJ_PERIOD - 1);
        let window = &series[start..=i];
        let low9 = window.iter().map(|p| p.low).fold(f64::INFINITY, f64::min);
        let high9 = window.iter().map(|p| p.high).fold(f64::NEG_INFINITY, f64::max);

        let close = series[i].close;
        let rsv = if high9 == low9 {
            50.0
        } else {
            (close - low9) / (high9 - low9) * 100.0
        };

        k = (2.0 / 3.0) * k + (1.0 / 3.0) * rsv;
        d = (2.0 / 3.0) * d + (1.0 / 3.0) * k;
        let j = 3.0 * k - 2.0 * d;

        let point = &mut series[i];
        point.k = Some(round2(k));
        point.d = Some(round2(d));
        point.j = Some(round2(j));
    }
}

/// # Summary
/// 计算 RSI(14)，首值之后使用 Wilder 平滑。
///
/// # Logic
/// 1. 少于 15 根 K 线时直接返回，所有点的 `rsi` 保持未定义。
/// 2. 用下标 1..=14 的涨跌幅求首个平均涨幅/跌幅，写入下标 14。
/// 3. 之后 `avg = (avg·13 + 当日值) / 14`。
/// 4. 平均跌幅为 0 时 RSI 记为 100。
///
/// # Arguments
/// * `series`: 升序序列，原地写入。
pub fn compute_rsi(series: &mut [KLinePoint]) {
    if series.len() < RSI_PERIOD + 1 {
        return;
    }

    let (gains, losses) = series[..=RSI_PERIOD]
        .windows(2)
        .map(|w| w[1].close - w[0].close)
        .fold((0.0, 0.0), |(g, l), delta| {
            if delta > 0.0 { (g + delta, l) } else { (g, l - delta) }
        });

    let mut avg_gain = gains / RSI_PERIOD_F;
    let mut avg_loss = losses / RSI_PERIOD_F;
    series[RSI_PERIOD].rsi = Some(rsi_value(avg_gain, avg_loss));

    for i in (RSI_PERIOD + 1)..series.len() {
        let delta = series[i].close - series[i - 1].close;
        let gain = delta.max(0.0);
        let loss = (-delta).max(0.0);

        avg_gain = (avg_gain * (RSI_PERIOD_F - 1.0) + gain) / RSI_PERIOD_F;
        avg_loss = (avg_loss * (RSI_PERIOD_F - 1.0) + loss) / RSI_PERIOD_F;
        series[i].rsi = Some(rsi_value(avg_gain, avg_loss));
    }
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    round2(100.0 - 100.0 / (1.0 + rs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Days, NaiveDate};

    fn series_from(bars: &[(f64, f64, f64)]) -> Vec<KLinePoint> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        bars.iter()
            .enumerate()
            .map(|(i, &(high, low, close))| {
                let date = start.checked_add_days(Days::new(u64::try_from(i).unwrap())).unwrap();
                KLinePoint::new(date, close, high, low, close, 1000)
            })
            .collect()
    }

    fn closes_series(closes: &[f64]) -> Vec<KLinePoint> {
        let bars: Vec<_> = closes.iter().map(|&c| (c + 1.0, c - 1.0, c)).collect();
        series_from(&bars)
    }

    #[test]
    fn test_moving_averages_match_trailing_means() {
        let closes: Vec<f64> = (0..25).map(|i| 10.0 + f64::from(i) * 0.5 + f64::from(i % 3)).collect();
        let mut series = closes_series(&closes);
        compute_moving_averages(&mut series);

        let mean = |from: usize, to: usize| {
            closes[from..=to].iter().sum::<f64>() / f64::from(u32::try_from(to - from + 1).unwrap())
        };

        for (i, point) in series.iter().enumerate() {
            if i >= 4 {
                assert!((point.ma5 - mean(i - 4, i)).abs() < 1e-9, "ma5 at {i}");
            } else {
                assert_eq!(point.ma5, 0.0);
            }
            if i >= 9 {
                assert!((point.ma10 - mean(i - 9, i)).abs() < 1e-9, "ma10 at {i}");
            } else {
                assert_eq!(point.ma10, 0.0);
            }
            if i >= 19 {
                assert!((point.ma20 - mean(i - 19, i)).abs() < 1e-9, "ma20 at {i}");
            } else {
                assert_eq!(point.ma20, 0.0);
            }
        }
    }

    #[test]
    fn test_kdj_flat_series_is_fixed_point() {
        let mut series = series_from(&[(12.0, 12.0, 12.0); 30]);
        compute_kdj(&mut series);

        for point in &series {
            assert_eq!(point.k, Some(50.0));
            assert_eq!(point.d, Some(50.0));
            assert_eq!(point.j, Some(50.0));
        }
    }

    #[test]
    fn test_kdj_first_step_recurrence() {
        // 收于最高价，RSV = 100
        let mut series = series_from(&[(10.0, 0.0, 10.0)]);
        compute_kdj(&mut series);

        assert_eq!(series[0].k, Some(66.67));
        assert_eq!(series[0].d, Some(55.56));
        assert_eq!(series[0].j, Some(88.89));
    }

    #[test]
    fn test_kdj_window_is_nine_bars() {
        // 第 0 根的极端低点在第 9 根时已移出窗口
        let mut bars = vec![(10.0, 1.0, 5.0)];
        bars.extend(std::iter::repeat_n((10.0, 8.0, 9.0), 9));
        let mut series = series_from(&bars);
        compute_kdj(&mut series);

        // 第 8 根窗口仍包含最低价 1：RSV = (9-1)/(10-1)*100
        // 第 9 根窗口最低价 8：RSV = (9-8)/(10-8)*100 = 50
        let mut k = 50.0;
        let mut d = 50.0;
        for (i, point) in series.iter().enumerate() {
            let rsv = match i {
                0 => (5.0 - 1.0) / 9.0 * 100.0,
                1..=8 => (9.0 - 1.0) / 9.0 * 100.0,
                _ => 50.0,
            };
            k = (2.0 / 3.0) * k + (1.0 / 3.0) * rsv;
            d = (2.0 / 3.0) * d + (1.0 / 3.0) * k;
            assert_eq!(point.k, Some(round2(k)), "k at {i}");
            assert_eq!(point.d, Some(round2(d)), "d at {i}");
        }
    }

    #[test]
    fn test_rsi_monotonic_rise_is_100() {
        let closes: Vec<f64> = (0..20).map(|i| 10.0 + f64::from(i)).collect();
        let mut series = closes_series(&closes);
        compute_rsi(&mut series);

        assert!(series[..14].iter().all(|p| p.rsi.is_none()));
        assert!(series[14..].iter().all(|p| p.rsi == Some(100.0)));
    }

    #[test]
    fn test_rsi_wilder_smoothing() {
        // 7 次 +2、7 次 -1：avgGain = 1, avgLoss = 0.5, RS = 2
        let mut closes = vec![100.0];
        for i in 0..14 {
            let last = closes[closes.len() - 1];
            closes.push(if i % 2 == 0 { last + 2.0 } else { last - 1.0 });
        }
        // 第 15 根持平，两个均值同比缩放，RS 不变
        let last = closes[closes.len() - 1];
        closes.push(last);
        // 第 16 根下跌 3
        closes.push(last - 3.0);

        let mut series = closes_series(&closes);
        compute_rsi(&mut series);

        assert_eq!(series[14].rsi, Some(66.67));
        assert_eq!(series[15].rsi, Some(66.67));

        let avg_gain = 13.0 / 14.0 * 13.0 / 14.0;
        let avg_loss = (6.5 / 14.0 * 13.0 + 3.0) / 14.0;
        let expected = round2(100.0 - 100.0 / (1.0 + avg_gain / avg_loss));
        assert_eq!(series[16].rsi, Some(expected));
    }

    #[test]
    fn test_short_series_leaves_fields_undefined() {
        let closes: Vec<f64> = (0..14).map(|i| 10.0 + f64::from(i)).collect();
        let mut series = closes_series(&closes);
        compute_all(&mut series);

        assert!(series.iter().all(|p| p.rsi.is_none()));
        assert!(series.iter().all(|p| p.ma20 == 0.0));
        assert!(series.iter().all(|p| p.k.is_some()));

        let mut empty: Vec<KLinePoint> = Vec::new();
        compute_all(&mut empty);
        assert!(empty.is_empty());
    }
}
