//! # 数据源字段映射
//!
//! 不同上游接口对同一概念使用不同字段名与定点缩放。归一化器只认识
//! `SourceProfile`，新增数据源时只需在此追加一份映射。

/// # Summary
/// K 线记录的字段映射与缩放。
#[derive(Debug, Clone, Copy)]
pub struct CandleFields {
    pub date: &'static str,
    pub open: &'static str,
    pub high: &'static str,
    pub low: &'static str,
    pub close: &'static str,
    pub volume: &'static str,
    // 价格字段乘数
    pub price_scale: f64,
    // 成交量字段乘数
    pub volume_scale: f64,
}

/// # Summary
/// 实时快照记录的字段映射与缩放。
#[derive(Debug, Clone, Copy)]
pub struct SnapshotFields {
    pub price: &'static str,
    pub change_percent: &'static str,
    // 上游自带的涨跌额字段 (仅用于与推导值交叉校验)
    pub change: Option<&'static str>,
    pub open: &'static str,
    pub high: &'static str,
    pub low: &'static str,
    pub volume: &'static str,
    pub turnover_rate: &'static str,
    pub pe: &'static str,
    pub market_cap: &'static str,
    pub price_scale: f64,
    pub percent_scale: f64,
    pub volume_scale: f64,
    pub turnover_scale: f64,
    pub pe_scale: f64,
    pub market_cap_scale: f64,
}

/// # Summary
/// 单个上游数据源的完整描述。
#[derive(Debug, Clone, Copy)]
pub struct SourceProfile {
    // 数据源名称，用于日志
    pub name: &'static str,
    pub candle: CandleFields,
    pub snapshot: SnapshotFields,
}

/// 散户量化接口：价格类字段为千分之一定点整数，市值单位为万元
pub const SANHU_PROFILE: SourceProfile = SourceProfile {
    name: "sanhu",
    candle: CandleFields {
        date: "RiQi",
        open: "KaiPan",
        high: "ZuiGao",
        low: "ZuiDi",
        close: "ShouPan",
        volume: "ZongLiang",
        price_scale: 0.001,
        volume_scale: 1.0,
    },
    snapshot: SnapshotFields {
        price: "JiaGe",
        change_percent: "ZhangFu",
        change: Some("ZhangDie"),
        open: "KaiPan",
        high: "ZuiGao",
        low: "ZuiDi",
        volume: "ZongLiang",
        turnover_rate: "HuanShou",
        pe: "ShiYingLv",
        market_cap: "ShiZhi",
        price_scale: 0.001,
        percent_scale: 0.001,
        volume_scale: 1.0,
        turnover_scale: 0.001,
        pe_scale: 0.001,
        market_cap_scale: 10_000.0,
    },
};

/// 麦蕊接口：所有字段均为普通小数，无需缩放
pub const MAIRUI_PROFILE: SourceProfile = SourceProfile {
    name: "mairui",
    candle: CandleFields {
        date: "d",
        open: "o",
        high: "h",
        low: "l",
        close: "c",
        volume: "v",
        price_scale: 1.0,
        volume_scale: 1.0,
    },
    snapshot: SnapshotFields {
        price: "p",
        change_percent: "pc",
        change: Some("ud"),
        open: "o",
        high: "h",
        low: "l",
        volume: "v",
        turnover_rate: "hs",
        pe: "pe",
        market_cap: "sz",
        price_scale: 1.0,
        percent_scale: 1.0,
        volume_scale: 1.0,
        turnover_scale: 1.0,
        pe_scale: 1.0,
        market_cap_scale: 1.0,
    },
};
