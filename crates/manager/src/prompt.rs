//! # 提示词与响应结构
//!
//! 三类提示词：权威数据分支的点评、搜索分支的联网检索、搜索结果的结构化抽取。
//! 两个结构化调用共用同一份 `response_schema()`。

use crate::reconcile::LocalTechnical;
use quantflow_core::common::Symbol;
use quantflow_core::market::entity::{KLinePoint, QuoteSnapshot};
use serde_json::{Value, json};

// 提示词中展示的近期收盘价个数
const RECENT_CLOSES: usize = 5;

fn fmt_opt(value: Option<f64>) -> String {
    value.map_or_else(|| "无".to_string(), |v| format!("{v:.2}"))
}

/// # Summary
/// 基于真实行情与本地指标的量化点评提示词。
///
/// # Logic
/// 1. 列出快照核心字段与最近 5 个收盘价。
/// 2. 给出本地计算的 KDJ、RSI (未计算时标注为 "无")。
/// 3. 要求按约定 JSON 输出建议、目标价、风险与情绪/资金估算。
pub fn analysis_prompt(stock: &QuoteSnapshot, series: &[KLinePoint], local: &LocalTechnical) -> String {
    let recent: Vec<String> = series[series.len().saturating_sub(RECENT_CLOSES)..]
        .iter()
        .map(|p| format!("{:.2}", p.close))
        .collect();

    format!(
        "你是一名量化交易分析师。以下是经过校验的真实行情与本地计算的技术指标，请据此给出分析。\n\
         \n\
         【行情】\n\
         - 标的: {name} ({symbol})\n\
         - 最新价: {price}\n\
         - 涨跌幅: {pct}%\n\
         - 换手率: {turnover}%\n\
         - 市盈率: {pe}\n\
         - 最近 {n} 日收盘: [{recent}]\n\
         \n\
         【本地指标】\n\
         - KDJ(9,3,3): K={k}, D={d}, J={j}\n\
         - RSI(14): {rsi}\n\
         \n\
         【要求】\n\
         1. 结合 KDJ 与 RSI 判断超买/超卖以及金叉/死叉信号。\n\
         2. 给出 BUY、SELL 或 HOLD 之一，并给出置信度 (0-100)。\n\
         3. 给出短期压力位 (targetPriceHigh) 与支撑位 (targetPriceLow)。\n\
         4. 列出 3 条主要风险。\n\
         5. 根据涨跌幅与换手率估算情绪分数 (0-100) 与主力资金流向。\n\
         \n\
         只输出 JSON，不要使用 Markdown 代码块；technical 字段请填写上面给出的 KDJ 与 RSI；reasoning 使用中文。",
        name = stock.name,
        symbol = stock.symbol,
        price = stock.price,
        pct = stock.change_percent,
        turnover = stock.turnover_rate,
        pe = stock.pe,
        n = recent.len(),
        recent = recent.join(", "),
        k = fmt_opt(local.kdj.map(|v| v.k)),
        d = fmt_opt(local.kdj.map(|v| v.d)),
        j = fmt_opt(local.kdj.map(|v| v.j)),
        rsi = fmt_opt(local.rsi),
    )
}

/// # Summary
/// 权威数据不可用时的联网检索提示词。
pub fn search_prompt(symbol: &Symbol) -> String {
    format!(
        "请联网检索股票 \"{symbol}\" 的最新行情与近期走势，需要：\n\
         1. 基本行情：名称、代码、最新价、涨跌幅、涨跌额、今开、最高、最低、成交量、市盈率、总市值。\n\
         2. 最近 10 至 15 个交易日的每日收盘价 (日期与价格)，用于绘制走势图，请尽量完整。\n\
         3. 雪球、东方财富股吧及主流财经媒体上的市场情绪 (看多/看空) 与热门话题。\n\
         4. A 股请补充北向资金与主力资金净流入情况。\n\
         5. 当前的 RSI、MACD、KDJ 数值。\n\
         如果查无此股票，请明确说明。"
    )
}

/// # Summary
/// 将联网检索得到的自由文本抽取为约定 JSON 的提示词。
pub fn extraction_prompt(symbol: &Symbol, search_text: &str) -> String {
    format!(
        "下面是关于股票 \"{symbol}\" 的检索结果，请据此填写 JSON。\n\
         \n\
         【检索结果】\n\
         {search_text}\n\
         \n\
         【规则】\n\
         - 只输出合法 JSON，不要使用 Markdown 代码块。\n\
         - history 数组填写检索结果中的每日收盘价；缺少明确日期时从今天起向前推算。\n\
         - RSI、MACD、资金流等数值若未提及，可根据描述的走势估算，无法估算时填 0。\n\
         - 查无此股票时 name 填 \"Unknown\"、price 填 0。\n\
         - reasoning 必须使用中文。"
    )
}

fn number() -> Value {
    json!({ "type": "NUMBER" })
}

fn string() -> Value {
    json!({ "type": "STRING" })
}

fn object(properties: Value) -> Value {
    json!({ "type": "OBJECT", "properties": properties })
}

fn array(items: Value) -> Value {
    json!({ "type": "ARRAY", "items": items })
}

/// # Summary
/// 结构化输出的响应 Schema (Gemini OpenAPI 子集)。
pub fn response_schema() -> Value {
    let mut stock = object(json!({
        "symbol": string(),
        "name": string(),
        "price": number(),
        "change": number(),
        "changePercent": number(),
        "open": number(),
        "high": number(),
        "low": number(),
        "volume": number(),
        "turnoverRate": number(),
        "pe": number(),
        "marketCap": number(),
    }));
    stock["required"] = json!(["symbol", "name", "price", "change", "changePercent"]);

    object(json!({
        "stock": stock,
        "history": array(object(json!({
            "date": string(),
            "close": number(),
        }))),
        "sentiment": object(json!({
            "score": number(),
            "trend": { "type": "STRING", "enum": ["bullish", "bearish", "neutral"] },
            "hotTopics": array(string()),
            "sources": array(object(json!({
                "name": string(),
                "heat": number(),
            }))),
            "recentComments": array(object(json!({
                "user": string(),
                "text": string(),
                "sentiment": { "type": "STRING", "enum": ["positive", "negative", "neutral"] },
                "time": string(),
            }))),
        })),
        "capital": object(json!({
            "mainInflow": number(),
            "northInflow": number(),
            "retailInflow": number(),
            "sectorRank": number(),
        })),
        "technical": object(json!({
            "rsi": number(),
            "macd": object(json!({ "dif": number(), "dea": number(), "macd": number() })),
            "kdj": object(json!({ "k": number(), "d": number(), "j": number() })),
        })),
        "analysis": object(json!({
            "action": { "type": "STRING", "enum": ["BUY", "SELL", "HOLD"] },
            "confidence": number(),
            "targetPriceHigh": number(),
            "targetPriceLow": number(),
            "reasoning": string(),
            "riskFactors": array(string()),
        })),
    }))
}
