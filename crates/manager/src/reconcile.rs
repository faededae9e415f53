//! # 行情与 AI 载荷合并
//!
//! AI 的 JSON 输出不可信：可能带代码围栏、缺字段、数值是字符串、枚举值超出约定。
//! 这里先宽松解析为 `AiPayload`，再与真实快照和本地指标合并，保证结果结构完整。

use quantflow_core::analysis::entity::{
    Action, AnalysisResult, CapitalFlow, DataMode, HistoricalPrice, Kdj, Macd, Recommendation,
    RecentComment, Sentiment, SentimentSource, TechnicalIndicators, Tone, Trend,
};
use quantflow_core::analysis::error::AiError;
use quantflow_core::common::Symbol;
use quantflow_core::common::num::{lenient_f64, lenient_opt_f64, lenient_string};
use quantflow_core::market::entity::{KLinePoint, QuoteSnapshot};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// 配额耗尽提示
pub const QUOTA_NOTICE: &str = "AI 配额已耗尽 (Quota Exceeded)。无法生成深度分析，但您可以继续查看实时行情。";
/// AI 返回内容无法解析
pub const PARSE_NOTICE: &str = "AI 返回数据格式错误 (JSON 解析错误)。";
/// 权威数据分支中 AI 不可用
pub const ANALYSIS_UNAVAILABLE_NOTICE: &str = "AI 分析服务暂时不可用。";
/// 搜索分支中 AI 不可用
pub const SEARCH_UNAVAILABLE_NOTICE: &str = "AI 搜索服务暂时不可用。";

const SYSTEM_NOTICE_PREFIX: &str = "[系统提示] ";
const DEGRADED_RISK_FACTORS: [&str; 2] = ["无法连接AI模型", "请参考左侧实时行情数据"];

/// # Summary
/// 宽松解析后的 AI 载荷。
///
/// # Invariants
/// - 除 `analysis` 外所有子对象都已补齐中性默认值。
/// - `analysis` 保留缺失状态，目标价需要等最终快照确定后再回填。
#[derive(Debug, Clone, PartialEq)]
pub struct AiPayload {
    pub stock: QuoteSnapshot,
    pub history: Vec<HistoricalPrice>,
    pub sentiment: Sentiment,
    pub capital: CapitalFlow,
    pub technical: TechnicalIndicators,
    pub analysis: Option<Recommendation>,
}

impl AiPayload {
    /// # Summary
    /// 以给定快照组装最终分析结果。
    ///
    /// # Arguments
    /// * `stock`: 最终采用的快照 (真实快照优先于 AI 快照)。
    ///
    /// # Returns
    /// `analysis` 缺失时使用目标价等于当前价的观望建议。
    pub fn into_result(self, stock: QuoteSnapshot) -> AnalysisResult {
        let analysis = self
            .analysis
            .unwrap_or_else(|| Recommendation::hold(stock.price));
        AnalysisResult {
            stock,
            sentiment: self.sentiment,
            capital: self.capital,
            technical: self.technical,
            analysis,
        }
    }
}

/// 去除 AI 输出中的 Markdown 代码围栏
pub fn strip_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "").trim().to_string()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// # Summary
/// 将 AI 的原始文本解析为载荷。
///
/// # Logic
/// 1. 去除代码围栏；空文本视为 `{}`。
/// 2. 宽松反序列化：字符串数值被解析，无法解析的数值取 0，未知枚举取中性/观望。
/// 3. 缺失的子对象补齐中性默认值；缺失的快照以查询代码命名、数值全为 0。
///
/// # Arguments
/// * `text`: AI 原始输出。
/// * `symbol`: 本次查询代码。
///
/// # Returns
/// 文本不是 JSON 对象时返回 `AiError::Parse`，与 AI 调用失败同等对待。
pub fn parse_payload(text: &str, symbol: &Symbol) -> Result<AiPayload, AiError> {
    let cleaned = strip_fences(text);
    let cleaned = if cleaned.is_empty() { "{}" } else { cleaned.as_str() };

    let value: Value =
        serde_json::from_str(cleaned).map_err(|e| AiError::Parse(e.to_string()))?;
    if !value.is_object() {
        return Err(AiError::Parse(format!(
            "expected a JSON object, got {}",
            json_kind(&value)
        )));
    }
    let raw: RawPayload =
        serde_json::from_value(value).map_err(|e| AiError::Parse(e.to_string()))?;

    Ok(AiPayload {
        stock: raw
            .stock
            .map(|s| s.into_snapshot(symbol))
            .unwrap_or_else(|| QuoteSnapshot::placeholder(symbol.as_str())),
        history: raw
            .history
            .into_iter()
            .map(|h| HistoricalPrice {
                date: h.date,
                close: h.close,
            })
            .collect(),
        sentiment: raw
            .sentiment
            .map(RawSentiment::into_sentiment)
            .unwrap_or_else(Sentiment::neutral),
        capital: raw
            .capital
            .map(RawCapital::into_capital)
            .unwrap_or_default(),
        technical: raw
            .technical
            .map(RawTechnical::into_technical)
            .unwrap_or_else(TechnicalIndicators::neutral),
        analysis: raw.analysis.map(RawRecommendation::into_recommendation),
    })
}

/// # Summary
/// 从本地序列最后一根 K 线提取的真实技术指标。
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LocalTechnical {
    // K、D、J 均已计算时才存在
    pub kdj: Option<Kdj>,
    // 序列不少于 15 根时才存在
    pub rsi: Option<f64>,
}

impl LocalTechnical {
    /// 读取序列最后一根 K 线的 KDJ 与 RSI
    pub fn from_series(series: &[KLinePoint]) -> Self {
        let Some(last) = series.last() else {
            return Self::default();
        };
        let kdj = match (last.k, last.d, last.j) {
            (Some(k), Some(d), Some(j)) => Some(Kdj { k, d, j }),
            _ => None,
        };
        Self { kdj, rsi: last.rsi }
    }

    /// 是否有任何本地计算值
    pub fn is_empty(&self) -> bool {
        self.kdj.is_none() && self.rsi.is_none()
    }

    /// 用本地计算值覆盖 AI 估算值，MACD 保持不变
    pub fn apply(&self, technical: &mut TechnicalIndicators) {
        if let Some(kdj) = self.kdj {
            technical.kdj = kdj;
        }
        if let Some(rsi) = self.rsi {
            technical.rsi = rsi;
        }
    }

    /// 降级结果使用的技术指标：本地值优先，缺失项取中性值
    pub fn or_neutral(&self) -> TechnicalIndicators {
        let mut technical = TechnicalIndicators::neutral();
        self.apply(&mut technical);
        technical
    }
}

/// # Summary
/// 合并真实快照、本地指标与 AI 载荷。
///
/// # Logic
/// 1. 传入的快照无条件覆盖 AI 快照。
/// 2. 本地 KDJ/RSI 覆盖 AI 的估算值；MACD 保留 AI 估算。
/// 3. 其余部分沿用 AI 载荷 (已补齐默认值)。
pub fn merge(snapshot: QuoteSnapshot, local: &LocalTechnical, payload: AiPayload) -> AnalysisResult {
    let mut result = payload.into_result(snapshot);
    local.apply(&mut result.technical);
    result
}

/// # Summary
/// 构造 AI 不可用时的降级分析结果。
///
/// # Logic
/// 1. 快照沿用目前已知的最佳快照 (可能是全零占位)。
/// 2. 情绪中性且无来源，资金流全 0。
/// 3. 技术指标尽量使用本地真实值。
/// 4. 建议固定为观望、置信度 0、目标价等于当前价，理由为系统提示。
pub fn degraded(snapshot: QuoteSnapshot, notice: &str, local: &LocalTechnical) -> AnalysisResult {
    let price = snapshot.price;
    AnalysisResult {
        stock: snapshot,
        sentiment: Sentiment::unavailable(),
        capital: CapitalFlow::default(),
        technical: local.or_neutral(),
        analysis: Recommendation {
            reasoning: format!("{SYSTEM_NOTICE_PREFIX}{notice}"),
            risk_factors: DEGRADED_RISK_FACTORS.iter().map(|s| (*s).to_string()).collect(),
            ..Recommendation::hold(price)
        },
    }
}

/// # Summary
/// 按错误类型与所在分支选择面向用户的提示语。
pub fn failure_notice(err: &AiError, branch: DataMode) -> &'static str {
    match err {
        AiError::Quota(_) => QUOTA_NOTICE,
        AiError::Parse(_) => PARSE_NOTICE,
        _ => match branch {
            DataMode::Primary => ANALYSIS_UNAVAILABLE_NOTICE,
            DataMode::Fallback => SEARCH_UNAVAILABLE_NOTICE,
        },
    }
}

// ---------------------------------------------------------------------------
// 宽松反序列化结构
// ---------------------------------------------------------------------------

/// 非对象值视为缺失
fn lenient_object<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

/// 非数组值视为空数组，无法解析的元素被跳过
fn lenient_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

/// 不认识的枚举值取默认变体
fn lenient_enum<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .and_then(|v| serde_json::from_value(v).ok())
        .unwrap_or_default())
}

#[derive(Deserialize, Debug, Default)]
struct RawPayload {
    #[serde(default, deserialize_with = "lenient_object")]
    stock: Option<RawStock>,
    #[serde(default, deserialize_with = "lenient_vec")]
    history: Vec<RawHistory>,
    #[serde(default, deserialize_with = "lenient_object")]
    sentiment: Option<RawSentiment>,
    #[serde(default, deserialize_with = "lenient_object")]
    capital: Option<RawCapital>,
    #[serde(default, deserialize_with = "lenient_object")]
    technical: Option<RawTechnical>,
    #[serde(default, deserialize_with = "lenient_object")]
    analysis: Option<RawRecommendation>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct RawStock {
    #[serde(default, deserialize_with = "lenient_string")]
    symbol: String,
    #[serde(default, deserialize_with = "lenient_string")]
    name: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    price: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    change: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    change_percent: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    open: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    high: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    low: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    volume: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    turnover_rate: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pe: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    market_cap: f64,
}

impl RawStock {
    fn into_snapshot(self, symbol: &Symbol) -> QuoteSnapshot {
        let or_symbol = |s: String| {
            if s.trim().is_empty() {
                symbol.as_str().to_string()
            } else {
                s
            }
        };
        QuoteSnapshot {
            symbol: or_symbol(self.symbol),
            name: or_symbol(self.name),
            price: self.price,
            change: self.change,
            change_percent: self.change_percent,
            open: self.open,
            high: self.high,
            low: self.low,
            volume: self.volume,
            turnover_rate: self.turnover_rate,
            pe: self.pe,
            market_cap: self.market_cap,
        }
    }
}

#[derive(Deserialize, Debug)]
struct RawHistory {
    #[serde(default, deserialize_with = "lenient_string")]
    date: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    close: f64,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct RawSentiment {
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    score: Option<f64>,
    #[serde(default, deserialize_with = "lenient_enum")]
    trend: Trend,
    #[serde(default, deserialize_with = "lenient_vec")]
    hot_topics: Vec<String>,
    #[serde(default, deserialize_with = "lenient_vec")]
    sources: Vec<RawSource>,
    #[serde(default, deserialize_with = "lenient_vec")]
    recent_comments: Vec<RawComment>,
}

impl RawSentiment {
    fn into_sentiment(self) -> Sentiment {
        let sources = if self.sources.is_empty() {
            Sentiment::placeholder_sources()
        } else {
            self.sources
                .into_iter()
                .map(|s| SentimentSource {
                    name: s.name,
                    heat: s.heat.clamp(0.0, 100.0),
                })
                .collect()
        };

        Sentiment {
            score: self.score.unwrap_or(50.0).clamp(0.0, 100.0),
            trend: self.trend,
            hot_topics: self.hot_topics,
            sources,
            recent_comments: self
                .recent_comments
                .into_iter()
                .map(|c| RecentComment {
                    user: c.user,
                    text: c.text,
                    sentiment: c.sentiment,
                    time: c.time,
                })
                .collect(),
        }
    }
}

#[derive(Deserialize, Debug)]
struct RawSource {
    #[serde(default, deserialize_with = "lenient_string")]
    name: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    heat: f64,
}

#[derive(Deserialize, Debug)]
struct RawComment {
    #[serde(default, deserialize_with = "lenient_string")]
    user: String,
    #[serde(default, deserialize_with = "lenient_string")]
    text: String,
    #[serde(default, deserialize_with = "lenient_enum")]
    sentiment: Tone,
    #[serde(default, deserialize_with = "lenient_string")]
    time: String,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct RawCapital {
    #[serde(default, deserialize_with = "lenient_f64")]
    main_inflow: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    north_inflow: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    retail_inflow: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    sector_rank: f64,
}

impl RawCapital {
    fn into_capital(self) -> CapitalFlow {
        CapitalFlow {
            main_inflow: self.main_inflow,
            north_inflow: self.north_inflow,
            retail_inflow: self.retail_inflow,
            sector_rank: self.sector_rank,
        }
    }
}

#[derive(Deserialize, Debug)]
struct RawTechnical {
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    rsi: Option<f64>,
    #[serde(default, deserialize_with = "lenient_object")]
    macd: Option<RawMacd>,
    #[serde(default, deserialize_with = "lenient_object")]
    kdj: Option<RawKdj>,
}

impl RawTechnical {
    fn into_technical(self) -> TechnicalIndicators {
        TechnicalIndicators {
            rsi: self.rsi.unwrap_or(50.0),
            macd: self
                .macd
                .map(|m| Macd {
                    dif: m.dif,
                    dea: m.dea,
                    macd: m.macd,
                })
                .unwrap_or_default(),
            kdj: self
                .kdj
                .map(|k| Kdj {
                    k: k.k.unwrap_or(50.0),
                    d: k.d.unwrap_or(50.0),
                    j: k.j.unwrap_or(50.0),
                })
                .unwrap_or_else(Kdj::neutral),
        }
    }
}

#[derive(Deserialize, Debug)]
struct RawMacd {
    #[serde(default, deserialize_with = "lenient_f64")]
    dif: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    dea: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    macd: f64,
}

#[derive(Deserialize, Debug)]
struct RawKdj {
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    k: Option<f64>,
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    d: Option<f64>,
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    j: Option<f64>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct RawRecommendation {
    #[serde(default, deserialize_with = "lenient_enum")]
    action: Action,
    #[serde(default, deserialize_with = "lenient_f64")]
    confidence: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    target_price_high: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    target_price_low: f64,
    #[serde(default, deserialize_with = "lenient_string")]
    reasoning: String,
    #[serde(default, deserialize_with = "lenient_vec")]
    risk_factors: Vec<String>,
}

impl RawRecommendation {
    fn into_recommendation(self) -> Recommendation {
        Recommendation {
            action: self.action,
            confidence: self.confidence.clamp(0.0, 100.0),
            target_price_high: self.target_price_high,
            target_price_low: self.target_price_low,
            reasoning: self.reasoning,
            risk_factors: self.risk_factors,
            sources: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn symbol() -> Symbol {
        Symbol::parse("600519").unwrap()
    }

    fn snapshot(price: f64) -> QuoteSnapshot {
        QuoteSnapshot {
            symbol: "600519".into(),
            name: "贵州茅台".into(),
            price,
            ..QuoteSnapshot::default()
        }
    }

    #[test]
    fn test_strip_fences() {
        assert_eq!(strip_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_fences("  {\"a\":1} "), "{\"a\":1}");
    }

    #[test]
    fn test_parse_fenced_payload_with_string_numbers() {
        let text = r#"```json
        {
          "stock": {"symbol": "600519", "name": "贵州茅台", "price": "1700.5", "pe": "abc"},
          "history": [{"date": "2024-03-01", "close": "1690"}, "junk"],
          "sentiment": {"score": "72", "trend": "sideways", "hotTopics": ["白酒", 3], "sources": []},
          "technical": {"rsi": "61.5"},
          "analysis": {"action": "buy", "confidence": "80", "targetPriceHigh": 1800, "riskFactors": "none"}
        }
        ```"#;

        let payload = parse_payload(text, &symbol()).unwrap();

        assert_eq!(payload.stock.price, 1700.5);
        assert_eq!(payload.stock.pe, 0.0);
        assert_eq!(payload.history, vec![HistoricalPrice { date: "2024-03-01".into(), close: 1690.0 }]);
        assert_eq!(payload.sentiment.score, 72.0);
        assert_eq!(payload.sentiment.trend, Trend::Neutral);
        assert_eq!(payload.sentiment.hot_topics, vec!["白酒".to_string()]);
        assert_eq!(payload.sentiment.sources, Sentiment::placeholder_sources());
        assert_eq!(payload.technical.rsi, 61.5);
        assert_eq!(payload.technical.kdj, Kdj::neutral());
        assert_eq!(payload.technical.macd, Macd::default());

        let analysis = payload.analysis.unwrap();
        assert_eq!(analysis.action, Action::Buy);
        assert_eq!(analysis.confidence, 80.0);
        assert_eq!(analysis.target_price_low, 0.0);
        assert!(analysis.risk_factors.is_empty());
    }

    #[test]
    fn test_parse_empty_object_fills_defaults() {
        let payload = parse_payload("{}", &symbol()).unwrap();

        assert_eq!(payload.stock, QuoteSnapshot::placeholder("600519"));
        assert!(payload.history.is_empty());
        assert_eq!(payload.sentiment, Sentiment::neutral());
        assert_eq!(payload.capital, CapitalFlow::default());
        assert_eq!(payload.technical, TechnicalIndicators::neutral());
        assert!(payload.analysis.is_none());

        let result = payload.into_result(snapshot(88.0));
        assert_eq!(result.analysis.action, Action::Hold);
        assert_eq!(result.analysis.target_price_high, 88.0);
        assert_eq!(result.analysis.target_price_low, 88.0);
    }

    #[test]
    fn test_out_of_range_scores_are_clamped() {
        let text = r#"{
            "sentiment": {"score": 180, "sources": [{"name": "雪球", "heat": -20}, {"name": "微博", "heat": "250"}]},
            "analysis": {"action": "SELL", "confidence": 140}
        }"#;
        let payload = parse_payload(text, &symbol()).unwrap();
        assert_eq!(payload.sentiment.score, 100.0);
        assert_eq!(payload.sentiment.sources[0].heat, 0.0);
        assert_eq!(payload.sentiment.sources[1].heat, 100.0);
        assert_eq!(payload.analysis.unwrap().confidence, 100.0);
    }

    #[test]
    fn test_parse_rejects_malformed_json() {
        let err = parse_payload("I'm sorry, I cannot help with that.", &symbol()).unwrap_err();
        assert!(matches!(err, AiError::Parse(_)));

        let err = parse_payload("[1, 2]", &symbol()).unwrap_err();
        assert!(matches!(err, AiError::Parse(_)));

        let err = parse_payload("```json\n[]\n```", &symbol()).unwrap_err();
        assert!(matches!(err, AiError::Parse(_)));

        assert!(parse_payload("42", &symbol()).is_err());

        assert!(parse_payload("", &symbol()).is_ok());
    }

    #[test]
    fn test_local_technical_overrides_ai_values() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 8).unwrap();
        let mut point = KLinePoint::new(date, 1.0, 1.0, 1.0, 1.0, 1);
        point.k = Some(30.0);
        point.d = Some(40.0);
        point.j = Some(10.0);
        let local = LocalTechnical::from_series(&[point]);

        let text = r#"{
            "technical": {"rsi": 99, "macd": {"dif": 1.5, "dea": 0.5, "macd": 2}, "kdj": {"k": 99, "d": 99, "j": 99}},
            "stock": {"price": 1, "name": "AI name"}
        }"#;
        let payload = parse_payload(text, &symbol()).unwrap();
        let result = merge(snapshot(100.0), &local, payload);

        assert_eq!(result.technical.kdj, Kdj { k: 30.0, d: 40.0, j: 10.0 });
        // 序列过短未计算 RSI，保留 AI 值
        assert_eq!(result.technical.rsi, 99.0);
        assert_eq!(result.technical.macd, Macd { dif: 1.5, dea: 0.5, macd: 2.0 });
        assert_eq!(result.stock, snapshot(100.0));
    }

    #[test]
    fn test_degraded_result() {
        let local = LocalTechnical {
            kdj: Some(Kdj { k: 20.0, d: 25.0, j: 10.0 }),
            rsi: None,
        };
        let result = degraded(snapshot(42.0), QUOTA_NOTICE, &local);

        assert_eq!(result.analysis.action, Action::Hold);
        assert_eq!(result.analysis.confidence, 0.0);
        assert_eq!(result.analysis.target_price_high, 42.0);
        assert_eq!(result.analysis.reasoning, format!("[系统提示] {QUOTA_NOTICE}"));
        assert_eq!(result.analysis.risk_factors.len(), 2);
        assert_eq!(result.technical.kdj.k, 20.0);
        assert_eq!(result.technical.rsi, 50.0);
        assert_eq!(result.sentiment.hot_topics, vec!["暂无数据".to_string()]);
        assert!(result.sentiment.sources.is_empty());
        assert_eq!(result.capital, CapitalFlow::default());
    }

    #[test]
    fn test_failure_notice_selection() {
        let quota = AiError::Quota("429".into());
        let parse = AiError::Parse("eof".into());
        let network = AiError::Network("reset".into());

        assert_eq!(failure_notice(&quota, DataMode::Fallback), QUOTA_NOTICE);
        assert_eq!(failure_notice(&parse, DataMode::Primary), PARSE_NOTICE);
        assert_eq!(failure_notice(&network, DataMode::Primary), ANALYSIS_UNAVAILABLE_NOTICE);
        assert_eq!(failure_notice(&network, DataMode::Fallback), SEARCH_UNAVAILABLE_NOTICE);
    }
}
