use crate::market::entity::{KLinePoint, QuoteSnapshot};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 市场情绪方向
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Bullish,
    Bearish,
    #[default]
    #[serde(other)]
    Neutral,
}

/// 单条评论的情绪倾向
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Positive,
    Negative,
    #[default]
    #[serde(other)]
    Neutral,
}

/// 交易建议动作
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Action {
    #[serde(rename = "BUY", alias = "buy", alias = "Buy")]
    Buy,
    #[serde(rename = "SELL", alias = "sell", alias = "Sell")]
    Sell,
    #[default]
    #[serde(rename = "HOLD", other)]
    Hold,
}

/// 舆情来源及其热度
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SentimentSource {
    #[schema(example = "雪球")]
    pub name: String,
    // 热度 0-100
    pub heat: f64,
}

/// 近期讨论摘录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RecentComment {
    pub user: String,
    pub text: String,
    pub sentiment: Tone,
    pub time: String,
}

/// # Summary
/// 市场情绪聚合。
///
/// # Invariants
/// - `score` 位于 0-100。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Sentiment {
    pub score: f64,
    pub trend: Trend,
    pub hot_topics: Vec<String>,
    pub sources: Vec<SentimentSource>,
    pub recent_comments: Vec<RecentComment>,
}

impl Sentiment {
    /// 占位舆情来源名称
    pub const PLACEHOLDER_SOURCES: [&'static str; 3] = ["雪球", "东方财富", "微博"];

    /// 三个热度均为 50 的占位来源
    pub fn placeholder_sources() -> Vec<SentimentSource> {
        Self::PLACEHOLDER_SOURCES
            .iter()
            .map(|name| SentimentSource {
                name: (*name).to_string(),
                heat: 50.0,
            })
            .collect()
    }

    /// # Summary
    /// AI 载荷缺失情绪对象时使用的中性默认值。
    pub fn neutral() -> Self {
        Self {
            score: 50.0,
            trend: Trend::Neutral,
            hot_topics: Vec::new(),
            sources: Self::placeholder_sources(),
            recent_comments: Vec::new(),
        }
    }

    /// # Summary
    /// AI 不可达时的降级情绪：中性分数，无来源。
    pub fn unavailable() -> Self {
        Self {
            score: 50.0,
            trend: Trend::Neutral,
            hot_topics: vec!["暂无数据".to_string()],
            sources: Vec::new(),
            recent_comments: Vec::new(),
        }
    }
}

/// 资金流向 (缺失时全部为 0)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CapitalFlow {
    // 主力净流入
    pub main_inflow: f64,
    // 北向资金
    pub north_inflow: f64,
    // 散户净流入
    pub retail_inflow: f64,
    // 板块排名
    pub sector_rank: f64,
}

/// MACD 三元组，本地不计算，仅来自 AI 估算或置零
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Macd {
    pub dif: f64,
    pub dea: f64,
    pub macd: f64,
}

/// KDJ 三元组
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Kdj {
    pub k: f64,
    pub d: f64,
    pub j: f64,
}

impl Kdj {
    /// 中性 KDJ (50/50/50)
    pub fn neutral() -> Self {
        Self {
            k: 50.0,
            d: 50.0,
            j: 50.0,
        }
    }
}

/// 技术指标汇总
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TechnicalIndicators {
    pub rsi: f64,
    pub macd: Macd,
    pub kdj: Kdj,
}

impl TechnicalIndicators {
    /// 中性技术指标：RSI 50、KDJ 全 50、MACD 全 0
    pub fn neutral() -> Self {
        Self {
            rsi: 50.0,
            macd: Macd::default(),
            kdj: Kdj::neutral(),
        }
    }
}

/// 联网搜索引用的网页
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct WebSource {
    pub title: String,
    pub uri: String,
}

/// # Summary
/// 交易建议。
///
/// # Invariants
/// - `confidence` 位于 0-100。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub action: Action,
    pub confidence: f64,
    pub target_price_high: f64,
    pub target_price_low: f64,
    pub reasoning: String,
    pub risk_factors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<WebSource>>,
}

impl Recommendation {
    /// # Summary
    /// 观望、置信度为 0 的保守建议，目标价取当前价。
    pub fn hold(price: f64) -> Self {
        Self {
            action: Action::Hold,
            confidence: 0.0,
            target_price_high: price,
            target_price_low: price,
            reasoning: String::new(),
            risk_factors: Vec::new(),
            sources: None,
        }
    }
}

/// # Summary
/// 面向展示层的完整分析结果。
///
/// # Invariants
/// - 所有子对象结构完整，展示层无需判空。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AnalysisResult {
    pub stock: QuoteSnapshot,
    pub sentiment: Sentiment,
    pub capital: CapitalFlow,
    pub technical: TechnicalIndicators,
    pub analysis: Recommendation,
}

/// AI 搜索得到的历史收盘价
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HistoricalPrice {
    #[schema(example = "2024-03-08")]
    pub date: String,
    pub close: f64,
}

/// 产出结果的编排分支
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DataMode {
    // 权威行情接口可用
    Primary,
    // 降级为 AI 联网搜索
    Fallback,
}

/// # Summary
/// 单次查询的最终展示对象。
///
/// # Invariants
/// - `series` 严格按日期升序。
/// - `error` 仅在所有分支均失败时出现。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub data_mode: DataMode,
    pub result: AnalysisResult,
    pub series: Vec<KLinePoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// AI 联网搜索的返回：正文与引用来源
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroundedText {
    pub text: String,
    pub sources: Vec<WebSource>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_wire_names() {
        assert_eq!(serde_json::to_string(&Action::Buy).unwrap(), "\"BUY\"");
        assert_eq!(serde_json::to_string(&Trend::Bearish).unwrap(), "\"bearish\"");
        assert_eq!(serde_json::to_string(&DataMode::Primary).unwrap(), "\"primary\"");
    }

    #[test]
    fn test_unknown_enum_values_fall_back() {
        let action: Action = serde_json::from_str("\"STRONG_BUY\"").unwrap();
        assert_eq!(action, Action::Hold);
        let action: Action = serde_json::from_str("\"sell\"").unwrap();
        assert_eq!(action, Action::Sell);
        let trend: Trend = serde_json::from_str("\"sideways\"").unwrap();
        assert_eq!(trend, Trend::Neutral);
    }

    #[test]
    fn test_neutral_sentiment_has_placeholder_sources() {
        let sentiment = Sentiment::neutral();
        assert_eq!(sentiment.score, 50.0);
        let names: Vec<_> = sentiment.sources.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["雪球", "东方财富", "微博"]);
        assert!(sentiment.sources.iter().all(|s| s.heat == 50.0));
    }
}
