use crate::prompt::{analysis_prompt, extraction_prompt, response_schema, search_prompt};
use crate::reconcile::{LocalTechnical, degraded, failure_notice, merge, parse_payload};
use quantflow_core::analysis::entity::{AnalysisResult, Dashboard, DataMode, HistoricalPrice};
use quantflow_core::analysis::error::AiError;
use quantflow_core::analysis::port::AiAnalyst;
use quantflow_core::common::Symbol;
use quantflow_core::common::time::TimeProvider;
use quantflow_core::config::DashboardConfig;
use quantflow_core::market::entity::{KLinePoint, QuoteSnapshot};
use quantflow_core::market::port::QuoteProvider;
use quantflow_market::normalize::{Normalizer, parse_date};
use quantflow_market::series;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::BTreeSet;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// 所有分支均失败时展示的横幅
pub const TOTAL_FAILURE_BANNER: &str = "无法获取数据，请检查股票代码是否正确，或检查网络连接。";

/// # Summary
/// 看板查询错误。除输入校验外，编排过程中的一切失败都被收敛为降级结果。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DashboardError {
    #[error("Symbol must not be empty")]
    EmptySymbol,
}

/// # Summary
/// 看板编排服务，系统的应用服务层门面。
/// 编译期仅依赖 core 中的端口定义，行情源、AI 与时钟均由构造函数注入。
///
/// # Invariants
/// - 每次查询独立构造快照与序列，不跨查询共享可变状态。
/// - 不做自动重试。
pub struct DashboardService {
    // 行情数据源
    provider: Arc<dyn QuoteProvider>,
    // 生成式 AI
    analyst: Arc<dyn AiAnalyst>,
    // 判定 "今天" 的时钟
    clock: Arc<dyn TimeProvider>,
    config: DashboardConfig,
    normalizer: Normalizer,
}

impl DashboardService {
    /// # Summary
    /// 创建 DashboardService 实例。
    ///
    /// # Arguments
    /// * `provider` - 行情数据源实现。
    /// * `analyst` - AI 分析师实现。
    /// * `clock` - 时钟实现。
    /// * `config` - 看板配置。
    pub fn new(
        provider: Arc<dyn QuoteProvider>,
        analyst: Arc<dyn AiAnalyst>,
        clock: Arc<dyn TimeProvider>,
        config: DashboardConfig,
    ) -> Self {
        let normalizer = Normalizer::new(provider.profile());
        Self {
            provider,
            analyst,
            clock,
            config,
            normalizer,
        }
    }

    /// # Summary
    /// 执行一次看板查询。
    ///
    /// # Logic
    /// 1. 代码去空白后为空则直接拒绝，不发起任何请求。
    /// 2. 并发拉取快照与 K 线，两者独立结束，失败与无数据同等视为缺失。
    /// 3. 快照价格为正走权威数据分支，否则走 AI 搜索分支。
    ///
    /// # Arguments
    /// * `raw_symbol` - 用户输入的代码。
    ///
    /// # Returns
    /// 结构完整的看板；仅空代码返回 `DashboardError::EmptySymbol`。
    pub async fn analyze(&self, raw_symbol: &str) -> Result<Dashboard, DashboardError> {
        let symbol = Symbol::parse(raw_symbol).ok_or(DashboardError::EmptySymbol)?;
        let source = self.normalizer.profile().name;

        let (snapshot, rows) = tokio::join!(
            self.provider.fetch_snapshot(&symbol),
            self.provider.fetch_candle_rows(&symbol)
        );

        let snapshot = match snapshot {
            Ok(Some(raw)) => Some(self.normalizer.snapshot(&symbol, &raw)),
            Ok(None) => {
                warn!(%symbol, source, "Snapshot absent upstream");
                None
            }
            Err(e) => {
                warn!(%symbol, source, error = %e, "Snapshot fetch failed");
                None
            }
        };
        let rows = rows.unwrap_or_else(|e| {
            warn!(%symbol, source, error = %e, "Candle fetch failed");
            Vec::new()
        });

        match snapshot.filter(QuoteSnapshot::is_usable) {
            Some(snapshot) => {
                info!(%symbol, price = snapshot.price, "Using authoritative market data");
                Ok(self.primary(&symbol, snapshot, &rows).await)
            }
            None => {
                info!(%symbol, "No usable snapshot, falling back to AI search");
                Ok(self.fallback(&symbol).await)
            }
        }
    }

    /// # Summary
    /// 权威数据分支：真实快照 + 真实序列，AI 仅提供点评。
    ///
    /// # Logic
    /// 1. 原始行构造序列并计算全部指标。
    /// 2. 以真实数据生成提示词请求 AI。
    /// 3. 成功则合并；失败 (含解析失败) 则降级，保留快照与本地指标。
    async fn primary(
        &self,
        symbol: &Symbol,
        snapshot: QuoteSnapshot,
        rows: &[serde_json::Value],
    ) -> Dashboard {
        let series = series::from_rows(&self.normalizer, rows);
        let local = LocalTechnical::from_series(&series);

        let prompt = analysis_prompt(&snapshot, &series, &local);
        let outcome = self
            .analyst
            .generate_json(&prompt, &response_schema())
            .await
            .and_then(|text| parse_payload(&text, symbol));

        let result = match outcome {
            Ok(payload) => merge(snapshot, &local, payload),
            Err(e) => {
                warn!(%symbol, error = %e, "AI analysis failed, returning degraded result");
                degraded(snapshot, failure_notice(&e, DataMode::Primary), &local)
            }
        };

        Dashboard {
            data_mode: DataMode::Primary,
            result,
            series,
            error: None,
        }
    }

    /// # Summary
    /// AI 搜索分支：联网检索 → 结构化抽取 → 由历史收盘价或完全合成绘图。
    ///
    /// # Logic
    /// 1. 检索与抽取任一步失败即降级：占位快照、空序列、错误横幅。
    /// 2. 检索引用附加到建议的 `sources`。
    /// 3. 历史点数达到阈值时用收盘价合成 K 线，否则按情绪趋势完全合成。
    async fn fallback(&self, symbol: &Symbol) -> Dashboard {
        match self.search_and_extract(symbol).await {
            Ok((result, history)) => {
                let series = self.chart_for(&result, &history);
                debug!(%symbol, history = history.len(), points = series.len(), "Fallback chart built");
                Dashboard {
                    data_mode: DataMode::Fallback,
                    result,
                    series,
                    error: None,
                }
            }
            Err(e) => {
                warn!(%symbol, error = %e, "AI search failed, every source exhausted");
                let notice = failure_notice(&e, DataMode::Fallback);
                Dashboard {
                    data_mode: DataMode::Fallback,
                    result: degraded(
                        QuoteSnapshot::placeholder(symbol.as_str()),
                        notice,
                        &LocalTechnical::default(),
                    ),
                    series: Vec::new(),
                    error: Some(TOTAL_FAILURE_BANNER.to_string()),
                }
            }
        }
    }

    async fn search_and_extract(
        &self,
        symbol: &Symbol,
    ) -> Result<(AnalysisResult, Vec<HistoricalPrice>), AiError> {
        let grounded = self.analyst.search(&search_prompt(symbol)).await?;
        debug!(%symbol, sources = grounded.sources.len(), "Grounded search returned");

        let text = self
            .analyst
            .generate_json(&extraction_prompt(symbol, &grounded.text), &response_schema())
            .await?;
        let mut payload = parse_payload(&text, symbol)?;

        let history = std::mem::take(&mut payload.history);
        let stock = payload.stock.clone();
        let mut result = payload.into_result(stock);
        result.analysis.sources = Some(grounded.sources);
        Ok((result, history))
    }

    fn chart_for(&self, result: &AnalysisResult, history: &[HistoricalPrice]) -> Vec<KLinePoint> {
        let today = self.clock.today();
        let mut rng = match self.config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        // 只统计日期可解析的不重复点，与收盘价合成实际使用的点一致
        let usable = history
            .iter()
            .filter_map(|h| parse_date(&h.date))
            .collect::<BTreeSet<_>>()
            .len();
        if usable < history.len() {
            debug!(usable, reported = history.len(), "AI history contains unusable dates");
        }

        if usable >= self.config.min_history_points {
            series::from_close_history(history, result.stock.price, today, &mut rng)
        } else {
            series::synthetic(
                self.config.synthetic_days,
                result.stock.price,
                result.sentiment.trend,
                today,
                &mut rng,
            )
        }
    }
}
