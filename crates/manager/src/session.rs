use crate::orchestrator::{DashboardError, DashboardService};
use quantflow_core::analysis::entity::Dashboard;
use quantflow_core::common::Symbol;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use tracing::{debug, info};

/// # Summary
/// 一次提交的结果：是否成为当前看板。
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    // 本次查询是最新发起的，已写入当前看板
    Applied(Dashboard),
    // 期间有更新的查询发起，本次结果被丢弃
    Stale(Dashboard),
}

impl QueryOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, QueryOutcome::Applied(_))
    }

    pub fn into_dashboard(self) -> Dashboard {
        match self {
            QueryOutcome::Applied(d) | QueryOutcome::Stale(d) => d,
        }
    }
}

/// # Summary
/// 查询会话，保证先发后至的旧结果不会覆盖新结果。
///
/// # Invariants
/// - 每次提交领取一个单调递增的序号。
/// - 结果仅在其序号仍等于最新发出的序号时写入 `current`。
pub struct QuerySession {
    service: Arc<DashboardService>,
    // 最新发出的序号
    sequence: AtomicU64,
    // 当前展示的看板
    current: RwLock<Option<Dashboard>>,
}

impl QuerySession {
    pub fn new(service: Arc<DashboardService>) -> Self {
        Self {
            service,
            sequence: AtomicU64::new(0),
            current: RwLock::new(None),
        }
    }

    /// # Summary
    /// 提交一次查询。
    ///
    /// # Logic
    /// 1. 空代码直接拒绝，不消耗序号。
    /// 2. 领取序号后执行编排。
    /// 3. 持写锁比较序号：仍是最新则写入当前看板，否则标记为过期。
    ///
    /// # Arguments
    /// * `raw_symbol` - 用户输入的代码。
    pub async fn submit(&self, raw_symbol: &str) -> Result<QueryOutcome, DashboardError> {
        if Symbol::parse(raw_symbol).is_none() {
            return Err(DashboardError::EmptySymbol);
        }

        let token = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(token, symbol = raw_symbol.trim(), "Query submitted");

        let dashboard = self.service.analyze(raw_symbol).await?;

        let mut current = self.current.write().unwrap_or_else(|e| e.into_inner());
        if self.sequence.load(Ordering::SeqCst) == token {
            *current = Some(dashboard.clone());
            Ok(QueryOutcome::Applied(dashboard))
        } else {
            info!(token, symbol = raw_symbol.trim(), "Discarding stale query result");
            Ok(QueryOutcome::Stale(dashboard))
        }
    }

    /// 当前展示的看板
    pub fn current(&self) -> Option<Dashboard> {
        self.current
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// 最新发出的序号，0 表示尚无查询
    pub fn latest_sequence(&self) -> u64 {
        self.sequence.load(Ordering::SeqCst)
    }
}
