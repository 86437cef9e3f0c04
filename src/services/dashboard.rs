//! Overview page loader.

use serde::Serialize;
use tracing::info;

use crate::api::ApiClient;
use crate::error::DashboardResult;
use crate::models::{
    DashboardStats, DashboardTrends, Distribution, PassRateTone, ResultPage, TestRunSummary,
    TestSuite, TrendPoint,
};
use crate::query::RunsQuery;

/// Number of runs shown in the "recent runs" table.
pub const RECENT_RUNS_LIMIT: u32 = 10;

/// Everything the overview page renders, fetched in one go.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub stats: DashboardStats,
    pub trends: DashboardTrends,
    pub recent_runs: ResultPage<TestRunSummary>,
    pub suites: Vec<TestSuite>,
}

impl DashboardSnapshot {
    /// Fetch stats, trends, recent runs and suites concurrently.
    ///
    /// Fails with the first error; no partial snapshot is returned.
    pub async fn load(client: &ApiClient, trend_days: u32) -> DashboardResult<Self> {
        let recent = RunsQuery::new(RECENT_RUNS_LIMIT, 0)?;

        let (stats, trends, recent_runs, suites) = tokio::try_join!(
            client.get_dashboard_stats(),
            client.get_dashboard_trends(trend_days),
            client.list_test_runs(&recent),
            client.list_test_suites(),
        )?;

        info!(
            total_runs = stats.total_runs,
            suites = suites.len(),
            trend_days,
            "dashboard loaded"
        );

        Ok(Self {
            stats,
            trends,
            recent_runs,
            suites,
        })
    }

    pub fn trend_series(&self) -> DashboardResult<Vec<TrendPoint>> {
        self.trends.series()
    }

    pub fn distribution(&self) -> Distribution {
        self.stats.distribution()
    }

    pub fn pass_rate_tone(&self) -> PassRateTone {
        self.stats.pass_rate_tone()
    }
}
