//! Typed client for the test results API.
//!
//! One struct per remote resource shares an [`HttpClient`]; [`ApiClient`] is the
//! facade the rest of the crate talks to. Nothing here caches: every call is a
//! fresh request.

mod dashboard;
pub mod http;
mod test_runs;
mod test_suites;

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use tracing::warn;
use uuid::Uuid;

pub use dashboard::{DashboardApi, MAX_TREND_DAYS};
pub use http::HttpClient;
pub use test_runs::TestRunsApi;
pub use test_suites::TestSuitesApi;

use crate::config::resolve_api_url;
use crate::error::DashboardResult;
use crate::models::{
    DashboardStats, DashboardTrends, ResultPage, TestRunDetail, TestRunSummary, TestSuite,
    TestSuiteDetail,
};
use crate::query::RunsQuery;

/// Environment variable overriding the default API base URL.
pub const API_URL_ENV: &str = "TDASH_API_URL";

/// Process-wide default base URL, resolved once from `TDASH_API_URL` with the
/// same rules as [`crate::config::Config::from_env`].
pub fn default_base_url() -> &'static str {
    static DEFAULT: OnceLock<String> = OnceLock::new();
    DEFAULT.get_or_init(|| resolve_api_url(std::env::var(API_URL_ENV).ok()))
}

/// Connection settings for [`ApiClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Absolute http(s) URL the `/api/...` paths are appended to
    pub base_url: String,
    /// Total request timeout; `None` waits indefinitely
    pub timeout: Option<Duration>,
    /// TCP connect timeout
    pub connect_timeout: Option<Duration>,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: None,
            connect_timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(default_base_url())
    }
}

/// Client for every endpoint of the results API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Arc<HttpClient>,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> DashboardResult<Self> {
        Ok(Self {
            http: Arc::new(HttpClient::new(config)?),
        })
    }

    pub fn base_url(&self) -> &str {
        self.http.base_url().as_str()
    }

    pub fn dashboard(&self) -> DashboardApi {
        DashboardApi::new(Arc::clone(&self.http))
    }

    pub fn test_runs(&self) -> TestRunsApi {
        TestRunsApi::new(Arc::clone(&self.http))
    }

    pub fn test_suites(&self) -> TestSuitesApi {
        TestSuitesApi::new(Arc::clone(&self.http))
    }

    pub async fn get_dashboard_stats(&self) -> DashboardResult<DashboardStats> {
        self.dashboard().stats().await
    }

    /// Trend data for the trailing window; fails before any I/O when `days`
    /// is outside 1-30.
    pub async fn get_dashboard_trends(&self, days: u32) -> DashboardResult<DashboardTrends> {
        self.dashboard().trends(days).await
    }

    pub async fn list_test_runs(
        &self,
        query: &RunsQuery,
    ) -> DashboardResult<ResultPage<TestRunSummary>> {
        let page = self.test_runs().list(query).await?;

        if !page.is_consistent() {
            warn!(
                total = page.total,
                offset = page.offset,
                rows = page.data.len(),
                "run page holds more rows than its total allows"
            );
        }
        for run in &page.data {
            warn_on_violation(run);
        }

        Ok(page)
    }

    pub async fn get_test_run(&self, id: Uuid) -> DashboardResult<TestRunDetail> {
        let detail = self.test_runs().get(id).await?;
        warn_on_violation(&detail.run);
        Ok(detail)
    }

    pub async fn list_test_suites(&self) -> DashboardResult<Vec<TestSuite>> {
        self.test_suites().list().await
    }

    pub async fn get_test_suite(&self, id: Uuid) -> DashboardResult<TestSuiteDetail> {
        self.test_suites().get(id).await
    }

    /// Execute a suite. An unknown suite is a `NotFound` rejection.
    pub async fn trigger_test_run(&self, suite_id: Uuid) -> DashboardResult<TestRunDetail> {
        let detail = self.test_runs().trigger(suite_id).await?;
        warn_on_violation(&detail.run);
        Ok(detail)
    }
}

/// Malformed runs are still returned; the violation is only logged.
fn warn_on_violation(run: &TestRunSummary) {
    if let Err(e) = run.check_invariants() {
        warn!(run_id = %run.id, error = %e, "test run payload violates invariants");
    }
}
