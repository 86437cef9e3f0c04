//! Domain models for the test results dashboard.

use serde::{Deserialize, Serialize};

pub mod dashboard;
pub mod test_case;
pub mod test_run;
pub mod test_suite;
pub mod timestamp;

// Re-export commonly used types
pub use dashboard::{
    DEFAULT_TREND_DAYS, DashboardStats, DashboardTrends, Distribution, PassRateTone, TrendPoint,
};
pub use test_case::{CaseCounts, CaseFilter, CaseStatus, TestCase};
pub use test_run::{CreateTestRunRequest, RunStatus, TestRunDetail, TestRunSummary};
pub use test_suite::{TestSuite, TestSuiteDetail};

/// One page of a list query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultPage<T> {
    pub data: Vec<T>,
    /// Number of items matching the query across all pages.
    pub total: u64,
    pub limit: u32,
    pub offset: u64,
}

impl<T> ResultPage<T> {
    /// Check `offset + len(data) <= total`, which only binds before the last page.
    pub fn is_consistent(&self) -> bool {
        self.offset >= self.total
            || self.offset.saturating_add(self.data.len() as u64) <= self.total
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn has_previous(&self) -> bool {
        self.offset > 0
    }

    pub fn has_next(&self) -> bool {
        self.offset.saturating_add(u64::from(self.limit)) < self.total
    }

    /// Range label such as `Showing 21-40 of 45 results`.
    ///
    /// Empty pages, including pages past the end, read `Showing 0 results`.
    pub fn showing_range(&self) -> String {
        if self.total == 0 || self.data.is_empty() {
            return "Showing 0 results".to_string();
        }
        let start = self.offset.saturating_add(1).min(self.total);
        let end = self
            .offset
            .saturating_add(self.data.len() as u64)
            .min(self.total);
        format!("Showing {}-{} of {} results", start, end, self.total)
    }
}
