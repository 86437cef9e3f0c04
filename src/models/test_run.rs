//! Test run models: one execution of a suite with aggregate counts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{DashboardError, DashboardResult};
use crate::metrics;
use crate::models::TestCase;
use crate::models::timestamp;

/// Run status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Running,
    Passed,
    Failed,
}

impl RunStatus {
    /// Wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Passed => "passed",
            Self::Failed => "failed",
        }
    }

    /// Parse from string representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "running" => Some(Self::Running),
            "passed" => Some(Self::Passed),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }

    /// Terminal statuses carry completion fields.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Running)
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Test run as listed by `GET /api/test-runs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestRunSummary {
    pub id: Uuid,
    /// Owning suite.
    pub suite_id: Uuid,
    /// Denormalized suite name.
    pub suite_name: String,
    pub status: RunStatus,
    #[serde(with = "timestamp")]
    pub started_at: DateTime<Utc>,
    #[serde(default, with = "timestamp::option")]
    pub completed_at: Option<DateTime<Utc>>,
    /// Wall-clock duration in milliseconds.
    #[serde(default)]
    pub duration_ms: Option<u64>,
    pub total_tests: u32,
    pub passed_tests: u32,
    pub failed_tests: u32,
}

impl TestRunSummary {
    /// Shortened id for tables and breadcrumbs (`1b4e28ba...`).
    pub fn short_id(&self) -> String {
        let id = self.id.to_string();
        format!("{}...", &id[..8])
    }

    /// Percentage of tests that passed, rounded half-up.
    pub fn progress_percentage(&self) -> u32 {
        metrics::progress_percentage(self.passed_tests, self.total_tests)
    }

    /// Pass rate computed from total and failed counts.
    pub fn pass_rate(&self) -> u32 {
        metrics::pass_rate(self.total_tests, self.failed_tests)
    }

    pub fn is_running(&self) -> bool {
        self.status == RunStatus::Running
    }

    /// Check the count and lifecycle invariants of a run.
    pub fn check_invariants(&self) -> DashboardResult<()> {
        let counted = u64::from(self.passed_tests) + u64::from(self.failed_tests);
        if counted > u64::from(self.total_tests) {
            return Err(DashboardError::Validation(format!(
                "run {}: passed ({}) + failed ({}) exceeds total ({})",
                self.id, self.passed_tests, self.failed_tests, self.total_tests
            )));
        }

        if self.is_running() && (self.completed_at.is_some() || self.duration_ms.is_some()) {
            return Err(DashboardError::Validation(format!(
                "run {} is running but carries completion fields",
                self.id
            )));
        }

        Ok(())
    }
}

/// Test run with its test cases, returned by `GET /api/test-runs/{id}`
/// and `POST /api/test-runs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestRunDetail {
    #[serde(flatten)]
    pub run: TestRunSummary,
    #[serde(default)]
    pub test_cases: Vec<TestCase>,
}

impl std::ops::Deref for TestRunDetail {
    type Target = TestRunSummary;

    fn deref(&self) -> &Self::Target {
        &self.run
    }
}

/// Body of `POST /api/test-runs`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTestRunRequest {
    pub suite_id: Uuid,
}
