//! Test suite model: a named collection of tests targeting one endpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::timestamp;
use crate::models::{RunStatus, TestRunSummary};

/// Test suite as listed by `GET /api/test-suites`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestSuite {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Endpoint the suite exercises
    #[serde(default)]
    pub target_url: Option<String>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    /// Status of the most recent run (denormalized)
    #[serde(default)]
    pub last_run_status: Option<RunStatus>,
    /// Start time of the most recent run (denormalized)
    #[serde(default, with = "timestamp::option")]
    pub last_run_at: Option<DateTime<Utc>>,
    /// Test count of the most recent run (denormalized)
    #[serde(default)]
    pub total_tests: Option<u32>,
}

impl TestSuite {
    /// Whether the suite has been executed at least once.
    pub fn has_runs(&self) -> bool {
        self.last_run_status.is_some() || self.last_run_at.is_some()
    }
}

/// Suite detail with its most recent runs, returned by `GET /api/test-suites/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestSuiteDetail {
    #[serde(flatten)]
    pub suite: TestSuite,
    #[serde(default)]
    pub recent_runs: Vec<TestRunSummary>,
}

impl std::ops::Deref for TestSuiteDetail {
    type Target = TestSuite;

    fn deref(&self) -> &Self::Target {
        &self.suite
    }
}
