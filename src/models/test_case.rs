//! Test case model: one test within a run, with its diagnostic payload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::timestamp;

/// Test case execution status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseStatus {
    Passed,
    Failed,
}

impl CaseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Failed => "failed",
        }
    }
}

impl std::fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Individual test case result.
///
/// `ai_insight`, `error_message` and `stack_trace` are normally only present on
/// failed cases, but may be missing even then.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCase {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub status: CaseStatus,
    /// Execution time in milliseconds
    pub execution_time_ms: u64,
    /// AI-generated explanation of the failure
    #[serde(default)]
    pub ai_insight: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub stack_trace: Option<String>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

impl TestCase {
    pub fn is_failed(&self) -> bool {
        self.status == CaseStatus::Failed
    }

    /// True when any diagnostic field carries text.
    pub fn has_diagnostics(&self) -> bool {
        [&self.ai_insight, &self.error_message, &self.stack_trace]
            .iter()
            .any(|field| field.as_deref().is_some_and(|text| !text.trim().is_empty()))
    }
}

/// Status filter for the test case list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaseFilter {
    #[default]
    All,
    Passed,
    Failed,
}

impl CaseFilter {
    pub fn matches(&self, case: &TestCase) -> bool {
        match self {
            Self::All => true,
            Self::Passed => case.status == CaseStatus::Passed,
            Self::Failed => case.status == CaseStatus::Failed,
        }
    }
}

/// Per-filter counts shown next to the filter buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CaseCounts {
    pub all: usize,
    pub passed: usize,
    pub failed: usize,
}

impl CaseCounts {
    pub fn for_filter(&self, filter: CaseFilter) -> usize {
        match filter {
            CaseFilter::All => self.all,
            CaseFilter::Passed => self.passed,
            CaseFilter::Failed => self.failed,
        }
    }
}
