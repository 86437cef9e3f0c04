//! Dashboard aggregates served by `/api/dashboard/*`.

use serde::{Deserialize, Serialize};

use crate::error::DashboardResult;
use crate::metrics;

/// Default trailing window for trend charts, in days.
pub const DEFAULT_TREND_DAYS: u32 = 7;

/// Top level dashboard metrics.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_runs: u64,
    /// Percentage of passing tests (0-100)
    pub pass_rate: f64,
    pub failed_tests: u64,
    pub avg_duration_ms: f64,
    pub total_tests: u64,
}

impl DashboardStats {
    /// Passed vs failed split for the distribution chart.
    pub fn distribution(&self) -> Distribution {
        metrics::distribution(self)
    }

    pub fn pass_rate_tone(&self) -> PassRateTone {
        metrics::pass_rate_tone(self.pass_rate)
    }
}

/// Trend dataset as parallel arrays.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DashboardTrends {
    pub dates: Vec<String>,
    pub passed: Vec<u64>,
    pub failed: Vec<u64>,
}

impl DashboardTrends {
    /// Zip the parallel arrays into chart points.
    pub fn series(&self) -> DashboardResult<Vec<TrendPoint>> {
        metrics::assemble_trend_series(&self.dates, &self.passed, &self.failed)
    }
}

/// One day of the trend series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: String,
    pub passed: u64,
    pub failed: u64,
}

/// Passed vs failed test counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Distribution {
    pub passed: u64,
    pub failed: u64,
}

/// Health classification of a pass rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PassRateTone {
    Success,
    Warning,
    Danger,
}
