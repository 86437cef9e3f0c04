//! Derived metrics over already-fetched data.
//!
//! Everything here is pure: no I/O, no clocks, no panics for any input. Rounding
//! is half-up to match the percentages the dashboard has always displayed.

use crate::error::{DashboardError, DashboardResult};
use crate::models::{
    CaseCounts, CaseFilter, CaseStatus, DashboardStats, Distribution, PassRateTone, TestCase,
    TestRunSummary, TrendPoint,
};

/// Pass rate above which the dashboard reports a healthy suite.
const SUCCESS_THRESHOLD: f64 = 80.0;
/// Pass rate above which the dashboard reports a warning instead of danger.
const WARNING_THRESHOLD: f64 = 60.0;

/// `round(100 * numerator / denominator)` with half-up rounding, 0 for an empty
/// denominator, clamped to 100.
fn rounded_percentage(numerator: u64, denominator: u64) -> u32 {
    if denominator == 0 {
        return 0;
    }
    let numerator = numerator.min(denominator);
    ((200 * numerator + denominator) / (2 * denominator)) as u32
}

/// Percentage of tests that did not fail.
///
/// `pass_rate(0, 0) == 0`; a failed count above the total yields 0.
pub fn pass_rate(total_tests: u32, failed_tests: u32) -> u32 {
    rounded_percentage(
        u64::from(total_tests.saturating_sub(failed_tests)),
        u64::from(total_tests),
    )
}

/// Percentage of tests that passed, 0 when there are no tests.
pub fn progress_percentage(passed: u32, total: u32) -> u32 {
    rounded_percentage(u64::from(passed), u64::from(total))
}

/// Zip parallel trend arrays into ordered points.
pub fn assemble_trend_series(
    dates: &[String],
    passed: &[u64],
    failed: &[u64],
) -> DashboardResult<Vec<TrendPoint>> {
    if dates.len() != passed.len() || dates.len() != failed.len() {
        return Err(DashboardError::Validation(format!(
            "trend arrays differ in length: dates={}, passed={}, failed={}",
            dates.len(),
            passed.len(),
            failed.len()
        )));
    }

    Ok(dates
        .iter()
        .zip(passed)
        .zip(failed)
        .map(|((date, &passed), &failed)| TrendPoint {
            date: date.clone(),
            passed,
            failed,
        })
        .collect())
}

/// Aggregate statistics computed client-side from a page of runs.
///
/// The pass rate is over tests (not runs), rounded to two decimals like the
/// server-side figure; the average duration only counts runs that report one.
pub fn summarize_runs(runs: &[TestRunSummary]) -> DashboardStats {
    let total_tests: u64 = runs.iter().map(|r| u64::from(r.total_tests)).sum();
    let failed_tests: u64 = runs.iter().map(|r| u64::from(r.failed_tests)).sum();
    let passed_tests: u64 = runs.iter().map(|r| u64::from(r.passed_tests)).sum();

    let durations: Vec<u64> = runs.iter().filter_map(|r| r.duration_ms).collect();
    let avg_duration_ms = if durations.is_empty() {
        0.0
    } else {
        let sum: u64 = durations.iter().sum();
        round2(sum as f64 / durations.len() as f64)
    };

    let pass_rate = if total_tests == 0 {
        0.0
    } else {
        round2(passed_tests.min(total_tests) as f64 * 100.0 / total_tests as f64)
    };

    DashboardStats {
        total_runs: runs.len() as u64,
        pass_rate,
        failed_tests,
        avg_duration_ms,
        total_tests,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Passed vs failed split; passed saturates at zero.
pub fn distribution(stats: &DashboardStats) -> Distribution {
    Distribution {
        passed: stats.total_tests.saturating_sub(stats.failed_tests),
        failed: stats.failed_tests,
    }
}

/// Classify a pass rate for display.
pub fn pass_rate_tone(pass_rate: f64) -> PassRateTone {
    if pass_rate > SUCCESS_THRESHOLD {
        PassRateTone::Success
    } else if pass_rate > WARNING_THRESHOLD {
        PassRateTone::Warning
    } else {
        PassRateTone::Danger
    }
}

/// Count cases per filter.
pub fn count_cases(cases: &[TestCase]) -> CaseCounts {
    let passed = cases
        .iter()
        .filter(|c| c.status == CaseStatus::Passed)
        .count();
    CaseCounts {
        all: cases.len(),
        passed,
        failed: cases.len() - passed,
    }
}

/// Cases matching a filter, in their original order.
pub fn filter_cases(cases: &[TestCase], filter: CaseFilter) -> Vec<&TestCase> {
    cases.iter().filter(|c| filter.matches(c)).collect()
}
