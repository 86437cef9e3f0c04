//! E2E tests: dashboard stats, trends and the overview loader.

use tdash_lib::error::DashboardError;
use tdash_lib::models::{Distribution, PassRateTone};
use tdash_lib::services::DashboardSnapshot;
use tokio_test::{assert_err, assert_ok};

use super::test_helpers::*;

#[actix_rt::test]
async fn test_stats_decode() {
    let (_server, client) = start_seeded().await;

    let stats = assert_ok!(client.get_dashboard_stats().await);
    assert_eq!(stats.total_runs, 25);
    assert_eq!(stats.pass_rate, 87.5);
    assert_eq!(stats.pass_rate_tone(), PassRateTone::Success);
    assert_eq!(
        stats.distribution(),
        Distribution {
            passed: 175,
            failed: 25
        }
    );
}

#[actix_rt::test]
async fn test_trends_send_days_and_assemble() {
    let (server, client) = start_seeded().await;

    let trends = assert_ok!(client.get_dashboard_trends(14).await);
    assert_eq!(server.last_trend_query().as_deref(), Some("days=14"));

    let series = assert_ok!(trends.series());
    assert_eq!(series.len(), 3);
    assert_eq!(series[2].date, "2024-05-01");
    assert_eq!(series[2].passed, 51);
    assert_eq!(series[2].failed, 3);
}

#[actix_rt::test]
async fn test_trend_days_out_of_range_fail_before_io() {
    let (server, client) = start_seeded().await;

    let err = assert_err!(client.get_dashboard_trends(0).await);
    assert!(matches!(err, DashboardError::Validation(_)));
    let err = assert_err!(client.get_dashboard_trends(31).await);
    assert!(matches!(err, DashboardError::Validation(_)));

    assert!(server.last_trend_query().is_none());
}

#[actix_rt::test]
async fn test_mismatched_trend_arrays() {
    let (server, client) = start_seeded().await;
    server.state.lock().unwrap().trends = serde_json::json!({
        "dates": ["d1", "d2"],
        "passed": [3],
        "failed": [1, 0],
    });

    let trends = assert_ok!(client.get_dashboard_trends(7).await);
    assert!(matches!(trends.series(), Err(DashboardError::Validation(_))));
}

#[actix_rt::test]
async fn test_dashboard_snapshot_loads_everything() {
    let (server, client) = start_seeded().await;

    let snapshot = assert_ok!(DashboardSnapshot::load(&client, 7).await);
    assert_eq!(snapshot.stats.total_runs, 25);
    assert_eq!(snapshot.suites.len(), 2);
    assert_eq!(snapshot.recent_runs.data.len(), 10);
    assert_eq!(snapshot.recent_runs.total, 25);
    assert_eq!(assert_ok!(snapshot.trend_series()).len(), 3);

    assert_eq!(server.last_run_query().as_deref(), Some("limit=10&offset=0"));
    assert_eq!(server.last_trend_query().as_deref(), Some("days=7"));
}

#[actix_rt::test]
async fn test_dashboard_snapshot_fails_fast() {
    let (server, client) = start_seeded().await;
    server.fail_with(500, r#"{"detail":"Database unavailable"}"#);

    let err = assert_err!(DashboardSnapshot::load(&client, 7).await);
    assert!(matches!(err, DashboardError::Http { status: 500, .. }));
    assert_eq!(err.user_message(), "Database unavailable");
}
