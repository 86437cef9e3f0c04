//! E2E tests: run listing, detail and triggering.

use chrono::NaiveDate;
use tdash_lib::error::DashboardError;
use tdash_lib::metrics;
use tdash_lib::models::{CaseFilter, RunStatus};
use tdash_lib::query::{QueryChange, RunsQuery};
use tokio_test::{assert_err, assert_ok};
use uuid::Uuid;

use super::test_helpers::*;

#[actix_rt::test]
async fn test_default_query_sends_only_pagination() {
    let (server, client) = start_seeded().await;

    let page = assert_ok!(client.list_test_runs(&RunsQuery::default()).await);
    assert_eq!(server.last_run_query().as_deref(), Some("limit=20&offset=0"));

    assert_eq!(page.total, 25);
    assert_eq!(page.data.len(), 20);
    assert!(page.is_consistent());
    assert!(page.has_next());
    assert_eq!(page.showing_range(), "Showing 1-20 of 25 results");
}

#[actix_rt::test]
async fn test_filters_are_serialized_in_wire_order() {
    let (server, client) = start_seeded().await;

    let query = RunsQuery::default()
        .with_change(
            QueryChange::new()
                .status(Some(RunStatus::Failed))
                .suite_id(Some(Uuid::parse_str(AUTH_SUITE_ID).unwrap()))
                .start_date(NaiveDate::from_ymd_opt(2024, 5, 1))
                .end_date(NaiveDate::from_ymd_opt(2024, 5, 31))
                .search(Some(" auth "))
                .limit(5),
        )
        .unwrap();

    let page = assert_ok!(client.list_test_runs(&query).await);
    assert_eq!(
        server.last_run_query().as_deref(),
        Some(
            "status=failed&suite_id=6ecd8c99-4036-403d-bf84-cf8400f67836\
             &start_date=2024-05-01&end_date=2024-05-31&q=auth&limit=5&offset=0"
        )
    );
    assert!(page.data.iter().all(|run| run.status == RunStatus::Failed));
}

#[actix_rt::test]
async fn test_pagination_walks_to_last_page() {
    let (_server, client) = start_seeded().await;

    let first = RunsQuery::default();
    let first_page = assert_ok!(client.list_test_runs(&first).await);

    let second = first.next_page(first_page.total).unwrap();
    let last_page = assert_ok!(client.list_test_runs(&second).await);

    assert_eq!(last_page.offset, 20);
    assert_eq!(last_page.data.len(), 5);
    assert!(!last_page.has_next());
    assert!(last_page.has_previous());
    assert_eq!(last_page.showing_range(), "Showing 21-25 of 25 results");
    assert!(second.next_page(last_page.total).is_none());
}

#[actix_rt::test]
async fn test_search_without_matches() {
    let (_server, client) = start_seeded().await;

    let query = RunsQuery::default()
        .with_change(QueryChange::new().search(Some("no-such-suite")))
        .unwrap();
    let page = assert_ok!(client.list_test_runs(&query).await);

    assert!(page.is_empty());
    assert_eq!(page.total, 0);
    assert_eq!(page.showing_range(), "Showing 0 results");
}

#[actix_rt::test]
async fn test_get_run_detail_with_cases() {
    let (_server, client) = start_seeded().await;

    let detail = assert_ok!(client.get_test_run(Uuid::parse_str(FAILED_RUN_ID).unwrap()).await);
    assert_eq!(detail.status, RunStatus::Failed);
    assert_eq!(detail.progress_percentage(), 70);
    assert_eq!(detail.pass_rate(), 70);
    assert_eq!(detail.short_id(), "1b4e28ba...");

    let counts = metrics::count_cases(&detail.test_cases);
    assert_eq!(counts.all, 3);
    assert_eq!(counts.failed, 1);

    let failed = metrics::filter_cases(&detail.test_cases, CaseFilter::Failed);
    assert_eq!(failed.len(), 1);
    assert!(failed[0].has_diagnostics());
}

#[actix_rt::test]
async fn test_running_run_has_no_completion_fields() {
    let (_server, client) = start_seeded().await;

    let detail = assert_ok!(client.get_test_run(Uuid::parse_str(RUNNING_RUN_ID).unwrap()).await);
    assert!(detail.is_running());
    assert!(detail.completed_at.is_none());
    assert!(detail.duration_ms.is_none());
    assert!(detail.test_cases.is_empty());
    assert_ok!(detail.check_invariants());
}

#[actix_rt::test]
async fn test_get_unknown_run_is_not_found() {
    let (_server, client) = start_seeded().await;

    let err = assert_err!(client.get_test_run(Uuid::parse_str(UNKNOWN_ID).unwrap()).await);
    assert!(matches!(err, DashboardError::NotFound { .. }));
    assert_eq!(err.user_message(), "Test run not found");
}

#[actix_rt::test]
async fn test_trigger_run() {
    let (server, client) = start_seeded().await;
    let before = server.run_count();

    let detail = assert_ok!(
        client
            .trigger_test_run(Uuid::parse_str(PAYMENTS_SUITE_ID).unwrap())
            .await
    );
    assert_eq!(detail.suite_name, "Payments");
    assert!(detail.status.is_terminal());
    assert_eq!(detail.test_cases.len(), 2);
    assert_eq!(server.run_count(), before + 1);

    // The new run is listed first
    let page = assert_ok!(client.list_test_runs(&RunsQuery::default()).await);
    assert_eq!(page.data[0].id, detail.id);
}

#[actix_rt::test]
async fn test_trigger_unknown_suite_is_rejection_not_network() {
    let (_server, client) = start_seeded().await;

    let err = assert_err!(
        client
            .trigger_test_run(Uuid::parse_str(UNKNOWN_ID).unwrap())
            .await
    );
    assert!(matches!(err, DashboardError::NotFound { .. }));
    assert!(err.is_rejection());
    assert!(!err.is_network());
    assert_eq!(err.user_message(), "Test suite not found");
}
