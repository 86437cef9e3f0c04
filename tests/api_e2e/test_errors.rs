//! E2E tests: transport and status error mapping.

use std::time::Duration;

use tdash_lib::api::{ApiClient, ApiConfig};
use tdash_lib::error::DashboardError;
use tdash_lib::query::{QueryChange, RunsQuery};
use tokio_test::assert_err;

use super::mock_api_server::{MockApiServer, MockApiState};
use super::test_helpers::*;

#[actix_rt::test]
async fn test_server_error_carries_body() {
    let (server, client) = start_seeded().await;
    server.fail_with(500, "internal explosion");

    let err = assert_err!(client.list_test_runs(&RunsQuery::default()).await);
    assert_eq!(
        err,
        DashboardError::Http {
            status: 500,
            body: "internal explosion".to_string()
        }
    );

    server.clear_failure();
    assert!(client.list_test_runs(&RunsQuery::default()).await.is_ok());
}

#[actix_rt::test]
async fn test_validation_error_body_is_unwrapped() {
    let (server, client) = start_seeded().await;
    server.fail_with(422, r#"{"detail":"limit must be less than or equal to 100"}"#);

    let err = assert_err!(client.get_dashboard_stats().await);
    assert!(matches!(err, DashboardError::Http { status: 422, .. }));
    assert_eq!(err.user_message(), "limit must be less than or equal to 100");
}

#[actix_rt::test]
async fn test_connection_refused_is_network_error() {
    let client = ApiClient::new(&ApiConfig::new(closed_port_url())).unwrap();

    let err = assert_err!(client.list_test_suites().await);
    assert!(err.is_network(), "expected network error, got {:?}", err);
    assert!(!err.is_rejection());
}

#[actix_rt::test]
async fn test_timeout_is_network_error() {
    let (server, _) = start_seeded().await;
    server.set_delay(Duration::from_millis(500));

    let client = client_with_timeout(&server.base_url, Duration::from_millis(50));
    let err = assert_err!(client.get_dashboard_stats().await);
    assert!(matches!(err, DashboardError::Network { .. }));
}

#[actix_rt::test]
async fn test_schema_mismatch_is_invalid_response() {
    let server = MockApiServer::start(MockApiState {
        stats: serde_json::json!({ "total_runs": "many" }),
        ..MockApiState::default()
    })
    .await;
    let client = ApiClient::new(&ApiConfig::new(server.base_url.clone())).unwrap();

    let err = assert_err!(client.get_dashboard_stats().await);
    assert!(matches!(err, DashboardError::InvalidResponse { .. }));
}

#[actix_rt::test]
async fn test_invalid_base_url_is_rejected_at_construction() {
    let result = ApiClient::new(&ApiConfig::new("ftp://results.example.com"));
    assert!(matches!(result, Err(DashboardError::Validation(_))));
}

#[actix_rt::test]
async fn test_invalid_query_fails_before_io() {
    let (server, client) = start_seeded().await;

    assert!(RunsQuery::new(0, 0).is_err());
    assert!(RunsQuery::default().with_change(QueryChange::new().limit(101)).is_err());
    let too_large = RunsQuery::new(500, 0);
    assert!(matches!(too_large, Err(DashboardError::Validation(_))));

    let err = assert_err!(client.get_dashboard_trends(90).await);
    assert!(matches!(err, DashboardError::Validation(_)));

    assert!(server.last_run_query().is_none());
    assert!(server.last_trend_query().is_none());
}
