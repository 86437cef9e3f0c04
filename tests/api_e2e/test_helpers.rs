//! Shared fixtures for the API E2E tests.

use serde_json::{Value, json};
use std::time::Duration;

use tdash_lib::api::{ApiClient, ApiConfig};

use super::mock_api_server::{MockApiServer, MockApiState};

pub const AUTH_SUITE_ID: &str = "6ecd8c99-4036-403d-bf84-cf8400f67836";
pub const PAYMENTS_SUITE_ID: &str = "0f8fad5b-d9cb-469f-a165-70867728950e";
pub const FAILED_RUN_ID: &str = "1b4e28ba-2fa1-11d2-883f-0016d3cca427";
pub const RUNNING_RUN_ID: &str = "7c9e6679-7425-40de-944b-e07fc1f90ae7";
pub const UNKNOWN_ID: &str = "00000000-0000-4000-8000-000000000000";

/// Finished run in the API's wire format (naive UTC timestamps).
pub fn run_json(id: &str, suite_id: &str, suite_name: &str, total: u32, failed: u32) -> Value {
    json!({
        "id": id,
        "suite_id": suite_id,
        "suite_name": suite_name,
        "status": if failed > 0 { "failed" } else { "passed" },
        "started_at": "2024-05-01T12:00:00.250000",
        "completed_at": "2024-05-01T12:00:04.250000",
        "duration_ms": 4000,
        "total_tests": total,
        "passed_tests": total - failed,
        "failed_tests": failed,
    })
}

pub fn case_json(name: &str, status: &str) -> Value {
    let failed = status == "failed";
    json!({
        "id": uuid::Uuid::new_v4().to_string(),
        "name": name,
        "description": null,
        "status": status,
        "execution_time_ms": 310,
        "ai_insight": if failed { json!("The submit button selector changed") } else { Value::Null },
        "error_message": if failed { json!("TimeoutError: locator('#submit')") } else { Value::Null },
        "stack_trace": null,
        "created_at": "2024-05-01T12:00:02",
    })
}

fn suite_json(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "description": format!("{} regression suite", name),
        "target_url": "https://staging.example.com",
        "created_at": "2024-04-01T08:00:00",
        "last_run_status": "failed",
        "last_run_at": "2024-05-01T12:00:00",
        "total_tests": 10,
    })
}

/// Fixture set: 25 runs across two suites plus one running run.
pub fn seeded_state() -> MockApiState {
    let mut runs = Vec::new();

    let mut running = run_json(RUNNING_RUN_ID, AUTH_SUITE_ID, "Auth", 4, 0);
    running["status"] = json!("running");
    running["completed_at"] = Value::Null;
    running["duration_ms"] = Value::Null;
    running["passed_tests"] = json!(0);
    runs.push(running);

    runs.push(run_json(FAILED_RUN_ID, AUTH_SUITE_ID, "Auth", 10, 3));
    for i in 0..23u32 {
        let id = format!("a0000000-0000-4000-8000-{:012}", i);
        let (suite_id, name) = if i % 2 == 0 {
            (PAYMENTS_SUITE_ID, "Payments")
        } else {
            (AUTH_SUITE_ID, "Auth")
        };
        runs.push(run_json(&id, suite_id, name, 8, u32::from(i % 5 == 0)));
    }

    let mut cases = std::collections::HashMap::new();
    cases.insert(
        FAILED_RUN_ID.to_string(),
        vec![
            case_json("login with valid password", "passed"),
            case_json("login with expired token", "failed"),
            case_json("logout clears session", "passed"),
        ],
    );

    MockApiState {
        stats: json!({
            "total_runs": 25,
            "pass_rate": 87.5,
            "failed_tests": 25,
            "avg_duration_ms": 4000.0,
            "total_tests": 200,
        }),
        trends: json!({
            "dates": ["2024-04-29", "2024-04-30", "2024-05-01"],
            "passed": [40, 38, 51],
            "failed": [2, 5, 3],
        }),
        runs,
        cases,
        suites: vec![
            suite_json(AUTH_SUITE_ID, "Auth"),
            suite_json(PAYMENTS_SUITE_ID, "Payments"),
        ],
        ..MockApiState::default()
    }
}

/// Start a seeded mock API and a client pointed at it.
pub async fn start_seeded() -> (MockApiServer, ApiClient) {
    let server = MockApiServer::start(seeded_state()).await;
    let client = ApiClient::new(&ApiConfig::new(server.base_url.clone())).unwrap();
    (server, client)
}

/// Client with a request timeout.
pub fn client_with_timeout(base_url: &str, timeout: Duration) -> ApiClient {
    let config = ApiConfig::new(base_url)
        .with_timeout(timeout)
        .with_connect_timeout(timeout);
    ApiClient::new(&config).unwrap()
}

/// Base URL on a port nothing listens on.
pub fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}
