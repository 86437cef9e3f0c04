use std::sync::Arc;

use uuid::Uuid;

use crate::api::http::HttpClient;
use crate::error::DashboardResult;
use crate::models::{CreateTestRunRequest, ResultPage, TestRunDetail, TestRunSummary};
use crate::query::RunsQuery;

pub struct TestRunsApi {
    client: Arc<HttpClient>,
}

impl TestRunsApi {
    pub fn new(client: Arc<HttpClient>) -> Self {
        Self { client }
    }

    /// One page of runs matching the query. Absent filters are not sent.
    pub async fn list(&self, query: &RunsQuery) -> DashboardResult<ResultPage<TestRunSummary>> {
        query.validate()?;
        let params = query.to_request_params();
        self.client
            .get_with_query("api/test-runs", "Test runs", Some(&params))
            .await
    }

    /// Run detail with its test cases.
    pub async fn get(&self, id: Uuid) -> DashboardResult<TestRunDetail> {
        self.client
            .get(&format!("api/test-runs/{}", id), "Test run")
            .await
    }

    /// Start a run of the given suite.
    ///
    /// The API executes the suite before answering, so the returned detail is
    /// normally terminal.
    pub async fn trigger(&self, suite_id: Uuid) -> DashboardResult<TestRunDetail> {
        self.client
            .post(
                "api/test-runs",
                "Test suite",
                &CreateTestRunRequest { suite_id },
            )
            .await
    }
}
