use std::sync::Arc;

use uuid::Uuid;

use crate::api::http::HttpClient;
use crate::error::DashboardResult;
use crate::models::{TestSuite, TestSuiteDetail};

pub struct TestSuitesApi {
    client: Arc<HttpClient>,
}

impl TestSuitesApi {
    pub fn new(client: Arc<HttpClient>) -> Self {
        Self { client }
    }

    /// All configured suites.
    pub async fn list(&self) -> DashboardResult<Vec<TestSuite>> {
        self.client.get("api/test-suites", "Test suites").await
    }

    /// One suite with its most recent runs.
    pub async fn get(&self, id: Uuid) -> DashboardResult<TestSuiteDetail> {
        self.client
            .get(&format!("api/test-suites/{}", id), "Test suite")
            .await
    }
}
