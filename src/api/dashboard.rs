use std::sync::Arc;

use crate::api::http::HttpClient;
use crate::error::{DashboardError, DashboardResult};
use crate::models::{DashboardStats, DashboardTrends};

/// Widest trend window the API serves, in days.
pub const MAX_TREND_DAYS: u32 = 30;

pub struct DashboardApi {
    client: Arc<HttpClient>,
}

impl DashboardApi {
    pub fn new(client: Arc<HttpClient>) -> Self {
        Self { client }
    }

    /// Aggregate metrics across all runs.
    pub async fn stats(&self) -> DashboardResult<DashboardStats> {
        self.client.get("api/dashboard/stats", "Dashboard stats").await
    }

    /// Daily passed/failed counts for the trailing `days` days.
    ///
    /// # Arguments
    ///
    /// * `days` - Window length, between 1 and 30
    pub async fn trends(&self, days: u32) -> DashboardResult<DashboardTrends> {
        validate_trend_days(days)?;
        self.client
            .get_with_query(
                "api/dashboard/trends",
                "Dashboard trends",
                Some(&[("days", days)]),
            )
            .await
    }
}

pub(crate) fn validate_trend_days(days: u32) -> DashboardResult<()> {
    if (1..=MAX_TREND_DAYS).contains(&days) {
        Ok(())
    } else {
        Err(DashboardError::Validation(format!(
            "trend window must be between 1 and {} days, got {}",
            MAX_TREND_DAYS, days
        )))
    }
}
