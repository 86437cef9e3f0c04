//! Test results dashboard client library.
//!
//! This library provides the data-access and view-state layer of the dashboard,
//! including the typed API client, the run query model, derived metrics and
//! the state holders views subscribe to.

pub mod api;
pub mod config;
pub mod error;
pub mod metrics;
pub mod models;
pub mod query;
pub mod services;

pub use api::{ApiClient, ApiConfig};
pub use error::{DashboardError, DashboardResult};
pub use query::{QueryChange, RunsQuery};
