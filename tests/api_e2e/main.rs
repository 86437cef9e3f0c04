//! API client E2E test suite.
//!
//! Drives the typed client and state holders against an in-process mock of the
//! results API. No external services are needed.
//!
//! Run with: cargo test --test api_e2e

mod test_helpers;

mod test_dashboard;
mod test_errors;
mod test_runs;
