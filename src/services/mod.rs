//! View-state services built on the API client.

pub mod dashboard;
pub mod state_holder;

pub use dashboard::{DashboardSnapshot, RECENT_RUNS_LIMIT};
pub use state_holder::{
    LoadStatus, PageSource, RefetchOutcome, RetainPolicy, RunDetailSource, RunDetailState,
    RunListSource, RunListState, StateHolder, ViewState,
};
