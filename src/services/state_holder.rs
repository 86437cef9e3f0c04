//! View state for one paginated or detail view.
//!
//! A [`StateHolder`] owns the latest fetched page plus loading/error flags and
//! publishes every change through a `tokio::sync::watch` channel. Refetches are
//! not queued or cancelled: each one bumps a generation counter, and a response
//! is applied only if it belongs to the newest request and its query still
//! matches the holder's query. Older responses are dropped.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;
use tracing::debug;
use uuid::Uuid;

use crate::api::ApiClient;
use crate::error::{DashboardError, DashboardResult};
use crate::models::{ResultPage, TestRunDetail, TestRunSummary};
use crate::query::RunsQuery;

/// Fetch seam between a view and the API.
#[async_trait::async_trait]
pub trait PageSource: Send + Sync {
    type Query: Clone + PartialEq + fmt::Debug + Send + Sync;
    type Page: Clone + fmt::Debug + Send + Sync;

    async fn fetch(&self, query: &Self::Query) -> DashboardResult<Self::Page>;
}

/// Run list keyed by [`RunsQuery`].
#[derive(Debug, Clone)]
pub struct RunListSource {
    client: ApiClient,
}

impl RunListSource {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl PageSource for RunListSource {
    type Query = RunsQuery;
    type Page = ResultPage<TestRunSummary>;

    async fn fetch(&self, query: &RunsQuery) -> DashboardResult<Self::Page> {
        self.client.list_test_runs(query).await
    }
}

/// Run detail keyed by run id.
#[derive(Debug, Clone)]
pub struct RunDetailSource {
    client: ApiClient,
}

impl RunDetailSource {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl PageSource for RunDetailSource {
    type Query = Uuid;
    type Page = TestRunDetail;

    async fn fetch(&self, id: &Uuid) -> DashboardResult<TestRunDetail> {
        self.client.get_test_run(*id).await
    }
}

/// Lifecycle of the held page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Error,
    Ready,
}

/// What to do with the current page while a different query loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetainPolicy {
    /// Keep showing the previous page (list views).
    KeepStale,
    /// Drop the page once the query changes (detail views).
    Discard,
}

/// Snapshot of a view.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState<Q, P> {
    pub status: LoadStatus,
    pub query: Q,
    pub page: Option<P>,
    /// Human-readable failure of the last honored request
    pub error: Option<String>,
}

impl<Q, P> ViewState<Q, P> {
    pub fn is_loading(&self) -> bool {
        self.status == LoadStatus::Loading
    }

    /// Error shown above a still-visible page.
    pub fn banner(&self) -> Option<&str> {
        match (&self.error, &self.page) {
            (Some(error), Some(_)) => Some(error.as_str()),
            _ => None,
        }
    }

    /// Error with nothing left to display.
    pub fn is_full_page_error(&self) -> bool {
        self.status == LoadStatus::Error && self.page.is_none()
    }
}

/// Result of one [`StateHolder::refetch`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum RefetchOutcome {
    /// The page was stored and the state is `Ready`.
    Applied,
    /// The error was stored and the state is `Error`.
    Failed(DashboardError),
    /// A newer request was issued meanwhile; the response was dropped.
    Superseded,
}

/// Holder of one view's latest page.
pub struct StateHolder<S: PageSource> {
    source: S,
    policy: RetainPolicy,
    /// Only read and written while the watch channel's lock is held
    generation: AtomicU64,
    state: watch::Sender<ViewState<S::Query, S::Page>>,
}

impl<S: PageSource> StateHolder<S> {
    /// Idle holder; nothing is fetched until [`refetch`](Self::refetch).
    pub fn new(source: S, query: S::Query, policy: RetainPolicy) -> Self {
        Self::from_state(
            source,
            policy,
            ViewState {
                status: LoadStatus::Idle,
                query,
                page: None,
                error: None,
            },
        )
    }

    /// Holder seeded with an already-fetched page, starting `Ready`.
    pub fn with_initial_page(
        source: S,
        query: S::Query,
        page: S::Page,
        policy: RetainPolicy,
    ) -> Self {
        Self::from_state(
            source,
            policy,
            ViewState {
                status: LoadStatus::Ready,
                query,
                page: Some(page),
                error: None,
            },
        )
    }

    fn from_state(source: S, policy: RetainPolicy, state: ViewState<S::Query, S::Page>) -> Self {
        let (state, _) = watch::channel(state);
        Self {
            source,
            policy,
            generation: AtomicU64::new(0),
            state,
        }
    }

    /// Receiver that always observes the latest state.
    pub fn subscribe(&self) -> watch::Receiver<ViewState<S::Query, S::Page>> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> ViewState<S::Query, S::Page> {
        self.state.borrow().clone()
    }

    pub fn query(&self) -> S::Query {
        self.state.borrow().query.clone()
    }

    pub fn policy(&self) -> RetainPolicy {
        self.policy
    }

    /// Fetch `query` and store the result unless a newer refetch superseded it.
    pub async fn refetch(&self, query: S::Query) -> RefetchOutcome {
        let mut generation = 0;
        self.state.send_modify(|state| {
            generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            if self.policy == RetainPolicy::Discard && state.query != query {
                state.page = None;
            }
            state.query = query.clone();
            state.status = LoadStatus::Loading;
            state.error = None;
        });
        debug!(generation, query = ?query, "refetch started");

        let result = self.source.fetch(&query).await;

        let mut outcome = RefetchOutcome::Superseded;
        self.state.send_if_modified(|state| {
            let latest = self.generation.load(Ordering::SeqCst);
            if latest != generation || state.query != query {
                debug!(
                    generation,
                    latest,
                    query = ?query,
                    "discarding stale response"
                );
                return false;
            }

            match result {
                Ok(page) => {
                    state.page = Some(page);
                    state.status = LoadStatus::Ready;
                    outcome = RefetchOutcome::Applied;
                }
                Err(err) => {
                    state.error = Some(err.user_message());
                    state.status = LoadStatus::Error;
                    outcome = RefetchOutcome::Failed(err);
                }
            }
            true
        });

        outcome
    }

    /// Fetch the current query again.
    pub async fn reload(&self) -> RefetchOutcome {
        self.refetch(self.query()).await
    }
}

/// Run list view: stale page stays visible while loading and on error.
pub type RunListState = StateHolder<RunListSource>;

/// Run detail view: a different run id starts from a blank page.
pub type RunDetailState = StateHolder<RunDetailSource>;

impl RunListState {
    pub fn for_runs(client: ApiClient, query: RunsQuery) -> Self {
        Self::new(RunListSource::new(client), query, RetainPolicy::KeepStale)
    }
}

impl RunDetailState {
    pub fn for_run(client: ApiClient, id: Uuid) -> Self {
        Self::new(RunDetailSource::new(client), id, RetainPolicy::Discard)
    }
}
