//! Filter and pagination value for the run list.
//!
//! [`RunsQuery`] is immutable: every change goes through [`RunsQuery::with_change`],
//! which validates and returns a new value. Equality and hashing are structural,
//! so the state holder can tell whether a response still matches what the view
//! asked for.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::error::{DashboardError, DashboardResult};
use crate::models::RunStatus;

/// Rows per page when nothing else is configured.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Upper bound the API accepts for `limit`.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Wire format for calendar dates.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Filters and pagination cursor for `GET /api/test-runs`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RunsQuery {
    status: Option<RunStatus>,
    suite_id: Option<Uuid>,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    search: Option<String>,
    limit: u32,
    offset: u64,
}

impl Default for RunsQuery {
    fn default() -> Self {
        Self {
            status: None,
            suite_id: None,
            start_date: None,
            end_date: None,
            search: None,
            limit: DEFAULT_PAGE_SIZE,
            offset: 0,
        }
    }
}

impl RunsQuery {
    /// Unfiltered query for one page.
    pub fn new(limit: u32, offset: u64) -> DashboardResult<Self> {
        let query = Self {
            limit,
            offset,
            ..Self::default()
        };
        query.validate()?;
        Ok(query)
    }

    pub fn status(&self) -> Option<RunStatus> {
        self.status
    }

    pub fn suite_id(&self) -> Option<Uuid> {
        self.suite_id
    }

    pub fn start_date(&self) -> Option<NaiveDate> {
        self.start_date
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        self.end_date
    }

    /// Free-text token matched against run id and suite name.
    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Whether any filter (not pagination) is set.
    pub fn has_filters(&self) -> bool {
        self.status.is_some()
            || self.suite_id.is_some()
            || self.start_date.is_some()
            || self.end_date.is_some()
            || self.search.is_some()
    }

    /// Check the query invariants.
    pub fn validate(&self) -> DashboardResult<()> {
        if self.limit == 0 || self.limit > MAX_PAGE_SIZE {
            return Err(DashboardError::Validation(format!(
                "limit must be between 1 and {}, got {}",
                MAX_PAGE_SIZE, self.limit
            )));
        }

        if let (Some(start), Some(end)) = (self.start_date, self.end_date)
            && start > end
        {
            return Err(DashboardError::Validation(format!(
                "start_date {} is after end_date {}",
                start.format(DATE_FORMAT),
                end.format(DATE_FORMAT)
            )));
        }

        if self.search.as_deref().is_some_and(|s| s.trim().is_empty()) {
            return Err(DashboardError::Validation(
                "search token must not be blank".to_string(),
            ));
        }

        Ok(())
    }

    /// Request parameters in wire order, omitting absent filters.
    pub fn to_request_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::with_capacity(7);

        if let Some(status) = self.status {
            params.push(("status", status.as_str().to_string()));
        }
        if let Some(suite_id) = self.suite_id {
            params.push(("suite_id", suite_id.to_string()));
        }
        if let Some(start) = self.start_date {
            params.push(("start_date", start.format(DATE_FORMAT).to_string()));
        }
        if let Some(end) = self.end_date {
            params.push(("end_date", end.format(DATE_FORMAT).to_string()));
        }
        if let Some(ref search) = self.search {
            params.push(("q", search.clone()));
        }
        params.push(("limit", self.limit.to_string()));
        params.push(("offset", self.offset.to_string()));

        params
    }

    /// Apply a change and return the resulting query.
    ///
    /// Changing any filter moves back to the first page unless the change also
    /// sets an offset.
    pub fn with_change(&self, change: QueryChange) -> DashboardResult<Self> {
        let mut next = self.clone();

        if let Some(status) = change.status {
            next.status = status;
        }
        if let Some(suite_id) = change.suite_id {
            next.suite_id = suite_id;
        }
        if let Some(start) = change.start_date {
            next.start_date = start;
        }
        if let Some(end) = change.end_date {
            next.end_date = end;
        }
        if let Some(search) = change.search {
            next.search = normalize_search(search);
        }
        if let Some(limit) = change.limit {
            next.limit = limit;
        }

        next.offset = match change.offset {
            Some(offset) => offset,
            None if next.filters_differ(self) => 0,
            None => self.offset,
        };

        next.validate()?;
        Ok(next)
    }

    /// Query for the following page, or `None` on the last page.
    pub fn next_page(&self, total: u64) -> Option<Self> {
        let offset = self.offset.checked_add(u64::from(self.limit))?;
        (offset < total).then(|| Self {
            offset,
            ..self.clone()
        })
    }

    /// Query for the preceding page, or `None` on the first page.
    pub fn previous_page(&self) -> Option<Self> {
        (self.offset > 0).then(|| Self {
            offset: self.offset.saturating_sub(u64::from(self.limit)),
            ..self.clone()
        })
    }

    /// Drop every filter, keep the page size and go back to the first page.
    pub fn cleared(&self) -> Self {
        Self {
            limit: self.limit,
            ..Self::default()
        }
    }

    fn filters_differ(&self, other: &Self) -> bool {
        self.status != other.status
            || self.suite_id != other.suite_id
            || self.start_date != other.start_date
            || self.end_date != other.end_date
            || self.search != other.search
    }
}

fn normalize_search(search: Option<String>) -> Option<String> {
    search
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// A set of edits to a [`RunsQuery`].
///
/// Optional filters use `Option<Option<T>>`: the outer `None` leaves the field
/// alone, `Some(None)` clears it and `Some(Some(v))` sets it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryChange {
    status: Option<Option<RunStatus>>,
    suite_id: Option<Option<Uuid>>,
    start_date: Option<Option<NaiveDate>>,
    end_date: Option<Option<NaiveDate>>,
    search: Option<Option<String>>,
    limit: Option<u32>,
    offset: Option<u64>,
}

impl QueryChange {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(mut self, status: Option<RunStatus>) -> Self {
        self.status = Some(status);
        self
    }

    pub fn suite_id(mut self, suite_id: Option<Uuid>) -> Self {
        self.suite_id = Some(suite_id);
        self
    }

    pub fn start_date(mut self, date: Option<NaiveDate>) -> Self {
        self.start_date = Some(date);
        self
    }

    pub fn end_date(mut self, date: Option<NaiveDate>) -> Self {
        self.end_date = Some(date);
        self
    }

    /// Set the search token; blank text clears it.
    pub fn search(mut self, text: Option<&str>) -> Self {
        self.search = Some(text.map(str::to_string));
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
