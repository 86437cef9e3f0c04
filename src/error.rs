//! Error types for the dashboard data layer.
//!
//! Uses thiserror for ergonomic error handling with automatic Display implementations.

use serde::Deserialize;

/// Errors surfaced by the API client, query model and metrics.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DashboardError {
    /// Transport failure (connection refused, DNS, TLS, timeout).
    #[error("Network error: {message}")]
    Network { message: String },

    /// Non-2xx response other than 404.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// Id-based lookup miss (404).
    #[error("{resource} not found: {message}")]
    NotFound { resource: String, message: String },

    /// Malformed or mismatched client-side data.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A 2xx body that does not decode into the expected type.
    #[error("Invalid response: {message}")]
    InvalidResponse { message: String },
}

/// FastAPI-style error body (`{"detail": "..."}`).
#[derive(Deserialize)]
struct ErrorDetail {
    detail: serde_json::Value,
}

impl DashboardError {
    /// Build an error from a non-2xx status and its body text.
    pub fn from_status(status: u16, resource: &str, body: String) -> Self {
        if status == 404 {
            Self::NotFound {
                resource: resource.to_string(),
                message: body,
            }
        } else {
            Self::Http { status, body }
        }
    }

    /// Human-readable message suitable for an error banner.
    ///
    /// Unwraps `{"detail": "..."}` bodies; falls back to the raw body text.
    pub fn user_message(&self) -> String {
        match self {
            Self::Http { status, body } => {
                let detail = extract_detail(body);
                if detail.is_empty() {
                    format!("Request failed with status {}", status)
                } else {
                    detail
                }
            }
            Self::NotFound { resource, message } => {
                let detail = extract_detail(message);
                if detail.is_empty() {
                    format!("{} not found", resource)
                } else {
                    detail
                }
            }
            Self::Network { message } => format!("Network error: {}", message),
            Self::Validation(message) => message.clone(),
            Self::InvalidResponse { message } => format!("Invalid response: {}", message),
        }
    }

    /// Whether the failure happened below the HTTP layer.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. })
    }

    /// Whether the remote service rejected the request on application grounds.
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Http { .. } | Self::NotFound { .. })
    }
}

/// Pull the `detail` text out of an error body, or return the trimmed body.
fn extract_detail(body: &str) -> String {
    match serde_json::from_str::<ErrorDetail>(body) {
        Ok(ErrorDetail {
            detail: serde_json::Value::String(text),
        }) => text,
        Ok(ErrorDetail { detail }) => detail.to_string(),
        Err(_) => body.trim().to_string(),
    }
}

/// Convenience type alias for Results with DashboardError.
pub type DashboardResult<T> = Result<T, DashboardError>;

// Conversion implementations for common error types

impl From<reqwest::Error> for DashboardError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            DashboardError::Network {
                message: format!("request timed out: {}", err),
            }
        } else if err.is_decode() {
            DashboardError::InvalidResponse {
                message: err.to_string(),
            }
        } else {
            DashboardError::Network {
                message: err.to_string(),
            }
        }
    }
}

impl From<serde_json::Error> for DashboardError {
    fn from(err: serde_json::Error) -> Self {
        DashboardError::InvalidResponse {
            message: format!("JSON parsing error: {}", err),
        }
    }
}
