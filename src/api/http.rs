//! Shared HTTP transport for the resource APIs.

use std::time::Duration;

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Client, Method, Response, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::api::ApiConfig;
use crate::error::{DashboardError, DashboardResult};

/// User agent for dashboard requests.
const USER_AGENT_VALUE: &str = concat!("tdash/", env!("CARGO_PKG_VERSION"));

/// Thin wrapper over `reqwest::Client` bound to one API base URL.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: Url,
}

impl HttpClient {
    /// Build a client from configuration.
    ///
    /// Fails with a validation error when the base URL is not an absolute
    /// http(s) URL.
    pub fn new(config: &ApiConfig) -> DashboardResult<Self> {
        let base_url = parse_base_url(&config.base_url)?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut builder = Client::builder().default_headers(default_headers);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(connect_timeout) = config.connect_timeout {
            builder = builder.connect_timeout(connect_timeout);
        }

        let client = builder.build().map_err(|e| DashboardError::Network {
            message: format!("failed to create HTTP client: {}", e),
        })?;

        Ok(Self { client, base_url })
    }

    /// Base URL every endpoint is resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn build_url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }

    /// GET a JSON resource. `resource` names it in not-found errors.
    pub async fn get<T>(&self, endpoint: &str, resource: &str) -> DashboardResult<T>
    where
        T: DeserializeOwned,
    {
        self.get_with_query::<T, ()>(endpoint, resource, None).await
    }

    /// GET a JSON resource with query parameters.
    pub async fn get_with_query<T, Q>(
        &self,
        endpoint: &str,
        resource: &str,
        query: Option<&Q>,
    ) -> DashboardResult<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let url = self.build_url(endpoint);
        let mut request = self.client.request(Method::GET, &url);
        if let Some(query) = query {
            request = request.query(query);
        }

        let response = self.send(Method::GET, &url, resource, request).await?;
        decode(&url, response).await
    }

    /// POST a JSON body and decode the JSON response.
    pub async fn post<T, B>(&self, endpoint: &str, resource: &str, body: &B) -> DashboardResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.build_url(endpoint);
        let request = self.client.request(Method::POST, &url).json(body);

        let response = self.send(Method::POST, &url, resource, request).await?;
        decode(&url, response).await
    }

    /// Send a request and map non-2xx statuses to typed errors.
    async fn send(
        &self,
        method: Method,
        url: &str,
        resource: &str,
        request: reqwest::RequestBuilder,
    ) -> DashboardResult<Response> {
        debug!(method = %method, url = %url, "sending request");

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                let err = DashboardError::from(e);
                warn!(method = %method, url = %url, error = %err, "request failed");
                return Err(err);
            }
        };

        let status = response.status();
        if status.is_success() {
            debug!(method = %method, url = %url, status = status.as_u16(), "request succeeded");
            return Ok(response);
        }

        // Body text is best effort; an unreadable body still yields the status error
        let body = response.text().await.unwrap_or_default();
        let err = DashboardError::from_status(status.as_u16(), resource, body);
        warn!(
            method = %method,
            url = %url,
            status = status.as_u16(),
            error = %err,
            "request rejected"
        );
        Err(err)
    }
}

/// Decode a 2xx body, reporting schema mismatches as invalid responses.
async fn decode<T: DeserializeOwned>(url: &str, response: Response) -> DashboardResult<T> {
    let text = response.text().await.map_err(|e| DashboardError::Network {
        message: format!("failed to read response body: {}", e),
    })?;

    serde_json::from_str(&text).map_err(|e| {
        warn!(url = %url, error = %e, "response did not match expected schema");
        DashboardError::InvalidResponse {
            message: format!("failed to parse response from {}: {}", url, e),
        }
    })
}

/// Validate and normalize the configured base URL.
fn parse_base_url(raw: &str) -> DashboardResult<Url> {
    let url = Url::parse(raw.trim()).map_err(|e| {
        DashboardError::Validation(format!("invalid API base URL '{}': {}", raw, e))
    })?;

    match url.scheme() {
        "http" | "https" if url.has_host() => Ok(url),
        "http" | "https" => Err(DashboardError::Validation(format!(
            "API base URL '{}' has no host",
            raw
        ))),
        scheme => Err(DashboardError::Validation(format!(
            "API base URL must use http or https, got '{}'",
            scheme
        ))),
    }
}

/// Timeout from whole seconds, treating zero as "no timeout".
pub(crate) fn timeout_from_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}
