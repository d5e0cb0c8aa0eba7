//! Request dispatch: executes a built `HttpRequest` and returns the raw
//! response.
//!
//! # Design
//! `Dispatcher` is the only seam that touches the network. It passes status
//! codes through untouched and maps failures that happen before any response
//! arrives (connect, timeout, aborted transfer) to `NetworkError::Transport`.
//! Status policy lives in `ApiManager`, so callers that want bytes regardless
//! of status can use a dispatcher directly.
//!
//! `ReqwestDispatcher` owns one `reqwest::Client` for its whole lifetime. The
//! client is internally reference-counted and safe to share, so concurrent
//! `perform` calls neither lock nor wait on each other.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Method};
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::NetworkError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Executes fully-formed requests.
///
/// Implemented by `ReqwestDispatcher` for real traffic and by test stubs.
pub trait Dispatcher: Send + Sync {
    /// Perform one round trip. Any status code counts as a response.
    fn perform(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, NetworkError>> + Send;
}

impl<D: Dispatcher> Dispatcher for Arc<D> {
    fn perform(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, NetworkError>> + Send {
        (**self).perform(request)
    }
}

/// Default User-Agent sent with every request.
const DEFAULT_USER_AGENT: &str = concat!("boxoffice/", env!("CARGO_PKG_VERSION"));

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Dispatcher backed by a long-lived `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestDispatcher {
    client: Client,
}

impl ReqwestDispatcher {
    /// Build a dispatcher with the default timeout and user agent.
    pub fn new() -> Result<Self, NetworkError> {
        Self::build(DEFAULT_TIMEOUT, DEFAULT_USER_AGENT)
    }

    /// Build a dispatcher using the timeout and user agent from `config`.
    pub fn from_config(config: &ClientConfig) -> Result<Self, NetworkError> {
        Self::build(config.timeout, &config.user_agent)
    }

    /// Wrap an already-configured client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    fn build(timeout: Duration, user_agent: &str) -> Result<Self, NetworkError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| NetworkError::Transport(format!("failed to create HTTP client: {e}")))?;
        Ok(Self { client })
    }

    fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Delete => Method::DELETE,
        }
    }

    fn map_error(error: reqwest::Error) -> NetworkError {
        let cause = if error.is_timeout() {
            format!("timed out: {error}")
        } else if error.is_connect() {
            format!("connection failed: {error}")
        } else {
            error.to_string()
        };
        NetworkError::Transport(cause)
    }
}

impl Dispatcher for ReqwestDispatcher {
    async fn perform(&self, request: HttpRequest) -> Result<HttpResponse, NetworkError> {
        debug!(method = %request.method, url = %request.url, "dispatching request");

        let mut builder = self
            .client
            .request(Self::to_reqwest_method(request.method), request.url.clone());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| {
            warn!(url = %request.url, error = %e, "transport failure");
            Self::map_error(e)
        })?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("<binary>").to_string()))
            .collect();

        // A transfer that dies mid-body never produced a complete response.
        let body = response.bytes().await.map_err(|e| {
            warn!(url = %request.url, error = %e, "failed to read response body");
            Self::map_error(e)
        })?;

        debug!(url = %request.url, status, bytes = body.len(), "response received");
        Ok(HttpResponse {
            status,
            headers,
            body: body.to_vec(),
        })
    }
}
