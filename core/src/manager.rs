//! The generic fetch pipeline.
//!
//! # Design
//! `ApiManager` composes the pieces in a fixed order and stops at the first
//! failure:
//!
//! 1. `Endpoint::build_request` (`InvalidUrl`)
//! 2. `Dispatcher::perform` (`Transport`, or `Cancelled` for the cancellable
//!    variants)
//! 3. status check, non-2xx discards the body (`RequestFailed`)
//! 4. empty body check (`NoData`)
//! 5. decode into the caller's type (`DecodingFailed`)
//!
//! The manager holds nothing but its dispatcher, so one instance can serve
//! any number of concurrent fetches. The only suspension point is the
//! dispatcher's round trip; decoding runs only after it completes.

use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::dispatcher::Dispatcher;
use crate::endpoint::Endpoint;
use crate::error::NetworkError;
use crate::http::HttpResponse;

/// Entry point for every typed fetch.
#[derive(Debug, Clone)]
pub struct ApiManager<D> {
    dispatcher: D,
}

impl<D: Dispatcher> ApiManager<D> {
    pub fn new(dispatcher: D) -> Self {
        Self { dispatcher }
    }

    /// The underlying dispatcher, for callers that want raw responses
    /// without the status policy.
    pub fn dispatcher(&self) -> &D {
        &self.dispatcher
    }

    /// Fetch `endpoint` and decode the JSON body into `T`.
    pub async fn fetch<T: DeserializeOwned>(&self, endpoint: &Endpoint) -> Result<T, NetworkError> {
        self.fetch_with(endpoint, decode_json::<T>).await
    }

    /// Fetch `endpoint` and return the body bytes unchanged.
    pub async fn fetch_bytes(&self, endpoint: &Endpoint) -> Result<Vec<u8>, NetworkError> {
        self.fetch_with(endpoint, Ok).await
    }

    /// Fetch `endpoint` and hand the body to `decode`.
    ///
    /// `decode` runs at most once, and only for a 2xx response with a
    /// non-empty body.
    pub async fn fetch_with<T, F>(&self, endpoint: &Endpoint, decode: F) -> Result<T, NetworkError>
    where
        F: FnOnce(Vec<u8>) -> Result<T, NetworkError>,
    {
        let request = endpoint.build_request()?;
        let response = self.dispatcher.perform(request).await?;
        decode(validate(response)?)
    }

    /// Like `fetch`, but gives up with `Cancelled` once `token` fires.
    pub async fn fetch_cancellable<T: DeserializeOwned>(
        &self,
        endpoint: &Endpoint,
        token: &CancellationToken,
    ) -> Result<T, NetworkError> {
        self.fetch_with_cancellation(endpoint, token, decode_json::<T>).await
    }

    /// Like `fetch_with`, but gives up with `Cancelled` once `token` fires.
    ///
    /// The in-flight dispatcher future is dropped on cancellation, which
    /// aborts the transfer; `decode` is never called in that case.
    pub async fn fetch_with_cancellation<T, F>(
        &self,
        endpoint: &Endpoint,
        token: &CancellationToken,
        decode: F,
    ) -> Result<T, NetworkError>
    where
        F: FnOnce(Vec<u8>) -> Result<T, NetworkError>,
    {
        let request = endpoint.build_request()?;
        let url = request.url.clone();
        let response = tokio::select! {
            biased;
            _ = token.cancelled() => {
                debug!(%url, "fetch cancelled");
                return Err(NetworkError::Cancelled);
            }
            response = self.dispatcher.perform(request) => response?,
        };
        decode(validate(response)?)
    }
}

/// Apply the status and empty-body policy, yielding the body to decode.
fn validate(response: HttpResponse) -> Result<Vec<u8>, NetworkError> {
    if !response.is_success() {
        warn!(status = response.status, "request failed");
        return Err(NetworkError::RequestFailed {
            status: response.status,
        });
    }
    if response.body.is_empty() {
        warn!(status = response.status, "empty response body");
        return Err(NetworkError::NoData);
    }
    Ok(response.body)
}

fn decode_json<T: DeserializeOwned>(body: Vec<u8>) -> Result<T, NetworkError> {
    serde_json::from_slice(&body).map_err(|e| {
        warn!(error = %e, "response did not match expected schema");
        NetworkError::DecodingFailed(e.to_string())
    })
}
