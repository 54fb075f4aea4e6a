//! Transport adapter: one `GET` per cycle against the metrics endpoint.
//!
//! Every way a request can go wrong is folded into a [`FetchError`] value.
//! Nothing here retries or caches; the scheduler simply asks again on its
//! next tick.

use std::future::Future;

use log::{debug, trace};

use crate::error::FetchError;
use crate::snapshot::MetricsSnapshot;
use crate::{METRICS_PATH, METRICS_PORT};

// ---------------------------------------------------------------------------
// MetricsEndpoint
// ---------------------------------------------------------------------------

/// Where the metrics server lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsEndpoint {
    pub host: String,
    pub port: u16,
    pub path: String,
}

impl MetricsEndpoint {
    /// The standard endpoint on `host`: port 5000, `/api/metrics`.
    pub fn for_host(host: impl Into<String>) -> Self {
        Self::new(host, METRICS_PORT)
    }

    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            path: METRICS_PATH.to_string(),
        }
    }

    /// Full request URL. Bare IPv6 literals are bracketed.
    pub fn url(&self) -> String {
        let host = if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]", self.host)
        } else {
            self.host.clone()
        };
        format!("http://{host}:{}{}", self.port, self.path)
    }

    fn unreachable(&self) -> FetchError {
        FetchError::Unreachable {
            host: self.host.clone(),
            port: self.port,
        }
    }
}

impl std::fmt::Display for MetricsEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.url())
    }
}

// ---------------------------------------------------------------------------
// SnapshotSource
// ---------------------------------------------------------------------------

/// Anything that can produce one snapshot per call.
///
/// The scheduler is generic over this so tests can script outcomes without a
/// network.
pub trait SnapshotSource: Send + Sync + 'static {
    fn fetch(&self) -> impl Future<Output = Result<MetricsSnapshot, FetchError>> + Send;
}

/// Fetch and parse one snapshot.
pub async fn fetch_snapshot(
    client: &reqwest::Client,
    endpoint: &MetricsEndpoint,
) -> Result<MetricsSnapshot, FetchError> {
    let url = endpoint.url();
    debug!("fetching {url}");

    let response = client.get(&url).send().await.map_err(|e| {
        debug!("request to {url} failed: {e}");
        endpoint.unreachable()
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::HttpStatus(status.as_u16()));
    }

    // A connection that drops mid-body is a network failure, not a bad payload.
    let body = response.bytes().await.map_err(|e| {
        debug!("reading body from {url} failed: {e}");
        endpoint.unreachable()
    })?;

    let snapshot = MetricsSnapshot::from_json(&body)?;
    trace!("snapshot from {url}: {snapshot:?}");
    Ok(snapshot)
}

/// [`SnapshotSource`] backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: MetricsEndpoint,
}

impl HttpTransport {
    pub fn new(endpoint: MetricsEndpoint) -> Self {
        Self::with_client(reqwest::Client::new(), endpoint)
    }

    pub fn with_client(client: reqwest::Client, endpoint: MetricsEndpoint) -> Self {
        Self { client, endpoint }
    }

    pub fn endpoint(&self) -> &MetricsEndpoint {
        &self.endpoint
    }
}

impl SnapshotSource for HttpTransport {
    async fn fetch(&self) -> Result<MetricsSnapshot, FetchError> {
        fetch_snapshot(&self.client, &self.endpoint).await
    }
}
