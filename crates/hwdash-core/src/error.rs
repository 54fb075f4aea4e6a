//! Failure taxonomy for a single fetch cycle.
//!
//! A response that parses but lacks some fields is *not* an error: partial
//! data is absorbed by the render engine field by field and never shows up
//! here.

use thiserror::Error;

/// Why a fetch cycle produced no snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// No network path to the server: refused, DNS failure, timeout, or the
    /// connection dropped while the body was streaming.
    #[error("cannot reach {host}:{port}")]
    Unreachable { host: String, port: u16 },

    /// The server answered with a non-2xx status.
    #[error("HTTP {0}")]
    HttpStatus(u16),

    /// The body was not a JSON object.
    #[error("malformed response body: {0}")]
    MalformedBody(String),
}

impl FetchError {
    /// Short machine-friendly tag, used in log lines and cycle stats.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unreachable { .. } => "unreachable",
            Self::HttpStatus(_) => "http_status",
            Self::MalformedBody(_) => "malformed_body",
        }
    }
}
