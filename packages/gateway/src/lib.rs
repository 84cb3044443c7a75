#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Remote data gateway for MIN observations.
//!
//! Two read-only calls against the Avalanche Canada submissions API:
//!
//! 1. **List**: summaries for an inclusive date window and one forecast
//!    region (`GET {base}/submissions?fromdate&todate&region`).
//! 2. **Detail**: one submission by identifier
//!    (`GET {base}/submissions/{id}`).
//!
//! Every call is a single attempt: no retries, no backoff, no auth. The
//! endpoint and region come from the embedded [`config`] file, with
//! environment overrides.

pub mod client;
pub mod config;
pub mod window;

use async_trait::async_trait;
use min_explorer_observation_models::{ObservationDetail, SummaryPage};
use thiserror::Error;

pub use client::AvalancheCanadaClient;
pub use config::GatewayConfig;
pub use window::{DateWindow, ListQuery};

/// Errors from gateway calls.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Transport-level failure (DNS, TLS, connection reset, ...).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("{url} returned HTTP {status}")]
    Status {
        /// Status code returned.
        status: u16,
        /// Requested URL.
        url: String,
    },

    /// The response body did not have the expected shape.
    #[error("Malformed response: {0}")]
    Json(#[from] serde_json::Error),

    /// The configured base URL can't be used.
    #[error("Invalid base URL '{url}': {message}")]
    BaseUrl {
        /// The offending URL.
        url: String,
        /// What is wrong with it.
        message: String,
    },

    /// The embedded configuration is malformed.
    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),
}

impl GatewayError {
    /// Whether the server reported that the resource does not exist.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status: 404, .. })
    }
}

/// A source of MIN observations.
///
/// [`AvalancheCanadaClient`] is the production implementation; tests swap in
/// in-memory fakes.
#[async_trait]
pub trait ObservationSource: Send + Sync {
    /// Region label requests are scoped to (for headers and subtitles).
    fn region(&self) -> &str;

    /// Fetches the summaries for `query`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] if the request fails, the server answers with
    /// a non-success status, or the body can't be parsed.
    async fn list(&self, query: &ListQuery) -> Result<SummaryPage, GatewayError>;

    /// Fetches one submission.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] if the request fails, the server answers with
    /// a non-success status (404 for unknown identifiers), or the body can't
    /// be parsed.
    async fn detail(&self, id: &str) -> Result<ObservationDetail, GatewayError>;
}
