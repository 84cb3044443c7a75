#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Terminal browser for MIN observations.
//!
//! The client-interactive counterpart of the dashboard. A [`Session`]
//! fetches the summary list once, drives a
//! [`Coordinator`](min_explorer_coordinator::Coordinator) whose address bar
//! is a [`DeepLink`], and renders list, map and detail views as text. The
//! deep link can be pasted into a browser to open the same observation on
//! the dashboard, and vice versa with `--url`.

pub mod deep_link;
pub mod interactive;
pub mod session;
pub mod text;

use min_explorer_gateway::GatewayError;
use min_explorer_map::MapError;
use thiserror::Error;

pub use deep_link::{DEFAULT_DASHBOARD_URL, DeepLink};
pub use session::Session;

/// Errors from the terminal browser.
#[derive(Debug, Error)]
pub enum BrowseError {
    /// Fetching the observation list failed.
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// A map view could not be built.
    #[error(transparent)]
    Map(#[from] MapError),

    /// The deep link passed in is not a usable URL.
    #[error("Invalid link '{link}': {message}")]
    InvalidLink {
        /// The offending link.
        link: String,
        /// Why it was rejected.
        message: String,
    },

    /// Writing a text view failed.
    #[error(transparent)]
    Fmt(#[from] std::fmt::Error),

    /// A prompt failed (e.g. no terminal attached).
    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),
}
