#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Map rendering adapter.
//!
//! The third-party map widget is reached only through the [`MapWidget`]
//! trait: add a marker, remove a marker, move the camera. [`MapAdapter`]
//! owns one widget plus every marker it created on it, so a re-render or a
//! drop can never leave stale markers (and their click handlers) behind.
//!
//! [`SceneWidget`] is the widget used by the dashboard: instead of drawing,
//! it records markers and camera into a serializable [`MapScene`] that the
//! browser-side `MapLibre` bootstrap replays.

pub mod adapter;
pub mod camera;
pub mod scene;

use min_explorer_map_models::{LngLat, MarkerStyle, ScreenSize};
use min_explorer_observation_models::{ObservationDetail, ObservationSummary};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use adapter::MapAdapter;
pub use camera::{Camera, FitBounds};
pub use scene::{MapScene, SceneMarker, SceneWidget};

/// Errors raised by a map widget.
#[derive(Debug, Error)]
pub enum MapError {
    /// The widget refused to create a marker.
    #[error("Failed to add marker for '{id}': {message}")]
    Marker {
        /// Identifier of the item the marker was for.
        id: String,
        /// Widget-specific reason.
        message: String,
    },

    /// Scene serialization failed.
    #[error("Scene serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Opaque widget-issued marker identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MarkerHandle(pub u64);

/// Hover popup content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Popup<'a> {
    /// Bold first line.
    pub title: &'a str,
    /// Second line.
    pub subtitle: &'a str,
}

/// Everything a widget needs to draw one marker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerSpec<'a> {
    /// Identifier of the item the marker stands for.
    pub id: &'a str,
    /// Where to draw it.
    pub position: LngLat,
    /// Visual variant.
    pub style: MarkerStyle,
    /// Popup shown while hovering, if any.
    pub popup: Option<Popup<'a>>,
    /// Whether clicking the marker selects the item.
    pub clickable: bool,
}

/// The primitives of a third-party map widget.
pub trait MapWidget {
    /// Size of the container the widget draws into.
    fn container(&self) -> ScreenSize;

    /// Draws a marker and returns a handle for removing it later.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::Marker`] if the widget can't create the marker.
    fn add_marker(&mut self, spec: &MarkerSpec<'_>) -> Result<MarkerHandle, MapError>;

    /// Removes a marker along with its popup and event listeners.
    fn remove_marker(&mut self, handle: MarkerHandle);

    /// Moves the camera.
    fn set_camera(&mut self, camera: &Camera);
}

/// One geo-tagged item to put on a map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapItem<'a> {
    /// Item identifier, reported back on click.
    pub id: &'a str,
    /// Where the item is.
    pub position: LngLat,
    /// Popup title.
    pub title: &'a str,
    /// Popup subtitle (the submitter).
    pub username: &'a str,
}

impl<'a> From<&'a ObservationSummary> for MapItem<'a> {
    fn from(obs: &'a ObservationSummary) -> Self {
        Self {
            id: &obs.id,
            position: obs.location.into(),
            title: &obs.title,
            username: &obs.username,
        }
    }
}

impl<'a> From<&'a ObservationDetail> for MapItem<'a> {
    fn from(detail: &'a ObservationDetail) -> Self {
        Self {
            id: &detail.submission_id,
            position: detail.location.into(),
            title: &detail.title,
            username: &detail.username,
        }
    }
}
