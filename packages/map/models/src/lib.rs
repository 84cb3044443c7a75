#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Geographic value types and viewport math for the observation map.
//!
//! Positions are WGS84 degrees. Viewports use the spherical Web Mercator
//! projection with 512 px tiles, matching `MapLibre` / Mapbox GL, so a
//! [`Viewport`] computed here lines up with what the browser widget draws
//! for the same center, zoom, and container size.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Pixel size of one Web Mercator tile at zoom 0.
pub const TILE_SIZE: f64 = 512.0;

/// Center used when there is nothing to show (Vancouver / Sea-to-Sky).
pub const FALLBACK_CENTER: LngLat = LngLat::new(-123.1, 49.3);

/// Zoom for the overview map when it is centered rather than fitted.
pub const DEFAULT_ZOOM: f64 = 8.0;

/// Zoom for the map inside the detail panel.
pub const DETAIL_ZOOM: f64 = 12.0;

/// Zoom for the non-interactive map inside a list card.
pub const MINI_ZOOM: f64 = 10.0;

/// Padding in pixels kept between fitted markers and the container edge.
pub const FIT_PADDING: f64 = 50.0;

/// Upper zoom bound for fit-bounds, so coincident markers don't zoom to the
/// street level of an empty tile.
pub const MAX_FIT_ZOOM: f64 = 18.0;

/// Web Mercator can't represent the poles.
const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

/// A WGS84 position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LngLat {
    /// Longitude in degrees.
    pub lng: f64,
    /// Latitude in degrees.
    pub lat: f64,
}

impl LngLat {
    /// Creates a position from longitude and latitude (in that order, like
    /// every GL map widget).
    #[must_use]
    pub const fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }

    /// Normalized Web Mercator x in `[0, 1]`.
    #[must_use]
    pub fn mercator_x(self) -> f64 {
        (self.lng + 180.0) / 360.0
    }

    /// Normalized Web Mercator y in `[0, 1]`, growing southwards.
    #[must_use]
    pub fn mercator_y(self) -> f64 {
        let lat = self.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
        (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0
    }

    /// Inverse of [`Self::mercator_x`] / [`Self::mercator_y`].
    #[must_use]
    pub fn from_mercator(x: f64, y: f64) -> Self {
        let lng = x.mul_add(360.0, -180.0);
        let lat = (PI * 2.0f64.mul_add(-y, 1.0)).sinh().atan().to_degrees();
        Self { lng, lat }
    }
}

/// A geographic bounding box in WGS84 coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Western longitude boundary.
    pub west: f64,
    /// Southern latitude boundary.
    pub south: f64,
    /// Eastern longitude boundary.
    pub east: f64,
    /// Northern latitude boundary.
    pub north: f64,
}

impl BoundingBox {
    /// Creates a new bounding box from the given coordinates.
    #[must_use]
    pub const fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self {
            west,
            south,
            east,
            north,
        }
    }

    /// Whether `point` lies inside the box (edges included).
    #[must_use]
    pub fn contains(&self, point: LngLat) -> bool {
        (self.west..=self.east).contains(&point.lng)
            && (self.south..=self.north).contains(&point.lat)
    }

    /// South-west and north-east corners, in the `[[w, s], [e, n]]` order the
    /// GL widgets accept for `fitBounds`.
    #[must_use]
    pub const fn corners(&self) -> [[f64; 2]; 2] {
        [[self.west, self.south], [self.east, self.north]]
    }
}

/// Size of a map container in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenSize {
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl ScreenSize {
    /// Creates a container size.
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// The camera of a map: what it is centered on, how far it is zoomed, and the
/// container it is drawn into.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Center of the container.
    pub center: LngLat,
    /// Zoom level (0 = whole world in one 512 px tile).
    pub zoom: f64,
    /// Container the viewport is drawn into.
    pub size: ScreenSize,
}

impl Viewport {
    /// Creates a viewport centered on `center`.
    #[must_use]
    pub const fn centered(center: LngLat, zoom: f64, size: ScreenSize) -> Self {
        Self { center, zoom, size }
    }

    /// Computes the viewport that shows all of `bounds` inside `size` with at
    /// least `padding` pixels on every side.
    ///
    /// The zoom is clamped to `[0, max_zoom]`. A box flat on one axis is
    /// fitted on the other; a single point lands on `max_zoom`.
    #[must_use]
    pub fn fit(bounds: &BoundingBox, size: ScreenSize, padding: f64, max_zoom: f64) -> Self {
        let nw = LngLat::new(bounds.west, bounds.north);
        let se = LngLat::new(bounds.east, bounds.south);
        let (x0, y0) = (nw.mercator_x(), nw.mercator_y());
        let (x1, y1) = (se.mercator_x(), se.mercator_y());

        let avail_w = 2.0f64.mul_add(-padding, size.width).max(1.0);
        let avail_h = 2.0f64.mul_add(-padding, size.height).max(1.0);

        let scale_x = span_scale(avail_w, x1 - x0);
        let scale_y = span_scale(avail_h, y1 - y0);
        let scale = match (scale_x, scale_y) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        let zoom = scale.map_or(max_zoom, |scale| scale.log2().clamp(0.0, max_zoom));

        let center = LngLat::from_mercator(f64::midpoint(x0, x1), f64::midpoint(y0, y1));

        Self { center, zoom, size }
    }

    /// Full width of the world in pixels at this zoom.
    #[must_use]
    pub fn world_size(&self) -> f64 {
        TILE_SIZE * self.zoom.exp2()
    }

    /// Projects a position into container pixel coordinates (origin at the
    /// top-left corner).
    #[must_use]
    pub fn project(&self, point: LngLat) -> (f64, f64) {
        let world = self.world_size();
        let x = (point.mercator_x() - self.center.mercator_x()).mul_add(world, self.size.width / 2.0);
        let y =
            (point.mercator_y() - self.center.mercator_y()).mul_add(world, self.size.height / 2.0);
        (x, y)
    }

    /// Whether `point` projects inside the container with at least `padding`
    /// pixels to every edge. A small tolerance absorbs float error.
    #[must_use]
    pub fn contains_padded(&self, point: LngLat, padding: f64) -> bool {
        const EPSILON: f64 = 1e-6;
        let (x, y) = self.project(point);
        x >= padding - EPSILON
            && x <= self.size.width - padding + EPSILON
            && y >= padding - EPSILON
            && y <= self.size.height - padding + EPSILON
    }
}

/// How many 512 px tiles of `span` (normalized mercator units) fit in
/// `available` pixels, as a power-of-two scale. `None` means any zoom fits.
fn span_scale(available: f64, span: f64) -> Option<f64> {
    if span.abs() < f64::EPSILON {
        None
    } else {
        Some(available / (span.abs() * TILE_SIZE))
    }
}

/// Visual variant of a marker. The `Display` form doubles as the CSS
/// modifier class in the browser.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MarkerStyle {
    /// An ordinary overview marker.
    Default,
    /// The overview marker of the currently selected observation.
    Selected,
    /// The single marker of the detail-panel map.
    Detail,
    /// The single marker of a list-card map.
    Mini,
}

/// Presentation options for one map container.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapOptions {
    /// Whether the user can pan, zoom, and click markers.
    pub interactive: bool,
    /// Zoom used when the map is centered rather than fitted.
    pub zoom: f64,
    /// Fit-bounds padding in pixels.
    pub padding: f64,
    /// Whether to show zoom / compass controls.
    pub navigation_control: bool,
    /// Whether to show the attribution control.
    pub attribution: bool,
    /// Nominal container size the initial viewport is computed for.
    pub size: ScreenSize,
    /// Style applied to single-marker maps.
    pub single_marker: MarkerStyle,
}

impl MapOptions {
    /// The full interactive overview map.
    #[must_use]
    pub const fn overview() -> Self {
        Self {
            interactive: true,
            zoom: DEFAULT_ZOOM,
            padding: FIT_PADDING,
            navigation_control: true,
            attribution: true,
            size: ScreenSize::new(960.0, 600.0),
            single_marker: MarkerStyle::Default,
        }
    }

    /// The interactive map inside the detail panel.
    #[must_use]
    pub const fn detail() -> Self {
        Self {
            interactive: true,
            zoom: DETAIL_ZOOM,
            padding: FIT_PADDING,
            navigation_control: true,
            attribution: true,
            size: ScreenSize::new(640.0, 300.0),
            single_marker: MarkerStyle::Detail,
        }
    }

    /// The static thumbnail map inside a list card.
    #[must_use]
    pub const fn mini() -> Self {
        Self {
            interactive: false,
            zoom: MINI_ZOOM,
            padding: 0.0,
            navigation_control: false,
            attribution: false,
            size: ScreenSize::new(320.0, 150.0),
            single_marker: MarkerStyle::Mini,
        }
    }
}
