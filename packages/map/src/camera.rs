//! Choosing where a map looks.

use geo::{BoundingRect, Centroid, MultiPoint, Point};
use min_explorer_map_models::{
    BoundingBox, FALLBACK_CENTER, LngLat, MAX_FIT_ZOOM, MapOptions, ScreenSize, Viewport,
};
use serde::{Deserialize, Serialize};

/// Bounds the widget should fit once it knows its real container size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FitBounds {
    /// Box around every marker.
    pub bounds: BoundingBox,
    /// Minimum distance in pixels between a marker and the container edge.
    pub padding: f64,
    /// Zoom the fit may not exceed.
    pub max_zoom: f64,
}

/// Initial viewport plus, for multi-marker maps, the bounds it was fitted to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Viewport for the nominal container size.
    pub viewport: Viewport,
    /// Set when the viewport came from fitting bounds.
    pub fit: Option<FitBounds>,
}

/// Frames `positions` in a container of `size`.
///
/// More than one position: fit their bounding box with `options.padding`.
/// Otherwise: center on the mean position (or [`FALLBACK_CENTER`] when there
/// is none) at `options.zoom`.
#[must_use]
pub fn frame(positions: &[LngLat], options: &MapOptions, size: ScreenSize) -> Camera {
    let points: MultiPoint<f64> = positions
        .iter()
        .map(|p| Point::new(p.lng, p.lat))
        .collect();

    if positions.len() > 1 {
        if let Some(rect) = points.bounding_rect() {
            let bounds = BoundingBox::new(rect.min().x, rect.min().y, rect.max().x, rect.max().y);
            return Camera {
                viewport: Viewport::fit(&bounds, size, options.padding, MAX_FIT_ZOOM),
                fit: Some(FitBounds {
                    bounds,
                    padding: options.padding,
                    max_zoom: MAX_FIT_ZOOM,
                }),
            };
        }
    }

    let center = points
        .centroid()
        .map_or(FALLBACK_CENTER, |c| LngLat::new(c.x(), c.y()));

    Camera {
        viewport: Viewport::centered(center, options.zoom, size),
        fit: None,
    }
}
