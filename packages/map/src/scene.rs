//! A [`MapWidget`] that records what it was asked to draw.
//!
//! The dashboard serializes the recorded [`MapScene`] into the page; the
//! browser bootstrap creates one `MapLibre` marker per [`SceneMarker`],
//! wires hover popups, and applies the [`Camera`]. The terminal browser
//! prints the same scene as text.

use min_explorer_map_models::{LngLat, MapOptions, MarkerStyle, ScreenSize};
use serde::Serialize;

use crate::camera::Camera;
use crate::{MapError, MapWidget, MarkerHandle, MarkerSpec};

/// Popup content of a recorded marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScenePopup {
    /// Bold first line.
    pub title: String,
    /// Second line.
    pub subtitle: String,
}

/// A recorded marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneMarker {
    /// Handle issued for the marker.
    pub handle: MarkerHandle,
    /// Item identifier.
    pub id: String,
    /// Where the marker is drawn.
    pub position: LngLat,
    /// Visual variant.
    pub style: MarkerStyle,
    /// Hover popup.
    pub popup: Option<ScenePopup>,
    /// Where clicking the marker leads, for clickable markers.
    pub href: Option<String>,
}

/// Everything drawn on one map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapScene {
    /// Presentation options of the map.
    pub options: MapOptions,
    /// Live markers, in creation order.
    pub markers: Vec<SceneMarker>,
    /// Last camera set, if any.
    pub camera: Option<Camera>,
}

impl MapScene {
    /// JSON safe to place inside a `<script type="application/json">`
    /// element.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::Json`] if serialization fails.
    pub fn to_embedded_json(&self) -> Result<String, MapError> {
        Ok(serde_json::to_string(self)?
            .replace('<', "\\u003c")
            .replace('>', "\\u003e")
            .replace('&', "\\u0026"))
    }

    /// The marker drawn with [`MarkerStyle::Selected`], if any.
    #[must_use]
    pub fn selected(&self) -> Option<&SceneMarker> {
        self.markers
            .iter()
            .find(|marker| marker.style == MarkerStyle::Selected)
    }
}

type LinkBuilder = Box<dyn Fn(&str) -> String>;

/// Recording widget.
pub struct SceneWidget {
    options: MapOptions,
    next_handle: u64,
    markers: Vec<SceneMarker>,
    camera: Option<Camera>,
    link: Option<LinkBuilder>,
}

impl SceneWidget {
    /// An empty scene for a map with `options`.
    #[must_use]
    pub const fn new(options: MapOptions) -> Self {
        Self {
            options,
            next_handle: 0,
            markers: Vec::new(),
            camera: None,
            link: None,
        }
    }

    /// Sets how clickable markers turn an identifier into a link.
    #[must_use]
    pub fn with_link(mut self, link: impl Fn(&str) -> String + 'static) -> Self {
        self.link = Some(Box::new(link));
        self
    }

    /// Snapshot of what is currently drawn.
    #[must_use]
    pub fn scene(&self) -> MapScene {
        MapScene {
            options: self.options,
            markers: self.markers.clone(),
            camera: self.camera,
        }
    }
}

impl MapWidget for SceneWidget {
    fn container(&self) -> ScreenSize {
        self.options.size
    }

    fn add_marker(&mut self, spec: &MarkerSpec<'_>) -> Result<MarkerHandle, MapError> {
        if !spec.position.lng.is_finite() || !spec.position.lat.is_finite() {
            return Err(MapError::Marker {
                id: spec.id.to_string(),
                message: "position is not finite".to_string(),
            });
        }

        self.next_handle += 1;
        let handle = MarkerHandle(self.next_handle);
        let href = if spec.clickable {
            self.link.as_ref().map(|link| link(spec.id))
        } else {
            None
        };

        self.markers.push(SceneMarker {
            handle,
            id: spec.id.to_string(),
            position: spec.position,
            style: spec.style,
            popup: spec.popup.map(|popup| ScenePopup {
                title: popup.title.to_string(),
                subtitle: popup.subtitle.to_string(),
            }),
            href,
        });
        Ok(handle)
    }

    fn remove_marker(&mut self, handle: MarkerHandle) {
        self.markers.retain(|marker| marker.handle != handle);
    }

    fn set_camera(&mut self, camera: &Camera) {
        self.camera = Some(*camera);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MapAdapter, MapItem};

    fn items() -> Vec<MapItem<'static>> {
        vec![
            MapItem {
                id: "abc123",
                position: LngLat::new(-123.0, 49.0),
                title: "Slab on <Brandywine>",
                username: "skier42",
            },
            MapItem {
                id: "def456",
                position: LngLat::new(-122.6, 49.4),
                title: "Powder",
                username: "board_b",
            },
        ]
    }

    #[test]
    fn records_markers_links_and_camera() {
        let widget = SceneWidget::new(MapOptions::overview())
            .with_link(|id| format!("?observation={id}"));
        let mut adapter = MapAdapter::new(widget, MapOptions::overview());
        adapter.render(&items(), Some("def456")).unwrap();

        let scene = adapter.widget().scene();
        assert_eq!(scene.markers.len(), 2);
        assert_eq!(scene.markers[0].href.as_deref(), Some("?observation=abc123"));
        assert_eq!(scene.selected().unwrap().id, "def456");
        assert!(scene.camera.unwrap().fit.is_some());
    }

    #[test]
    fn rerender_replaces_recorded_markers() {
        let mut adapter = MapAdapter::new(SceneWidget::new(MapOptions::overview()), MapOptions::overview());
        adapter.render(&items(), None).unwrap();
        adapter.render(&items()[..1], None).unwrap();

        let scene = adapter.widget().scene();
        assert_eq!(scene.markers.len(), 1);
        assert_eq!(scene.markers[0].id, "abc123");
        assert!(scene.markers[0].href.is_none());
    }

    #[test]
    fn non_finite_positions_are_refused() {
        let mut adapter = MapAdapter::new(SceneWidget::new(MapOptions::overview()), MapOptions::overview());
        let mut bad = items();
        bad[1].position = LngLat::new(f64::NAN, 49.0);

        assert!(adapter.render(&bad, None).is_err());
        assert!(adapter.widget().scene().markers.is_empty());
    }

    #[test]
    fn embedded_json_cannot_close_the_script_tag() {
        let mut adapter = MapAdapter::new(SceneWidget::new(MapOptions::overview()), MapOptions::overview());
        adapter.render(&items(), None).unwrap();

        let json = adapter.widget().scene().to_embedded_json().unwrap();
        assert!(!json.contains('<'));
        assert!(json.contains("Slab on \\u003cBrandywine\\u003e"));

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["markers"][0]["popup"]["title"], "Slab on <Brandywine>");
        assert_eq!(value["markers"][0]["style"], "default");
    }
}
