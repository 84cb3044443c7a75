//! [`MapAdapter`]: the owned widget and its marker set.

use min_explorer_map_models::{LngLat, MapOptions, MarkerStyle};

use crate::camera::{Camera, frame};
use crate::{MapError, MapItem, MapWidget, MarkerHandle, MarkerSpec, Popup};

/// A marker currently drawn on the widget.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LiveMarker {
    handle: MarkerHandle,
    id: String,
}

/// Markers added during one render. Removes them all on drop unless
/// [`MarkerBatch::commit`] was reached, so a failure halfway through a render
/// leaves the widget empty rather than half-populated.
struct MarkerBatch<'w, W: MapWidget> {
    widget: &'w mut W,
    added: Vec<LiveMarker>,
}

impl<'w, W: MapWidget> MarkerBatch<'w, W> {
    const fn new(widget: &'w mut W) -> Self {
        Self {
            widget,
            added: Vec::new(),
        }
    }

    fn add(&mut self, spec: &MarkerSpec<'_>) -> Result<(), MapError> {
        let handle = self.widget.add_marker(spec)?;
        self.added.push(LiveMarker {
            handle,
            id: spec.id.to_string(),
        });
        Ok(())
    }

    fn commit(mut self) -> Vec<LiveMarker> {
        std::mem::take(&mut self.added)
    }
}

impl<W: MapWidget> Drop for MarkerBatch<'_, W> {
    fn drop(&mut self) {
        for marker in self.added.drain(..) {
            self.widget.remove_marker(marker.handle);
        }
    }
}

type SelectCallback = Box<dyn FnMut(&str)>;

/// Owns a [`MapWidget`] and every marker drawn on it.
///
/// Each [`render`](Self::render) first removes the markers of the previous
/// render; dropping the adapter removes whatever is left.
pub struct MapAdapter<W: MapWidget> {
    widget: W,
    options: MapOptions,
    markers: Vec<LiveMarker>,
    on_select: Option<SelectCallback>,
}

impl<W: MapWidget> MapAdapter<W> {
    /// Wraps `widget`. Nothing is drawn until [`Self::render`].
    #[must_use]
    pub const fn new(widget: W, options: MapOptions) -> Self {
        Self {
            widget,
            options,
            markers: Vec::new(),
            on_select: None,
        }
    }

    /// Registers the callback invoked with an item's identifier when its
    /// marker is clicked.
    #[must_use]
    pub fn on_select(mut self, callback: impl FnMut(&str) + 'static) -> Self {
        self.on_select = Some(Box::new(callback));
        self
    }

    /// A single-marker map centered on `position`: the card thumbnail
    /// ([`MapOptions::mini`]) or the detail-panel map
    /// ([`MapOptions::detail`]).
    ///
    /// # Errors
    ///
    /// Returns [`MapError`] if the widget refuses the marker.
    pub fn single(widget: W, options: MapOptions, id: &str, position: LngLat) -> Result<Self, MapError> {
        let mut adapter = Self::new(widget, options);
        {
            let mut batch = MarkerBatch::new(&mut adapter.widget);
            batch.add(&MarkerSpec {
                id,
                position,
                style: options.single_marker,
                popup: None,
                clickable: false,
            })?;
            adapter.markers = batch.commit();
        }
        let camera = frame(&[position], &options, adapter.widget.container());
        adapter.widget.set_camera(&camera);
        Ok(adapter)
    }

    /// Replaces the markers with one per item and reframes the camera.
    ///
    /// The marker for `selected` is drawn with [`MarkerStyle::Selected`].
    /// Every marker of the previous render is removed before any new marker
    /// is added.
    ///
    /// # Errors
    ///
    /// Returns [`MapError`] if the widget refuses a marker; the markers added
    /// by this call are removed again and the map is left empty.
    pub fn render(&mut self, items: &[MapItem<'_>], selected: Option<&str>) -> Result<Camera, MapError> {
        self.teardown();

        let clickable = self.options.interactive;
        let mut batch = MarkerBatch::new(&mut self.widget);
        for item in items {
            let style = if selected == Some(item.id) {
                MarkerStyle::Selected
            } else {
                MarkerStyle::Default
            };
            batch.add(&MarkerSpec {
                id: item.id,
                position: item.position,
                style,
                popup: Some(Popup {
                    title: item.title,
                    subtitle: item.username,
                }),
                clickable,
            })?;
        }
        self.markers = batch.commit();

        let positions: Vec<LngLat> = items.iter().map(|item| item.position).collect();
        let camera = frame(&positions, &self.options, self.widget.container());
        self.widget.set_camera(&camera);

        log::debug!(
            "Rendered {} markers (selected: {selected:?})",
            self.markers.len()
        );
        Ok(camera)
    }

    /// Handles a click on `handle`: invokes the selection callback with the
    /// marker's identifier and returns it. Clicks on non-interactive maps or
    /// on unknown handles are ignored.
    pub fn marker_clicked(&mut self, handle: MarkerHandle) -> Option<&str> {
        if !self.options.interactive {
            return None;
        }
        let marker = self.markers.iter().find(|m| m.handle == handle)?;
        if let Some(callback) = self.on_select.as_mut() {
            callback(&marker.id);
        }
        Some(&marker.id)
    }

    /// Removes every marker drawn by this adapter.
    pub fn teardown(&mut self) {
        for marker in self.markers.drain(..) {
            self.widget.remove_marker(marker.handle);
        }
    }

    /// Identifiers of the markers currently drawn, in render order.
    pub fn marker_ids(&self) -> impl Iterator<Item = &str> {
        self.markers.iter().map(|m| m.id.as_str())
    }

    /// Handle of the marker drawn for `id`.
    #[must_use]
    pub fn handle_for(&self, id: &str) -> Option<MarkerHandle> {
        self.markers.iter().find(|m| m.id == id).map(|m| m.handle)
    }

    /// The wrapped widget.
    #[must_use]
    pub const fn widget(&self) -> &W {
        &self.widget
    }

    /// Presentation options this adapter was built with.
    #[must_use]
    pub const fn options(&self) -> &MapOptions {
        &self.options
    }
}

impl<W: MapWidget> Drop for MapAdapter<W> {
    fn drop(&mut self) {
        self.teardown();
    }
}
