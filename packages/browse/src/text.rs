//! Plain-text views of a session.

use std::fmt::Write as _;

use min_explorer_coordinator::{AddressBar, Coordinator, Phase};
use min_explorer_map::{MapAdapter, MapItem, MapScene, SceneWidget};
use min_explorer_map_models::MapOptions;
use min_explorer_observation_models::format::{
    format_coordinates, format_timestamp, permalink, subtitle,
};
use min_explorer_observation_models::{ObservationDetail, ObservationSummary, SummaryPage};

use crate::BrowseError;

/// Title line plus the region / count subtitle.
#[must_use]
pub fn header(region: &str, page: &SummaryPage) -> String {
    format!("Avalanche Observations\n{}\n", subtitle(region, page.item_count))
}

/// One numbered entry per listed observation; `selected` is starred.
///
/// # Errors
///
/// Returns [`BrowseError::Fmt`] if writing the text fails.
pub fn list_view(
    observations: &[ObservationSummary],
    selected: Option<&str>,
) -> Result<String, BrowseError> {
    let mut out = String::new();
    for (index, obs) in observations.iter().enumerate() {
        let star = if selected == Some(obs.id.as_str()) { '*' } else { ' ' };
        writeln!(
            out,
            "{star}{:>3}. {} [{} photos]",
            index + 1,
            obs.title,
            obs.image_count
        )?;
        writeln!(
            out,
            "      {} | {} | {}",
            obs.username,
            format_timestamp(&obs.datetime),
            format_coordinates(&obs.location)
        )?;
        let counts: Vec<String> = obs
            .observations
            .entries()
            .map(|(category, count)| format!("{category} {count}"))
            .collect();
        writeln!(out, "      {}", counts.join(" | "))?;
        if !obs.tags.is_empty() {
            writeln!(out, "      Tags: {}", obs.tags.join(", "))?;
        }
    }
    if observations.is_empty() {
        out.push_str("No observations in this window.\n");
    }
    Ok(out)
}

/// The overview map of a session, kept alive so marker clicks can be
/// replayed against it.
pub struct TerminalMap {
    adapter: MapAdapter<SceneWidget>,
}

impl TerminalMap {
    /// Places one marker per observation, highlighting `selected`.
    ///
    /// # Errors
    ///
    /// Returns [`BrowseError::Map`] if a marker can't be placed.
    pub fn new(observations: &[ObservationSummary], selected: Option<&str>) -> Result<Self, BrowseError> {
        let options = MapOptions::overview();
        let mut adapter = MapAdapter::new(SceneWidget::new(options), options);
        let items: Vec<MapItem<'_>> = observations.iter().map(MapItem::from).collect();
        adapter.render(&items, selected)?;
        Ok(Self { adapter })
    }

    /// What is drawn.
    #[must_use]
    pub fn scene(&self) -> MapScene {
        self.adapter.widget().scene()
    }

    /// Clicks the `index`th marker (in drawing order) and returns the
    /// identifier it selects.
    pub fn click(&mut self, index: usize) -> Option<String> {
        let handle = self.scene().markers.get(index)?.handle;
        self.adapter.marker_clicked(handle).map(str::to_string)
    }

    /// Camera summary followed by one line per marker.
    ///
    /// # Errors
    ///
    /// Returns [`BrowseError::Fmt`] if writing the text fails.
    pub fn render(&self) -> Result<String, BrowseError> {
        render_scene(&self.scene())
    }
}

/// Describes a scene as text: camera first, then markers.
///
/// # Errors
///
/// Returns [`BrowseError::Fmt`] if writing the text fails.
pub fn render_scene(scene: &MapScene) -> Result<String, BrowseError> {
    let mut out = String::new();
    if let Some(camera) = scene.camera {
        let center = camera.viewport.center;
        write!(
            out,
            "Map centered on {:.4}, {:.4} at zoom {:.1}",
            center.lat, center.lng, camera.viewport.zoom
        )?;
        if let Some(fit) = camera.fit {
            write!(
                out,
                " (fitted to {:.4}..{:.4} N, {:.4}..{:.4} E)",
                fit.bounds.south, fit.bounds.north, fit.bounds.west, fit.bounds.east
            )?;
        }
        out.push('\n');
    }
    for (index, marker) in scene.markers.iter().enumerate() {
        let star = if scene.selected().is_some_and(|s| s.handle == marker.handle) {
            '*'
        } else {
            ' '
        };
        let label = marker
            .popup
            .as_ref()
            .map_or_else(|| marker.id.clone(), |popup| format!("{} ({})", popup.title, popup.subtitle));
        writeln!(
            out,
            "{star}{:>3}. {label} @ {:.4}, {:.4}",
            index + 1,
            marker.position.lat,
            marker.position.lng
        )?;
    }
    Ok(out)
}

/// The detail view for the coordinator's current phase, or `None` when
/// nothing is open.
///
/// # Errors
///
/// Returns [`BrowseError::Map`] if the location map can't be built, or
/// [`BrowseError::Fmt`] if writing the text fails.
pub fn detail_view<A: AddressBar>(coordinator: &Coordinator<A>) -> Result<Option<String>, BrowseError> {
    let notice = coordinator
        .last_error()
        .map(|failure| format!("! Could not load observation {}: {}\n", failure.id, failure.message));

    Ok(match coordinator.phase() {
        Phase::Empty => notice,
        Phase::Loading { id } => Some(format!("Loading {id}...\n")),
        Phase::Loaded { detail } => {
            let mut out = notice.unwrap_or_default();
            out.push_str(&detail_text(detail)?);
            Some(out)
        }
    })
}

fn detail_text(detail: &ObservationDetail) -> Result<String, BrowseError> {
    let mut out = String::new();
    writeln!(out, "== {} ==", detail.title)?;
    writeln!(out, "Submitted by: {}", detail.username)?;
    writeln!(out, "Date: {}", format_timestamp(&detail.datetime))?;
    writeln!(out, "Region: {}", detail.region)?;
    writeln!(out, "Location: {}", format_coordinates(&detail.location))?;

    let options = MapOptions::detail();
    let map = MapAdapter::single(
        SceneWidget::new(options),
        options,
        &detail.submission_id,
        detail.location.into(),
    )?;
    out.push_str(&render_scene(&map.widget().scene())?);

    if let Some(comment) = detail.comment() {
        writeln!(out, "\nComments:\n{comment}")?;
    }

    if let Some(quick) = &detail.observations.quick {
        if let Some(quality) = &quick.riding_quality {
            writeln!(out, "Riding quality: {quality}")?;
        }
        for (label, values) in quick.condition_lists() {
            writeln!(out, "{label}: {}", values.join(", "))?;
        }
    }

    let counts: Vec<String> = detail
        .observation_counts
        .reported()
        .map(|(category, count)| format!("{category} {count}"))
        .collect();
    if !counts.is_empty() {
        writeln!(out, "Observation counts: {}", counts.join(" | "))?;
    }

    if !detail.tags.is_empty() {
        writeln!(out, "Tags: {}", detail.tags.join(", "))?;
    }

    if !detail.images.is_empty() {
        writeln!(out, "Images ({}):", detail.images.len())?;
        for image in &detail.images {
            writeln!(out, "  {}", image.url)?;
        }
    }

    writeln!(out, "{}", permalink(&detail.submission_id))?;
    Ok(out)
}
