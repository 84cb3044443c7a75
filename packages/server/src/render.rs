//! Server-side HTML for the dashboard page.
//!
//! Everything shown is derived from a [`SummaryPage`] and a [`Coordinator`]
//! that has already restored (and loaded) the selection from the URL. Map
//! containers embed the [`MapScene`] recorded by a [`SceneWidget`].
//!
//! In the browser, selections after the first paint swap the detail panel
//! in place: the page carries a loading-panel template and
//! [`detail_fragment`] renders the replacement.

use std::fmt::Write as _;

use min_explorer_coordinator::{AddressBar, Coordinator, DetailFailure, Phase};
use min_explorer_map::{MapAdapter, MapItem, MapScene, SceneWidget};
use min_explorer_map_models::{LngLat, MapOptions};
use min_explorer_observation_models::format::{
    format_coordinates, format_timestamp, permalink, subtitle,
};
use min_explorer_observation_models::{
    ObservationCategory, ObservationDetail, ObservationSummary, SummaryPage, ViewMode,
};
use min_explorer_server_models::PageParams;

use crate::{MapConfig, ServerError, assets};

const PAGE_TITLE: &str = "Avalanche Observations";

/// Renders the full dashboard page.
///
/// One card per entry of `page.items.data`; the header shows the server's
/// `itemCount`.
///
/// # Errors
///
/// Returns [`ServerError`] if a map scene can't be built.
pub fn page<A: AddressBar>(
    page: &SummaryPage,
    region: &str,
    coordinator: &Coordinator<A>,
    map: &MapConfig,
) -> Result<String, ServerError> {
    let observations = page.observations();
    let view = coordinator.view_mode();
    let selected = coordinator.selected_id();

    let mut out = String::new();
    open_document(&mut out, map)?;
    write!(
        out,
        r#"<header class="header"><h1>{PAGE_TITLE}</h1><p class="subtitle">{}</p></header>"#,
        escape_html(&subtitle(region, page.item_count))
    )?;
    tabs(&mut out, view)?;

    write!(
        out,
        r#"<section class="map-wrapper" data-view-panel="map"{}>"#,
        hidden_unless(view == ViewMode::Map)
    )?;
    map_container(&mut out, "overview", &overview_scene(observations, selected)?)?;
    out.push_str("</section>");

    out.push_str(r#"<div class="content-wrapper">"#);
    write!(
        out,
        r#"<section class="list-container{}" data-view-panel="list"{}>"#,
        if coordinator.phase() == Phase::Empty && coordinator.last_error().is_none() {
            ""
        } else {
            " list-container-split"
        },
        hidden_unless(view == ViewMode::List)
    )?;
    for obs in observations {
        card(&mut out, obs, selected == Some(obs.id.as_str()))?;
    }
    out.push_str("</section>");
    detail_panel(&mut out, coordinator)?;
    out.push_str("</div>");

    out.push_str(r#"<template id="detail-loading">"#);
    loading_panel(&mut out, "")?;
    out.push_str("</template>");

    close_document(&mut out);
    Ok(out)
}

/// Renders only the detail panel for the coordinator's current phase.
///
/// Empty when nothing is selected and nothing failed.
///
/// # Errors
///
/// Returns [`ServerError`] if the location map can't be built.
pub fn detail_fragment<A: AddressBar>(coordinator: &Coordinator<A>) -> Result<String, ServerError> {
    let mut out = String::new();
    detail_panel(&mut out, coordinator)?;
    Ok(out)
}

/// Renders the page shown when the observation list can't be fetched.
///
/// # Errors
///
/// Returns [`ServerError::Fmt`] if writing the markup fails.
pub fn error_page(region: &str, message: &str, map: &MapConfig) -> Result<String, ServerError> {
    let mut out = String::new();
    open_document(&mut out, map)?;
    write!(
        out,
        r#"<header class="header"><h1>{PAGE_TITLE}</h1><p class="subtitle">{}</p></header><div class="error-notice">Failed to fetch observations: {}</div>"#,
        escape_html(region),
        escape_html(message)
    )?;
    close_document(&mut out);
    Ok(out)
}

/// The interactive overview map with one clickable marker per observation.
///
/// # Errors
///
/// Returns [`ServerError::Map`] if a marker can't be placed.
pub fn overview_scene(
    observations: &[ObservationSummary],
    selected: Option<&str>,
) -> Result<MapScene, ServerError> {
    let options = MapOptions::overview();
    let widget = SceneWidget::new(options).with_link(PageParams::selection_href);
    let mut adapter = MapAdapter::new(widget, options);
    let items: Vec<MapItem<'_>> = observations.iter().map(MapItem::from).collect();
    adapter.render(&items, selected)?;
    Ok(adapter.widget().scene())
}

fn single_scene(options: MapOptions, id: &str, position: LngLat) -> Result<MapScene, ServerError> {
    let adapter = MapAdapter::single(SceneWidget::new(options), options, id, position)?;
    Ok(adapter.widget().scene())
}

fn open_document(out: &mut String, map: &MapConfig) -> Result<(), ServerError> {
    write!(
        out,
        r#"<!DOCTYPE html><html lang="en"><head><meta charset="utf-8"><meta name="viewport" content="width=device-width, initial-scale=1"><title>{PAGE_TITLE}</title><link rel="stylesheet" href="{}"><link rel="stylesheet" href="/assets/app.css"></head><body data-map-style="{}" data-map-token="{}"><main class="main"><div class="container">"#,
        assets::maplibre_css_url(),
        escape_html(&map.style_url),
        escape_html(map.access_token.as_deref().unwrap_or_default())
    )?;
    Ok(())
}

fn close_document(out: &mut String) {
    out.push_str("</div></main><script src=\"");
    out.push_str(&assets::maplibre_js_url());
    out.push_str("\"></script><script src=\"/assets/map.js\"></script></body></html>");
}

const fn hidden_unless(visible: bool) -> &'static str {
    if visible { "" } else { " hidden" }
}

fn tabs(out: &mut String, view: ViewMode) -> Result<(), ServerError> {
    out.push_str(r#"<nav class="tab-container">"#);
    for (mode, label) in [
        (ViewMode::List, "\u{1f4cb} List View"),
        (ViewMode::Map, "\u{1f5fa}\u{fe0f} Map View"),
    ] {
        write!(
            out,
            r#"<button type="button" class="tab-button{}" data-view="{mode}">{label}</button>"#,
            if mode == view { " tab-button-active" } else { "" }
        )?;
    }
    out.push_str("</nav>");
    Ok(())
}

fn map_container(out: &mut String, variant: &str, scene: &MapScene) -> Result<(), ServerError> {
    write!(
        out,
        r#"<div class="map map-{variant}"><script type="application/json">{}</script></div>"#,
        scene.to_embedded_json()?
    )?;
    Ok(())
}

fn meta_item(out: &mut String, label: &str, value: &str) -> Result<(), ServerError> {
    write!(
        out,
        r#"<div class="meta-item"><span class="label">{label}</span> <span class="value">{}</span></div>"#,
        escape_html(value)
    )?;
    Ok(())
}

fn count_item(out: &mut String, category: ObservationCategory, count: u32) -> Result<(), ServerError> {
    write!(
        out,
        r#"<div class="observation-item"><span class="obs-label">{category}</span><span class="obs-value">{count}</span></div>"#
    )?;
    Ok(())
}

fn tags(out: &mut String, tags: &[String]) -> Result<(), ServerError> {
    if tags.is_empty() {
        return Ok(());
    }
    out.push_str(r#"<div class="tags">"#);
    for tag in tags {
        write!(out, r#"<span class="tag">{}</span>"#, escape_html(tag))?;
    }
    out.push_str("</div>");
    Ok(())
}

fn permalink_anchor(out: &mut String, id: &str) -> Result<(), ServerError> {
    write!(
        out,
        r#"<a class="permalink" href="{}" target="_blank" rel="noopener noreferrer">View on avalanche.ca</a>"#,
        escape_html(&permalink(id))
    )?;
    Ok(())
}

fn card(out: &mut String, obs: &ObservationSummary, selected: bool) -> Result<(), ServerError> {
    write!(
        out,
        r#"<article class="card{}" id="observation-{}"><div class="card-header"><h2 class="title"><a href="{}" data-observation="{}">{}</a></h2><span class="image-count">{} {}</span></div>"#,
        if selected { " card-selected" } else { "" },
        escape_html(&obs.id),
        escape_html(&PageParams::selection_href(&obs.id)),
        escape_html(&obs.id),
        escape_html(&obs.title),
        '\u{1f4f7}',
        obs.image_count
    )?;

    out.push_str(r#"<div class="metadata">"#);
    meta_item(out, "Submitted by:", &obs.username)?;
    meta_item(out, "Date:", &format_timestamp(&obs.datetime))?;
    meta_item(out, "Location:", &format_coordinates(&obs.location))?;
    out.push_str("</div>");

    out.push_str(r#"<div class="mini-map-section">"#);
    map_container(
        out,
        "mini",
        &single_scene(MapOptions::mini(), &obs.id, obs.location.into())?,
    )?;
    out.push_str("</div>");

    out.push_str(r#"<div class="observations"><h3>Observations</h3><div class="observation-grid">"#);
    for (category, count) in obs.observations.entries() {
        count_item(out, category, count)?;
    }
    out.push_str("</div></div>");

    tags(out, &obs.tags)?;
    permalink_anchor(out, &obs.id)?;
    out.push_str("</article>");
    Ok(())
}

fn panel_header(out: &mut String, title: &str) -> Result<(), ServerError> {
    write!(
        out,
        r#"<aside class="detail-panel"><a class="back-button" href="/" data-clear aria-label="Back to observations"><span class="back-button-icon">&larr;</span> Back to observations</a><div class="detail-header"><h2>{}</h2><a class="close-button" href="/" data-clear aria-label="Close details">&times;</a></div>"#,
        escape_html(title)
    )?;
    Ok(())
}

fn failure_notice(out: &mut String, failure: &DetailFailure) -> Result<(), ServerError> {
    write!(
        out,
        r#"<div class="error-notice">Could not load observation {}: {}</div>"#,
        escape_html(&failure.id),
        escape_html(&failure.message)
    )?;
    Ok(())
}

fn detail_panel<A: AddressBar>(out: &mut String, coordinator: &Coordinator<A>) -> Result<(), ServerError> {
    let failure = coordinator.last_error();
    match coordinator.phase() {
        Phase::Empty => {
            if let Some(failure) = failure {
                panel_header(out, "Observation unavailable")?;
                failure_notice(out, failure)?;
                out.push_str("</aside>");
            }
        }
        Phase::Loading { id } => loading_panel(out, id)?,
        Phase::Loaded { detail } => {
            panel_header(out, &detail.title)?;
            if let Some(failure) = failure {
                failure_notice(out, failure)?;
            }
            detail_content(out, detail)?;
            out.push_str("</aside>");
        }
    }
    Ok(())
}

fn loading_panel(out: &mut String, id: &str) -> Result<(), ServerError> {
    panel_header(out, id)?;
    out.push_str(r#"<div class="loading">Loading...</div></aside>"#);
    Ok(())
}

fn detail_content(out: &mut String, detail: &ObservationDetail) -> Result<(), ServerError> {
    out.push_str(r#"<div class="detail-content">"#);

    out.push_str(r#"<section class="detail-section"><h3>Information</h3><div class="detail-meta">"#);
    meta_item(out, "Submitted by:", &detail.username)?;
    meta_item(out, "Date:", &format_timestamp(&detail.datetime))?;
    meta_item(out, "Region:", &detail.region)?;
    meta_item(out, "Location:", &format_coordinates(&detail.location))?;
    out.push_str("</div></section>");

    out.push_str(r#"<section class="detail-section"><h3>Location Map</h3>"#);
    map_container(
        out,
        "detail",
        &single_scene(
            MapOptions::detail(),
            &detail.submission_id,
            detail.location.into(),
        )?,
    )?;
    out.push_str("</section>");

    if let Some(comment) = detail.comment() {
        write!(
            out,
            r#"<section class="detail-section"><h3>Comments</h3><p class="comment">{}</p></section>"#,
            escape_html(comment)
        )?;
    }

    if let Some(quick) = &detail.observations.quick {
        let lists = quick.condition_lists();
        if !lists.is_empty() || quick.riding_quality.is_some() {
            out.push_str(r#"<section class="detail-section"><h3>Quick Report</h3>"#);
            if let Some(quality) = &quick.riding_quality {
                meta_item(out, "Riding quality:", quality)?;
            }
            for (label, values) in lists {
                write!(out, r#"<h4>{label}</h4><ul class="condition-list">"#)?;
                for value in values {
                    write!(out, "<li>{}</li>", escape_html(value))?;
                }
                out.push_str("</ul>");
            }
            out.push_str("</section>");
        }
    }

    out.push_str(r#"<section class="detail-section"><h3>Observation Counts</h3><div class="observation-grid">"#);
    for (category, count) in detail.observation_counts.reported() {
        count_item(out, category, count)?;
    }
    out.push_str("</div></section>");

    if !detail.tags.is_empty() {
        out.push_str(r#"<section class="detail-section"><h3>Tags</h3>"#);
        tags(out, &detail.tags)?;
        out.push_str("</section>");
    }

    if !detail.images.is_empty() {
        write!(
            out,
            r#"<section class="detail-section"><h3>Images ({})</h3><div class="image-grid">"#,
            detail.images.len()
        )?;
        for (index, image) in detail.images.iter().enumerate() {
            write!(
                out,
                r#"<img src="{}" alt="Observation image {}" class="detail-image" loading="lazy">"#,
                escape_html(&image.url),
                index + 1
            )?;
        }
        out.push_str("</div></section>");
    }

    permalink_anchor(out, &detail.submission_id)?;
    out.push_str("</div>");
    Ok(())
}

/// Escapes text for use in HTML content and double- or single-quoted
/// attributes.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use min_explorer_coordinator::MemoryAddressBar;

    use super::*;

    fn summary_page(item_count: u64) -> SummaryPage {
        serde_json::from_value(serde_json::json!({
            "items": { "data": [
                {
                    "id": "abc123",
                    "title": "Whumpfing on <Brandywine>",
                    "username": "skier42",
                    "datetime": "2025-01-10T18:22:00.000Z",
                    "location": { "latitude": 49.2, "longitude": -122.9 },
                    "region": "Southwest Coast",
                    "imageCount": 2,
                    "observations": { "quick": 1, "avalanche": 0, "snowpack": 1, "weather": 0, "incident": 0 },
                    "tags": ["whumpf", "whumpf"]
                },
                {
                    "id": "def456",
                    "title": "Powder day",
                    "username": "board_b",
                    "datetime": "2025-01-11T09:05:00-08:00",
                    "location": { "latitude": 49.4, "longitude": -122.6 },
                    "region": "Southwest Coast",
                    "imageCount": 0,
                    "observations": { "quick": 1, "avalanche": 0, "snowpack": 0, "weather": 0, "incident": 0 }
                }
            ]},
            "itemCount": item_count
        }))
        .unwrap()
    }

    fn detail() -> ObservationDetail {
        serde_json::from_value(serde_json::json!({
            "submissionID": "abc123",
            "title": "Whumpfing on <Brandywine>",
            "username": "skier42",
            "datetime": "2025-01-10T18:22:00.000Z",
            "location": { "latitude": 49.2, "longitude": -122.9 },
            "region": "Southwest Coast",
            "imageCount": 1,
            "observationCounts": { "quick": 1, "snowpack": 1 },
            "tags": ["whumpf"],
            "observations": {
                "quick": {
                    "rideType": ["Skiing"],
                    "ridingQuality": "Good",
                    "comment": "  Big collapse near the ridge.  "
                }
            },
            "images": [
                { "id": "img1", "url": "https://example.org/a.jpg", "width": 800, "height": 600 }
            ]
        }))
        .unwrap()
    }

    fn loaded(view: ViewMode) -> Coordinator<MemoryAddressBar> {
        let mut coordinator = Coordinator::new(MemoryAddressBar::with_selection(Some("abc123")));
        coordinator.set_view_mode(view);
        let request = coordinator.restore_from_url().unwrap();
        coordinator.complete(request, Ok::<_, String>(detail()));
        coordinator
    }

    #[test]
    fn one_card_per_listed_observation_regardless_of_item_count() {
        let coordinator = Coordinator::new(MemoryAddressBar::new());
        let html = page(&summary_page(57), "Southwest Coast", &coordinator, &MapConfig::default()).unwrap();

        assert_eq!(html.matches(r#"<article class="card"#).count(), 2);
        assert!(html.contains("Southwest Coast \u{2022} 57 observations from the last week"));
        assert!(!html.contains("detail-panel"));
    }

    #[test]
    fn card_shows_metadata_counts_and_tags() {
        let coordinator = Coordinator::new(MemoryAddressBar::new());
        let html = page(&summary_page(2), "Southwest Coast", &coordinator, &MapConfig::default()).unwrap();

        assert!(html.contains(
            r#"<a href="?observation=abc123" data-observation="abc123">Whumpfing on &lt;Brandywine&gt;</a>"#
        ));
        assert!(html.contains("Jan 10, 2025, 6:22 PM"));
        assert!(html.contains("Jan 11, 2025, 9:05 AM"));
        assert!(html.contains("49.2000, -122.9000"));
        assert_eq!(html.matches(r#"<span class="tag">whumpf</span>"#).count(), 2);

        let quick = html.find(">Quick<").unwrap();
        let incident = html.find(">Incident<").unwrap();
        assert!(quick < incident);
    }

    #[test]
    fn selected_observation_is_highlighted_and_detailed() {
        let html = page(
            &summary_page(2),
            "Southwest Coast",
            &loaded(ViewMode::List),
            &MapConfig::default(),
        )
        .unwrap();

        assert!(html.contains(r#"<article class="card card-selected" id="observation-abc123">"#));
        assert!(html.contains("list-container-split"));
        assert!(html.contains(r#"<p class="comment">Big collapse near the ridge.</p>"#));
        assert!(html.contains("<h3>Images (1)</h3>"));
        assert!(html.contains(r#"<li>Skiing</li>"#));
        assert!(html.contains("https://avalanche.ca/map?panel=mountain-information-network-submissions/abc123"));
        assert!(html.contains(r#"class="map map-detail""#));
    }

    #[test]
    fn overview_marks_selected_marker() {
        let page = summary_page(2);
        let scene = overview_scene(page.observations(), Some("def456")).unwrap();

        assert_eq!(scene.markers.len(), 2);
        assert_eq!(scene.selected().unwrap().id, "def456");
        assert_eq!(scene.markers[0].href.as_deref(), Some("?observation=abc123"));
    }

    #[test]
    fn map_view_hides_list_but_keeps_detail() {
        let html = page(
            &summary_page(2),
            "Southwest Coast",
            &loaded(ViewMode::Map),
            &MapConfig::default(),
        )
        .unwrap();

        assert!(html.contains(r#"data-view-panel="list" hidden>"#));
        assert!(html.contains(r#"<section class="map-wrapper" data-view-panel="map">"#));
        assert!(html.contains("detail-panel"));
    }

    #[test]
    fn failed_detail_shows_notice() {
        let mut coordinator = Coordinator::new(MemoryAddressBar::with_selection(Some("missing")));
        let request = coordinator.restore_from_url().unwrap();
        coordinator.complete(request, Err::<ObservationDetail, _>("HTTP 404"));

        let html = page(&summary_page(2), "Southwest Coast", &coordinator, &MapConfig::default()).unwrap();

        assert!(html.contains("Could not load observation missing: HTTP 404"));
        assert_eq!(html.matches(r#"<article class="card"#).count(), 2);
    }

    #[test]
    fn page_carries_loading_template() {
        let html = page(&summary_page(2), "Southwest Coast", &loaded(ViewMode::List), &MapConfig::default()).unwrap();
        let template = html.find(r#"<template id="detail-loading">"#).unwrap();
        assert!(html[template..].contains(r#"<div class="loading">Loading...</div></aside></template>"#));
        assert_eq!(html.matches("data-clear").count(), 4);
    }

    #[test]
    fn fragment_follows_coordinator_phase() {
        let mut coordinator = Coordinator::new(MemoryAddressBar::new());
        assert_eq!(detail_fragment(&coordinator).unwrap(), "");

        let request = coordinator.select_observation("abc123");
        let loading = detail_fragment(&coordinator).unwrap();
        assert!(loading.starts_with(r#"<aside class="detail-panel">"#));
        assert!(loading.contains("<h2>abc123</h2>"));
        assert!(loading.contains(r#"<div class="loading">Loading...</div>"#));

        coordinator.complete(request, Ok::<_, String>(detail()));
        let loaded = detail_fragment(&coordinator).unwrap();
        assert!(loaded.contains("<h2>Whumpfing on &lt;Brandywine&gt;</h2>"));
        assert!(loaded.contains(r#"class="map map-detail""#));
        assert!(!loaded.contains("Loading..."));
        assert!(!loaded.contains("<article"));
    }

    #[test]
    fn error_page_escapes_message() {
        let html = error_page("Southwest Coast", "<boom>", &MapConfig::default()).unwrap();
        assert!(html.contains("Failed to fetch observations: &lt;boom&gt;"));
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & Jerry's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#39;s&lt;/a&gt;"
        );
    }
}
