//! Static assets compiled into the binary.

/// Dashboard stylesheet, served at `/assets/app.css`.
pub const APP_CSS: &str = include_str!("../assets/app.css");

/// `MapLibre` bootstrap that replays embedded map scenes, switches tabs and
/// swaps the detail panel on selection, served at `/assets/map.js`.
pub const MAP_JS: &str = include_str!("../assets/map.js");

/// Pinned `MapLibre` GL release loaded by the page.
pub const MAPLIBRE_VERSION: &str = "4.7.1";

/// `MapLibre` stylesheet URL.
#[must_use]
pub fn maplibre_css_url() -> String {
    format!("https://unpkg.com/maplibre-gl@{MAPLIBRE_VERSION}/dist/maplibre-gl.css")
}

/// `MapLibre` script URL.
#[must_use]
pub fn maplibre_js_url() -> String {
    format!("https://unpkg.com/maplibre-gl@{MAPLIBRE_VERSION}/dist/maplibre-gl.js")
}
