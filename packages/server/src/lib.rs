#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web server for the MIN observation dashboard.
//!
//! Renders the dashboard page (header, list/map tabs, observation cards with
//! mini-maps, detail panel) on the server and proxies the two MIN endpoints
//! as a small JSON API. Map containers carry an embedded
//! [`MapScene`](min_explorer_map::MapScene) that `assets/map.js` replays
//! with `MapLibre` GL.
//!
//! Selection travels in the `observation` query parameter. Markers and card
//! titles point at `?observation=<id>`; in the browser a click pushes that
//! URL and swaps in the panel from `/fragments/detail` without reloading,
//! while a reload restores the same selection on the server.

pub mod assets;
mod handlers;
pub mod interactive;
pub mod render;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use min_explorer_gateway::{AvalancheCanadaClient, GatewayConfig, GatewayError, ObservationSource};
use min_explorer_map::MapError;
use thiserror::Error;

/// Environment variable overriding the map style URL.
pub const MAP_STYLE_URL_ENV: &str = "MAP_STYLE_URL";

/// Environment variable holding an optional access token for the map style.
pub const MAP_ACCESS_TOKEN_ENV: &str = "MAP_ACCESS_TOKEN";

/// Style used when [`MAP_STYLE_URL_ENV`] is unset.
pub const DEFAULT_MAP_STYLE_URL: &str = "https://tiles.openfreemap.org/styles/liberty";

/// Errors from starting the server or rendering a page.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Gateway configuration or request failure.
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// A map scene could not be built.
    #[error(transparent)]
    Map(#[from] MapError),

    /// Writing markup failed.
    #[error("Render error: {0}")]
    Fmt(#[from] std::fmt::Error),

    /// Binding or running the HTTP server failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Browser-side map settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapConfig {
    /// `MapLibre` style document URL.
    pub style_url: String,
    /// Appended as `access_token` to requests for the style's resources.
    pub access_token: Option<String>,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            style_url: DEFAULT_MAP_STYLE_URL.to_string(),
            access_token: None,
        }
    }
}

impl MapConfig {
    /// Reads [`MAP_STYLE_URL_ENV`] and [`MAP_ACCESS_TOKEN_ENV`]; blank values
    /// count as unset.
    #[must_use]
    pub fn from_env() -> Self {
        let non_blank = |name: &str| {
            std::env::var(name)
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        Self {
            style_url: non_blank(MAP_STYLE_URL_ENV)
                .unwrap_or_else(|| DEFAULT_MAP_STYLE_URL.to_string()),
            access_token: non_blank(MAP_ACCESS_TOKEN_ENV),
        }
    }
}

/// Shared application state.
pub struct AppState {
    /// Where observations come from.
    pub source: Arc<dyn ObservationSource>,
    /// Length of the trailing list window, in days.
    pub window_days: u32,
    /// Browser-side map settings.
    pub map: MapConfig,
}

/// Registers every route on `cfg`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(handlers::index))
        .service(
            web::scope("/api")
                .route("/health", web::get().to(handlers::health))
                .route("/observations", web::get().to(handlers::observations))
                .route("/observations/{id}", web::get().to(handlers::observation)),
        )
        .route("/fragments/detail", web::get().to(handlers::detail_fragment))
        .service(
            web::scope("/assets")
                .route("/app.css", web::get().to(handlers::app_css))
                .route("/map.js", web::get().to(handlers::map_js)),
        );
}

/// Initializes `pretty_env_logger` unless a logger is already installed.
pub fn init_logger() {
    if pretty_env_logger::try_init_custom_env("RUST_LOG").is_err() {
        log::debug!("Logger already initialized");
    }
}

/// Starts the dashboard server.
///
/// Loads the gateway configuration (embedded TOML plus `MIN_API_BASE_URL` /
/// `MIN_REGION` overrides), builds the MIN client, and serves on
/// `BIND_ADDR:PORT` (default `127.0.0.1:8080`). The caller provides the
/// async runtime (e.g. via `#[actix_web::main]`).
///
/// # Errors
///
/// * [`ServerError::Gateway`] if the configuration is invalid
/// * [`ServerError::Io`] if the HTTP server fails to bind or run
#[allow(clippy::future_not_send)]
pub async fn run_server() -> Result<(), ServerError> {
    init_logger();

    let config = GatewayConfig::from_env()?;
    log::info!(
        "Using MIN API at {} for region '{}'",
        config.base_url,
        config.region
    );
    let client = AvalancheCanadaClient::new(&config)?;

    let state = web::Data::new(AppState {
        source: Arc::new(client),
        window_days: config.window_days,
        map: MapConfig::from_env(),
    });

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((bind_addr, port))?
    .run()
    .await?;

    Ok(())
}
