//! HTTP handler functions for the dashboard and its JSON API.

use actix_web::{
    HttpResponse,
    http::{StatusCode, header::ContentType},
    web,
};
use min_explorer_coordinator::{Coordinator, MemoryAddressBar};
use min_explorer_gateway::{DateWindow, GatewayError, ListQuery};
use min_explorer_server_models::{ApiError, ApiHealth, PageParams};

use crate::{AppState, assets, render};

fn list_query(state: &AppState) -> ListQuery {
    ListQuery::new(
        DateWindow::trailing_from_now(state.window_days),
        state.source.region(),
    )
}

/// `GET /`
///
/// Fetches the summary list, restores the selection carried by
/// `?observation=`, loads its detail, and renders the page.
pub async fn index(state: web::Data<AppState>, params: web::Query<PageParams>) -> HttpResponse {
    let region = state.source.region();

    let page = match state.source.list(&list_query(&state)).await {
        Ok(page) => page,
        Err(e) => {
            log::error!("Failed to fetch observations: {e}");
            return match render::error_page(region, &e.to_string(), &state.map) {
                Ok(html) => HttpResponse::BadGateway()
                    .content_type(ContentType::html())
                    .body(html),
                Err(e) => {
                    log::error!("Failed to render error page: {e}");
                    HttpResponse::BadGateway().finish()
                }
            };
        }
    };
    log::debug!(
        "Fetched {} observations (itemCount {})",
        page.observations().len(),
        page.item_count
    );

    let params = params.into_inner();
    let mut coordinator = Coordinator::new(MemoryAddressBar::with_selection(
        params.observation.as_deref(),
    ));
    if let Some(view) = params.view {
        coordinator.set_view_mode(view);
    }
    coordinator.restore_and_load(state.source.as_ref()).await;

    match render::page(&page, region, &coordinator, &state.map) {
        Ok(html) => HttpResponse::Ok().content_type(ContentType::html()).body(html),
        Err(e) => {
            log::error!("Failed to render page: {e}");
            HttpResponse::InternalServerError().json(ApiError::new("Failed to render page"))
        }
    }
}

/// `GET /fragments/detail?observation=<id>`
///
/// The detail panel for one selection, swapped into the page by the browser
/// without reloading it. The status mirrors [`observation`]: 404 when the
/// observation doesn't exist, 502 for any other failure. Failure bodies carry
/// the notice panel.
pub async fn detail_fragment(
    state: web::Data<AppState>,
    params: web::Query<PageParams>,
) -> HttpResponse {
    let Some(id) = params.into_inner().observation else {
        return HttpResponse::BadRequest().json(ApiError::new("Missing observation parameter"));
    };

    let mut coordinator = Coordinator::new(MemoryAddressBar::new());
    let request = coordinator.select_observation(&id);
    let status = match state.source.detail(&id).await {
        Ok(detail) => {
            coordinator.complete(request, Ok::<_, GatewayError>(detail));
            StatusCode::OK
        }
        Err(e) => {
            let status = if e.is_not_found() {
                StatusCode::NOT_FOUND
            } else {
                StatusCode::BAD_GATEWAY
            };
            coordinator.complete(request, Err(e));
            status
        }
    };

    match render::detail_fragment(&coordinator) {
        Ok(html) => HttpResponse::build(status)
            .content_type(ContentType::html())
            .body(html),
        Err(e) => {
            log::error!("Failed to render detail for {id}: {e}");
            HttpResponse::InternalServerError().json(ApiError::new("Failed to render detail"))
        }
    }
}

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/observations`
///
/// The summary page for the configured region and trailing window, as
/// returned upstream.
pub async fn observations(state: web::Data<AppState>) -> HttpResponse {
    match state.source.list(&list_query(&state)).await {
        Ok(page) => HttpResponse::Ok().json(page),
        Err(e) => {
            log::error!("Failed to fetch observations: {e}");
            HttpResponse::BadGateway().json(ApiError::new("Failed to fetch observations"))
        }
    }
}

/// `GET /api/observations/{id}`
///
/// One detail record. Upstream 404 maps to 404; every other failure to 502.
pub async fn observation(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    let id = path.into_inner();
    match state.source.detail(&id).await {
        Ok(detail) => HttpResponse::Ok().json(detail),
        Err(e) if e.is_not_found() => {
            log::debug!("Observation {id} not found");
            HttpResponse::NotFound().json(ApiError::new(format!("Observation {id} not found")))
        }
        Err(e) => {
            log::warn!("Failed to fetch observation {id}: {e}");
            HttpResponse::BadGateway().json(ApiError::new("Failed to fetch observation"))
        }
    }
}

/// `GET /assets/app.css`
pub async fn app_css() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/css; charset=utf-8")
        .body(assets::APP_CSS)
}

/// `GET /assets/map.js`
pub async fn map_js() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/javascript; charset=utf-8")
        .body(assets::MAP_JS)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use actix_web::{App, test};
    use async_trait::async_trait;
    use min_explorer_gateway::ObservationSource;
    use min_explorer_observation_models::{ObservationDetail, SummaryPage};

    use super::*;
    use crate::{MapConfig, configure};

    struct FakeSource {
        page: Option<SummaryPage>,
        details: BTreeMap<String, ObservationDetail>,
        detail_calls: AtomicUsize,
    }

    #[async_trait]
    impl ObservationSource for FakeSource {
        fn region(&self) -> &str {
            "Southwest Coast"
        }

        async fn list(&self, _query: &ListQuery) -> Result<SummaryPage, GatewayError> {
            self.page.clone().ok_or(GatewayError::Status {
                status: 503,
                url: "https://example.org/submissions".to_string(),
            })
        }

        async fn detail(&self, id: &str) -> Result<ObservationDetail, GatewayError> {
            self.detail_calls.fetch_add(1, Ordering::SeqCst);
            match id {
                "broken" => Err(GatewayError::Status {
                    status: 500,
                    url: format!("https://example.org/submissions/{id}"),
                }),
                _ => self.details.get(id).cloned().ok_or_else(|| GatewayError::Status {
                    status: 404,
                    url: format!("https://example.org/submissions/{id}"),
                }),
            }
        }
    }

    fn summary_page() -> SummaryPage {
        serde_json::from_value(serde_json::json!({
            "items": { "data": [
                {
                    "id": "abc123",
                    "title": "Whumpfing",
                    "username": "skier42",
                    "datetime": "2025-01-10T18:22:00.000Z",
                    "location": { "latitude": 49.0, "longitude": -123.0 },
                    "region": "Southwest Coast"
                },
                {
                    "id": "def456",
                    "title": "Powder day",
                    "username": "board_b",
                    "datetime": "2025-01-11T09:05:00-08:00",
                    "location": { "latitude": 49.4, "longitude": -122.6 },
                    "region": "Southwest Coast"
                }
            ]},
            "itemCount": 40
        }))
        .unwrap()
    }

    fn detail() -> ObservationDetail {
        serde_json::from_value(serde_json::json!({
            "submissionID": "abc123",
            "title": "Whumpfing",
            "username": "skier42",
            "datetime": "2025-01-10T18:22:00.000Z",
            "location": { "latitude": 49.0, "longitude": -123.0 },
            "region": "Southwest Coast",
            "observations": { "quick": { "comment": "Shooting cracks below the col." } }
        }))
        .unwrap()
    }

    fn source(page: Option<SummaryPage>) -> Arc<FakeSource> {
        Arc::new(FakeSource {
            page,
            details: BTreeMap::from([("abc123".to_string(), detail())]),
            detail_calls: AtomicUsize::new(0),
        })
    }

    fn state(source: Arc<FakeSource>) -> web::Data<AppState> {
        web::Data::new(AppState {
            source,
            window_days: 7,
            map: MapConfig::default(),
        })
    }

    async fn get(source: Arc<FakeSource>, uri: &str) -> (StatusCode, String) {
        let app = test::init_service(App::new().app_data(state(source)).configure(configure)).await;
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        let status = resp.status();
        let body = test::read_body(resp).await;
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[actix_web::test]
    async fn index_renders_one_card_per_item_without_fetching_detail() {
        let source = source(Some(summary_page()));
        let (status, body) = get(Arc::clone(&source), "/").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.matches(r#"<article class="card"#).count(), 2);
        assert!(body.contains("40 observations from the last week"));
        assert_eq!(source.detail_calls.load(Ordering::SeqCst), 0);
    }

    #[actix_web::test]
    async fn index_restores_selection_with_one_detail_fetch() {
        let source = source(Some(summary_page()));
        let (status, body) = get(Arc::clone(&source), "/?observation=abc123").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(source.detail_calls.load(Ordering::SeqCst), 1);
        assert!(body.contains("Shooting cracks below the col."));
        assert!(body.contains("card-selected"));
    }

    #[actix_web::test]
    async fn reload_reproduces_the_same_page() {
        let source = source(Some(summary_page()));
        let (_, first) = get(Arc::clone(&source), "/?observation=abc123").await;
        let (_, second) = get(Arc::clone(&source), "/?observation=abc123").await;
        assert_eq!(first, second);
    }

    #[actix_web::test]
    async fn unknown_selection_shows_notice_and_keeps_list() {
        let source = source(Some(summary_page()));
        let (status, body) = get(source, "/?observation=missing").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Could not load observation missing"));
        assert_eq!(body.matches(r#"<article class="card"#).count(), 2);
    }

    #[actix_web::test]
    async fn list_failure_is_a_bad_gateway_page() {
        let (status, body) = get(source(None), "/").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(body.contains("Failed to fetch observations"));
    }

    #[actix_web::test]
    async fn api_detail_maps_upstream_status() {
        let (status, body) = get(source(None), "/api/observations/abc123").await;
        assert_eq!(status, StatusCode::OK);
        let value: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["submissionID"], "abc123");

        let (status, _) = get(source(None), "/api/observations/missing").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = get(source(None), "/api/observations/broken").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
    }

    #[actix_web::test]
    async fn detail_fragment_swaps_panel_without_the_page() {
        let source = source(None);
        let (status, body) = get(Arc::clone(&source), "/fragments/detail?observation=abc123").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.starts_with(r#"<aside class="detail-panel">"#));
        assert!(body.contains("Shooting cracks below the col."));
        assert!(!body.contains("<html"));
        assert_eq!(source.detail_calls.load(Ordering::SeqCst), 1);
    }

    #[actix_web::test]
    async fn detail_fragment_failures_carry_notice_and_status() {
        let (status, body) = get(source(None), "/fragments/detail?observation=missing").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("Could not load observation missing"));

        let (status, body) = get(source(None), "/fragments/detail?observation=broken").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(body.contains("Could not load observation broken"));

        let (status, _) = get(source(None), "/fragments/detail").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn api_list_proxies_page() {
        let (status, body) = get(source(Some(summary_page())), "/api/observations").await;
        assert_eq!(status, StatusCode::OK);
        let value: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["itemCount"], 40);
        assert_eq!(value["items"]["data"].as_array().unwrap().len(), 2);
    }

    #[actix_web::test]
    async fn health_and_assets_are_served() {
        let (status, body) = get(source(None), "/api/health").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("\"healthy\":true"));

        let (status, body) = get(source(None), "/assets/map.js").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("maplibregl"));
    }
}
