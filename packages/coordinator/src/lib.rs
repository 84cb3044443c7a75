#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! View-state coordinator.
//!
//! Single source of truth for which observation is open. The list
//! highlight, the map's selected marker, and the detail panel all read from
//! a [`Coordinator`]; the [`AddressBar`] mirrors its selection so a reload
//! reproduces the same view.
//!
//! Selecting is split in two so overlapping fetches can't clobber each
//! other:
//!
//! 1. [`Coordinator::select_observation`] updates the URL immediately and
//!    hands back a [`DetailRequest`] carrying a fresh token.
//! 2. Whoever performs the fetch passes the outcome to
//!    [`Coordinator::complete`], which applies it only if that token is still
//!    the latest one.
//!
//! [`Coordinator::select_and_load`] does both against an
//! [`ObservationSource`] for callers that fetch one at a time.

pub mod address_bar;

use std::fmt::Display;

use min_explorer_gateway::ObservationSource;
use min_explorer_observation_models::{ObservationDetail, ViewMode};

pub use address_bar::{AddressBar, MemoryAddressBar};

/// A detail fetch the coordinator is waiting on.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "the fetch outcome must be passed to Coordinator::complete"]
pub struct DetailRequest {
    token: u64,
    id: String,
}

impl DetailRequest {
    /// Identifier to fetch.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Token identifying this request; later requests have larger tokens.
    #[must_use]
    pub const fn token(&self) -> u64 {
        self.token
    }
}

/// What [`Coordinator::complete`] did with an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The fetched detail is now the held detail.
    Applied,
    /// The fetch failed; the previously held detail was kept.
    Failed,
    /// A newer selection (or a clear) superseded the request; nothing
    /// changed.
    Stale,
}

/// A detail fetch that failed, as shown to consumers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailFailure {
    /// Identifier that could not be loaded.
    pub id: String,
    /// Human-readable reason.
    pub message: String,
}

/// What the detail panel should show.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Phase<'a> {
    /// Nothing is open.
    Empty,
    /// A fetch for `id` is outstanding; show a loading indicator.
    Loading {
        /// Identifier being fetched.
        id: &'a str,
    },
    /// `detail` is open.
    Loaded {
        /// The open observation.
        detail: &'a ObservationDetail,
    },
}

/// Keeps selection, held detail, and the URL in agreement.
#[derive(Debug)]
pub struct Coordinator<A: AddressBar> {
    address_bar: A,
    selected: Option<String>,
    detail: Option<ObservationDetail>,
    pending: Option<DetailRequest>,
    last_token: u64,
    last_error: Option<DetailFailure>,
    view_mode: ViewMode,
}

impl<A: AddressBar> Coordinator<A> {
    /// A coordinator with nothing selected, in list view. Call
    /// [`Self::restore_from_url`] once after construction to pick up a
    /// selection carried by the URL.
    #[must_use]
    pub const fn new(address_bar: A) -> Self {
        Self {
            address_bar,
            selected: None,
            detail: None,
            pending: None,
            last_token: 0,
            last_error: None,
            view_mode: ViewMode::List,
        }
    }

    /// Opens `id`: writes it to the URL right away and starts a new request.
    ///
    /// Unknown identifiers are passed through; their fetch will simply fail.
    pub fn select_observation(&mut self, id: &str) -> DetailRequest {
        self.address_bar.push_selection(Some(id));
        self.begin(id)
    }

    /// Picks up the selection already present in the URL, without writing
    /// the URL again. Returns `None` when the URL carries no selection.
    pub fn restore_from_url(&mut self) -> Option<DetailRequest> {
        let id = self.address_bar.selection()?;
        log::debug!("Restoring selection {id} from URL");
        Some(self.begin(&id))
    }

    fn begin(&mut self, id: &str) -> DetailRequest {
        self.last_token += 1;
        let request = DetailRequest {
            token: self.last_token,
            id: id.to_string(),
        };
        self.selected = Some(id.to_string());
        self.last_error = None;
        self.pending = Some(request.clone());
        request
    }

    /// Applies the outcome of `request`'s fetch if `request` is still the
    /// latest one.
    ///
    /// On failure the error is logged and recorded in
    /// [`Self::last_error`]; whatever detail was held before stays held.
    pub fn complete<E: Display>(
        &mut self,
        request: DetailRequest,
        outcome: Result<ObservationDetail, E>,
    ) -> Completion {
        if self.pending.as_ref() != Some(&request) {
            log::debug!(
                "Discarding stale response for {} (token {})",
                request.id,
                request.token
            );
            return Completion::Stale;
        }
        self.pending = None;

        match outcome {
            Ok(detail) => {
                if detail.submission_id != request.id {
                    log::warn!(
                        "Requested observation {} but received {}",
                        request.id,
                        detail.submission_id
                    );
                }
                self.detail = Some(detail);
                Completion::Applied
            }
            Err(e) => {
                log::warn!("Failed to fetch observation {}: {e}", request.id);
                self.last_error = Some(DetailFailure {
                    id: request.id,
                    message: e.to_string(),
                });
                Completion::Failed
            }
        }
    }

    /// [`Self::select_observation`], then fetches from `source` and
    /// [`Self::complete`]s.
    pub async fn select_and_load<S>(&mut self, source: &S, id: &str) -> Completion
    where
        S: ObservationSource + ?Sized,
    {
        let request = self.select_observation(id);
        let outcome = source.detail(request.id()).await;
        self.complete(request, outcome)
    }

    /// [`Self::restore_from_url`], then fetches from `source` and
    /// [`Self::complete`]s. `None` when the URL carries no selection.
    pub async fn restore_and_load<S>(&mut self, source: &S) -> Option<Completion>
    where
        S: ObservationSource + ?Sized,
    {
        let request = self.restore_from_url()?;
        let outcome = source.detail(request.id()).await;
        Some(self.complete(request, outcome))
    }

    /// Closes the detail panel and removes the selection from the URL. Any
    /// outstanding request becomes stale.
    pub fn clear_selection(&mut self) {
        self.selected = None;
        self.detail = None;
        self.pending = None;
        self.last_error = None;
        self.address_bar.push_selection(None);
    }

    /// Switches between list and map. Never touches the selection or URL.
    pub const fn set_view_mode(&mut self, mode: ViewMode) {
        self.view_mode = mode;
    }

    /// Active view mode.
    #[must_use]
    pub const fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    /// Selected identifier (what the URL says).
    #[must_use]
    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Whether a fetch is outstanding.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// The held detail, which may belong to an earlier selection if the
    /// latest fetch failed. Prefer [`Self::phase`] for rendering.
    #[must_use]
    pub const fn detail(&self) -> Option<&ObservationDetail> {
        self.detail.as_ref()
    }

    /// Why the latest fetch failed, until the next selection or clear.
    #[must_use]
    pub const fn last_error(&self) -> Option<&DetailFailure> {
        self.last_error.as_ref()
    }

    /// What the detail panel should show. Never exposes held detail while a
    /// fetch is outstanding.
    #[must_use]
    pub fn phase(&self) -> Phase<'_> {
        if let Some(request) = &self.pending {
            return Phase::Loading { id: &request.id };
        }
        self.detail
            .as_ref()
            .map_or(Phase::Empty, |detail| Phase::Loaded { detail })
    }

    /// Whether the in-memory selection and the URL agree.
    #[must_use]
    pub fn is_in_sync(&self) -> bool {
        self.address_bar.selection().as_deref() == self.selected.as_deref()
    }

    /// The address bar.
    #[must_use]
    pub const fn address_bar(&self) -> &A {
        &self.address_bar
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use min_explorer_gateway::{GatewayError, ListQuery};
    use min_explorer_observation_models::SummaryPage;

    use super::*;

    fn detail(id: &str, title: &str) -> ObservationDetail {
        serde_json::from_value(serde_json::json!({
            "submissionID": id,
            "title": title,
            "username": "skier42",
            "datetime": "2025-01-10T18:22:00.000Z",
            "location": { "latitude": 49.2, "longitude": -122.9 },
            "region": "Southwest Coast"
        }))
        .unwrap()
    }

    fn not_found(id: &str) -> GatewayError {
        GatewayError::Status {
            status: 404,
            url: format!("https://example.org/submissions/{id}"),
        }
    }

    /// In-memory source that records every detail request.
    #[derive(Default)]
    struct FakeSource {
        details: BTreeMap<String, ObservationDetail>,
        requested: Mutex<Vec<String>>,
    }

    impl FakeSource {
        fn with(details: &[ObservationDetail]) -> Self {
            Self {
                details: details
                    .iter()
                    .map(|d| (d.submission_id.clone(), d.clone()))
                    .collect(),
                requested: Mutex::default(),
            }
        }

        fn requested(&self) -> Vec<String> {
            self.requested.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ObservationSource for FakeSource {
        fn region(&self) -> &str {
            "Southwest Coast"
        }

        async fn list(&self, _query: &ListQuery) -> Result<SummaryPage, GatewayError> {
            Ok(SummaryPage::default())
        }

        async fn detail(&self, id: &str) -> Result<ObservationDetail, GatewayError> {
            self.requested.lock().unwrap().push(id.to_string());
            self.details.get(id).cloned().ok_or_else(|| not_found(id))
        }
    }

    #[test]
    fn starts_empty_in_list_view() {
        let coordinator = Coordinator::new(MemoryAddressBar::new());
        assert_eq!(coordinator.phase(), Phase::Empty);
        assert_eq!(coordinator.view_mode(), ViewMode::List);
        assert!(coordinator.is_in_sync());
    }

    #[test]
    fn url_is_written_before_the_fetch_resolves() {
        let mut coordinator = Coordinator::new(MemoryAddressBar::new());
        let request = coordinator.select_observation("abc123");

        assert_eq!(
            coordinator.address_bar().selection().as_deref(),
            Some("abc123")
        );
        assert_eq!(coordinator.phase(), Phase::Loading { id: "abc123" });
        assert!(coordinator.is_in_sync());

        let outcome: Result<_, GatewayError> = Ok(detail("abc123", "Slab"));
        assert_eq!(coordinator.complete(request, outcome), Completion::Applied);
        assert!(matches!(
            coordinator.phase(),
            Phase::Loaded { detail } if detail.title == "Slab"
        ));
        assert!(coordinator.is_in_sync());
    }

    #[test]
    fn select_then_clear_leaves_no_selection() {
        let mut coordinator = Coordinator::new(MemoryAddressBar::new());
        let request = coordinator.select_observation("abc123");
        coordinator.clear_selection();

        assert_eq!(coordinator.address_bar().selection(), None);
        assert_eq!(coordinator.phase(), Phase::Empty);
        assert!(coordinator.is_in_sync());

        // The late response must not reopen the panel.
        let outcome: Result<_, GatewayError> = Ok(detail("abc123", "Slab"));
        assert_eq!(coordinator.complete(request, outcome), Completion::Stale);
        assert_eq!(coordinator.phase(), Phase::Empty);
        assert!(coordinator.detail().is_none());
    }

    #[test]
    fn restore_issues_one_request_without_rewriting_the_url() {
        let mut coordinator = Coordinator::new(MemoryAddressBar::with_selection(Some("abc123")));
        let request = coordinator.restore_from_url().unwrap();

        assert_eq!(request.id(), "abc123");
        assert_eq!(coordinator.phase(), Phase::Loading { id: "abc123" });
        assert_eq!(coordinator.address_bar().pushes(), 0);
        assert!(coordinator.is_in_sync());
    }

    #[test]
    fn restore_without_parameter_does_nothing() {
        let mut coordinator = Coordinator::new(MemoryAddressBar::new());
        assert!(coordinator.restore_from_url().is_none());
        assert_eq!(coordinator.phase(), Phase::Empty);
    }

    #[tokio::test]
    async fn restore_and_load_fetches_exactly_once() {
        let source = FakeSource::with(&[detail("abc123", "Slab")]);
        let mut coordinator = Coordinator::new(MemoryAddressBar::with_selection(Some("abc123")));

        let completion = coordinator.restore_and_load(&source).await;

        assert_eq!(completion, Some(Completion::Applied));
        assert_eq!(source.requested(), vec!["abc123".to_string()]);
        assert_eq!(coordinator.detail().unwrap().submission_id, "abc123");
    }

    #[test]
    fn latest_selection_wins_when_responses_arrive_out_of_order() {
        let mut coordinator = Coordinator::new(MemoryAddressBar::new());
        let first = coordinator.select_observation("a");
        let second = coordinator.select_observation("b");
        assert!(second.token() > first.token());

        let outcome: Result<_, GatewayError> = Ok(detail("b", "Bravo"));
        assert_eq!(coordinator.complete(second, outcome), Completion::Applied);
        let outcome: Result<_, GatewayError> = Ok(detail("a", "Alpha"));
        assert_eq!(coordinator.complete(first, outcome), Completion::Stale);

        assert_eq!(coordinator.detail().unwrap().submission_id, "b");
        assert_eq!(coordinator.selected_id(), Some("b"));
        assert!(coordinator.is_in_sync());
    }

    #[test]
    fn early_stale_response_does_not_end_loading() {
        let mut coordinator = Coordinator::new(MemoryAddressBar::new());
        let first = coordinator.select_observation("a");
        let _second = coordinator.select_observation("b");

        let outcome: Result<_, GatewayError> = Ok(detail("a", "Alpha"));
        assert_eq!(coordinator.complete(first, outcome), Completion::Stale);
        assert_eq!(coordinator.phase(), Phase::Loading { id: "b" });
        assert!(coordinator.detail().is_none());
    }

    #[tokio::test]
    async fn failed_fetch_keeps_previous_detail() {
        let source = FakeSource::with(&[detail("a", "Alpha")]);
        let mut coordinator = Coordinator::new(MemoryAddressBar::new());

        assert_eq!(
            coordinator.select_and_load(&source, "a").await,
            Completion::Applied
        );
        assert_eq!(
            coordinator.select_and_load(&source, "missing").await,
            Completion::Failed
        );

        assert!(matches!(
            coordinator.phase(),
            Phase::Loaded { detail } if detail.submission_id == "a"
        ));
        let failure = coordinator.last_error().unwrap();
        assert_eq!(failure.id, "missing");
        assert!(failure.message.contains("404"));
        assert_eq!(coordinator.selected_id(), Some("missing"));
        assert!(coordinator.is_in_sync());
    }

    #[tokio::test]
    async fn new_selection_clears_previous_error() {
        let source = FakeSource::with(&[detail("a", "Alpha")]);
        let mut coordinator = Coordinator::new(MemoryAddressBar::new());

        coordinator.select_and_load(&source, "missing").await;
        assert!(coordinator.last_error().is_some());
        assert_eq!(coordinator.phase(), Phase::Empty);

        coordinator.select_and_load(&source, "a").await;
        assert!(coordinator.last_error().is_none());
    }

    #[tokio::test]
    async fn reload_reproduces_the_same_detail() {
        let source = FakeSource::with(&[detail("abc123", "Slab"), detail("def456", "Powder")]);

        let mut original = Coordinator::new(MemoryAddressBar::new());
        original.select_and_load(&source, "abc123").await;

        let url_after = original.address_bar().selection();
        let mut reloaded = Coordinator::new(MemoryAddressBar::with_selection(url_after.as_deref()));
        reloaded.restore_and_load(&source).await;

        assert_eq!(original.detail(), reloaded.detail());
        assert_eq!(original.selected_id(), reloaded.selected_id());
    }

    #[test]
    fn view_mode_is_independent_of_selection() {
        let mut coordinator = Coordinator::new(MemoryAddressBar::new());
        let _request = coordinator.select_observation("abc123");
        let pushes = coordinator.address_bar().pushes();

        coordinator.set_view_mode(ViewMode::Map);

        assert_eq!(coordinator.view_mode(), ViewMode::Map);
        assert_eq!(coordinator.selected_id(), Some("abc123"));
        assert_eq!(coordinator.address_bar().pushes(), pushes);
    }
}
