//! One browsing session: the fetched list plus the view state over it.

use min_explorer_coordinator::{Completion, Coordinator};
use min_explorer_gateway::{DateWindow, ListQuery, ObservationSource};
use min_explorer_observation_models::{SummaryPage, ViewMode};

use crate::{BrowseError, DeepLink};

/// The observation list of one session and the coordinator driving the
/// selection over it.
pub struct Session<'s, S: ObservationSource + ?Sized> {
    source: &'s S,
    page: SummaryPage,
    coordinator: Coordinator<DeepLink>,
}

impl<'s, S: ObservationSource + ?Sized> Session<'s, S> {
    /// Fetches the trailing `window_days` of observations, then restores and
    /// loads the selection carried by `link`.
    ///
    /// # Errors
    ///
    /// Returns [`BrowseError::Gateway`] if the list can't be fetched. A
    /// failed detail fetch is not an error; it shows up in the detail view.
    pub async fn open(source: &'s S, link: DeepLink, window_days: u32) -> Result<Self, BrowseError> {
        let query = ListQuery::new(DateWindow::trailing_from_now(window_days), source.region());
        let page = source.list(&query).await?;
        log::info!(
            "Fetched {} observations for {}",
            page.observations().len(),
            source.region()
        );

        let mut coordinator = Coordinator::new(link);
        coordinator.restore_and_load(source).await;

        Ok(Self {
            source,
            page,
            coordinator,
        })
    }

    /// Opens `id` and waits for its detail.
    pub async fn select(&mut self, id: &str) -> Completion {
        self.coordinator.select_and_load(self.source, id).await
    }

    /// Closes the detail view.
    pub fn clear(&mut self) {
        self.coordinator.clear_selection();
    }

    /// Switches between list and map view and returns the new mode.
    pub fn toggle_view(&mut self) -> ViewMode {
        let mode = self.coordinator.view_mode().toggled();
        self.coordinator.set_view_mode(mode);
        mode
    }

    /// Region the list was fetched for.
    #[must_use]
    pub fn region(&self) -> &str {
        self.source.region()
    }

    /// The fetched list.
    #[must_use]
    pub const fn page(&self) -> &SummaryPage {
        &self.page
    }

    /// The view state.
    #[must_use]
    pub const fn coordinator(&self) -> &Coordinator<DeepLink> {
        &self.coordinator
    }

    /// The deep link reproducing the current selection.
    #[must_use]
    pub const fn link(&self) -> &DeepLink {
        self.coordinator.address_bar()
    }
}
