//! Interactive terminal browser.
//!
//! A `dialoguer` menu over a [`Session`]: open an observation from the list
//! or the map, switch views, close the detail, quit. The deep link is
//! printed after every change of selection.

use dialoguer::Select;
use min_explorer_coordinator::Completion;
use min_explorer_gateway::ObservationSource;
use min_explorer_observation_models::ViewMode;

use crate::text::{TerminalMap, detail_view, header, list_view};
use crate::{BrowseError, DeepLink, Session};

/// Top-level actions in the browser menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Open,
    ToggleView,
    Close,
    Quit,
}

impl Action {
    fn label(self, view: ViewMode) -> &'static str {
        match (self, view) {
            (Self::Open, ViewMode::List) => "Open an observation",
            (Self::Open, ViewMode::Map) => "Click a map marker",
            (Self::ToggleView, ViewMode::List) => "Switch to map view",
            (Self::ToggleView, ViewMode::Map) => "Switch to list view",
            (Self::Close, _) => "Close detail",
            (Self::Quit, _) => "Quit",
        }
    }
}

/// Runs the browser until the user quits.
///
/// # Errors
///
/// * [`BrowseError::Gateway`] if the observation list can't be fetched
/// * [`BrowseError::Prompt`] if a prompt fails
pub async fn run<S>(source: &S, link: DeepLink, window_days: u32) -> Result<(), BrowseError>
where
    S: ObservationSource + ?Sized,
{
    let mut session = Session::open(source, link, window_days).await?;
    println!("{}", header(session.region(), session.page()));

    loop {
        let view = session.coordinator().view_mode();
        let selected = session.coordinator().selected_id().map(str::to_string);
        let mut map = TerminalMap::new(session.page().observations(), selected.as_deref())?;

        match view {
            ViewMode::List => print!(
                "{}",
                list_view(session.page().observations(), selected.as_deref())?
            ),
            ViewMode::Map => print!("{}", map.render()?),
        }
        if let Some(detail) = detail_view(session.coordinator())? {
            println!();
            print!("{detail}");
        }
        println!("\nLink: {}\n", session.link());

        let mut actions = Vec::with_capacity(4);
        if !session.page().observations().is_empty() {
            actions.push(Action::Open);
        }
        actions.push(Action::ToggleView);
        if selected.is_some() {
            actions.push(Action::Close);
        }
        actions.push(Action::Quit);
        let labels: Vec<&str> = actions.iter().map(|a| a.label(view)).collect();

        let idx = Select::new()
            .with_prompt("What would you like to do?")
            .items(&labels)
            .default(0)
            .interact()?;

        match actions[idx] {
            Action::Open => {
                let id = match view {
                    ViewMode::List => pick_from_list(&session)?,
                    ViewMode::Map => pick_from_map(&mut map)?,
                };
                if let Some(id) = id {
                    println!("Loading {id}...");
                    match session.select(&id).await {
                        Completion::Applied => log::debug!("Opened {id}"),
                        Completion::Failed | Completion::Stale => {}
                    }
                }
            }
            Action::ToggleView => {
                session.toggle_view();
            }
            Action::Close => session.clear(),
            Action::Quit => return Ok(()),
        }
        println!();
    }
}

fn pick_from_list<S>(session: &Session<'_, S>) -> Result<Option<String>, BrowseError>
where
    S: ObservationSource + ?Sized,
{
    let observations = session.page().observations();
    let mut labels: Vec<String> = observations
        .iter()
        .map(|obs| format!("{} ({})", obs.title, obs.username))
        .collect();
    labels.push("Back".to_string());

    let idx = Select::new()
        .with_prompt("Observation")
        .items(&labels)
        .default(0)
        .interact()?;

    Ok(observations.get(idx).map(|obs| obs.id.clone()))
}

fn pick_from_map(map: &mut TerminalMap) -> Result<Option<String>, BrowseError> {
    let scene = map.scene();
    let mut labels: Vec<String> = scene
        .markers
        .iter()
        .map(|marker| {
            marker.popup.as_ref().map_or_else(
                || marker.id.clone(),
                |popup| format!("{} ({})", popup.title, popup.subtitle),
            )
        })
        .collect();
    labels.push("Back".to_string());

    let idx = Select::new()
        .with_prompt("Marker")
        .items(&labels)
        .default(0)
        .interact()?;

    Ok(map.click(idx))
}
