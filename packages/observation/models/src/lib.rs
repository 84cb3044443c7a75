#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Avalanche observation data model.
//!
//! These types mirror the JSON shapes served by the Avalanche Canada
//! Mountain Information Network (MIN) submissions API. Both the
//! server-rendered dashboard and the terminal browser consume them, along
//! with the shared display helpers in [`format`], so list cards and detail
//! panels read the same everywhere.

pub mod format;

use chrono::{DateTime, FixedOffset};
use min_explorer_map_models::LngLat;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Name of the query parameter that carries the selected observation.
pub const SELECTION_PARAM: &str = "observation";

/// A geographic point as the API encodes it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

impl From<Location> for LngLat {
    fn from(location: Location) -> Self {
        Self::new(location.longitude, location.latitude)
    }
}

/// The five observation categories a MIN submission can contain.
///
/// Declaration order is display order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "title_case")]
pub enum ObservationCategory {
    /// Quick report (riding conditions, comment).
    Quick,
    /// Avalanche activity.
    Avalanche,
    /// Snowpack test results.
    Snowpack,
    /// Weather report.
    Weather,
    /// Avalanche incident.
    Incident,
}

impl ObservationCategory {
    /// Returns all categories in display order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Quick,
            Self::Avalanche,
            Self::Snowpack,
            Self::Weather,
            Self::Incident,
        ]
    }
}

/// Per-category counts on a summary. Missing fields count as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservationCounts {
    /// Quick reports.
    pub quick: u32,
    /// Avalanche reports.
    pub avalanche: u32,
    /// Snowpack reports.
    pub snowpack: u32,
    /// Weather reports.
    pub weather: u32,
    /// Incident reports.
    pub incident: u32,
}

impl ObservationCounts {
    /// Count for one category.
    #[must_use]
    pub const fn get(&self, category: ObservationCategory) -> u32 {
        match category {
            ObservationCategory::Quick => self.quick,
            ObservationCategory::Avalanche => self.avalanche,
            ObservationCategory::Snowpack => self.snowpack,
            ObservationCategory::Weather => self.weather,
            ObservationCategory::Incident => self.incident,
        }
    }

    /// All five counts in display order.
    pub fn entries(&self) -> impl Iterator<Item = (ObservationCategory, u32)> + '_ {
        ObservationCategory::all()
            .iter()
            .map(|category| (*category, self.get(*category)))
    }
}

/// One observation as it appears in the list response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservationSummary {
    /// Submission identifier, unique within one list response.
    pub id: String,
    /// Title given by the submitter.
    pub title: String,
    /// Submitter's username.
    pub username: String,
    /// When the observation was made (ISO 8601).
    pub datetime: String,
    /// Where the observation was made.
    pub location: Location,
    /// Forecast region label.
    pub region: String,
    /// Number of attached photos.
    #[serde(default)]
    pub image_count: u32,
    /// Per-category report counts.
    #[serde(default)]
    pub observations: ObservationCounts,
    /// Free-text tags, in submission order.
    #[serde(default)]
    pub tags: Vec<String>,
}

impl ObservationSummary {
    /// Parsed [`Self::datetime`], if it is valid RFC 3339.
    #[must_use]
    pub fn timestamp(&self) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc3339(&self.datetime).ok()
    }
}

/// Wrapper around the list of summaries in the list response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryItems {
    /// The summaries on this page.
    #[serde(default)]
    pub data: Vec<ObservationSummary>,
}

/// The list endpoint's response body.
///
/// `item_count` is the server's total and may differ from
/// `items.data.len()`; only the latter is ever rendered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryPage {
    /// The summaries on this page.
    pub items: SummaryItems,
    /// Total number of matching observations reported by the server.
    #[serde(default)]
    pub item_count: u64,
}

impl SummaryPage {
    /// The observations to display.
    #[must_use]
    pub fn observations(&self) -> &[ObservationSummary] {
        &self.items.data
    }

    /// Looks up an observation on this page by identifier.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&ObservationSummary> {
        self.items.data.iter().find(|obs| obs.id == id)
    }
}

/// Per-category counts on a detail record; absent categories were not
/// reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetailCounts {
    /// Quick reports.
    pub quick: Option<u32>,
    /// Avalanche reports.
    pub avalanche: Option<u32>,
    /// Snowpack reports.
    pub snowpack: Option<u32>,
    /// Weather reports.
    pub weather: Option<u32>,
    /// Incident reports.
    pub incident: Option<u32>,
}

impl DetailCounts {
    /// Count for one category, if reported.
    #[must_use]
    pub const fn get(&self, category: ObservationCategory) -> Option<u32> {
        match category {
            ObservationCategory::Quick => self.quick,
            ObservationCategory::Avalanche => self.avalanche,
            ObservationCategory::Snowpack => self.snowpack,
            ObservationCategory::Weather => self.weather,
            ObservationCategory::Incident => self.incident,
        }
    }

    /// Reported counts in display order, skipping absent ones.
    pub fn reported(&self) -> impl Iterator<Item = (ObservationCategory, u32)> + '_ {
        ObservationCategory::all()
            .iter()
            .filter_map(|category| self.get(*category).map(|count| (*category, count)))
    }
}

/// The quick-report section of a detail record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickObservation {
    /// Avalanche conditions checked by the submitter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avalanche_conditions: Option<Vec<String>>,
    /// Type of riding (e.g. "Skiing", "Snowmobiling").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ride_type: Option<Vec<String>>,
    /// Snow conditions checked by the submitter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snow_conditions: Option<Vec<String>>,
    /// Weather conditions checked by the submitter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather: Option<Vec<String>>,
    /// Overall riding quality.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub riding_quality: Option<String>,
    /// Free-text comment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl QuickObservation {
    /// The comment, if it has any non-whitespace content.
    #[must_use]
    pub fn comment(&self) -> Option<&str> {
        self.comment
            .as_deref()
            .map(str::trim)
            .filter(|comment| !comment.is_empty())
    }

    /// Labelled condition lists that have at least one entry.
    #[must_use]
    pub fn condition_lists(&self) -> Vec<(&'static str, &[String])> {
        [
            ("Ride type", self.ride_type.as_deref()),
            ("Snow conditions", self.snow_conditions.as_deref()),
            ("Avalanche conditions", self.avalanche_conditions.as_deref()),
            ("Weather", self.weather.as_deref()),
        ]
        .into_iter()
        .filter_map(|(label, values)| {
            values
                .filter(|values| !values.is_empty())
                .map(|values| (label, values))
        })
        .collect()
    }
}

/// The report sections of a detail record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetailObservations {
    /// Quick report, if submitted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quick: Option<QuickObservation>,
    /// Weather report; its shape is not interpreted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather: Option<serde_json::Value>,
    /// Snowpack report; its shape is not interpreted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snowpack: Option<serde_json::Value>,
}

/// A photo attached to a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservationImage {
    /// Image identifier.
    pub id: String,
    /// Absolute URL of the image.
    pub url: String,
    /// Width in pixels.
    #[serde(default)]
    pub width: u32,
    /// Height in pixels.
    #[serde(default)]
    pub height: u32,
}

/// One observation as returned by the detail endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservationDetail {
    /// Submission identifier.
    #[serde(rename = "submissionID")]
    pub submission_id: String,
    /// Title given by the submitter.
    pub title: String,
    /// Submitter's username.
    pub username: String,
    /// When the observation was made (ISO 8601).
    pub datetime: String,
    /// Where the observation was made.
    pub location: Location,
    /// Forecast region label.
    #[serde(default)]
    pub region: String,
    /// Number of attached photos.
    #[serde(default)]
    pub image_count: u32,
    /// Per-category report counts.
    #[serde(default)]
    pub observation_counts: DetailCounts,
    /// Free-text tags, in submission order.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Report sections.
    #[serde(default)]
    pub observations: DetailObservations,
    /// Attached photos, in submission order.
    #[serde(default)]
    pub images: Vec<ObservationImage>,
}

impl ObservationDetail {
    /// The quick-report comment, if any.
    #[must_use]
    pub fn comment(&self) -> Option<&str> {
        self.observations
            .quick
            .as_ref()
            .and_then(QuickObservation::comment)
    }
}

/// Which of the two main presentations is active. Never persisted.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ViewMode {
    /// Cards, one per observation.
    #[default]
    List,
    /// All observations on one map.
    Map,
}

impl ViewMode {
    /// The other mode.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::List => Self::Map,
            Self::Map => Self::List,
        }
    }
}
