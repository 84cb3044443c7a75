//! A dashboard URL used as the terminal browser's address bar.

use std::fmt;

use min_explorer_coordinator::AddressBar;
use min_explorer_observation_models::SELECTION_PARAM;
use reqwest::Url;

use crate::BrowseError;

/// Dashboard served by `min_explorer_server` with its default settings.
pub const DEFAULT_DASHBOARD_URL: &str = "http://127.0.0.1:8080/";

/// A dashboard URL whose `observation` parameter holds the selection.
///
/// Other query parameters are preserved across writes. Pasting
/// [`DeepLink::as_str`] into a browser opens the same observation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeepLink {
    url: Url,
}

impl DeepLink {
    /// Parses an absolute dashboard URL.
    ///
    /// # Errors
    ///
    /// Returns [`BrowseError::InvalidLink`] if `link` is not an absolute URL.
    pub fn parse(link: &str) -> Result<Self, BrowseError> {
        let url = Url::parse(link.trim()).map_err(|e| BrowseError::InvalidLink {
            link: link.to_string(),
            message: e.to_string(),
        })?;
        Ok(Self { url })
    }

    /// The URL as text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }
}

impl fmt::Display for DeepLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}

impl AddressBar for DeepLink {
    fn selection(&self) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(key, _)| key == SELECTION_PARAM)
            .map(|(_, value)| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    fn push_selection(&mut self, id: Option<&str>) {
        let kept: Vec<(String, String)> = self
            .url
            .query_pairs()
            .filter(|(key, _)| key != SELECTION_PARAM)
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();

        self.url.set_query(None);
        if kept.is_empty() && id.is_none() {
            return;
        }

        let mut pairs = self.url.query_pairs_mut();
        pairs.extend_pairs(kept);
        if let Some(id) = id {
            pairs.append_pair(SELECTION_PARAM, id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_selection_parameter() {
        let link = DeepLink::parse("http://localhost:8080/?view=map&observation=abc123").unwrap();
        assert_eq!(link.selection().as_deref(), Some("abc123"));

        let link = DeepLink::parse("http://localhost:8080/?observation=").unwrap();
        assert_eq!(link.selection(), None);

        let link = DeepLink::parse(DEFAULT_DASHBOARD_URL).unwrap();
        assert_eq!(link.selection(), None);
    }

    #[test]
    fn push_replaces_selection_and_keeps_other_parameters() {
        let mut link =
            DeepLink::parse("http://localhost:8080/?observation=old&view=map").unwrap();
        link.push_selection(Some("def 456"));
        assert_eq!(
            link.as_str(),
            "http://localhost:8080/?view=map&observation=def+456"
        );
        assert_eq!(link.selection().as_deref(), Some("def 456"));
    }

    #[test]
    fn clearing_removes_parameter() {
        let mut link = DeepLink::parse("http://localhost:8080/?observation=abc123").unwrap();
        link.push_selection(None);
        assert_eq!(link.as_str(), "http://localhost:8080/");
        assert_eq!(link.selection(), None);
    }

    #[test]
    fn rejects_relative_links() {
        assert!(matches!(
            DeepLink::parse("?observation=abc123"),
            Err(BrowseError::InvalidLink { .. })
        ));
    }
}
