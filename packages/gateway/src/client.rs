//! `reqwest`-backed [`ObservationSource`] for the Avalanche Canada API.

use async_trait::async_trait;
use min_explorer_observation_models::{ObservationDetail, SummaryPage};
use reqwest::Url;
use serde::de::DeserializeOwned;

use crate::{GatewayConfig, GatewayError, ListQuery, ObservationSource};

const USER_AGENT: &str = concat!("min-explorer/", env!("CARGO_PKG_VERSION"));

/// Client for the MIN submissions API.
#[derive(Debug, Clone)]
pub struct AvalancheCanadaClient {
    client: reqwest::Client,
    base_url: Url,
    region: String,
}

impl AvalancheCanadaClient {
    /// Builds a client for `config`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::BaseUrl`] if the configured base URL can't have
    /// paths appended, or [`GatewayError::Http`] if the HTTP client can't be
    /// constructed.
    pub fn new(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Self::with_client(client, config)
    }

    /// Builds a client around an existing `reqwest::Client`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::BaseUrl`] if the configured base URL can't have
    /// paths appended.
    pub fn with_client(client: reqwest::Client, config: &GatewayConfig) -> Result<Self, GatewayError> {
        let base_url = Url::parse(&config.base_url).map_err(|e| GatewayError::BaseUrl {
            url: config.base_url.clone(),
            message: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(GatewayError::BaseUrl {
                url: config.base_url.clone(),
                message: "URL cannot have path segments".to_string(),
            });
        }

        Ok(Self {
            client,
            base_url,
            region: config.region.clone(),
        })
    }

    /// `{base}/submissions` followed by `extra` segments, each
    /// percent-encoded.
    fn endpoint(&self, extra: &[&str]) -> Result<Url, GatewayError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| GatewayError::BaseUrl {
                url: self.base_url.to_string(),
                message: "URL cannot have path segments".to_string(),
            })?
            .pop_if_empty()
            .push("submissions")
            .extend(extra);
        Ok(url)
    }

    /// URL of the list endpoint, without query parameters.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::BaseUrl`] if the base URL can't have paths
    /// appended.
    pub fn list_url(&self) -> Result<Url, GatewayError> {
        self.endpoint(&[])
    }

    /// URL of the detail endpoint for `id`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::BaseUrl`] if the base URL can't have paths
    /// appended.
    pub fn detail_url(&self, id: &str) -> Result<Url, GatewayError> {
        self.endpoint(&[id])
    }
}

/// Sends one GET and decodes the JSON body. Single attempt.
async fn get_json<T: DeserializeOwned>(request: reqwest::RequestBuilder) -> Result<T, GatewayError> {
    let resp = request.send().await?;
    let status = resp.status();
    let url = resp.url().to_string();

    if !status.is_success() {
        log::debug!("{url} answered {status}");
        return Err(GatewayError::Status {
            status: status.as_u16(),
            url,
        });
    }

    let body = resp.text().await?;
    decode(&body)
}

/// Parses a response body into `T`.
fn decode<T: DeserializeOwned>(body: &str) -> Result<T, GatewayError> {
    Ok(serde_json::from_str(body)?)
}

#[async_trait]
impl ObservationSource for AvalancheCanadaClient {
    fn region(&self) -> &str {
        &self.region
    }

    async fn list(&self, query: &ListQuery) -> Result<SummaryPage, GatewayError> {
        let url = self.list_url()?;
        log::debug!(
            "Listing {} observations from {} to {}",
            query.region,
            query.window.from,
            query.window.to
        );

        let page: SummaryPage = get_json(self.client.get(url).query(&query.params())).await?;

        log::info!(
            "Fetched {} observations ({} reported by server)",
            page.observations().len(),
            page.item_count
        );
        Ok(page)
    }

    async fn detail(&self, id: &str) -> Result<ObservationDetail, GatewayError> {
        let url = self.detail_url(id)?;
        log::debug!("Fetching observation {id}");
        get_json(self.client.get(url)).await
    }
}
