// client.rs
use crate::api::models::{ApiFilter, PropertiesResponse};
use crate::api::{ApiError, ListingSource};
use reqwest::blocking::Client;
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

const USER_AGENT: &str = concat!("listing-search/", env!("CARGO_PKG_VERSION"));

/// Talks to the remote properties API.
#[derive(Clone)]
pub struct HttpListingSource {
    client: Client,
    base_url: String,
}

impl HttpListingSource {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn read_json(resp: reqwest::blocking::Response) -> Result<Value, ApiError> {
        let status = resp.status();
        let url = resp.url().to_string();
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                url,
            });
        }

        let text = resp.text().map_err(|e| ApiError::Network(e.to_string()))?;
        serde_json::from_str(&text).map_err(|e| ApiError::JsonParse(e.to_string()))
    }
}

impl ListingSource for HttpListingSource {
    fn search_properties(
        &self,
        page: u32,
        sort: &str,
        body: &ApiFilter,
    ) -> Result<PropertiesResponse, ApiError> {
        let url = format!("{}/properties-mock", self.base_url);
        let start = Instant::now();

        let page = page.to_string();
        let result = self
            .client
            .post(&url)
            .query(&[("page", page.as_str()), ("sort", sort)])
            .json(body)
            .send()
            .map_err(ApiError::from)
            .and_then(Self::read_json)
            .and_then(PropertiesResponse::from_value);

        match &result {
            Ok(resp) => debug!(
                page = %page,
                sort,
                items = resp.items.len(),
                elapsed = ?start.elapsed(),
                "fetched properties"
            ),
            Err(e) => warn!(page = %page, sort, error = %e, "properties fetch failed"),
        }
        result
    }

    fn property_types(&self, category: Option<&str>) -> Result<Value, ApiError> {
        let url = format!("{}/property-types", self.base_url);
        let mut req = self.client.get(&url);
        if let Some(c) = category {
            req = req.query(&[("category", c)]);
        }

        let result = req.send().map_err(ApiError::from).and_then(Self::read_json);
        if let Err(e) = &result {
            debug!(error = %e, "property-types endpoint unavailable");
        }
        result
    }
}
