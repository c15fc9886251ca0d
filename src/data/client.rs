//! PokeAPI HTTP client
//!
//! Fetches location areas and Pokemon from PokeAPI. GET responses are read
//! through and written back to the shared [`ResponseCache`], keyed by URL.

use std::sync::Arc;

use bytes::Bytes;
use reqwest::header::ACCEPT;
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use super::{LocationAreaDetail, LocationAreaPage, Pokemon};
use crate::cache::ResponseCache;

/// Base URL for the PokeAPI v2 REST API
pub const DEFAULT_BASE_URL: &str = "https://pokeapi.co/api/v2";

/// Errors that can occur when fetching from PokeAPI
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("{url} returned {status}")]
    Status { url: String, status: StatusCode },

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    Parse(#[from] serde_json::Error),

    /// The base URL cannot have resource paths appended to it
    #[error("Invalid API URL {0}")]
    InvalidUrl(String),
}

/// Client for PokeAPI
#[derive(Debug, Clone)]
pub struct PokeApiClient {
    /// HTTP client for making requests
    http_client: Client,
    /// Response cache consulted by GET requests
    cache: Option<Arc<ResponseCache>>,
    /// Base URL for the API (allows override for testing)
    base_url: String,
}

impl PokeApiClient {
    /// Creates a client that never caches
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            cache: None,
            base_url: normalize_base_url(base_url.into()),
        }
    }

    /// Creates a client whose GET requests go through `cache`
    pub fn with_cache(base_url: impl Into<String>, cache: Arc<ResponseCache>) -> Self {
        Self {
            cache: Some(cache),
            ..Self::new(base_url)
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn cache(&self) -> Option<&Arc<ResponseCache>> {
        self.cache.as_ref()
    }

    /// Fetches a page of location areas
    ///
    /// # Arguments
    /// * `page_url` - A `next`/`previous` URL from an earlier page, or `None` for the first page
    pub async fn location_areas(&self, page_url: Option<&str>) -> Result<LocationAreaPage, ApiError> {
        let url = match page_url {
            Some(url) => url.to_string(),
            None => self.resource_url(&["location-area"])?,
        };
        self.fetch_as(&url).await
    }

    /// Fetches one location area by name, including its Pokemon encounters
    pub async fn location_area(&self, name: &str) -> Result<LocationAreaDetail, ApiError> {
        let url = self.resource_url(&["location-area", name])?;
        self.fetch_as(&url).await
    }

    /// Fetches one Pokemon by name
    pub async fn pokemon(&self, name: &str) -> Result<Pokemon, ApiError> {
        let url = self.resource_url(&["pokemon", name])?;
        self.fetch_as(&url).await
    }

    /// Appends `segments` to the base URL, percent-encoding each one
    ///
    /// A name containing `/`, `?` or `#` stays inside its own path segment.
    fn resource_url(&self, segments: &[&str]) -> Result<String, ApiError> {
        let invalid = || ApiError::InvalidUrl(self.base_url.clone());
        let mut url = Url::parse(&self.base_url).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .extend(segments);
        Ok(url.to_string())
    }

    /// GETs `url` and parses the body as `T`
    async fn fetch_as<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        let body = self.get_json(url).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// GETs `url`, returning the raw body
    ///
    /// # Behavior
    /// - Returns the cached body without touching the network if `url` is cached
    /// - Otherwise performs the request and caches the body only on a success status
    pub async fn get_json(&self, url: &str) -> Result<Bytes, ApiError> {
        if let Some(body) = self.cache.as_ref().and_then(|cache| cache.get(url)) {
            debug!(url, "using cached response");
            return Ok(body);
        }

        let response = self
            .http_client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await?;
        let body = read_success_body(url, response).await?;

        if let Some(cache) = &self.cache {
            cache.add(url, body.clone());
        }
        Ok(body)
    }

    /// POSTs `body` as JSON to `url` with extra `headers`, returning the raw body
    ///
    /// Never reads from or writes to the cache.
    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
        headers: &[(&str, &str)],
    ) -> Result<Bytes, ApiError> {
        let mut request = self
            .http_client
            .post(url)
            .header(ACCEPT, "application/json")
            .json(body);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        let response = request.send().await?;
        read_success_body(url, response).await
    }
}

async fn read_success_body(url: &str, response: reqwest::Response) -> Result<Bytes, ApiError> {
    let status = response.status();
    if !status.is_success() {
        warn!(url, %status, "request failed");
        return Err(ApiError::Status {
            url: url.to_string(),
            status,
        });
    }
    Ok(response.bytes().await?)
}

fn normalize_base_url(base_url: String) -> String {
    base_url.trim_end_matches('/').to_string()
}
