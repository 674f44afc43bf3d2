//! Client for the Hacker News Firebase API.
//!
//! Every endpoint answers JSON; unknown ids answer a literal `null`, which
//! is surfaced as [`ApiError::NotFound`].

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Url;
use serde::de::DeserializeOwned;

use super::source::{ApiError, NewsSource};
use super::types::{Item, StoryList, User};

pub const DEFAULT_API_BASE_URL: &str = "https://hacker-news.firebaseio.com/v0";

pub struct HackerNewsClient {
    base_url: String,
    client: reqwest::Client,
}

impl HackerNewsClient {
    pub fn new(base_url: Option<String>) -> Self {
        let base_url = base_url.unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `<base_url>/<segments...>`, each segment percent-encoded so a user
    /// name cannot climb out of `user/`.
    fn url(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ApiError::Network(format!("invalid base url {}: {e}", self.base_url)))?;
        url.path_segments_mut()
            .map_err(|_| ApiError::Network(format!("invalid base url {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// GETs `url` and decodes the body, mapping `null` to `None`.
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<Option<T>, ApiError> {
        debug!("GET {}", url);

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!("HN API returned {} for {}", status, url);
            return Err(ApiError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str::<Option<T>>(&body).map_err(|e| ApiError::Parse(format!("{url}: {e}")))
    }
}

#[async_trait]
impl NewsSource for HackerNewsClient {
    async fn story_ids(&self, list: StoryList) -> Result<Vec<u64>, ApiError> {
        let ids: Option<Vec<u64>> = self.get_json(self.url(&[list.endpoint()])?).await?;
        Ok(ids.unwrap_or_default())
    }

    async fn item(&self, id: u64) -> Result<Item, ApiError> {
        let file = format!("{id}.json");
        self.get_json(self.url(&["item", file.as_str()])?)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("item {id}")))
    }

    async fn user(&self, name: &str) -> Result<User, ApiError> {
        let file = format!("{name}.json");
        self.get_json(self.url(&["user", file.as_str()])?)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("user {name}")))
    }
}
