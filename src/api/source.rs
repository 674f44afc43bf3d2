use std::fmt;

use async_trait::async_trait;

use super::types::{Item, StoryList, User};

/// Errors that can occur while talking to the Hacker News API.
#[derive(Debug)]
pub enum ApiError {
    /// Network-level failure (timeout, DNS, connection refused).
    Network(String),
    /// The API answered with a non-success status.
    Status { status: u16, url: String },
    /// The response body was not the JSON we expected.
    Parse(String),
    /// The API answered `null`: the item or user does not exist.
    NotFound(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(msg) => write!(f, "network error: {msg}"),
            ApiError::Status { status, url } => write!(f, "HTTP {status} from {url}"),
            ApiError::Parse(msg) => write!(f, "parse error: {msg}"),
            ApiError::NotFound(what) => write!(f, "{what} not found"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Parse(e.to_string())
        } else {
            ApiError::Network(e.to_string())
        }
    }
}

/// Where stories, comments and users come from.
#[async_trait]
pub trait NewsSource: Send + Sync {
    /// Ids of a story listing, in ranking order.
    async fn story_ids(&self, list: StoryList) -> Result<Vec<u64>, ApiError>;

    async fn item(&self, id: u64) -> Result<Item, ApiError>;

    /// Fetches several items concurrently.
    ///
    /// Order follows `ids`. Items that no longer exist are skipped, any other
    /// failure aborts the whole batch.
    async fn items(&self, ids: &[u64]) -> Result<Vec<Item>, ApiError> {
        let fetched = futures::future::join_all(ids.iter().map(|&id| self.item(id))).await;
        let mut items = Vec::with_capacity(fetched.len());
        for result in fetched {
            match result {
                Ok(item) => items.push(item),
                Err(ApiError::NotFound(_)) => {}
                Err(e) => return Err(e),
            }
        }
        Ok(items)
    }

    async fn user(&self, name: &str) -> Result<User, ApiError>;
}
