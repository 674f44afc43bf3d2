//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tempfile::TempDir;

use crate::api::{ApiError, Item, NewsSource, StoryList, User};
use crate::core::state::{App, DisplayConfig};

/// An in-memory source for tests that don't need real API calls.
#[derive(Default)]
pub struct FakeSource {
    pub lists: HashMap<&'static str, Vec<u64>>,
    pub items: HashMap<u64, Item>,
    pub users: HashMap<String, User>,
}

impl FakeSource {
    pub fn with_items(items: Vec<Item>) -> Self {
        let ids: Vec<u64> = items.iter().map(|i| i.id).collect();
        let mut source = FakeSource::default();
        source.lists.insert(StoryList::Top.endpoint(), ids);
        source.items = items.into_iter().map(|i| (i.id, i)).collect();
        source
    }
}

#[async_trait]
impl NewsSource for FakeSource {
    async fn story_ids(&self, list: StoryList) -> Result<Vec<u64>, ApiError> {
        Ok(self.lists.get(list.endpoint()).cloned().unwrap_or_default())
    }

    async fn item(&self, id: u64) -> Result<Item, ApiError> {
        self.items
            .get(&id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("item {id}")))
    }

    async fn user(&self, name: &str) -> Result<User, ApiError> {
        self.users
            .get(name)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("user {name}")))
    }
}

pub fn story(id: u64, title: &str, kids: Vec<u64>) -> Item {
    Item {
        id,
        title: Some(title.to_string()),
        by: Some("pg".to_string()),
        score: Some(42),
        time: Some(1_700_000_000),
        url: Some(format!("https://example.com/{id}")),
        descendants: Some(kids.len() as u64),
        kids,
        ..Default::default()
    }
}

pub fn comment(id: u64, parent: u64, text: &str, kids: Vec<u64>) -> Item {
    Item {
        id,
        kind: crate::api::ItemKind::Comment,
        by: Some("tptacek".to_string()),
        text: Some(text.to_string()),
        time: Some(1_700_000_100),
        parent: Some(parent),
        kids,
        ..Default::default()
    }
}

/// Creates a test App over a FakeSource holding `items` as the top listing.
///
/// Color is off so output can be compared as plain text. The returned
/// `TempDir` backs `data_dir` and must outlive the App.
pub fn test_app(items: Vec<Item>) -> (App, TempDir) {
    test_app_with_source(FakeSource::with_items(items))
}

pub fn test_app_with_source(source: FakeSource) -> (App, TempDir) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let app = App {
        source: Arc::new(source),
        display: DisplayConfig::new(false),
        story_limit: 10,
        comments_limit: 5,
        data_dir: dir.path().to_path_buf(),
    };
    (app, dir)
}
