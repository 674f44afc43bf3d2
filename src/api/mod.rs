pub mod client;
pub mod source;
pub mod types;

pub use client::{DEFAULT_API_BASE_URL, HackerNewsClient};
pub use source::{ApiError, NewsSource};
pub use types::{Item, ItemKind, StoryList, User};
