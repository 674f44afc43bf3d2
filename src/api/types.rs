use serde::{Deserialize, Serialize};

/// The story listings the Firebase API publishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoryList {
    Top,
    Best,
    New,
    Ask,
    Show,
    Jobs,
}

impl StoryList {
    /// Endpoint path relative to the API base url.
    pub fn endpoint(self) -> &'static str {
        match self {
            StoryList::Top => "topstories.json",
            StoryList::Best => "beststories.json",
            StoryList::New => "newstories.json",
            StoryList::Ask => "askstories.json",
            StoryList::Show => "showstories.json",
            StoryList::Jobs => "jobstories.json",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StoryList::Top => "Top Stories",
            StoryList::Best => "Best Stories",
            StoryList::New => "Latest Stories",
            StoryList::Ask => "Ask HN",
            StoryList::Show => "Show HN",
            StoryList::Jobs => "Jobs",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    #[default]
    Story,
    Comment,
    Job,
    Poll,
    PollOpt,
}

/// A story, comment, job or poll as returned by `item/<id>.json`.
///
/// Every field except `id` is optional upstream, so everything defaults.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Item {
    pub id: u64,
    #[serde(rename = "type", default)]
    pub kind: ItemKind,
    #[serde(default)]
    pub by: Option<String>,
    #[serde(default)]
    pub time: Option<i64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub score: Option<i64>,
    #[serde(default)]
    pub descendants: Option<u64>,
    #[serde(default)]
    pub kids: Vec<u64>,
    #[serde(default)]
    pub parent: Option<u64>,
    #[serde(default)]
    pub dead: bool,
    #[serde(default)]
    pub deleted: bool,
}

impl Item {
    /// Dead or deleted items carry no content worth printing.
    pub fn is_visible(&self) -> bool {
        !self.dead && !self.deleted
    }

    /// Host part of the story url, without a leading `www.`.
    pub fn domain(&self) -> Option<&str> {
        let url = self.url.as_deref()?;
        let rest = url.split_once("://").map_or(url, |(_, rest)| rest);
        let host = rest.split(['/', '?', '#']).next()?;
        let host = host.strip_prefix("www.").unwrap_or(host);
        if host.is_empty() { None } else { Some(host) }
    }
}

/// A user profile as returned by `user/<id>.json`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub created: i64,
    #[serde(default)]
    pub karma: i64,
    #[serde(default)]
    pub about: Option<String>,
    #[serde(default)]
    pub submitted: Vec<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_story_deserializes() {
        let json = r#"{
            "by": "dhouston",
            "descendants": 71,
            "id": 8863,
            "kids": [8952, 9224],
            "score": 111,
            "time": 1175714200,
            "title": "My YC app: Dropbox - Throw away your USB drive",
            "type": "story",
            "url": "http://www.getdropbox.com/u/2/screencast.html"
        }"#;
        let item: Item = serde_json::from_str(json).unwrap();
        assert_eq!(item.id, 8863);
        assert_eq!(item.kind, ItemKind::Story);
        assert_eq!(item.by.as_deref(), Some("dhouston"));
        assert_eq!(item.kids, vec![8952, 9224]);
        assert_eq!(item.domain(), Some("getdropbox.com"));
        assert!(item.is_visible());
    }

    #[test]
    fn test_sparse_comment_deserializes() {
        let json = r#"{"id": 2921983, "type": "comment", "deleted": true}"#;
        let item: Item = serde_json::from_str(json).unwrap();
        assert_eq!(item.kind, ItemKind::Comment);
        assert!(item.kids.is_empty());
        assert!(!item.is_visible());
    }

    #[test]
    fn test_pollopt_kind() {
        let item: Item = serde_json::from_str(r#"{"id": 1, "type": "pollopt"}"#).unwrap();
        assert_eq!(item.kind, ItemKind::PollOpt);
    }

    #[test]
    fn test_domain_without_url() {
        let item = Item {
            id: 1,
            ..Default::default()
        };
        assert_eq!(item.domain(), None);
    }

    #[test]
    fn test_domain_strips_path_and_query() {
        let item = Item {
            id: 1,
            url: Some("https://news.example.org?id=3".to_string()),
            ..Default::default()
        };
        assert_eq!(item.domain(), Some("news.example.org"));
    }

    #[test]
    fn test_user_deserializes() {
        let json = r#"{"about": "hi", "created": 1173923446, "id": "jl", "karma": 4765, "submitted": [8265435, 8168423]}"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.id, "jl");
        assert_eq!(user.karma, 4765);
        assert_eq!(user.submitted.len(), 2);
    }

    #[test]
    fn test_story_list_endpoints() {
        assert_eq!(StoryList::Top.endpoint(), "topstories.json");
        assert_eq!(StoryList::Jobs.endpoint(), "jobstories.json");
        assert_eq!(StoryList::New.label(), "Latest Stories");
    }
}
