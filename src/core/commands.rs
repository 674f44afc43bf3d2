//! # Commands
//!
//! The work behind each `hn` subcommand. Commands write to any
//! `io::Write` so the CLI, the shell and the tests share them.

use std::fmt;
use std::io::{self, Write};

use chrono::Utc;
use log::{info, warn};

use crate::api::{ApiError, Item, StoryList};
use crate::core::state::App;
use crate::core::{onions, render, store};

#[derive(Debug)]
pub enum CommandError {
    Api(ApiError),
    Io(io::Error),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::Api(e) => write!(f, "{e}"),
            CommandError::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for CommandError {}

impl From<ApiError> for CommandError {
    fn from(e: ApiError) -> Self {
        CommandError::Api(e)
    }
}

impl From<io::Error> for CommandError {
    fn from(e: io::Error) -> Self {
        CommandError::Io(e)
    }
}

/// Prints the first `limit` stories of a listing and remembers their ids.
pub async fn list_stories(
    app: &App,
    list: StoryList,
    limit: Option<usize>,
    out: &mut dyn Write,
) -> Result<(), CommandError> {
    let limit = limit.unwrap_or(app.story_limit);
    let ids: Vec<u64> = app.source.story_ids(list).await?.into_iter().take(limit).collect();
    let items = app.source.items(&ids).await?;
    info!("Fetched {} of {} requested {:?} stories", items.len(), ids.len(), list);

    let color = app.display.color();
    let now = Utc::now();
    writeln!(out, "{}", render::header(list.label(), color))?;
    for (i, item) in items.iter().enumerate() {
        writeln!(out, "{}", render::format_story(i + 1, item, color, now))?;
    }

    let shown: Vec<u64> = items.iter().map(|i| i.id).collect();
    if let Err(e) = store::save_last_ids(&app.last_ids_path(), &shown) {
        warn!("Failed to remember listing: {}", e);
    }
    Ok(())
}

/// Prints one story, optionally followed by its comment tree.
///
/// `target` is a position in the last listing or a raw item id.
pub async fn view(
    app: &App,
    target: u64,
    comments: bool,
    comments_limit: Option<usize>,
    out: &mut dyn Write,
) -> Result<(), CommandError> {
    let id = store::load_last_ids(&app.last_ids_path()).resolve(target);
    let item = app.source.item(id).await?;

    let color = app.display.color();
    let width = render::terminal_width();
    writeln!(out, "{}", render::format_story_detail(&item, color, width, Utc::now()))?;

    if comments {
        let limit = comments_limit.unwrap_or(app.comments_limit);
        print_comment_tree(app, &item, limit, out).await?;
    }
    Ok(())
}

/// Depth-first walk of the comment tree, fetching each level's children
/// concurrently.
async fn print_comment_tree(
    app: &App,
    item: &Item,
    limit: usize,
    out: &mut dyn Write,
) -> Result<(), CommandError> {
    let top: Vec<u64> = item.kids.iter().take(limit).copied().collect();
    if top.is_empty() {
        writeln!(out, "\nNo comments.")?;
        return Ok(());
    }

    let color = app.display.color();
    let width = render::terminal_width();
    let now = Utc::now();

    let mut stack: Vec<(Item, usize)> = app
        .source
        .items(&top)
        .await?
        .into_iter()
        .rev()
        .map(|c| (c, 0))
        .collect();

    while let Some((comment, depth)) = stack.pop() {
        writeln!(out, "\n{}", render::format_comment(&comment, depth, color, width, now))?;
        if !comment.kids.is_empty() {
            let kids = app.source.items(&comment.kids).await?;
            stack.extend(kids.into_iter().rev().map(|k| (k, depth + 1)));
        }
    }
    Ok(())
}

pub async fn show_user(app: &App, name: &str, out: &mut dyn Write) -> Result<(), CommandError> {
    let user = app.source.user(name).await?;
    writeln!(out, "{}", render::format_user(&user, app.display.color(), Utc::now()))?;
    Ok(())
}

/// Prints the top-level posts of a "Who is hiring?" style thread that
/// mention `query`, case-insensitively.
pub async fn search_thread(
    app: &App,
    thread_id: u64,
    query: &str,
    out: &mut dyn Write,
) -> Result<(), CommandError> {
    let thread = app.source.item(thread_id).await?;
    let posts = app.source.items(&thread.kids).await?;
    let needle = query.to_lowercase();

    let color = app.display.color();
    let width = render::terminal_width();
    let now = Utc::now();
    let title = thread.title.as_deref().unwrap_or("[untitled]");
    writeln!(out, "{}", render::header(title, color))?;

    let mut matches = 0;
    for post in posts.iter().filter(|p| p.is_visible()) {
        let text = render::html_to_text(post.text.as_deref().unwrap_or(""));
        if text.to_lowercase().contains(&needle) {
            matches += 1;
            writeln!(out, "\n{}", render::format_comment(post, 0, color, width, now))?;
        }
    }
    writeln!(out, "\n{matches} of {} posts match \"{query}\"", posts.len())?;
    Ok(())
}

pub fn onion(limit: Option<usize>, out: &mut dyn Write) -> Result<(), CommandError> {
    for (i, headline) in onions::headlines(limit).iter().enumerate() {
        writeln!(out, "{:>4}. {headline}", i + 1)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::User;
    use crate::test_support::{FakeSource, comment, story, test_app, test_app_with_source};

    fn output(buf: Vec<u8>) -> String {
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_list_stories_prints_and_remembers() {
        let (app, _dir) = test_app(vec![
            story(11, "First", vec![]),
            story(22, "Second", vec![]),
            story(33, "Third", vec![]),
        ]);
        let mut out = Vec::new();
        tokio_test::block_on(list_stories(&app, StoryList::Top, Some(2), &mut out)).unwrap();

        let text = output(out);
        assert!(text.starts_with("Top Stories\n"));
        assert!(text.contains("   1. First"));
        assert!(text.contains("   2. Second"));
        assert!(!text.contains("Third"));
        assert_eq!(store::load_last_ids(&app.last_ids_path()).ids, vec![11, 22]);
    }

    #[test]
    fn test_list_stories_uses_app_limit() {
        let items = (1..=20).map(|i| story(i, &format!("Story {i}"), vec![])).collect();
        let (mut app, _dir) = test_app(items);
        app.story_limit = 3;
        let mut out = Vec::new();
        tokio_test::block_on(list_stories(&app, StoryList::Top, None, &mut out)).unwrap();
        assert_eq!(store::load_last_ids(&app.last_ids_path()).ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_view_resolves_listing_index() {
        let (app, _dir) = test_app(vec![story(11, "First", vec![]), story(22, "Second", vec![])]);
        store::save_last_ids(&app.last_ids_path(), &[22, 11]).unwrap();
        let mut out = Vec::new();
        tokio_test::block_on(view(&app, 1, false, None, &mut out)).unwrap();
        assert!(output(out).starts_with("Second"));
    }

    #[test]
    fn test_view_with_nested_comments_is_depth_first() {
        let (app, _dir) = test_app(vec![
            story(1, "Thread", vec![2, 4]),
            comment(2, 1, "parent one", vec![3]),
            comment(3, 2, "child of one", vec![]),
            comment(4, 1, "parent two", vec![]),
        ]);
        let mut out = Vec::new();
        tokio_test::block_on(view(&app, 1, true, None, &mut out)).unwrap();

        let text = output(out);
        let one = text.find("parent one").unwrap();
        let child = text.find("  child of one").unwrap();
        let two = text.find("parent two").unwrap();
        assert!(one < child && child < two);
    }

    #[test]
    fn test_view_comments_limit() {
        let (app, _dir) = test_app(vec![
            story(1, "Thread", vec![2, 3]),
            comment(2, 1, "kept", vec![]),
            comment(3, 1, "dropped", vec![]),
        ]);
        let mut out = Vec::new();
        tokio_test::block_on(view(&app, 1, true, Some(1), &mut out)).unwrap();
        let text = output(out);
        assert!(text.contains("kept"));
        assert!(!text.contains("dropped"));
    }

    #[test]
    fn test_view_without_comments_says_so() {
        let (app, _dir) = test_app(vec![story(7, "Quiet", vec![])]);
        let mut out = Vec::new();
        tokio_test::block_on(view(&app, 7, true, None, &mut out)).unwrap();
        assert!(output(out).ends_with("No comments.\n"));
    }

    #[test]
    fn test_view_unknown_item_is_not_found() {
        let (app, _dir) = test_app(vec![]);
        let mut out = Vec::new();
        let result = tokio_test::block_on(view(&app, 999, false, None, &mut out));
        assert!(matches!(result, Err(CommandError::Api(ApiError::NotFound(_)))));
    }

    #[test]
    fn test_show_user() {
        let mut source = FakeSource::default();
        source.users.insert(
            "pg".to_string(),
            User {
                id: "pg".to_string(),
                karma: 155_000,
                ..Default::default()
            },
        );
        let (app, _dir) = test_app_with_source(source);
        let mut out = Vec::new();
        tokio_test::block_on(show_user(&app, "pg", &mut out)).unwrap();
        assert!(output(out).contains("karma: 155000"));
    }

    #[test]
    fn test_search_thread_filters_case_insensitively() {
        let mut thread = story(100, "Ask HN: Who is hiring?", vec![101, 102, 103]);
        thread.url = None;
        let mut dead = comment(103, 100, "Rust shop, remote", vec![]);
        dead.dead = true;
        let (app, _dir) = test_app(vec![
            thread,
            comment(101, 100, "Acme | RUST engineer | Remote", vec![]),
            comment(102, 100, "Initech | Java | Onsite", vec![]),
            dead,
        ]);
        let mut out = Vec::new();
        tokio_test::block_on(search_thread(&app, 100, "rust", &mut out)).unwrap();

        let text = output(out);
        assert!(text.starts_with("Ask HN: Who is hiring?"));
        assert!(text.contains("Acme"));
        assert!(!text.contains("Initech"));
        assert!(text.ends_with("1 of 3 posts match \"rust\"\n"));
    }

    #[test]
    fn test_onion_limit() {
        let mut out = Vec::new();
        onion(Some(2), &mut out).unwrap();
        assert_eq!(output(out).lines().count(), 2);
    }
}
