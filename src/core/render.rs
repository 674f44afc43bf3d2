//! Text formatting for stories, comments and users.
//!
//! Every formatter takes a `color` flag: with it off the output is plain
//! text, with it on crossterm styling is applied.

use chrono::{DateTime, TimeZone, Utc};
use crossterm::style::{StyledContent, Stylize};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::api::{Item, User};

pub const DEFAULT_WIDTH: usize = 80;
const COMMENT_INDENT: usize = 2;

pub fn paint<F>(text: &str, color: bool, style: F) -> String
where
    F: FnOnce(StyledContent<&str>) -> StyledContent<&str>,
{
    if color {
        style(text.stylize()).to_string()
    } else {
        text.to_string()
    }
}

/// Current terminal width, or [`DEFAULT_WIDTH`] when stdout is not a tty.
pub fn terminal_width() -> usize {
    crossterm::terminal::size()
        .map(|(w, _)| w as usize)
        .ok()
        .filter(|w| *w > 0)
        .unwrap_or(DEFAULT_WIDTH)
}

pub fn header(title: &str, color: bool) -> String {
    paint(title, color, |s| s.bold().yellow())
}

/// Title line and metadata line of a story, without the rank column.
fn story_lines(item: &Item, color: bool, now: DateTime<Utc>) -> (String, String) {
    let title = item.title.as_deref().unwrap_or("[untitled]");
    let mut first = paint(title, color, |s| s.bold());
    if let Some(domain) = item.domain() {
        first.push_str(&paint(&format!(" ({domain})"), color, |s| s.magenta()));
    }

    let mut meta = Vec::new();
    if let Some(score) = item.score {
        meta.push(paint(&format!("{score} points"), color, |s| s.green()));
    }
    if let Some(by) = item.by.as_deref() {
        meta.push(format!("by {}", paint(by, color, |s| s.cyan())));
    }
    if let Some(time) = item.time {
        meta.push(relative_time(time, now));
    }
    let mut second = meta.join(" ");
    if let Some(descendants) = item.descendants {
        second.push_str(&format!(" | {descendants} comments"));
    }
    (first, second)
}

/// Renders a story as a numbered two-line entry.
pub fn format_story(index: usize, item: &Item, color: bool, now: DateTime<Utc>) -> String {
    let rank = format!("{:>4}. ", index);
    let (first, second) = story_lines(item, color, now);
    format!(
        "{}{first}\n{}{second}",
        paint(&rank, color, |s| s.dark_grey()),
        " ".repeat(rank.len())
    )
}

/// Full view of a single story: title, url, metadata and body text.
pub fn format_story_detail(item: &Item, color: bool, width: usize, now: DateTime<Utc>) -> String {
    let (first, second) = story_lines(item, color, now);
    let mut out = format!("{first}\n{second}");
    if let Some(url) = item.url.as_deref() {
        out.push('\n');
        out.push_str(&paint(url, color, |s| s.underlined()));
    }
    if let Some(text) = item.text.as_deref() {
        out.push_str("\n\n");
        out.push_str(&wrap_indented(&html_to_text(text), 0, width));
    }
    out
}

/// Renders a comment indented by `depth` levels.
pub fn format_comment(item: &Item, depth: usize, color: bool, width: usize, now: DateTime<Utc>) -> String {
    let indent = depth * COMMENT_INDENT;
    let by = item.by.as_deref().unwrap_or("[deleted]");
    let mut head = format!("{}{}", " ".repeat(indent), paint(by, color, |s| s.cyan()));
    if let Some(time) = item.time {
        head.push_str(&paint(&format!(" {}", relative_time(time, now)), color, |s| s.dark_grey()));
    }
    let body = if item.is_visible() {
        html_to_text(item.text.as_deref().unwrap_or(""))
    } else {
        "[deleted]".to_string()
    };
    format!("{head}\n{}", wrap_indented(&body, indent, width))
}

pub fn format_user(user: &User, color: bool, now: DateTime<Utc>) -> String {
    let mut out = format!(
        "{}\n  karma: {}\n  created: {}\n  submissions: {}",
        paint(&user.id, color, |s| s.bold().cyan()),
        paint(&user.karma.to_string(), color, |s| s.green()),
        relative_time(user.created, now),
        user.submitted.len()
    );
    if let Some(about) = user.about.as_deref() {
        out.push_str("\n\n");
        out.push_str(&wrap_indented(&html_to_text(about), 2, DEFAULT_WIDTH));
    }
    out
}

/// "3 hours ago" style age of a unix timestamp.
pub fn relative_time(timestamp: i64, now: DateTime<Utc>) -> String {
    let Some(then) = Utc.timestamp_opt(timestamp, 0).single() else {
        return "some time ago".to_string();
    };
    let secs = (now - then).num_seconds().max(0);
    let (value, unit) = match secs {
        0..60 => return "just now".to_string(),
        60..3_600 => (secs / 60, "minute"),
        3_600..86_400 => (secs / 3_600, "hour"),
        86_400..2_592_000 => (secs / 86_400, "day"),
        2_592_000..31_536_000 => (secs / 2_592_000, "month"),
        _ => (secs / 31_536_000, "year"),
    };
    let plural = if value == 1 { "" } else { "s" };
    format!("{value} {unit}{plural} ago")
}

/// Cuts `text` so it occupies at most `max` terminal columns.
pub fn truncate_to_width(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > max {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

fn wrap_indented(text: &str, indent: usize, width: usize) -> String {
    let prefix = " ".repeat(indent);
    let options = textwrap::Options::new(width.saturating_sub(indent).max(20))
        .initial_indent(&prefix)
        .subsequent_indent(&prefix);
    text.split('\n')
        .map(|para| {
            if para.trim().is_empty() {
                String::new()
            } else {
                textwrap::fill(para, &options)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Converts the small HTML subset HN uses in comments to plain text.
pub fn html_to_text(html: &str) -> String {
    let with_breaks = html
        .replace("<p>", "\n\n")
        .replace("</p>", "")
        .replace("<br>", "\n");

    let mut text = String::with_capacity(with_breaks.len());
    let mut in_tag = false;
    for c in with_breaks.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }

    text.replace("&#x27;", "'")
        .replace("&#39;", "'")
        .replace("&quot;", "\"")
        .replace("&#x2F;", "/")
        .replace("&gt;", ">")
        .replace("&lt;", "<")
        .replace("&amp;", "&")
        .trim()
        .to_string()
}
