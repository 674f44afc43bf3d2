use std::cell::RefCell;
use std::rc::Rc;

/// Produces completion candidates for the word under the cursor.
pub trait Completer {
    /// Candidates replacing the last word of `text_before_cursor`.
    fn complete(&self, text_before_cursor: &str) -> Vec<String>;
}

/// Subcommands offered as the first word.
pub const COMMANDS: &[&str] = &[
    "ask", "best", "exit", "freelance", "hiring", "jobs", "new", "onion", "quit", "show", "top",
    "user", "view",
];

fn options_for(command: &str) -> &'static [&'static str] {
    match command {
        "top" | "best" | "new" | "ask" | "show" | "jobs" | "onion" => &["--limit"],
        "view" => &["--comments", "--comments-limit"],
        "hiring" | "freelance" => &["--id"],
        _ => &[],
    }
}

/// Completes `hn` subcommands, their options, and for `view` the ids of
/// the most recently refreshed listing.
pub struct CommandCompleter {
    story_ids: Rc<RefCell<Vec<u64>>>,
}

impl CommandCompleter {
    pub fn new(story_ids: Rc<RefCell<Vec<u64>>>) -> Self {
        Self { story_ids }
    }
}

impl Completer for CommandCompleter {
    fn complete(&self, text_before_cursor: &str) -> Vec<String> {
        let words: Vec<&str> = text_before_cursor.split_whitespace().collect();
        let starting_new_word = text_before_cursor.is_empty()
            || text_before_cursor.ends_with(char::is_whitespace);
        let current = if starting_new_word { "" } else { words.last().copied().unwrap_or("") };
        let completed_words = if starting_new_word { words.len() } else { words.len() - 1 };

        if completed_words == 0 {
            return COMMANDS
                .iter()
                .filter(|c| c.starts_with(current))
                .map(|c| c.to_string())
                .collect();
        }

        let command = words[0];
        let mut candidates: Vec<String> = options_for(command)
            .iter()
            .filter(|o| o.starts_with(current) && !words[..completed_words].contains(*o))
            .map(|o| o.to_string())
            .collect();

        if command == "view" && completed_words == 1 {
            candidates.extend(
                self.story_ids
                    .borrow()
                    .iter()
                    .map(u64::to_string)
                    .filter(|id| id.starts_with(current)),
            );
        }
        candidates
    }
}
