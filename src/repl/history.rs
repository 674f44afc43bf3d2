//! Submitted shell lines, oldest first, persisted one per line.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use log::warn;

const MAX_ENTRIES: usize = 1_000;

#[derive(Debug, Default)]
pub struct History {
    entries: Vec<String>,
    /// Position while walking with Up/Down; `None` when editing a new line.
    position: Option<usize>,
    /// The unsent line saved when the walk started.
    draft: String,
    path: Option<PathBuf>,
    /// Lines currently in the file at `path`, including ones trimmed from memory.
    file_lines: usize,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the history file at `path`; later submissions are appended to it.
    pub fn load(path: &Path) -> Self {
        let entries: Vec<String> = match fs::read_to_string(path) {
            Ok(contents) => contents
                .lines()
                .filter(|l| !l.trim().is_empty())
                .map(str::to_string)
                .collect(),
            Err(e) => {
                if e.kind() != io::ErrorKind::NotFound {
                    warn!("Failed to read history {}: {}", path.display(), e);
                }
                Vec::new()
            }
        };
        let mut history = Self {
            file_lines: entries.len(),
            entries,
            path: Some(path.to_path_buf()),
            ..Default::default()
        };
        history.trim();
        history
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Records a submitted line. Blank lines and repeats of the last entry
    /// are skipped.
    pub fn push(&mut self, line: &str) {
        self.position = None;
        let line = line.trim();
        if line.is_empty() || self.entries.last().is_some_and(|l| l == line) {
            return;
        }
        self.entries.push(line.to_string());
        self.trim();
        let Some(path) = &self.path else {
            return;
        };
        if self.file_lines >= MAX_ENTRIES {
            match rewrite(path, &self.entries) {
                Ok(()) => self.file_lines = self.entries.len(),
                Err(e) => warn!("Failed to rewrite history {}: {}", path.display(), e),
            }
        } else {
            match append_line(path, line) {
                Ok(()) => self.file_lines += 1,
                Err(e) => warn!("Failed to save history: {}", e),
            }
        }
    }

    fn trim(&mut self) {
        if self.entries.len() > MAX_ENTRIES {
            let excess = self.entries.len() - MAX_ENTRIES;
            self.entries.drain(..excess);
        }
    }

    /// Steps to the previous (older) entry. `current` is the buffer text,
    /// remembered when the walk starts.
    pub fn previous_entry(&mut self, current: &str) -> Option<&str> {
        let next = match self.position {
            None if self.entries.is_empty() => return None,
            None => {
                self.draft = current.to_string();
                self.entries.len() - 1
            }
            Some(0) => 0,
            Some(i) => i - 1,
        };
        self.position = Some(next);
        Some(&self.entries[next])
    }

    /// Steps to the next (newer) entry, ending at the saved draft.
    pub fn next_entry(&mut self) -> Option<&str> {
        let i = self.position?;
        if i + 1 < self.entries.len() {
            self.position = Some(i + 1);
            Some(&self.entries[i + 1])
        } else {
            self.position = None;
            Some(&self.draft)
        }
    }

    /// Newest entry older than `before` containing `query`.
    pub fn search_backward(&self, query: &str, before: Option<usize>) -> Option<usize> {
        let end = before.unwrap_or(self.entries.len());
        self.entries[..end.min(self.entries.len())]
            .iter()
            .rposition(|entry| entry.contains(query))
    }

    /// Newest entry that extends `prefix`, for inline suggestions.
    pub fn suggest(&self, prefix: &str) -> Option<&str> {
        if prefix.is_empty() {
            return None;
        }
        self.entries
            .iter()
            .rev()
            .find(|entry| entry.len() > prefix.len() && entry.starts_with(prefix))
            .map(String::as_str)
    }
}

fn append_line(path: &Path, line: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{line}")
}

/// Replaces the file with `entries` through a temporary file and rename.
fn rewrite(path: &Path, entries: &[String]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension("tmp");
    let mut contents = entries.join("\n");
    contents.push('\n');
    fs::write(&tmp, contents)?;
    fs::rename(&tmp, path)
}
