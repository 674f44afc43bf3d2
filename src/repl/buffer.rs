//! The editable line of the shell.
//!
//! `Buffer` owns the text, the cursor (a byte offset) and the transient
//! states layered on top of it: an open completion menu and a reverse
//! history search. Any edit closes the completion menu, keeping whatever
//! candidate was applied.

/// An open completion menu.
#[derive(Debug, Clone, PartialEq)]
pub struct CompleteState {
    pub candidates: Vec<String>,
    /// `None` while the menu is open with nothing picked yet.
    pub selected: Option<usize>,
    /// Byte offset where the word being completed starts.
    word_start: usize,
    /// The word as typed, restored when the selection cycles past the end.
    original: String,
}

impl CompleteState {
    pub fn selected_candidate(&self) -> Option<&str> {
        self.selected.map(|i| self.candidates[i].as_str())
    }
}

/// An active reverse history search.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    pub query: String,
    /// History index of the current match.
    pub match_index: Option<usize>,
    /// Buffer text before the search started, restored on cancel.
    pub original: String,
}

#[derive(Debug, Default)]
pub struct Buffer {
    text: String,
    cursor: usize,
    complete_state: Option<CompleteState>,
    search: Option<SearchState>,
}

impl Buffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn text_before_cursor(&self) -> &str {
        &self.text[..self.cursor]
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn cursor_at_end(&self) -> bool {
        self.cursor == self.text.len()
    }

    /// Replaces the text and puts the cursor at the end.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.cursor = self.text.len();
        self.complete_state = None;
    }

    /// Clears everything, including any menu or search.
    pub fn reset(&mut self) {
        self.text.clear();
        self.cursor = 0;
        self.complete_state = None;
        self.search = None;
    }

    pub fn insert_char(&mut self, c: char) {
        self.text.insert(self.cursor, c);
        self.cursor += c.len_utf8();
        self.complete_state = None;
    }

    pub fn insert_str(&mut self, s: &str) {
        self.text.insert_str(self.cursor, s);
        self.cursor += s.len();
        self.complete_state = None;
    }

    /// Backspace. Returns `false` at the start of the line.
    pub fn delete_before_cursor(&mut self) -> bool {
        self.complete_state = None;
        match self.prev_char_len() {
            Some(len) => {
                self.cursor -= len;
                self.text.remove(self.cursor);
                true
            }
            None => false,
        }
    }

    /// Delete. Returns `false` at the end of the line.
    pub fn delete(&mut self) -> bool {
        self.complete_state = None;
        if self.cursor_at_end() {
            return false;
        }
        self.text.remove(self.cursor);
        true
    }

    pub fn cursor_left(&mut self) {
        self.complete_state = None;
        if let Some(len) = self.prev_char_len() {
            self.cursor -= len;
        }
    }

    pub fn cursor_right(&mut self) {
        self.complete_state = None;
        if let Some(c) = self.text[self.cursor..].chars().next() {
            self.cursor += c.len_utf8();
        }
    }

    pub fn cursor_home(&mut self) {
        self.complete_state = None;
        self.cursor = 0;
    }

    pub fn cursor_end(&mut self) {
        self.complete_state = None;
        self.cursor = self.text.len();
    }

    fn prev_char_len(&self) -> Option<usize> {
        self.text[..self.cursor].chars().next_back().map(char::len_utf8)
    }

    /// Byte offset of the start of the word the cursor is in.
    pub fn word_start(&self) -> usize {
        self.text_before_cursor()
            .rfind(char::is_whitespace)
            .map_or(0, |i| i + 1)
    }

    // ------------------------------------------------------------------
    // Completion
    // ------------------------------------------------------------------

    pub fn complete_state(&self) -> Option<&CompleteState> {
        self.complete_state.as_ref()
    }

    /// Opens the completion menu over `candidates`.
    ///
    /// An empty candidate list leaves the menu closed.
    pub fn open_completion(&mut self, candidates: Vec<String>, select_first: bool) {
        if candidates.is_empty() {
            self.complete_state = None;
            return;
        }
        let word_start = self.word_start();
        self.complete_state = Some(CompleteState {
            candidates,
            selected: None,
            original: self.text[word_start..self.cursor].to_string(),
            word_start,
        });
        if select_first {
            self.complete_next();
        }
    }

    /// Selects the next candidate, cycling back to the typed word after
    /// the last one.
    pub fn complete_next(&mut self) {
        let Some(state) = self.complete_state.as_mut() else {
            return;
        };
        state.selected = match state.selected {
            None => Some(0),
            Some(i) if i + 1 < state.candidates.len() => Some(i + 1),
            Some(_) => None,
        };
        self.apply_selection();
    }

    pub fn complete_previous(&mut self) {
        let Some(state) = self.complete_state.as_mut() else {
            return;
        };
        let last = state.candidates.len() - 1;
        state.selected = match state.selected {
            None => Some(last),
            Some(0) => None,
            Some(i) => Some(i - 1),
        };
        self.apply_selection();
    }

    /// Closes the menu, keeping the applied candidate.
    pub fn close_completion(&mut self) {
        self.complete_state = None;
    }

    fn apply_selection(&mut self) {
        let Some(state) = self.complete_state.as_ref() else {
            return;
        };
        let replacement = state
            .selected_candidate()
            .unwrap_or(&state.original)
            .to_string();
        let start = state.word_start;
        self.text.replace_range(start..self.cursor, &replacement);
        self.cursor = start + replacement.len();
    }

    // ------------------------------------------------------------------
    // Search
    // ------------------------------------------------------------------

    pub fn search(&self) -> Option<&SearchState> {
        self.search.as_ref()
    }

    pub fn search_mut(&mut self) -> Option<&mut SearchState> {
        self.search.as_mut()
    }

    pub fn start_search(&mut self) {
        self.complete_state = None;
        self.search = Some(SearchState {
            original: self.text.clone(),
            ..Default::default()
        });
    }

    /// Leaves search mode, keeping the matched text.
    pub fn accept_search(&mut self) {
        self.search = None;
    }

    /// Leaves search mode, restoring the text from before the search.
    pub fn cancel_search(&mut self) {
        if let Some(search) = self.search.take() {
            self.set_text(search.original);
        }
    }
}
