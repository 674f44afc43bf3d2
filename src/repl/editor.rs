//! A single-line editor driven by a [`KeyBindingRegistry`].
//!
//! The prompt line is redrawn in place after every key: prompt, text, the
//! history suggestion in dark grey, and the completion menu on the row
//! below. Deferred tasks run between keys with raw mode switched off, so
//! anything they print lands below the prompt like normal output.

use std::io::{self, Write, stdout};

use crossterm::cursor::{MoveToColumn, MoveUp};
use crossterm::event::{
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::style::{Print, Stylize};
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::{execute, queue};
use log::{debug, info};
use unicode_width::UnicodeWidthStr;

use super::bindings::refine_search;
use super::buffer::Buffer;
use super::completer::Completer;
use super::event::{InputEvent, Key, read_event};
use super::history::History;
use super::registry::{KeyBindingRegistry, KeyPressEvent, LoopOutcome, TerminalTasks};
use crate::core::render::{paint, terminal_width, truncate_to_width};
use crate::core::state::DisplayConfig;

/// Result of reading one line.
#[derive(Debug, PartialEq, Eq)]
pub enum ReadOutcome {
    Line(String),
    /// The session was ended from the keyboard.
    Eof,
}

/// Raw mode for the duration of one line edit.
struct RawModeGuard;

impl RawModeGuard {
    fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        // Ignored by terminals without the kitty protocol
        let _ = execute!(
            stdout(),
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES)
        );
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), PopKeyboardEnhancementFlags);
        let _ = terminal::disable_raw_mode();
    }
}

pub struct LineEditor {
    prompt: String,
    buffer: Buffer,
    history: History,
    completer: Box<dyn Completer>,
    tasks: TerminalTasks,
    display: DisplayConfig,
}

impl LineEditor {
    pub fn new(
        prompt: impl Into<String>,
        history: History,
        completer: Box<dyn Completer>,
        display: DisplayConfig,
    ) -> Self {
        Self {
            prompt: prompt.into(),
            buffer: Buffer::new(),
            history,
            completer,
            tasks: TerminalTasks::new(),
            display,
        }
    }

    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    pub fn pending_tasks(&self) -> usize {
        self.tasks.len()
    }

    /// Runs every task queued by `run_in_terminal`, oldest first.
    pub fn run_pending_tasks(&mut self) {
        if !self.tasks.is_empty() {
            debug!("Running {} deferred task(s)", self.tasks.len());
        }
        self.tasks.run_all();
    }

    /// Applies one key press. Printable keys without a binding are typed
    /// into the line, or into the query while searching.
    pub fn handle_key(&mut self, registry: &KeyBindingRegistry, key: Key) -> LoopOutcome {
        let mut event = KeyPressEvent::new(
            key,
            &mut self.buffer,
            &mut self.history,
            self.completer.as_ref(),
            &mut self.tasks,
        );
        if let Some(outcome) = registry.dispatch(&mut event) {
            return outcome;
        }

        if let Key::Char(c) = key {
            if let Some(search) = self.buffer.search_mut() {
                search.query.push(c);
                search.match_index = None;
                refine_search(&mut self.buffer, &self.history, false);
            } else {
                self.buffer.insert_char(c);
            }
        }
        LoopOutcome::Continue
    }

    /// Reads one line from the terminal.
    ///
    /// A submitted line is added to the history before it is returned.
    pub fn read_line(&mut self, registry: &KeyBindingRegistry) -> io::Result<ReadOutcome> {
        self.buffer.reset();
        let mut raw_mode = Some(RawModeGuard::enter()?);

        loop {
            self.render()?;
            let key = match read_event()? {
                InputEvent::Key(key) => key,
                InputEvent::Redraw => continue,
            };
            let outcome = self.handle_key(registry, key);

            if !self.tasks.is_empty() {
                self.finish_line()?;
                raw_mode.take();
                self.run_pending_tasks();
                raw_mode = Some(RawModeGuard::enter()?);
            }

            match outcome {
                LoopOutcome::Continue => {}
                LoopOutcome::Submit => {
                    self.finish_line()?;
                    let line = self.buffer.text().to_string();
                    self.history.push(&line);
                    return Ok(ReadOutcome::Line(line));
                }
                LoopOutcome::Exit => {
                    self.finish_line()?;
                    info!("Shell exit requested from the keyboard");
                    return Ok(ReadOutcome::Eof);
                }
            }
        }
    }

    fn prompt_text(&self) -> String {
        match self.buffer.search() {
            Some(search) => format!("(reverse-i-search)`{}': ", search.query),
            None => self.prompt.clone(),
        }
    }

    fn render(&self) -> io::Result<()> {
        let color = self.display.color();
        let prompt = self.prompt_text();
        let mut out = stdout();
        queue!(
            out,
            MoveToColumn(0),
            Clear(ClearType::FromCursorDown),
            Print(paint(&prompt, color, |s| s.bold())),
            Print(self.buffer.text())
        )?;

        if let Some(rest) = self.suggestion_tail() {
            queue!(out, Print(paint(rest, color, |s| s.dark_grey())))?;
        }

        if let Some(menu) = self.menu_line(color) {
            queue!(out, Print("\r\n"), Print(menu), MoveUp(1))?;
        }

        let column = prompt.width() + self.buffer.text_before_cursor().width();
        queue!(out, MoveToColumn(column.min(u16::MAX as usize) as u16))?;
        out.flush()
    }

    /// The part of the history suggestion not typed yet, which Right or
    /// Ctrl+F at the end of the line would accept.
    pub fn suggestion_tail(&self) -> Option<&str> {
        if self.buffer.search().is_some() || !self.buffer.cursor_at_end() {
            return None;
        }
        let suggestion = self.history.suggest(self.buffer.text())?;
        Some(&suggestion[self.buffer.text().len()..])
    }

    /// The open completion menu as one row, cut to the terminal width.
    fn menu_line(&self, color: bool) -> Option<String> {
        let state = self.buffer.complete_state()?;
        let width = terminal_width();
        let mut line = String::new();
        let mut used = 0;
        for (i, candidate) in state.candidates.iter().enumerate() {
            let cell = truncate_to_width(&format!(" {candidate} "), width.saturating_sub(used));
            used += cell.width();
            let selected = state.selected == Some(i);
            line.push_str(&match (selected, color) {
                (true, true) => paint(&cell, true, |s| s.black().on_cyan()),
                (true, false) => format!("[{}]", cell.trim()),
                (false, _) => cell,
            });
            if used >= width {
                break;
            }
        }
        Some(line)
    }

    /// Redraws the line without suggestion or menu and moves below it.
    fn finish_line(&self) -> io::Result<()> {
        let color = self.display.color();
        let mut out = stdout();
        queue!(
            out,
            MoveToColumn(0),
            Clear(ClearType::FromCursorDown),
            Print(paint(&self.prompt_text(), color, |s| s.bold())),
            Print(self.buffer.text()),
            Print("\r\n")
        )?;
        out.flush()
    }
}
