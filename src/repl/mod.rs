//! # Interactive Shell
//!
//! `hn shell` reads lines with a [`LineEditor`] and runs each one as an
//! `hn` subcommand.
//!
//! ```text
//! crossterm event ──► event::key_from_event ──► Key
//!                                                │
//!          KeyManager (F2, F5, F10, Ctrl+Space)  ▼
//!          + default bindings ───────────► KeyBindingRegistry::dispatch
//!                                                │
//!                        LoopOutcome ◄───────────┤
//!                                                ▼
//!                                   TerminalTasks (run_in_terminal)
//! ```
//!
//! Everything runs on the thread that called [`run`]. Network calls go
//! through `Runtime::block_on`, so a refresh holds the prompt until it
//! returns.

pub mod bindings;
pub mod buffer;
pub mod completer;
pub mod editor;
pub mod event;
pub mod history;
pub mod keys;
pub mod registry;

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;
use std::sync::Arc;

use clap::Parser;
use log::{info, warn};
use tokio::runtime::Runtime;

use crate::api::{NewsSource, StoryList};
use crate::cli::{Command, execute};
use crate::core::state::App;
use completer::CommandCompleter;
use editor::{LineEditor, ReadOutcome};
use history::History;
use keys::KeyManager;

const PROMPT: &str = "hn> ";

/// One line typed at the prompt, parsed like `hn` arguments.
#[derive(Parser, Debug)]
#[command(name = "hn", no_binary_name = true)]
struct ShellLine {
    #[command(subcommand)]
    command: Command,
}

/// What the shell does with one submitted line.
#[derive(Debug, PartialEq, Eq)]
enum LineAction {
    Nothing,
    Quit,
    Run(Command),
    /// Parse failure or help text, already formatted for printing.
    Message(String),
}

fn parse_line(line: &str) -> LineAction {
    let words = match shell_words::split(line) {
        Ok(words) => words,
        Err(e) => return LineAction::Message(format!("hn: {e}")),
    };
    match words.first().map(String::as_str) {
        None => LineAction::Nothing,
        Some("exit" | "quit") => LineAction::Quit,
        Some(_) => match ShellLine::try_parse_from(words) {
            Ok(parsed) => LineAction::Run(parsed.command),
            Err(e) => LineAction::Message(e.render().to_string()),
        },
    }
}

/// Fetches the top story ids for completion, keeping the old ones on error.
fn refresh_story_ids(source: &Arc<dyn NewsSource>, runtime: &Runtime, ids: &RefCell<Vec<u64>>) {
    match runtime.block_on(source.story_ids(StoryList::Top)) {
        Ok(fresh) => {
            info!("Refreshed {} top story ids", fresh.len());
            println!("Refreshed {} stories.", fresh.len());
            *ids.borrow_mut() = fresh;
        }
        Err(e) => {
            warn!("Refresh failed: {}", e);
            eprintln!("hn: refresh failed: {e}");
        }
    }
}

pub fn run(app: App, runtime: Rc<Runtime>) -> io::Result<()> {
    info!("Starting shell");
    let story_ids = Rc::new(RefCell::new(Vec::new()));

    let keys = {
        let setter = app.display.clone();
        let getter = app.display.clone();
        let source = Arc::clone(&app.source);
        let runtime = Rc::clone(&runtime);
        let ids = Rc::clone(&story_ids);
        KeyManager::new(
            move |enabled| setter.set_color(enabled),
            move || getter.color(),
            move || refresh_story_ids(&source, &runtime, &ids),
        )
    };

    refresh_story_ids(&app.source, &runtime, &story_ids);
    println!("F2 color  F5 refresh  F10 quit  Ctrl+Space complete  Ctrl+R search");

    let mut editor = LineEditor::new(
        PROMPT,
        History::load(&app.history_path()),
        Box::new(CommandCompleter::new(Rc::clone(&story_ids))),
        app.display.clone(),
    );

    loop {
        let line = match editor.read_line(keys.manager())? {
            ReadOutcome::Line(line) => line,
            ReadOutcome::Eof => break,
        };
        match parse_line(&line) {
            LineAction::Nothing => {}
            LineAction::Quit => break,
            LineAction::Message(text) => println!("{}", text.trim_end()),
            LineAction::Run(command) => {
                let mut out = io::stdout().lock();
                if let Err(e) = runtime.block_on(execute(&app, command, &mut out)) {
                    warn!("Command failed: {}", e);
                    writeln!(out, "hn: {e}")?;
                }
                out.flush()?;
            }
        }
    }

    info!("Shell closed");
    Ok(())
}
