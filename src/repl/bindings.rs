//! Built-in editing bindings installed by
//! [`KeyBindingRegistry::with_defaults`](super::registry::KeyBindingRegistry::with_defaults).
//!
//! Plain editing keys are always bound. The four optional groups follow
//! [`DefaultBindings`]:
//!
//! - abort/exit: Ctrl+C clears the line, Ctrl+D on an empty line exits
//! - search: Ctrl+R reverse-searches history
//! - auto-suggest: Right/Ctrl+F at end of line accepts the history suggestion
//! - system: Alt+! runs the line as a shell command

use std::process::Command;

use log::{info, warn};

use super::buffer::Buffer;
use super::event::Key;
use super::history::History;
use super::registry::{DefaultBindings, KeyBindingRegistry, KeyPressEvent, LoopOutcome};

pub fn register_defaults(registry: &mut KeyBindingRegistry, defaults: DefaultBindings) {
    registry.add_binding(Key::Enter, |event| {
        let buffer = event.current_buffer();
        if buffer.search().is_some() {
            buffer.accept_search();
            return LoopOutcome::Submit;
        }
        if buffer.complete_state().is_some_and(|s| s.selected.is_some()) {
            buffer.close_completion();
            return LoopOutcome::Continue;
        }
        LoopOutcome::Submit
    });

    registry.add_binding(Key::Backspace, |event| {
        let (buffer, history) = event.buffer_and_history();
        if let Some(search) = buffer.search_mut() {
            search.query.pop();
            search.match_index = None;
            refine_search(buffer, history, false);
        } else {
            buffer.delete_before_cursor();
        }
        LoopOutcome::Continue
    });

    registry.add_binding(Key::Delete, |event| {
        event.current_buffer().delete();
        LoopOutcome::Continue
    });

    registry.add_binding(Key::Left, |event| {
        let buffer = event.current_buffer();
        buffer.accept_search();
        buffer.cursor_left();
        LoopOutcome::Continue
    });

    for key in [Key::Home, Key::Control('a')] {
        registry.add_binding(key, |event| {
            let buffer = event.current_buffer();
            buffer.accept_search();
            buffer.cursor_home();
            LoopOutcome::Continue
        });
    }

    for key in [Key::End, Key::Control('e')] {
        registry.add_binding(key, |event| {
            let buffer = event.current_buffer();
            buffer.accept_search();
            buffer.cursor_end();
            LoopOutcome::Continue
        });
    }

    registry.add_binding(Key::Up, |event| {
        let (buffer, history) = event.buffer_and_history();
        buffer.accept_search();
        if buffer.complete_state().is_some() {
            buffer.complete_previous();
        } else if let Some(entry) = history.previous_entry(buffer.text()) {
            let entry = entry.to_string();
            buffer.set_text(entry);
        }
        LoopOutcome::Continue
    });

    registry.add_binding(Key::Down, |event| {
        let (buffer, history) = event.buffer_and_history();
        buffer.accept_search();
        if buffer.complete_state().is_some() {
            buffer.complete_next();
        } else if let Some(entry) = history.next_entry() {
            let entry = entry.to_string();
            buffer.set_text(entry);
        }
        LoopOutcome::Continue
    });

    registry.add_binding(Key::Tab, |event| {
        if event.current_buffer().complete_state().is_some() {
            event.current_buffer().complete_next();
        } else {
            event.start_completion(true);
        }
        LoopOutcome::Continue
    });

    registry.add_binding(Key::Escape, |event| {
        let buffer = event.current_buffer();
        if buffer.search().is_some() {
            buffer.cancel_search();
        } else {
            buffer.close_completion();
        }
        LoopOutcome::Continue
    });

    let auto_suggest = defaults.auto_suggest;
    for key in [Key::Right, Key::Control('f')] {
        registry.add_binding(key, move |event| {
            let (buffer, history) = event.buffer_and_history();
            buffer.accept_search();
            if auto_suggest && buffer.cursor_at_end() {
                if let Some(suggestion) = history.suggest(buffer.text()) {
                    let suggestion = suggestion.to_string();
                    buffer.set_text(suggestion);
                    return LoopOutcome::Continue;
                }
            }
            buffer.cursor_right();
            LoopOutcome::Continue
        });
    }

    if defaults.abort_and_exit {
        registry.add_binding(Key::Control('c'), |event| {
            event.current_buffer().reset();
            LoopOutcome::Continue
        });
        registry.add_binding(Key::Control('d'), |event| {
            let buffer = event.current_buffer();
            if buffer.is_empty() {
                return LoopOutcome::Exit;
            }
            buffer.delete();
            LoopOutcome::Continue
        });
    }

    if defaults.search {
        registry.add_binding(Key::Control('r'), |event| {
            let (buffer, history) = event.buffer_and_history();
            if buffer.search().is_some() {
                refine_search(buffer, history, true);
            } else {
                buffer.start_search();
            }
            LoopOutcome::Continue
        });
    }

    if defaults.system {
        registry.add_binding(Key::Alt('!'), |event| {
            let buffer = event.current_buffer();
            let command = buffer.text().trim().to_string();
            buffer.reset();
            if !command.is_empty() {
                event.run_in_terminal(move || run_system_command(&command));
            }
            LoopOutcome::Continue
        });
    }
}

/// Re-runs the active search. `older` steps past the current match,
/// otherwise the newest match of the (changed) query is taken. Without a
/// match the buffer keeps its text.
pub fn refine_search(buffer: &mut Buffer, history: &History, older: bool) {
    let Some(search) = buffer.search() else {
        return;
    };
    if search.query.is_empty() {
        return;
    }
    let before = if older { search.match_index } else { None };
    if let Some(index) = history.search_backward(&search.query, before) {
        let text = history.entries()[index].clone();
        buffer.set_text(text);
        if let Some(search) = buffer.search_mut() {
            search.match_index = Some(index);
        }
    }
}

pub fn run_system_command(command: &str) {
    info!("Running system command: {}", command);
    #[cfg(windows)]
    let status = Command::new("cmd").args(["/C", command]).status();
    #[cfg(not(windows))]
    let status = Command::new("sh").args(["-c", command]).status();

    match status {
        Ok(status) if !status.success() => warn!("`{}` exited with {}", command, status),
        Ok(_) => {}
        Err(e) => eprintln!("hn: failed to run `{command}`: {e}"),
    }
}
