//! # Shell Keys
//!
//! The keys specific to `hn shell`, layered on top of the default editing
//! bindings:
//!
//! | Key        | Action                                         |
//! |------------|------------------------------------------------|
//! | F2         | toggle color output                            |
//! | F5         | refresh the top stories (outside the redraw)   |
//! | F10        | leave the shell                                |
//! | Ctrl+Space | open the completion menu, or advance it        |
//!
//! The manager only wires keys to the hooks it is given. It owns no state
//! of its own and is not changed after it is built.

use std::rc::Rc;

use log::debug;

use super::event::Key;
use super::registry::{DefaultBindings, KeyBindingRegistry, LoopOutcome};

pub const TOGGLE_COLOR_KEY: Key = Key::F(2);
pub const REFRESH_KEY: Key = Key::F(5);
pub const QUIT_KEY: Key = Key::F(10);
pub const COMPLETE_KEY: Key = Key::ControlSpace;

type SetColorHook = Rc<dyn Fn(bool)>;
type GetColorHook = Rc<dyn Fn() -> bool>;
type RefreshHook = Rc<dyn Fn()>;

pub struct KeyManager {
    registry: KeyBindingRegistry,
}

impl KeyManager {
    /// Builds the shell's key registry around the three hooks.
    ///
    /// `refresh` usually blocks on the network. It is queued with
    /// `run_in_terminal` and never runs inside a key handler.
    pub fn new<S, G, R>(set_color: S, get_color: G, refresh: R) -> Self
    where
        S: Fn(bool) + 'static,
        G: Fn() -> bool + 'static,
        R: Fn() + 'static,
    {
        Self::builder()
            .set_color(set_color)
            .get_color(get_color)
            .refresh(refresh)
            .build()
    }

    pub fn builder() -> KeyManagerBuilder {
        KeyManagerBuilder::default()
    }

    /// The registry to hand to the line editor.
    pub fn manager(&self) -> &KeyBindingRegistry {
        &self.registry
    }
}

/// Collects the hooks for a [`KeyManager`].
///
/// Every hook is required. Building with one missing is a programming
/// error and panics before any key is registered.
#[derive(Default)]
pub struct KeyManagerBuilder {
    set_color: Option<SetColorHook>,
    get_color: Option<GetColorHook>,
    refresh: Option<RefreshHook>,
}

impl KeyManagerBuilder {
    pub fn set_color<F: Fn(bool) + 'static>(mut self, hook: F) -> Self {
        self.set_color = Some(Rc::new(hook));
        self
    }

    pub fn get_color<F: Fn() -> bool + 'static>(mut self, hook: F) -> Self {
        self.get_color = Some(Rc::new(hook));
        self
    }

    pub fn refresh<F: Fn() + 'static>(mut self, hook: F) -> Self {
        self.refresh = Some(Rc::new(hook));
        self
    }

    pub fn build(self) -> KeyManager {
        let set_color = self.set_color.expect("KeyManager requires a set_color hook");
        let get_color = self.get_color.expect("KeyManager requires a get_color hook");
        let refresh = self.refresh.expect("KeyManager requires a refresh hook");

        let mut registry = KeyBindingRegistry::with_defaults(DefaultBindings::all());

        registry.add_binding(TOGGLE_COLOR_KEY, move |_| {
            let enabled = !get_color();
            debug!("Color output {}", if enabled { "on" } else { "off" });
            set_color(enabled);
            LoopOutcome::Continue
        });

        registry.add_binding(REFRESH_KEY, move |event| {
            let refresh = Rc::clone(&refresh);
            event.run_in_terminal(move || refresh());
            LoopOutcome::Continue
        });

        registry.add_binding(QUIT_KEY, |_| LoopOutcome::Exit);

        registry.add_binding(COMPLETE_KEY, |event| {
            if event.current_buffer().complete_state().is_some() {
                event.current_buffer().complete_next();
            } else {
                event.start_completion(false);
            }
            LoopOutcome::Continue
        });

        KeyManager { registry }
    }
}
