//! # Key Dispatch
//!
//! A registry maps each [`Key`] to one handler. The editor looks the key up
//! on every press and hands the handler a [`KeyPressEvent`] giving access to
//! the line being edited.
//!
//! Handlers never unwind to stop the shell. They return a [`LoopOutcome`]
//! and the read loop acts on it.
//!
//! Work that must not run mid-redraw (network fetches, shell commands) is
//! queued with [`KeyPressEvent::run_in_terminal`]. The editor drains the
//! queue in FIFO order after the handler returns, with the terminal out of
//! raw mode, on the same thread.

use std::collections::{HashMap, VecDeque};

use super::buffer::Buffer;
use super::completer::Completer;
use super::event::Key;
use super::history::History;

/// What the read loop should do after a key was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopOutcome {
    /// Keep editing the current line.
    Continue,
    /// The line is complete; hand it to the caller.
    Submit,
    /// End the session.
    Exit,
}

pub type KeyHandler = Box<dyn Fn(&mut KeyPressEvent<'_>) -> LoopOutcome>;

/// A deferred task run outside the redraw cycle.
pub type TerminalTask = Box<dyn FnOnce()>;

#[derive(Default)]
pub struct TerminalTasks {
    queue: VecDeque<TerminalTask>,
}

impl TerminalTasks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, task: TerminalTask) {
        self.queue.push_back(task);
    }

    pub fn pop(&mut self) -> Option<TerminalTask> {
        self.queue.pop_front()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Runs every queued task in order, including tasks queued meanwhile.
    pub fn run_all(&mut self) {
        while let Some(task) = self.pop() {
            task();
        }
    }
}

/// Passed to a handler for the duration of one key press.
pub struct KeyPressEvent<'a> {
    pub key: Key,
    buffer: &'a mut Buffer,
    history: &'a mut History,
    completer: &'a dyn Completer,
    tasks: &'a mut TerminalTasks,
}

impl<'a> KeyPressEvent<'a> {
    pub fn new(
        key: Key,
        buffer: &'a mut Buffer,
        history: &'a mut History,
        completer: &'a dyn Completer,
        tasks: &'a mut TerminalTasks,
    ) -> Self {
        Self {
            key,
            buffer,
            history,
            completer,
            tasks,
        }
    }

    pub fn current_buffer(&mut self) -> &mut Buffer {
        &mut *self.buffer
    }

    /// Buffer and history together, for handlers that move text between them.
    pub fn buffer_and_history(&mut self) -> (&mut Buffer, &mut History) {
        (&mut *self.buffer, &mut *self.history)
    }

    /// Schedules `task` to run once the handler returns, outside the redraw.
    pub fn run_in_terminal<F>(&mut self, task: F)
    where
        F: FnOnce() + 'static,
    {
        self.tasks.push(Box::new(task));
    }

    /// Opens the completion menu for the word under the cursor.
    pub fn start_completion(&mut self, select_first: bool) {
        let candidates = self.completer.complete(self.buffer.text_before_cursor());
        self.buffer.open_completion(candidates, select_first);
    }
}

/// Which groups of built-in bindings a registry starts with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultBindings {
    pub search: bool,
    pub abort_and_exit: bool,
    pub system: bool,
    pub auto_suggest: bool,
}

impl DefaultBindings {
    pub fn all() -> Self {
        Self {
            search: true,
            abort_and_exit: true,
            system: true,
            auto_suggest: true,
        }
    }

    pub fn none() -> Self {
        Self {
            search: false,
            abort_and_exit: false,
            system: false,
            auto_suggest: false,
        }
    }
}

pub struct KeyBindingRegistry {
    bindings: HashMap<Key, KeyHandler>,
    defaults: DefaultBindings,
}

impl KeyBindingRegistry {
    /// An empty registry: no key is bound.
    pub fn new() -> Self {
        Self {
            bindings: HashMap::new(),
            defaults: DefaultBindings::none(),
        }
    }

    /// A registry pre-loaded with the editing bindings plus the groups
    /// enabled in `defaults`.
    pub fn with_defaults(defaults: DefaultBindings) -> Self {
        let mut registry = Self {
            bindings: HashMap::new(),
            defaults,
        };
        super::bindings::register_defaults(&mut registry, defaults);
        registry
    }

    pub fn defaults(&self) -> DefaultBindings {
        self.defaults
    }

    /// Binds `key` to `handler`, replacing any earlier binding.
    pub fn add_binding<F>(&mut self, key: Key, handler: F)
    where
        F: Fn(&mut KeyPressEvent<'_>) -> LoopOutcome + 'static,
    {
        self.bindings.insert(key, Box::new(handler));
    }

    pub fn has_binding(&self, key: Key) -> bool {
        self.bindings.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Runs the handler bound to `event.key`. `None` when the key is unbound.
    pub fn dispatch(&self, event: &mut KeyPressEvent<'_>) -> Option<LoopOutcome> {
        let handler = self.bindings.get(&event.key)?;
        Some(handler(event))
    }
}

impl Default for KeyBindingRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    struct NoCompletions;

    impl Completer for NoCompletions {
        fn complete(&self, _text_before_cursor: &str) -> Vec<String> {
            Vec::new()
        }
    }

    struct Fixture {
        buffer: Buffer,
        history: History,
        tasks: TerminalTasks,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                buffer: Buffer::new(),
                history: History::new(),
                tasks: TerminalTasks::new(),
            }
        }

        fn press(&mut self, registry: &KeyBindingRegistry, key: Key) -> Option<LoopOutcome> {
            let mut event = KeyPressEvent::new(
                key,
                &mut self.buffer,
                &mut self.history,
                &NoCompletions,
                &mut self.tasks,
            );
            registry.dispatch(&mut event)
        }
    }

    #[test]
    fn test_unbound_key_dispatches_nothing() {
        let registry = KeyBindingRegistry::new();
        let mut f = Fixture::new();
        assert!(registry.is_empty());
        assert_eq!(f.press(&registry, Key::F(7)), None);
    }

    #[test]
    fn test_later_binding_replaces_earlier() {
        let mut registry = KeyBindingRegistry::new();
        registry.add_binding(Key::F(1), |_| LoopOutcome::Continue);
        registry.add_binding(Key::F(1), |_| LoopOutcome::Exit);
        let mut f = Fixture::new();
        assert_eq!(registry.len(), 1);
        assert_eq!(f.press(&registry, Key::F(1)), Some(LoopOutcome::Exit));
    }

    #[test]
    fn test_handler_edits_buffer() {
        let mut registry = KeyBindingRegistry::new();
        registry.add_binding(Key::Control('x'), |event| {
            event.current_buffer().insert_str("hello");
            LoopOutcome::Continue
        });
        let mut f = Fixture::new();
        f.press(&registry, Key::Control('x'));
        assert_eq!(f.buffer.text(), "hello");
    }

    #[test]
    fn test_run_in_terminal_defers_until_drained() {
        let ran = Rc::new(Cell::new(0));
        let mut registry = KeyBindingRegistry::new();
        let counter = ran.clone();
        registry.add_binding(Key::F(9), move |event| {
            let counter = counter.clone();
            event.run_in_terminal(move || counter.set(counter.get() + 1));
            LoopOutcome::Continue
        });

        let mut f = Fixture::new();
        f.press(&registry, Key::F(9));
        f.press(&registry, Key::F(9));
        assert_eq!(ran.get(), 0);
        assert_eq!(f.tasks.len(), 2);

        f.tasks.run_all();
        assert_eq!(ran.get(), 2);
        assert!(f.tasks.is_empty());
    }

    #[test]
    fn test_tasks_run_in_fifo_order() {
        let order = Rc::new(std::cell::RefCell::new(Vec::new()));
        let mut tasks = TerminalTasks::new();
        for i in 0..3 {
            let order = order.clone();
            tasks.push(Box::new(move || order.borrow_mut().push(i)));
        }
        tasks.run_all();
        assert_eq!(*order.borrow(), vec![0, 1, 2]);
    }

    #[test]
    fn test_with_defaults_records_flags() {
        let registry = KeyBindingRegistry::with_defaults(DefaultBindings::all());
        assert_eq!(registry.defaults(), DefaultBindings::all());
        assert!(registry.has_binding(Key::Enter));
        assert!(registry.has_binding(Key::Control('r')));
    }
}
