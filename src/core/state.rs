//! # Application State
//!
//! Everything a command needs to run, built once from the resolved config.
//!
//! ```text
//! App
//! ├── source: Arc<dyn NewsSource>   // HN API (or a fake in tests)
//! ├── display: DisplayConfig        // color flag, shared with the F2 binding
//! ├── story_limit: usize            // rows printed by listing commands
//! ├── comments_limit: usize         // top-level comments shown by `view`
//! └── data_dir: PathBuf             // ~/.hncli (history, last listing)
//! ```

use std::cell::Cell;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;

use crate::api::NewsSource;
use crate::core::config::ResolvedConfig;

/// Output settings that can change while the shell is running.
///
/// Clones share the same flag. The shell and its key bindings run on one
/// thread, so a `Cell` is enough.
#[derive(Debug, Clone)]
pub struct DisplayConfig {
    color: Rc<Cell<bool>>,
}

impl DisplayConfig {
    pub fn new(color: bool) -> Self {
        Self {
            color: Rc::new(Cell::new(color)),
        }
    }

    pub fn color(&self) -> bool {
        self.color.get()
    }

    pub fn set_color(&self, enabled: bool) {
        self.color.set(enabled);
    }
}

pub struct App {
    pub source: Arc<dyn NewsSource>,
    pub display: DisplayConfig,
    pub story_limit: usize,
    pub comments_limit: usize,
    pub data_dir: PathBuf,
}

impl App {
    pub fn from_config(source: Arc<dyn NewsSource>, config: &ResolvedConfig) -> Self {
        Self {
            source,
            display: DisplayConfig::new(config.color),
            story_limit: config.story_limit,
            comments_limit: config.comments_limit,
            data_dir: config.data_dir.clone(),
        }
    }

    /// Path of the file remembering the ids of the last printed listing.
    pub fn last_ids_path(&self) -> PathBuf {
        self.data_dir.join("last_ids.json")
    }

    pub fn history_path(&self) -> PathBuf {
        self.data_dir.join("history")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_config_clones_share_flag() {
        let display = DisplayConfig::new(true);
        let other = display.clone();
        other.set_color(false);
        assert!(!display.color());
    }

    #[test]
    fn test_app_paths_under_data_dir() {
        let (app, _dir) = crate::test_support::test_app(vec![]);
        assert!(app.last_ids_path().starts_with(&app.data_dir));
        assert!(app.history_path().ends_with("history"));
    }
}
