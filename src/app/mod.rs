//! Pager state and main event loop.
//!
//! This module implements The Elm Architecture (TEA):
//! - [`Model`]: The complete pager state
//! - [`Message`]: All possible events and actions
//! - [`update`]: Pure function for state transitions
//! - [`App::run`]: Main event loop with rendering

mod event_loop;
mod input;
mod model;
mod update;

pub use model::{CHROME_ROWS, Mode, Model};
pub use update::{Message, update};

use std::path::PathBuf;

use crate::theme::Theme;

/// Owns the document and runs the interactive pager.
pub struct App {
    file_path: PathBuf,
    source: String,
    theme: Theme,
}

impl App {
    /// Create a pager for `source`, read from `file_path`.
    pub fn new(file_path: PathBuf, source: String) -> Self {
        Self {
            file_path,
            source,
            theme: Theme::default(),
        }
    }

    /// Set the rendering theme.
    pub const fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    fn display_name(&self) -> String {
        self.file_path.display().to_string()
    }
}
