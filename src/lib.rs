// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. search::compute_matches)
    clippy::module_name_repetitions
)]

//! # Incipit
//!
//! A terminal pager for markdown.
//!
//! Incipit renders markdown files in the terminal with:
//! - Headings drawn as colored "pills"
//! - Fenced code blocks in rounded, syntax-highlighted boxes
//! - Light, dark and no-color themes
//! - Incremental, case-insensitive search
//!
//! ## Architecture
//!
//! Rendering is a pipeline: code blocks and headings are cut out of the
//! source and replaced by placeholders, the remaining prose is rendered,
//! then the placeholders are swapped for the custom-rendered blocks.
//!
//! The pager uses The Elm Architecture (TEA) pattern:
//! - **Model**: Application state
//! - **Message**: Events and actions
//! - **Update**: Pure state transitions
//! - **View**: Render to terminal
//!
//! ## Modules
//!
//! - [`app`]: Pager state machine and event loop
//! - [`document`]: Markdown rendering pipeline
//! - [`ui`]: Terminal UI components
//! - [`highlight`]: Syntax highlighting
//! - [`search`]: Search functionality
//! - [`config`]: Saved default flags

pub mod ansi;
pub mod app;
pub mod config;
pub mod document;
pub mod highlight;
pub mod perf;
pub mod search;
pub mod theme;
pub mod ui;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::{App, Message, Model};
    pub use crate::document::render_markdown;
    pub use crate::theme::Theme;
    pub use crate::ui::viewport::Viewport;
}
