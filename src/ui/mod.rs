//! Terminal UI components.
//!
//! This module contains all UI-related code including:
//! - [`viewport`]: Scroll position and visible range management
//! - [`style`]: Header and footer styling
//!
//! The screen is a header row, the document, and a footer row.

pub mod style;
pub mod viewport;

mod render;
mod status;

pub use render::render;
pub use status::{HELP_TEXT, footer_text, header_text};
