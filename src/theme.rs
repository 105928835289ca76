//! Color themes.
//!
//! The theme is chosen once at startup and is fixed for the lifetime of
//! the process. `NoTty` is the no-color mode used for plain output.

use std::fmt;

/// Rendering theme for the whole document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Theme {
    #[default]
    Dark,
    Light,
    NoTty,
}

impl Theme {
    /// Resolve the theme from the user's choices.
    ///
    /// No-color (flag or `NO_COLOR`) wins over `--light`, which wins over
    /// the dark default.
    pub const fn resolve(light: bool, no_color: bool) -> Self {
        if no_color {
            Self::NoTty
        } else if light {
            Self::Light
        } else {
            Self::Dark
        }
    }

    /// Whether any ANSI color codes may be emitted.
    pub const fn uses_color(self) -> bool {
        !matches!(self, Self::NoTty)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
            Self::NoTty => "notty",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// True when the `NO_COLOR` value asks for colorless output.
pub fn no_color_requested(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.is_empty())
}
