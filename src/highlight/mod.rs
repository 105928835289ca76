//! Syntax highlighting for code blocks.
//!
//! Uses syntect for highlighting with Sublime Text syntax definitions and
//! emits 256-color ANSI text. Every token is followed by a full reset, which
//! the code block renderer rewrites to keep its background alive.
//!
//! Highlighting is best effort: an unknown language or a highlighter error
//! yields the code unchanged.

use std::fmt::Write as _;
use std::sync::OnceLock;

use syntect::easy::HighlightLines;
use syntect::highlighting::{FontStyle, Theme as SyntectTheme, ThemeSet};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

use crate::ansi::RESET;
use crate::theme::Theme;

/// Color palette used for token colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Palette {
    Light,
    Dark,
}

impl Palette {
    const fn preferred_themes(self) -> &'static [&'static str] {
        match self {
            Self::Dark => &[
                "Monokai Extended",
                "base16-eighties.dark",
                "base16-mocha.dark",
                "base16-ocean.dark",
            ],
            Self::Light => &["InspiredGitHub", "Solarized (light)", "base16-ocean.light"],
        }
    }
}

impl From<Theme> for Palette {
    fn from(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self::Light,
            Theme::Dark | Theme::NoTty => Self::Dark,
        }
    }
}

/// Highlight `code` as `language`, returning ANSI text with the same line
/// structure as the input.
pub fn highlight_code(code: &str, language: &str, palette: Palette) -> String {
    if language.is_empty() {
        return code.to_string();
    }
    let syntax_set = syntax_set();
    let syntax = syntax_set
        .find_syntax_by_token(language)
        .or_else(|| syntax_set.find_syntax_by_name(language));
    let Some(syntax) = syntax else {
        tracing::trace!(language, "no syntax definition; leaving code plain");
        return code.to_string();
    };

    let mut highlighter = HighlightLines::new(syntax, theme(palette));
    let mut out = String::with_capacity(code.len() * 2);
    for line in LinesWithEndings::from(code) {
        let Ok(ranges) = highlighter.highlight_line(line, syntax_set) else {
            tracing::trace!(language, "highlighter failed; leaving code plain");
            return code.to_string();
        };
        for (style, text) in ranges {
            let (body, newline) = match text.strip_suffix('\n') {
                Some(body) => (body, true),
                None => (text, false),
            };
            if !body.is_empty() {
                let fg = rgb_to_ansi256(style.foreground.r, style.foreground.g, style.foreground.b);
                let bold = if style.font_style.contains(FontStyle::BOLD) {
                    "1;"
                } else {
                    ""
                };
                let _ = write!(out, "\x1b[{bold}38;5;{fg}m{body}{RESET}");
            }
            if newline {
                out.push('\n');
            }
        }
    }
    out
}

fn syntax_set() -> &'static SyntaxSet {
    static SYNTAX_SET: OnceLock<SyntaxSet> = OnceLock::new();
    SYNTAX_SET.get_or_init(|| {
        let _scope = crate::perf::scope("highlight.syntax_set.load_defaults");
        SyntaxSet::load_defaults_newlines()
    })
}

fn theme_set() -> &'static ThemeSet {
    static THEME_SET: OnceLock<ThemeSet> = OnceLock::new();
    THEME_SET.get_or_init(|| {
        let _scope = crate::perf::scope("highlight.theme_set.load_defaults");
        ThemeSet::load_defaults()
    })
}

fn theme(palette: Palette) -> &'static SyntectTheme {
    static DARK: OnceLock<SyntectTheme> = OnceLock::new();
    static LIGHT: OnceLock<SyntectTheme> = OnceLock::new();
    let cell = match palette {
        Palette::Dark => &DARK,
        Palette::Light => &LIGHT,
    };
    cell.get_or_init(|| {
        let themes = &theme_set().themes;
        palette
            .preferred_themes()
            .iter()
            .find_map(|name| themes.get(*name))
            .or_else(|| themes.values().next())
            .cloned()
            .unwrap_or_default()
    })
}

/// Map a truecolor value onto the xterm 256-color palette.
fn rgb_to_ansi256(r: u8, g: u8, b: u8) -> u8 {
    // Near-greys map onto the 24-step grey ramp.
    if r.abs_diff(g) < 8 && g.abs_diff(b) < 8 && r.abs_diff(b) < 8 {
        let avg = (u16::from(r) + u16::from(g) + u16::from(b)) / 3;
        if avg < 8 {
            return 16;
        }
        if avg > 238 {
            return 231;
        }
        #[allow(clippy::cast_possible_truncation)]
        let step = ((avg - 8) * 24 / 231) as u8;
        return 232 + step.min(23);
    }
    let level = |c: u8| -> u8 {
        if c < 48 {
            0
        } else if c < 115 {
            1
        } else {
            (c - 35) / 40
        }
    };
    16 + 36 * level(r) + 6 * level(g) + level(b)
}
