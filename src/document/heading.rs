//! Heading "pills": the heading label on a colored background.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::ansi::{bg256, fg256, paint};
use crate::theme::Theme;

use super::extract::HeadingBlock;

static INLINE_MARKERS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[*_~`]{1,2}").expect("valid inline marker regex"));

/// Columns of background padding on each side of the label.
const PILL_PADDING: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PillStyle {
    fg: u8,
    bg: u8,
    bold: bool,
}

impl PillStyle {
    const fn new(fg: u8, bg: u8, bold: bool) -> Self {
        Self { fg, bg, bold }
    }

    const fn lookup(level: u8, theme: Theme) -> Self {
        match (theme, level) {
            (Theme::Light, 1) => Self::new(0, 105, true),
            (Theme::Light, 2) => Self::new(27, 195, true),
            (Theme::Light, 3) => Self::new(28, 194, true),
            (Theme::Light, 4) => Self::new(19, 189, true),
            (Theme::Light, 5) => Self::new(17, 153, false),
            (Theme::Light, _) => Self::new(59, 188, false),
            (_, 1) => Self::new(15, 57, true),
            (_, 2) => Self::new(51, 23, true),
            (_, 3) => Self::new(48, 22, true),
            (_, 4) => Self::new(75, 17, true),
            (_, 5) => Self::new(67, 236, false),
            (_, _) => Self::new(60, 235, false),
        }
    }

    fn sgr(self) -> String {
        let colors = format!("{};{}", fg256(self.fg), bg256(self.bg));
        if self.bold {
            format!("1;{colors}")
        } else {
            colors
        }
    }
}

/// Heading text with inline emphasis markers removed and whitespace trimmed.
pub fn heading_label(text: &str) -> String {
    INLINE_MARKERS.replace_all(text, "").trim().to_string()
}

/// Render `heading` as a pill, or as its bare label without color.
pub fn render_heading(heading: &HeadingBlock, theme: Theme) -> String {
    let label = heading_label(&heading.text);
    if !theme.uses_color() {
        return label;
    }
    let pad = " ".repeat(PILL_PADDING);
    paint(
        &format!("{pad}{label}{pad}"),
        &PillStyle::lookup(heading.level, theme).sgr(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ansi::strip_ansi;

    #[test]
    fn test_section_heading_is_padded_pill() {
        let out = render_heading(&HeadingBlock::new(2, "Section"), Theme::Dark);
        assert_eq!(strip_ansi(&out), "  Section  ");
        assert!(!out.contains("## "));
        assert_eq!(out, "\x1b[1;38;5;51;48;5;23m  Section  \x1b[0m");
    }

    #[test]
    fn test_label_strips_inline_markers() {
        let cases = [
            ("**Bold** Title", "Bold Title"),
            ("_under_ and `code`", "under and code"),
            ("~~gone~~  ", "gone"),
            ("  plain  ", "plain"),
        ];
        for (input, want) in cases {
            assert_eq!(heading_label(input), want, "input {input:?}");
        }
    }

    #[test]
    fn test_notty_returns_plain_label() {
        let out = render_heading(&HeadingBlock::new(1, "*Title*"), Theme::NoTty);
        assert_eq!(out, "Title");
    }

    #[test]
    fn test_levels_five_and_six_are_not_bold() {
        for level in 1..=6 {
            for theme in [Theme::Dark, Theme::Light] {
                let out = render_heading(&HeadingBlock::new(level, "x"), theme);
                assert_eq!(out.starts_with("\x1b[1;"), level <= 4, "level {level} {theme}");
            }
        }
    }

    #[test]
    fn test_light_palette_differs_from_dark() {
        let heading = HeadingBlock::new(1, "Title");
        assert_eq!(
            render_heading(&heading, Theme::Light),
            "\x1b[1;38;5;0;48;5;105m  Title  \x1b[0m"
        );
        assert_eq!(
            render_heading(&heading, Theme::Dark),
            "\x1b[1;38;5;15;48;5;57m  Title  \x1b[0m"
        );
    }
}
