//! ANSI escape handling.
//!
//! Every stage of the pipeline works on ANSI-escaped strings, so this
//! module provides the shared helpers: stripping escapes, measuring the
//! visible text, and converting SGR-styled lines into ratatui lines for
//! the pager view.

use once_cell::sync::Lazy;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use regex::Regex;
use unicode_width::UnicodeWidthStr;

pub const RESET: &str = "\x1b[0m";

static ANSI_ESCAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\x1b\[[0-9;]*[a-zA-Z]").expect("valid ansi escape regex"));

/// Remove all CSI escape sequences from `s`.
pub fn strip_ansi(s: &str) -> String {
    ANSI_ESCAPE.replace_all(s, "").into_owned()
}

/// Visible length in runes after stripping escapes.
pub fn visible_width(s: &str) -> usize {
    strip_ansi(s).chars().count()
}

/// Terminal column width after stripping escapes.
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(strip_ansi(s).as_str())
}

/// Wrap `text` in an SGR sequence built from `params`, followed by a reset.
///
/// Empty `params` (or empty text) leaves the text untouched.
pub fn paint(text: &str, params: &str) -> String {
    if params.is_empty() || text.is_empty() {
        return text.to_string();
    }
    format!("\x1b[{params}m{text}{RESET}")
}

/// SGR parameters selecting a 256-color foreground.
pub fn fg256(index: u8) -> String {
    format!("38;5;{index}")
}

/// SGR parameters selecting a 256-color background.
pub fn bg256(index: u8) -> String {
    format!("48;5;{index}")
}

/// Convert one ANSI-styled line into a ratatui [`Line`].
///
/// SGR sequences become span styles; any other escape sequence is dropped.
pub fn to_line(s: &str) -> Line<'static> {
    let mut spans = Vec::new();
    let mut style = Style::default();
    let mut buf = String::new();
    let mut chars = s.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '\x1b' {
            buf.push(ch);
            continue;
        }
        if chars.peek() != Some(&'[') {
            // Two-byte escape: skip the designator.
            chars.next();
            continue;
        }
        chars.next();
        let mut params = String::new();
        let mut final_byte = None;
        for c in chars.by_ref() {
            if ('\x40'..='\x7e').contains(&c) {
                final_byte = Some(c);
                break;
            }
            params.push(c);
        }
        if final_byte != Some('m') {
            continue;
        }
        if !buf.is_empty() {
            spans.push(Span::styled(std::mem::take(&mut buf), style));
        }
        style = apply_sgr(style, &params);
    }

    if !buf.is_empty() {
        spans.push(Span::styled(buf, style));
    }
    Line::from(spans)
}

fn apply_sgr(mut style: Style, params: &str) -> Style {
    let codes: Vec<u16> = if params.is_empty() {
        vec![0]
    } else {
        params
            .split(';')
            .map(|p| p.parse::<u16>().unwrap_or(0))
            .collect()
    };

    let mut i = 0;
    while i < codes.len() {
        match codes[i] {
            0 => style = Style::default(),
            1 => style = style.add_modifier(Modifier::BOLD),
            2 => style = style.add_modifier(Modifier::DIM),
            3 => style = style.add_modifier(Modifier::ITALIC),
            4 => style = style.add_modifier(Modifier::UNDERLINED),
            7 => style = style.add_modifier(Modifier::REVERSED),
            9 => style = style.add_modifier(Modifier::CROSSED_OUT),
            22 => style = style.remove_modifier(Modifier::BOLD | Modifier::DIM),
            23 => style = style.remove_modifier(Modifier::ITALIC),
            24 => style = style.remove_modifier(Modifier::UNDERLINED),
            27 => style = style.remove_modifier(Modifier::REVERSED),
            29 => style = style.remove_modifier(Modifier::CROSSED_OUT),
            code @ 30..=37 => style = style.fg(basic_color(code - 30)),
            38 => {
                if let Some(color) = extended_color(&codes, &mut i) {
                    style = style.fg(color);
                }
            }
            39 => style = style.fg(Color::Reset),
            code @ 40..=47 => style = style.bg(basic_color(code - 40)),
            48 => {
                if let Some(color) = extended_color(&codes, &mut i) {
                    style = style.bg(color);
                }
            }
            49 => style = style.bg(Color::Reset),
            code @ 90..=97 => style = style.fg(basic_color(code - 90 + 8)),
            code @ 100..=107 => style = style.bg(basic_color(code - 100 + 8)),
            _ => {}
        }
        i += 1;
    }
    style
}

#[allow(clippy::cast_possible_truncation)]
const fn basic_color(index: u16) -> Color {
    Color::Indexed(index as u8)
}

/// Parse `5;n` or `2;r;g;b` following a 38/48 code, advancing `i` past it.
fn extended_color(codes: &[u16], i: &mut usize) -> Option<Color> {
    let byte = |idx: usize| codes.get(idx).and_then(|v| u8::try_from(*v).ok());
    match codes.get(*i + 1) {
        Some(5) => {
            let color = byte(*i + 2).map(Color::Indexed);
            *i += 2;
            color
        }
        Some(2) => {
            let color = match (byte(*i + 2), byte(*i + 3), byte(*i + 4)) {
                (Some(r), Some(g), Some(b)) => Some(Color::Rgb(r, g, b)),
                _ => None,
            };
            *i += 4;
            color
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_ansi_removes_sgr() {
        let cases = [
            ("\x1b[31mhello\x1b[0m", "hello"),
            ("\x1b[1;32mworld\x1b[0m", "world"),
            ("no escapes", "no escapes"),
            ("", ""),
        ];
        for (input, want) in cases {
            assert_eq!(strip_ansi(input), want, "input {input:?}");
        }
    }

    #[test]
    fn test_visible_width_counts_runes() {
        assert_eq!(visible_width("\x1b[38;5;23m╭──╮\x1b[0m"), 4);
    }

    #[test]
    fn test_display_width_counts_wide_chars() {
        assert_eq!(display_width("日本"), 4);
        assert_eq!(visible_width("日本"), 2);
    }

    #[test]
    fn test_paint_skips_empty_params() {
        assert_eq!(paint("x", ""), "x");
        assert_eq!(paint("x", "1"), "\x1b[1mx\x1b[0m");
    }

    #[test]
    fn test_to_line_applies_256_colors() {
        let line = to_line("a\x1b[1;38;5;15;48;5;57mB\x1b[0mc");
        assert_eq!(line.spans.len(), 3);
        assert_eq!(line.spans[0].content, "a");
        assert_eq!(line.spans[1].content, "B");
        assert_eq!(line.spans[1].style.fg, Some(Color::Indexed(15)));
        assert_eq!(line.spans[1].style.bg, Some(Color::Indexed(57)));
        assert!(line.spans[1].style.add_modifier.contains(Modifier::BOLD));
        assert_eq!(line.spans[2].style, Style::default());
    }

    #[test]
    fn test_to_line_parses_truecolor() {
        let line = to_line("\x1b[38;2;10;20;30mx");
        assert_eq!(line.spans[0].style.fg, Some(Color::Rgb(10, 20, 30)));
    }

    #[test]
    fn test_to_line_drops_non_sgr_sequences() {
        let line = to_line("\x1b[2Kplain");
        assert_eq!(line.spans.len(), 1);
        assert_eq!(line.spans[0].content, "plain");
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn strip_ansi_is_idempotent(s in "(\x1b\\[[0-9;]{0,6}[a-zA-Z]|[a-z ╭─]){0,40}") {
                let once = strip_ansi(&s);
                prop_assert_eq!(strip_ansi(&once), once.clone());
            }

            #[test]
            fn strip_ansi_is_identity_without_escapes(s in "[^\x1b]{0,80}") {
                prop_assert_eq!(strip_ansi(&s), s);
            }

            #[test]
            fn to_line_keeps_visible_text(s in "(\x1b\\[[0-9;]{0,8}m|[a-z ]){0,40}") {
                let line = to_line(&s);
                let text: String = line.spans.iter().map(|span| span.content.as_ref()).collect();
                prop_assert_eq!(text, strip_ansi(&s));
            }
        }
    }
}
