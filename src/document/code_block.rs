//! Boxed code block rendering.
//!
//! ```text
//! ╭── rust ──────╮
//! │              │
//! │ fn main() {} │
//! │              │
//! ╰──────────────╯
//! ```

use crate::ansi::{RESET, bg256, fg256, paint, strip_ansi};
use crate::highlight::{Palette, highlight_code};
use crate::theme::Theme;

use super::extract::CodeBlock;

/// Border and background colors for one theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BoxColors {
    background: u8,
    border: u8,
}

impl BoxColors {
    const fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self {
                background: 254,
                border: 27,
            },
            Theme::Dark | Theme::NoTty => Self {
                background: 235,
                border: 23,
            },
        }
    }
}

/// Render `block` as a box exactly `width` columns wide.
///
/// Lines longer than the inner width are not truncated and push the right
/// border out.
pub fn render_code_block(block: &CodeBlock, width: u16, theme: Theme) -> String {
    let width = usize::from(width);
    let inner = width.saturating_sub(4).max(1);
    let colors = BoxColors::for_theme(theme);
    let color = theme.uses_color();

    let border = |glyphs: &str| {
        if color {
            paint(glyphs, &fg256(colors.border))
        } else {
            glyphs.to_string()
        }
    };
    let bg_on = format!("\x1b[{}m", bg256(colors.background));
    let reset_to_bg = format!("\x1b[0;{}m", bg256(colors.background));

    let rule = "─".repeat(width.saturating_sub(2));
    let top = match block.language.as_deref() {
        Some(lang) => format!(
            "╭── {lang} {}╮",
            "─".repeat(width.saturating_sub(6 + lang.len()))
        ),
        None => format!("╭{rule}╮"),
    };
    let bottom = format!("╰{rule}╯");
    let left = border("│");
    let right = border("│");

    let blank = if color {
        format!("{left} {bg_on}{}{RESET} {right}", " ".repeat(inner))
    } else {
        format!("{left} {} {right}", " ".repeat(inner))
    };

    let source = if color {
        highlight_code(&block.code, block.language(), Palette::from(theme))
    } else {
        block.code.clone()
    };

    let mut lines = Vec::new();
    lines.push(border(&top));
    lines.push(blank.clone());
    for line in source.trim_end_matches('\n').split('\n') {
        let visible = strip_ansi(line);
        let pad = " ".repeat(inner.saturating_sub(visible.chars().count()));
        if color {
            let body = line.replace(RESET, &reset_to_bg);
            lines.push(format!("{left} {bg_on}{body}{pad}{RESET} {right}"));
        } else {
            lines.push(format!("{left} {visible}{pad} {right}"));
        }
    }
    lines.push(blank);
    lines.push(border(&bottom));
    lines.join("\n")
}
