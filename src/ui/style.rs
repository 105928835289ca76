//! Styles for the pager chrome (header and footer rows).
//!
//! The document itself carries its own ANSI styling; these only cover
//! the rows around it.

use ratatui::style::{Color, Modifier, Style};

use crate::theme::Theme;

/// Colors used by the header and footer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChromeStyle {
    /// File name in the header row
    pub header: Style,
    /// Help, search prompt and match info in the footer row
    pub footer: Style,
}

impl ChromeStyle {
    pub fn for_theme(theme: Theme) -> Self {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        if theme.uses_color() {
            Self {
                header: bold.fg(Color::Indexed(99)),
                footer: Style::default().fg(Color::Indexed(241)),
            }
        } else {
            Self {
                header: bold,
                footer: Style::default(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_is_bold_purple() {
        let style = ChromeStyle::for_theme(Theme::Dark);
        assert_eq!(style.header.fg, Some(Color::Indexed(99)));
        assert!(style.header.add_modifier.contains(Modifier::BOLD));
        assert_eq!(style.footer.fg, Some(Color::Indexed(241)));
    }

    #[test]
    fn test_notty_chrome_has_no_colors() {
        let style = ChromeStyle::for_theme(Theme::NoTty);
        assert_eq!(style.header.fg, None);
        assert_eq!(style.footer.fg, None);
    }
}
