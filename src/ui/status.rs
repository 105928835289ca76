use unicode_width::UnicodeWidthStr;

use crate::app::Model;

pub const HELP_TEXT: &str = " ↑/k ↓/j  g/G  / search  q quit";

/// Header row content: the file name after one space.
pub fn header_text(model: &Model) -> String {
    format!(" {}", model.file_name)
}

/// Footer row content. The first matching case wins:
/// search prompt, no-matches notice, match position, help with percentage.
pub fn footer_text(model: &Model) -> String {
    let query = &model.search_query;
    if model.is_searching() {
        return format!("/{query}_");
    }
    if model.no_matches && !query.is_empty() {
        return format!(" no matches: {query}");
    }
    if !model.matches().is_empty() {
        return format!(
            " {}/{}: {query}",
            model.match_index() + 1,
            model.matches().len()
        );
    }
    let percent = format!("  {:>3}% ", model.viewport.scroll_percent());
    let width = usize::from(model.viewport.width());
    let gap = width.saturating_sub(HELP_TEXT.width() + percent.width());
    format!("{HELP_TEXT}{}{percent}", " ".repeat(gap))
}
