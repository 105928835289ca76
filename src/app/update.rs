use crate::app::Model;
use crate::app::model::{CHROME_ROWS, Mode};
use crate::search::{next_match, previous_match};

/// All events and actions the pager reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // Navigation
    /// Scroll up by n lines
    ScrollUp(usize),
    /// Scroll down by n lines
    ScrollDown(usize),
    PageUp,
    PageDown,
    HalfPageUp,
    HalfPageDown,
    GoToTop,
    GoToBottom,

    // Search
    /// Enter search mode
    StartSearch,
    /// Append a character to the query
    SearchInput(char),
    /// Remove the last character of the query
    SearchBackspace,
    /// Commit the query (Enter)
    SubmitSearch,
    /// Leave search mode and forget the query (Esc)
    CancelSearch,
    /// Go to the next match
    NextMatch,
    /// Go to the previous match
    PrevMatch,

    // Application
    /// Terminal size is known or changed (width, height)
    Resize(u16, u16),
    Quit,
}

/// Pure state transition: take the model and a message, return the new model.
pub fn update(mut model: Model, msg: Message) -> Model {
    match msg {
        Message::Resize(width, height) => resize(&mut model, width, height),
        Message::Quit => model.should_quit = true,
        msg => match model.mode {
            Mode::Loading => {}
            Mode::Searching => update_searching(&mut model, msg),
            Mode::Normal => update_normal(&mut model, msg),
        },
    }
    model
}

fn resize(model: &mut Model, width: u16, height: u16) {
    let doc_height = height.saturating_sub(CHROME_ROWS);
    if crate::perf::is_debug_log_enabled() {
        crate::perf::log_event("pager.resize", format!("width={width} height={height}"));
    }
    if model.is_ready() {
        model.viewport.set_height(doc_height);
        if width != model.rendered_width() {
            model.apply_content(width);
        }
        model.viewport.set_width(width);
    } else {
        model.viewport = crate::ui::viewport::Viewport::new(width, doc_height, 0);
        model.apply_content(width);
        model.mode = Mode::Normal;
    }
}

fn update_searching(model: &mut Model, msg: Message) {
    match msg {
        Message::SearchInput(c) => model.search_query.push(c),
        Message::SearchBackspace => {
            model.search_query.pop();
            model.no_matches = false;
        }
        Message::SubmitSearch => {
            if !model.search_query.is_empty() {
                model.commit_search();
            }
            model.mode = Mode::Normal;
        }
        Message::CancelSearch => {
            model.clear_search();
            model.mode = Mode::Normal;
        }
        _ => {}
    }
}

fn update_normal(model: &mut Model, msg: Message) {
    match msg {
        Message::ScrollUp(n) => model.viewport.scroll_up(n),
        Message::ScrollDown(n) => model.viewport.scroll_down(n),
        Message::PageUp => model.viewport.page_up(),
        Message::PageDown => model.viewport.page_down(),
        Message::HalfPageUp => model.viewport.half_page_up(),
        Message::HalfPageDown => model.viewport.half_page_down(),
        Message::GoToTop => model.viewport.go_to_top(),
        Message::GoToBottom => model.viewport.go_to_bottom(),
        Message::StartSearch => {
            model.mode = Mode::Searching;
            model.no_matches = false;
        }
        Message::NextMatch => model.step_match(next_match),
        Message::PrevMatch => model.step_match(previous_match),
        _ => {}
    }
}
