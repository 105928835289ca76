use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::ansi::to_line;
use crate::app::Model;

use super::status::{footer_text, header_text};
use super::style::ChromeStyle;

/// Render the complete UI.
pub fn render(model: &Model, frame: &mut Frame) {
    let area = frame.area();
    if !model.is_ready() {
        let loading = Paragraph::new(vec![Line::default(), Line::from("  Loading...")]);
        frame.render_widget(loading, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);
    let style = ChromeStyle::for_theme(model.theme);

    render_header(model, frame, chunks[0], style);
    render_document(model, frame, chunks[1]);
    let footer = Paragraph::new(footer_text(model)).style(style.footer);
    frame.render_widget(footer, chunks[2]);
}

fn render_header(model: &Model, frame: &mut Frame, area: Rect, style: ChromeStyle) {
    let text = header_text(model);
    let (lead, name) = text.split_at(1);
    let header = Line::from(vec![
        Span::raw(lead.to_string()),
        Span::styled(name.to_string(), style.header),
    ]);
    frame.render_widget(Paragraph::new(header), area);
}

fn render_document(model: &Model, frame: &mut Frame, area: Rect) {
    let lines: Vec<Line> = model.rendered_lines()[model.viewport.visible_range()]
        .iter()
        .map(|line| to_line(line))
        .collect();
    frame.render_widget(Paragraph::new(lines), area);
}
