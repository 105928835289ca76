//! Markdown prose to ANSI text.
//!
//! Renders everything the extractor leaves behind: paragraphs, lists,
//! quotes, tables and the like. Output lines carry a two-column margin and
//! wrap at `width - 4`. Blocks are separated by one blank line.

use std::fmt::Write as _;

use comrak::nodes::{AstNode, ListDelimType, ListType, NodeList, NodeValue, TableAlignment};
use comrak::{Arena, Options, parse_document};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::ansi::paint;
use crate::highlight::{Palette, highlight_code};
use crate::theme::Theme;

use super::RenderError;

const MARGIN: usize = 2;

/// SGR parameters for each prose element.
#[derive(Debug, Clone, Copy)]
struct ProseStyles {
    text: &'static str,
    heading: &'static str,
    code: &'static str,
    code_block: &'static str,
    link: &'static str,
    link_url: &'static str,
    quote: &'static str,
    rule: &'static str,
    marker: &'static str,
    table_border: &'static str,
}

const DARK_STYLES: ProseStyles = ProseStyles {
    text: "38;5;252",
    heading: "1;38;5;39",
    code: "38;5;203;48;5;236",
    code_block: "38;5;244",
    link: "4;38;5;30",
    link_url: "38;5;35",
    quote: "38;5;244",
    rule: "38;5;240",
    marker: "38;5;245",
    table_border: "38;5;240",
};

const LIGHT_STYLES: ProseStyles = ProseStyles {
    text: "38;5;234",
    heading: "1;38;5;27",
    code: "38;5;203;48;5;254",
    code_block: "38;5;242",
    link: "4;38;5;36",
    link_url: "38;5;29",
    quote: "38;5;242",
    rule: "38;5;250",
    marker: "38;5;244",
    table_border: "38;5;250",
};

const NO_STYLES: ProseStyles = ProseStyles {
    text: "",
    heading: "",
    code: "",
    code_block: "",
    link: "",
    link_url: "",
    quote: "",
    rule: "",
    marker: "",
    table_border: "",
};

impl ProseStyles {
    const fn for_theme(theme: Theme) -> &'static Self {
        match theme {
            Theme::Dark => &DARK_STYLES,
            Theme::Light => &LIGHT_STYLES,
            Theme::NoTty => &NO_STYLES,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct InlineStyle {
    emphasis: bool,
    strong: bool,
    strikethrough: bool,
    code: bool,
    link: bool,
    url: bool,
    heading: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct InlineSpan {
    text: String,
    style: InlineStyle,
}

impl InlineSpan {
    fn new(text: impl Into<String>, style: InlineStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}

/// One unit of word wrapping.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    /// Non-whitespace run; may span several styles (`**bold**ly`).
    Word(Vec<InlineSpan>),
    Space(InlineSpan),
    Break,
}

impl Token {
    fn width(&self) -> usize {
        match self {
            Self::Word(pieces) => pieces.iter().map(|p| p.text.width()).sum(),
            Self::Space(span) => span.text.width(),
            Self::Break => 0,
        }
    }
}

/// Markdown-to-ANSI renderer for prose.
#[derive(Debug, Clone)]
pub struct ProseRenderer {
    theme: Theme,
    width: usize,
    styles: &'static ProseStyles,
}

impl ProseRenderer {
    /// Create a renderer that wraps output to `width` terminal columns.
    ///
    /// # Errors
    /// Returns [`RenderError::InvalidWidth`] for a zero width.
    pub fn new(theme: Theme, width: u16) -> Result<Self, RenderError> {
        if width == 0 {
            return Err(RenderError::InvalidWidth(width));
        }
        Ok(Self {
            theme,
            width: usize::from(width),
            styles: ProseStyles::for_theme(theme),
        })
    }

    /// Render `markdown` to ANSI text without a trailing newline.
    ///
    /// # Errors
    /// Returns an error if the output cannot be assembled.
    pub fn render(&self, markdown: &str) -> Result<String, RenderError> {
        let _scope = crate::perf::scope("render.prose");
        let arena = Arena::new();
        let mut options = Options::default();
        options.extension.strikethrough = true;
        options.extension.table = true;
        options.extension.autolink = true;
        options.extension.tasklist = true;
        let root = parse_document(&arena, markdown, &options);
        let wrap_width = self.width.saturating_sub(MARGIN * 2).max(1);
        let lines = self.render_blocks(root, wrap_width);

        let margin = " ".repeat(MARGIN);
        let mut out = String::new();
        for (idx, line) in lines.iter().enumerate() {
            if idx > 0 {
                out.push('\n');
            }
            if !line.is_empty() {
                write!(out, "{margin}{line}")?;
            }
        }
        Ok(out)
    }

    fn render_blocks<'a>(&self, container: &'a AstNode<'a>, width: usize) -> Vec<String> {
        let mut lines = Vec::new();
        for child in container.children() {
            let block = self.render_block(child, width);
            if block.is_empty() {
                continue;
            }
            if !lines.is_empty() {
                lines.push(String::new());
            }
            lines.extend(block);
        }
        lines
    }

    fn render_block<'a>(&self, node: &'a AstNode<'a>, width: usize) -> Vec<String> {
        match &node.data.borrow().value {
            NodeValue::Paragraph => {
                let spans = collect_inline_spans(node, InlineStyle::default());
                self.wrap(&spans, width)
            }
            NodeValue::Heading(_) => {
                let style = InlineStyle {
                    heading: true,
                    ..InlineStyle::default()
                };
                let spans = collect_inline_spans(node, style);
                self.wrap(&spans, width)
            }
            NodeValue::CodeBlock(code_block) => {
                self.render_code(&code_block.info, &code_block.literal)
            }
            NodeValue::List(list) => self.render_list(node, list, width),
            NodeValue::BlockQuote => {
                let bar = paint("│ ", self.styles.quote);
                self.render_blocks(node, width.saturating_sub(2).max(1))
                    .into_iter()
                    .map(|line| format!("{bar}{line}"))
                    .collect()
            }
            NodeValue::ThematicBreak => vec![paint(&"─".repeat(width), self.styles.rule)],
            NodeValue::Table(table) => self.render_table(node, &table.alignments, width),
            NodeValue::HtmlBlock(html) => html
                .literal
                .trim_end_matches('\n')
                .split('\n')
                .map(|line| paint(line.trim_end(), self.styles.text))
                .collect(),
            _ => self.render_blocks(node, width),
        }
    }

    fn render_code(&self, info: &str, literal: &str) -> Vec<String> {
        let language = info.split_whitespace().next().unwrap_or_default();
        let highlighted = if self.theme.uses_color() {
            highlight_code(literal, language, Palette::from(self.theme))
        } else {
            literal.to_string()
        };
        let plain = highlighted == literal;
        highlighted
            .trim_end_matches('\n')
            .split('\n')
            .map(|line| {
                if plain {
                    format!("  {}", paint(line, self.styles.code_block))
                } else {
                    format!("  {line}")
                }
            })
            .collect()
    }

    fn render_list<'a>(&self, node: &'a AstNode<'a>, list: &NodeList, width: usize) -> Vec<String> {
        let count = node.children().count();
        let last_number = list.start + count.saturating_sub(1);
        let number_width = last_number.to_string().len();
        let delimiter = match list.delimiter {
            ListDelimType::Period => '.',
            ListDelimType::Paren => ')',
        };

        let mut lines = Vec::new();
        for (index, item) in node.children().enumerate() {
            let marker = match &item.data.borrow().value {
                NodeValue::TaskItem(Some(_)) => "[✓] ".to_string(),
                NodeValue::TaskItem(None) => "[ ] ".to_string(),
                _ => match list.list_type {
                    ListType::Bullet => "• ".to_string(),
                    ListType::Ordered => {
                        format!("{:>number_width$}{delimiter} ", list.start + index)
                    }
                },
            };
            let marker_width = marker.width();
            let body_width = width.saturating_sub(marker_width).max(1);
            let body = self.render_item(item, body_width, list.tight);

            if index > 0 && !list.tight {
                lines.push(String::new());
            }
            let indent = " ".repeat(marker_width);
            let painted_marker = paint(&marker, self.styles.marker);
            if body.is_empty() {
                lines.push(painted_marker);
                continue;
            }
            for (line_idx, line) in body.into_iter().enumerate() {
                if line_idx == 0 {
                    lines.push(format!("{painted_marker}{line}"));
                } else if line.is_empty() {
                    lines.push(line);
                } else {
                    lines.push(format!("{indent}{line}"));
                }
            }
        }
        lines
    }

    fn render_item<'a>(&self, item: &'a AstNode<'a>, width: usize, tight: bool) -> Vec<String> {
        if !tight {
            return self.render_blocks(item, width);
        }
        item.children()
            .flat_map(|child| self.render_block(child, width))
            .collect()
    }

    fn render_table<'a>(
        &self,
        node: &'a AstNode<'a>,
        alignments: &[TableAlignment],
        width: usize,
    ) -> Vec<String> {
        let (mut rows, has_header) = collect_table_rows(node);
        let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
        if columns == 0 {
            return Vec::new();
        }
        for row in &mut rows {
            row.resize(columns, String::new());
        }

        let mut widths = vec![1_usize; columns];
        for row in &rows {
            for (idx, cell) in row.iter().enumerate() {
                widths[idx] = widths[idx].max(cell.width());
            }
        }
        // Row width is 1 + sum(width + 3).
        while 1 + widths.iter().sum::<usize>() + 3 * columns > width.max(4) {
            let Some((widest, _)) = widths.iter().enumerate().max_by_key(|(_, w)| **w) else {
                break;
            };
            if widths[widest] <= 1 {
                break;
            }
            widths[widest] -= 1;
        }

        let border = |left, middle, right| {
            paint(&table_border(&widths, left, middle, right), self.styles.table_border)
        };
        let mut lines = vec![border('┌', '┬', '┐')];
        for (idx, row) in rows.iter().enumerate() {
            lines.push(self.table_row(row, &widths, alignments));
            if has_header && idx == 0 {
                lines.push(border('├', '┼', '┤'));
            }
        }
        lines.push(border('└', '┴', '┘'));
        lines
    }

    fn table_row(
        &self,
        cells: &[String],
        widths: &[usize],
        alignments: &[TableAlignment],
    ) -> String {
        let bar = paint("│", self.styles.table_border);
        let mut out = bar.clone();
        for (idx, width) in widths.iter().enumerate() {
            let content = truncate_to_width(cells.get(idx).map_or("", String::as_str), *width);
            let padding = width.saturating_sub(content.width());
            let (left, right) = match alignments.get(idx).copied().unwrap_or(TableAlignment::None) {
                TableAlignment::Right => (padding, 0),
                TableAlignment::Center => (padding / 2, padding - padding / 2),
                TableAlignment::Left | TableAlignment::None => (0, padding),
            };
            out.push(' ');
            out.push_str(&" ".repeat(left));
            out.push_str(&paint(&content, self.styles.text));
            out.push_str(&" ".repeat(right));
            out.push(' ');
            out.push_str(&bar);
        }
        out
    }

    fn wrap(&self, spans: &[InlineSpan], width: usize) -> Vec<String> {
        let mut lines: Vec<Vec<Token>> = vec![Vec::new()];
        let mut line_width = 0_usize;

        for token in tokenize(spans) {
            if token == Token::Break {
                lines.push(Vec::new());
                line_width = 0;
                continue;
            }
            let token_width = token.width();
            let is_space = matches!(token, Token::Space(_));
            if is_space && line_width == 0 {
                continue;
            }
            if !is_space && line_width > 0 && line_width + token_width > width {
                if let Some(line) = lines.last_mut() {
                    trim_trailing_space(line);
                }
                lines.push(Vec::new());
                line_width = 0;
            }
            line_width += token_width;
            if let Some(line) = lines.last_mut() {
                line.push(token);
            }
        }

        lines
            .into_iter()
            .map(|mut line| {
                trim_trailing_space(&mut line);
                self.emit(&line)
            })
            .collect()
    }

    /// Paint one wrapped line, merging neighbouring pieces that share a style.
    fn emit(&self, tokens: &[Token]) -> String {
        let mut runs: Vec<InlineSpan> = Vec::new();
        let pieces = tokens.iter().flat_map(|token| match token {
            Token::Word(pieces) => pieces.clone(),
            Token::Space(span) => vec![span.clone()],
            Token::Break => Vec::new(),
        });
        for piece in pieces {
            match runs.last_mut() {
                Some(last) if last.style == piece.style => last.text.push_str(&piece.text),
                _ => runs.push(piece),
            }
        }
        runs.iter()
            .map(|run| paint(&run.text, &self.sgr(run.style)))
            .collect()
    }

    fn sgr(&self, style: InlineStyle) -> String {
        if !self.theme.uses_color() {
            return String::new();
        }
        let base = if style.code {
            self.styles.code
        } else if style.url {
            self.styles.link_url
        } else if style.link {
            self.styles.link
        } else if style.heading {
            self.styles.heading
        } else {
            self.styles.text
        };
        let mut params = vec![base];
        if style.strong {
            params.push("1");
        }
        if style.emphasis {
            params.push("3");
        }
        if style.strikethrough {
            params.push("9");
        }
        params.join(";")
    }
}

fn collect_inline_spans<'a>(node: &'a AstNode<'a>, style: InlineStyle) -> Vec<InlineSpan> {
    let mut spans = Vec::new();
    for child in node.children() {
        collect_inline_spans_recursive(child, style, &mut spans);
    }
    spans
}

fn collect_inline_spans_recursive<'a>(
    node: &'a AstNode<'a>,
    style: InlineStyle,
    spans: &mut Vec<InlineSpan>,
) {
    match &node.data.borrow().value {
        NodeValue::Text(text) => spans.push(InlineSpan::new(text.as_str(), style)),
        NodeValue::Code(code) => spans.push(InlineSpan::new(
            code.literal.as_str(),
            InlineStyle { code: true, ..style },
        )),
        NodeValue::HtmlInline(html) => spans.push(InlineSpan::new(html.as_str(), style)),
        NodeValue::Emph => {
            let style = InlineStyle { emphasis: true, ..style };
            spans.extend(collect_inline_spans(node, style));
        }
        NodeValue::Strong => {
            let style = InlineStyle { strong: true, ..style };
            spans.extend(collect_inline_spans(node, style));
        }
        NodeValue::Strikethrough => {
            let style = InlineStyle {
                strikethrough: true,
                ..style
            };
            spans.extend(collect_inline_spans(node, style));
        }
        NodeValue::Link(link) => {
            let label = collect_inline_spans(node, InlineStyle { link: true, ..style });
            let label_text: String = label.iter().map(|span| span.text.as_str()).collect();
            spans.extend(label);
            if !link.url.is_empty() && link.url != label_text {
                spans.push(InlineSpan::new(" ", style));
                spans.push(InlineSpan::new(link.url.as_str(), InlineStyle { url: true, ..style }));
            }
        }
        NodeValue::Image(image) => {
            let alt = extract_text(node);
            spans.push(InlineSpan::new(
                format!("Image: {alt} → {}", image.url),
                InlineStyle { link: true, ..style },
            ));
        }
        NodeValue::SoftBreak => spans.push(InlineSpan::new(" ", style)),
        NodeValue::LineBreak => spans.push(InlineSpan::new("\n", style)),
        _ => spans.extend(collect_inline_spans(node, style)),
    }
}

fn extract_text<'a>(node: &'a AstNode<'a>) -> String {
    collect_inline_spans(node, InlineStyle::default())
        .into_iter()
        .map(|span| span.text)
        .collect::<String>()
        .replace('\n', " ")
}

/// Split spans into words, spaces and hard breaks.
fn tokenize(spans: &[InlineSpan]) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut word: Vec<InlineSpan> = Vec::new();

    for span in spans {
        let mut buf = String::new();
        let mut in_space = false;
        for ch in span.text.chars() {
            if ch == '\n' {
                flush_piece(&mut buf, in_space, span.style, &mut word, &mut tokens);
                flush_word(&mut word, &mut tokens);
                tokens.push(Token::Break);
                in_space = false;
                continue;
            }
            let is_space = ch.is_whitespace();
            if is_space != in_space {
                flush_piece(&mut buf, in_space, span.style, &mut word, &mut tokens);
                if is_space {
                    flush_word(&mut word, &mut tokens);
                }
                in_space = is_space;
            }
            buf.push(ch);
        }
        flush_piece(&mut buf, in_space, span.style, &mut word, &mut tokens);
    }
    flush_word(&mut word, &mut tokens);
    tokens
}

fn flush_piece(
    buf: &mut String,
    is_space: bool,
    style: InlineStyle,
    word: &mut Vec<InlineSpan>,
    tokens: &mut Vec<Token>,
) {
    if buf.is_empty() {
        return;
    }
    let piece = InlineSpan::new(std::mem::take(buf), style);
    if is_space {
        tokens.push(Token::Space(piece));
    } else {
        word.push(piece);
    }
}

fn flush_word(word: &mut Vec<InlineSpan>, tokens: &mut Vec<Token>) {
    if !word.is_empty() {
        tokens.push(Token::Word(std::mem::take(word)));
    }
}

fn trim_trailing_space(line: &mut Vec<Token>) {
    while matches!(line.last(), Some(Token::Space(_))) {
        line.pop();
    }
}

fn collect_table_rows<'a>(node: &'a AstNode<'a>) -> (Vec<Vec<String>>, bool) {
    let mut rows = Vec::new();
    let mut has_header = false;
    for row_node in node.children() {
        let NodeValue::TableRow(header) = row_node.data.borrow().value else {
            continue;
        };
        has_header |= header;
        let cells = row_node
            .children()
            .filter(|cell| matches!(cell.data.borrow().value, NodeValue::TableCell))
            .map(|cell| extract_text(cell).split_whitespace().collect::<Vec<_>>().join(" "))
            .collect();
        rows.push(cells);
    }
    (rows, has_header)
}

fn table_border(widths: &[usize], left: char, middle: char, right: char) -> String {
    let mut out = String::new();
    out.push(left);
    for (idx, width) in widths.iter().enumerate() {
        out.push_str(&"─".repeat(width + 2));
        if idx + 1 < widths.len() {
            out.push(middle);
        }
    }
    out.push(right);
    out
}

fn truncate_to_width(text: &str, max_width: usize) -> String {
    let mut out = String::new();
    let mut width = 0_usize;
    for ch in text.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width > max_width {
            break;
        }
        out.push(ch);
        width += ch_width;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ansi::strip_ansi;

    fn render(markdown: &str, width: u16) -> String {
        ProseRenderer::new(Theme::NoTty, width)
            .and_then(|renderer| renderer.render(markdown))
            .unwrap()
    }

    #[test]
    fn test_zero_width_is_rejected() {
        assert!(matches!(
            ProseRenderer::new(Theme::Dark, 0),
            Err(RenderError::InvalidWidth(0))
        ));
    }

    #[test]
    fn test_paragraph_has_margin() {
        assert_eq!(render("Hello world.", 80), "  Hello world.");
    }

    #[test]
    fn test_paragraphs_separated_by_blank_line() {
        assert_eq!(render("One.\n\nTwo.", 80), "  One.\n\n  Two.");
    }

    #[test]
    fn test_soft_break_joins_lines() {
        assert_eq!(render("one\ntwo", 80), "  one two");
    }

    #[test]
    fn test_hard_break_starts_new_line() {
        assert_eq!(render("one  \ntwo", 80), "  one\n  two");
    }

    #[test]
    fn test_wraps_at_width_minus_margins() {
        let out = render("aaa bbb ccc ddd", 12);
        assert_eq!(out, "  aaa bbb\n  ccc ddd");
    }

    #[test]
    fn test_long_word_is_never_split() {
        let out = render("INCIPIT_CODEBLOCK_12345678901234567890", 10);
        assert_eq!(out, "  INCIPIT_CODEBLOCK_12345678901234567890");
    }

    #[test]
    fn test_placeholder_survives_on_its_own_line() {
        let out = render("Intro text.\n\nINCIPIT_HEADER_0\n\nMore text.", 40);
        assert!(out.split('\n').any(|line| line.trim() == "INCIPIT_HEADER_0"));
    }

    #[test]
    fn test_bullet_and_ordered_lists() {
        assert_eq!(render("- one\n- two", 80), "  • one\n  • two");
        assert_eq!(render("1. one\n2. two", 80), "  1. one\n  2. two");
    }

    #[test]
    fn test_nested_list_is_indented() {
        let out = render("- outer\n  - inner", 80);
        assert_eq!(out, "  • outer\n    • inner");
    }

    #[test]
    fn test_task_items() {
        let out = render("- [x] done\n- [ ] todo", 80);
        assert_eq!(out, "  [✓] done\n  [ ] todo");
    }

    #[test]
    fn test_block_quote_prefix() {
        assert_eq!(render("> quoted", 80), "  │ quoted");
    }

    #[test]
    fn test_link_shows_url() {
        assert_eq!(
            render("[site](https://example.com)", 80),
            "  site https://example.com"
        );
        assert_eq!(render("<https://example.com>", 80), "  https://example.com");
    }

    #[test]
    fn test_image_alt_and_url() {
        assert_eq!(render("![logo](logo.png)", 80), "  Image: logo → logo.png");
    }

    #[test]
    fn test_table_has_box_borders() {
        let out = render("| a | b |\n|---|--:|\n| 1 | 22 |", 80);
        let lines: Vec<&str> = out.split('\n').collect();
        assert_eq!(lines[0], "  ┌───┬────┐");
        assert_eq!(lines[1], "  │ a │  b │");
        assert_eq!(lines[2], "  ├───┼────┤");
        assert_eq!(lines[3], "  │ 1 │ 22 │");
        assert_eq!(lines[4], "  └───┴────┘");
    }

    #[test]
    fn test_thematic_break_spans_wrap_width() {
        assert_eq!(render("---", 14), format!("  {}", "─".repeat(10)));
    }

    #[test]
    fn test_indented_code_is_kept_verbatim() {
        assert_eq!(render("    let x = 1;", 80), "    let x = 1;");
    }

    #[test]
    fn test_notty_has_no_escapes() {
        let out = render("**bold** _it_ `code` ~~gone~~ [l](u)", 80);
        assert!(!out.contains('\x1b'));
        assert_eq!(out, "  bold it code gone l u");
    }

    #[test]
    fn test_dark_theme_styles_inline_elements() {
        let renderer = ProseRenderer::new(Theme::Dark, 80).unwrap();
        let out = renderer.render("plain **bold** `code`").unwrap();
        assert!(out.contains("\x1b[38;5;252;1mbold\x1b[0m"));
        assert!(out.contains("\x1b[38;5;203;48;5;236mcode\x1b[0m"));
        assert_eq!(strip_ansi(&out), "  plain bold code");
    }

    #[test]
    fn test_styled_word_does_not_wrap_apart() {
        let out = render("xxxxxx **bold**ly", 12);
        assert_eq!(out, "  xxxxxx\n  boldly");
    }

    #[test]
    fn test_empty_document_renders_empty() {
        assert_eq!(render("", 80), "");
    }
}
