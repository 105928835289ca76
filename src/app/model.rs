use crate::ansi::strip_ansi;
use crate::document::render_markdown;
use crate::search::compute_matches;
use crate::theme::Theme;
use crate::ui::viewport::Viewport;

/// Rows reserved outside the document: one header, one footer.
pub const CHROME_ROWS: u16 = 2;

/// Which part of the pager lifecycle the model is in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    /// No terminal size known yet; nothing has been rendered.
    #[default]
    Loading,
    /// Scrolling the document.
    Normal,
    /// Typing a search query in the footer.
    Searching,
}

/// The complete pager state.
///
/// All state lives here - no global or scattered state.
#[derive(Debug, Clone, Default)]
pub struct Model {
    /// Name shown in the header row
    pub file_name: String,
    /// Raw markdown source
    pub source: String,
    /// Theme fixed for the lifetime of the pager
    pub theme: Theme,
    pub mode: Mode,
    /// Viewport over the rendered lines
    pub viewport: Viewport,
    /// Current search query (kept after the search is committed)
    pub search_query: String,
    /// Set when a committed query found nothing
    pub no_matches: bool,
    /// Whether the app should quit
    pub should_quit: bool,
    rendered_width: u16,
    rendered_lines: Vec<String>,
    search_lines: Vec<String>,
    matches: Vec<usize>,
    match_index: usize,
}

impl Model {
    pub fn new(file_name: impl Into<String>, source: impl Into<String>, theme: Theme) -> Self {
        Self {
            file_name: file_name.into(),
            source: source.into(),
            theme,
            ..Self::default()
        }
    }

    pub const fn is_ready(&self) -> bool {
        !matches!(self.mode, Mode::Loading)
    }

    pub const fn is_searching(&self) -> bool {
        matches!(self.mode, Mode::Searching)
    }

    /// Width the current rendering was produced for.
    pub const fn rendered_width(&self) -> u16 {
        self.rendered_width
    }

    /// Rendered document, one ANSI-styled string per line.
    pub fn rendered_lines(&self) -> &[String] {
        &self.rendered_lines
    }

    /// Rendered document lines with escapes stripped.
    pub fn search_lines(&self) -> &[String] {
        &self.search_lines
    }

    /// Line indices matching the search query.
    pub fn matches(&self) -> &[usize] {
        &self.matches
    }

    /// Cursor into [`Self::matches`].
    pub const fn match_index(&self) -> usize {
        self.match_index
    }

    /// Render the document at `width` and load it into the viewport.
    ///
    /// The scroll offset survives the re-render unchanged, and an active
    /// query is re-run against the new lines.
    pub(super) fn apply_content(&mut self, width: u16) {
        let _scope = crate::perf::scope("pager.apply_content");
        let rendered = render_markdown(&self.source, self.theme, width);
        self.rendered_lines = rendered.split('\n').map(str::to_string).collect();
        self.search_lines = self.rendered_lines.iter().map(|line| strip_ansi(line)).collect();
        self.rendered_width = width;
        self.viewport.set_total_lines(self.rendered_lines.len());

        if !self.search_query.is_empty() {
            self.matches = compute_matches(&self.search_lines, &self.search_query);
            self.match_index = self.match_index.min(self.matches.len().saturating_sub(1));
            self.no_matches = self.matches.is_empty();
        }
        tracing::debug!(
            width,
            lines = self.rendered_lines.len(),
            matches = self.matches.len(),
            "rendered document"
        );
    }

    /// Run the current query, reset the cursor, and jump to the first hit.
    pub(super) fn commit_search(&mut self) {
        self.matches = compute_matches(&self.search_lines, &self.search_query);
        self.match_index = 0;
        self.no_matches = self.matches.is_empty();
        tracing::debug!(query = %self.search_query, matches = self.matches.len(), "search committed");
        if let Some(&line) = self.matches.first() {
            self.viewport.jump_to_line(line);
        }
    }

    pub(super) fn clear_search(&mut self) {
        self.search_query.clear();
        self.matches.clear();
        self.match_index = 0;
        self.no_matches = false;
    }

    /// Move the match cursor with `step` and jump to the selected line.
    pub(super) fn step_match(&mut self, step: fn(usize, usize) -> usize) {
        if self.matches.is_empty() {
            return;
        }
        self.match_index = step(self.match_index, self.matches.len());
        let line = self.matches[self.match_index];
        self.viewport.jump_to_line(line);
    }
}
