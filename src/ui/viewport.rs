//! Viewport management for scrolling.
//!
//! The [`Viewport`] struct tracks the visible slice of the rendered
//! document and handles all scroll operations. Scrolling keeps the offset
//! inside `0..=total_lines - height`; resizing and new content leave it
//! alone, so an offset past the end just shows fewer lines.

use std::ops::Range;

/// Manages the visible portion of a document.
///
/// # Example
///
/// ```
/// use incipit::ui::viewport::Viewport;
///
/// let mut vp = Viewport::new(80, 22, 100);
/// assert_eq!(vp.visible_range(), 0..22);
///
/// vp.scroll_down(10);
/// assert_eq!(vp.visible_range(), 10..32);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Viewport {
    width: u16,
    height: u16,
    offset: usize,
    total_lines: usize,
}

impl Viewport {
    /// Create a viewport `height` rows tall over `total_lines` lines.
    pub const fn new(width: u16, height: u16, total_lines: usize) -> Self {
        Self {
            width,
            height,
            offset: 0,
            total_lines,
        }
    }

    pub const fn offset(&self) -> usize {
        self.offset
    }

    pub const fn width(&self) -> u16 {
        self.width
    }

    pub const fn height(&self) -> u16 {
        self.height
    }

    pub const fn total_lines(&self) -> usize {
        self.total_lines
    }

    /// Range of document lines currently on screen.
    pub fn visible_range(&self) -> Range<usize> {
        let start = self.offset.min(self.total_lines);
        let end = (self.offset + self.height as usize).min(self.total_lines);
        start..end
    }

    /// Scroll position as a percentage (0-100).
    ///
    /// A document that fits entirely on screen is at 100%.
    pub fn scroll_percent(&self) -> u8 {
        let max_offset = self.max_offset();
        if max_offset == 0 {
            return 100;
        }

        // Percentage value always 0-100
        #[allow(
            clippy::cast_precision_loss,
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss
        )]
        {
            ((self.offset as f64 / max_offset as f64).min(1.0) * 100.0).round() as u8
        }
    }

    pub const fn scroll_up(&mut self, n: usize) {
        self.offset = self.offset.saturating_sub(n);
    }

    pub fn scroll_down(&mut self, n: usize) {
        self.offset = (self.offset + n).min(self.max_offset());
    }

    pub const fn page_up(&mut self) {
        self.scroll_up(self.height as usize);
    }

    pub fn page_down(&mut self) {
        self.scroll_down(self.height as usize);
    }

    pub const fn half_page_up(&mut self) {
        self.scroll_up(self.height as usize / 2);
    }

    pub fn half_page_down(&mut self) {
        self.scroll_down(self.height as usize / 2);
    }

    pub const fn go_to_top(&mut self) {
        self.offset = 0;
    }

    pub const fn go_to_bottom(&mut self) {
        self.offset = self.max_offset();
    }

    /// Jump to an absolute line: back to the top, then down `line` lines.
    ///
    /// The result does not depend on the previous scroll position.
    pub fn jump_to_line(&mut self, line: usize) {
        self.go_to_top();
        self.scroll_down(line);
    }

    /// Restore a previously saved offset, clamped to the current content.
    pub fn set_offset(&mut self, offset: usize) {
        self.offset = offset.min(self.max_offset());
    }

    /// Change the number of visible rows. The offset is not touched.
    pub const fn set_height(&mut self, height: u16) {
        self.height = height;
    }

    pub const fn set_width(&mut self, width: u16) {
        self.width = width;
    }

    /// Replace the line count after new content is set. The offset is not
    /// touched.
    pub const fn set_total_lines(&mut self, total: usize) {
        self.total_lines = total;
    }

    const fn max_offset(&self) -> usize {
        self.total_lines.saturating_sub(self.height as usize)
    }
}
