//! Layout coordination for the recycled list.
//!
//! [`Layout`] turns the model length, a fixed row height and the viewport
//! height into the two numbers the recycler cares about: which contiguous
//! index range is on screen, and how many row views can ever be needed at
//! once. Heights and offsets are measured in terminal lines.
//!
//! ```rust
//! use bubbletea_recycler::layout::{Layout, RecyclerConfig};
//!
//! let mut layout = Layout::new(
//!     RecyclerConfig::default()
//!         .with_row_height(1)
//!         .with_viewport_height(5)
//!         .with_overscan(1),
//! );
//! layout.set_length(10_000);
//!
//! assert_eq!(layout.extent(), 10_000);
//! assert_eq!(layout.visible_range(), Some((0, 5)));
//! assert_eq!(layout.capacity(), 7);
//!
//! layout.set_offset(42);
//! assert_eq!(layout.visible_range(), Some((42, 47)));
//! ```

use serde::Deserialize;

/// Sizing options for a recycled list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RecyclerConfig {
    /// Height of every row in lines. Zero is treated as one.
    pub row_height: usize,
    /// Height of the visible area in lines.
    pub viewport_height: usize,
    /// Extra rows bound past the bottom edge of the viewport.
    pub overscan: usize,
}

impl Default for RecyclerConfig {
    fn default() -> Self {
        Self {
            row_height: 1,
            viewport_height: 10,
            overscan: 1,
        }
    }
}

impl RecyclerConfig {
    /// Sets the row height.
    pub fn with_row_height(mut self, row_height: usize) -> Self {
        self.row_height = row_height;
        self
    }

    /// Sets the viewport height.
    pub fn with_viewport_height(mut self, viewport_height: usize) -> Self {
        self.viewport_height = viewport_height;
        self
    }

    /// Sets the overscan.
    pub fn with_overscan(mut self, overscan: usize) -> Self {
        self.overscan = overscan;
        self
    }
}

/// Scroll state and extent calculations for a list of fixed-height rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    row_height: usize,
    viewport_height: usize,
    overscan: usize,
    len: usize,
    /// Lines scrolled from the top of the content.
    offset: usize,
}

impl Default for Layout {
    fn default() -> Self {
        Self::new(RecyclerConfig::default())
    }
}

impl Layout {
    /// Creates a layout for an empty model.
    pub fn new(config: RecyclerConfig) -> Self {
        Self {
            row_height: config.row_height.max(1),
            viewport_height: config.viewport_height,
            overscan: config.overscan,
            len: 0,
            offset: 0,
        }
    }

    /// Row height in lines.
    pub fn row_height(&self) -> usize {
        self.row_height
    }

    /// Viewport height in lines.
    pub fn viewport_height(&self) -> usize {
        self.viewport_height
    }

    /// Overscan rows.
    pub fn overscan(&self) -> usize {
        self.overscan
    }

    /// Model length the layout was last told about.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the layout covers no rows.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Current scroll offset in lines.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Total scrollable extent: model length times row height.
    pub fn extent(&self) -> usize {
        self.len.saturating_mul(self.row_height)
    }

    /// Largest offset that still fills the viewport.
    pub fn max_offset(&self) -> usize {
        self.extent().saturating_sub(self.viewport_height)
    }

    /// Records a new model length and re-clamps the offset.
    pub fn set_length(&mut self, len: usize) {
        self.len = len;
        self.set_offset(self.offset);
    }

    /// Resizes the viewport and re-clamps the offset.
    pub fn set_viewport_height(&mut self, viewport_height: usize) {
        self.viewport_height = viewport_height;
        self.set_offset(self.offset);
    }

    /// Scrolls to `n` lines from the top, clamped to [`Layout::max_offset`].
    pub fn set_offset(&mut self, n: usize) {
        self.offset = n.min(self.max_offset());
    }

    /// Scrolls down by `n` lines.
    pub fn scroll_down(&mut self, n: usize) {
        self.set_offset(self.offset.saturating_add(n));
    }

    /// Scrolls up by `n` lines.
    pub fn scroll_up(&mut self, n: usize) {
        self.set_offset(self.offset.saturating_sub(n));
    }

    /// Scrolls by `delta` lines; negative values scroll up.
    pub fn scroll_by(&mut self, delta: isize) {
        if delta < 0 {
            self.scroll_up(delta.unsigned_abs());
        } else {
            self.scroll_down(delta.unsigned_abs());
        }
    }

    /// Scrolls down by one viewport.
    pub fn page_down(&mut self) {
        self.scroll_down(self.viewport_height.max(1));
    }

    /// Scrolls up by one viewport.
    pub fn page_up(&mut self) {
        self.scroll_up(self.viewport_height.max(1));
    }

    /// Scrolls to the first row.
    pub fn goto_top(&mut self) {
        self.offset = 0;
    }

    /// Scrolls so the last row sits at the bottom of the viewport.
    pub fn goto_bottom(&mut self) {
        self.offset = self.max_offset();
    }

    /// Applies the smallest scroll that puts row `index` fully in view.
    pub fn scroll_to_index(&mut self, index: usize) {
        let top = index.saturating_mul(self.row_height);
        let bottom = top.saturating_add(self.row_height);
        if top < self.offset {
            self.set_offset(top);
        } else if bottom > self.offset + self.viewport_height {
            self.set_offset(bottom.saturating_sub(self.viewport_height));
        }
    }

    /// Number of whole-or-partial rows the viewport can show at offset zero.
    pub fn rows_in_viewport(&self) -> usize {
        self.viewport_height.div_ceil(self.row_height).max(1)
    }

    /// Upper bound on concurrently bound rows, independent of model length.
    ///
    /// One row more than [`Layout::rows_in_viewport`] for a row straddling
    /// each edge when the offset is mid-row, plus the overscan.
    pub fn capacity(&self) -> usize {
        self.rows_in_viewport() + 1 + self.overscan
    }

    /// Inclusive index range to bind at the current offset, or `None` for an
    /// empty model.
    pub fn visible_range(&self) -> Option<(usize, usize)> {
        if self.len == 0 {
            return None;
        }
        let last_index = self.len - 1;
        let first = (self.offset / self.row_height).min(last_index);
        let last_line = self.offset + self.viewport_height.max(1) - 1;
        let last = (last_line / self.row_height + self.overscan).min(last_index);
        Some((first, last))
    }
}
