#![forbid(unsafe_code)]

//! Virtualization primitives for the result list.
//!
//! Only rows that intersect the viewport, plus an overscan margin above and
//! below, are ever produced. Offsets and heights are in abstract units
//! (pixels for a graphical host, `row_height == 1` lines for a terminal).
//!
//! # Core Types
//!
//! - [`visible_range`] - pure window calculation, usable without any surface
//! - [`VirtualizedListState`] - scroll offset, viewport geometry, page identity
//! - [`VirtualizedList`] - paints the window into a [`Frame`]
//!
//! # Example
//!
//! ```ignore
//! use alphadex_widgets::virtualized::visible_range;
//!
//! // 500 tall viewport, 30 tall rows, 10 rows overscan, 100 rows total.
//! let range = visible_range(0, 500, 30, 10, 100);
//! assert_eq!(range, 0..27);
//! ```

use std::ops::Range;
use std::sync::Arc;

use alphadex_core::{Name, ResultPage};
use alphadex_runtime::Frame;

/// Default viewport height in units.
pub const DEFAULT_VIEWPORT_HEIGHT: u32 = 500;
/// Default row height in units.
pub const DEFAULT_ROW_HEIGHT: u32 = 30;
/// Default rows rendered beyond each edge of the viewport.
pub const DEFAULT_OVERSCAN: usize = 10;

/// Rows to produce for a viewport at `scroll_offset`.
///
/// Returns the rows intersecting `[scroll_offset, scroll_offset +
/// viewport_height)` widened by `overscan` rows on each side and clamped to
/// `0..len`. An empty list, zero viewport or zero row height yields `0..0`.
#[must_use]
pub fn visible_range(
    scroll_offset: u32,
    viewport_height: u32,
    row_height: u32,
    overscan: usize,
    len: usize,
) -> Range<usize> {
    if len == 0 || viewport_height == 0 || row_height == 0 {
        return 0..0;
    }
    let scroll = u64::from(scroll_offset);
    let row = u64::from(row_height);
    let first = (scroll / row) as usize;
    let past_last = (scroll + u64::from(viewport_height)).div_ceil(row) as usize;

    let end = past_last.saturating_add(overscan).min(len);
    let start = first.saturating_sub(overscan).min(end);
    start..end
}

/// Render one row. Pure in `(index, name)`.
#[must_use]
pub fn render_row(_index: usize, name: &Name) -> String {
    name.as_str().to_string()
}

/// Scroll state for a [`VirtualizedList`].
#[derive(Debug, Clone)]
pub struct VirtualizedListState {
    scroll_offset: u32,
    viewport_height: u32,
    row_height: u32,
    overscan: usize,
    /// Page the offset belongs to; compared by identity.
    source: Option<Arc<ResultPage>>,
}

impl Default for VirtualizedListState {
    fn default() -> Self {
        Self::new()
    }
}

impl VirtualizedListState {
    /// Create a new state with the default geometry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            scroll_offset: 0,
            viewport_height: DEFAULT_VIEWPORT_HEIGHT,
            row_height: DEFAULT_ROW_HEIGHT,
            overscan: DEFAULT_OVERSCAN,
            source: None,
        }
    }

    /// Set the viewport height.
    #[must_use]
    pub fn with_viewport_height(mut self, height: u32) -> Self {
        self.viewport_height = height;
        self
    }

    /// Set the row height.
    #[must_use]
    pub fn with_row_height(mut self, height: u32) -> Self {
        self.row_height = height;
        self
    }

    /// Set overscan amount.
    #[must_use]
    pub fn with_overscan(mut self, overscan: usize) -> Self {
        self.overscan = overscan;
        self
    }

    #[must_use]
    pub fn scroll_offset(&self) -> u32 {
        self.scroll_offset
    }

    #[must_use]
    pub fn viewport_height(&self) -> u32 {
        self.viewport_height
    }

    #[must_use]
    pub fn row_height(&self) -> u32 {
        self.row_height
    }

    #[must_use]
    pub fn overscan(&self) -> usize {
        self.overscan
    }

    /// Number of rows in the current source page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.source.as_ref().map_or(0, |p| p.len())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Largest offset that still fills the viewport.
    #[must_use]
    pub fn max_offset(&self) -> u32 {
        let content = (self.len() as u64).saturating_mul(u64::from(self.row_height));
        let max = content.saturating_sub(u64::from(self.viewport_height));
        u32::try_from(max).unwrap_or(u32::MAX)
    }

    /// Rows to render at the current offset, overscan included.
    #[must_use]
    pub fn visible_range(&self) -> Range<usize> {
        visible_range(
            self.scroll_offset,
            self.viewport_height,
            self.row_height,
            self.overscan,
            self.len(),
        )
    }

    /// Adopt `page` as the backing sequence.
    ///
    /// A page that is not the same allocation as the current one resets the
    /// offset to the top, even when its contents are equal. Returns whether a
    /// reset happened.
    pub fn sync_source(&mut self, page: &Arc<ResultPage>) -> bool {
        let same = self
            .source
            .as_ref()
            .is_some_and(|current| Arc::ptr_eq(current, page));
        if same {
            return false;
        }
        self.source = Some(Arc::clone(page));
        self.scroll_to_top();
        true
    }

    /// Drop the backing sequence and return to the top.
    pub fn clear_source(&mut self) {
        self.source = None;
        self.scroll_to_top();
    }

    /// Scroll by delta units (positive = down), clamped to the content.
    pub fn scroll(&mut self, delta: i64) {
        let next = i64::from(self.scroll_offset)
            .saturating_add(delta)
            .clamp(0, i64::from(self.max_offset()));
        self.scroll_offset = next as u32;
    }

    /// Scroll to top.
    pub fn scroll_to_top(&mut self) {
        self.scroll_offset = 0;
    }

    /// Scroll so that row `idx` sits at the top of the viewport.
    pub fn scroll_to_row(&mut self, idx: usize) {
        let target = (idx as u64).saturating_mul(u64::from(self.row_height));
        let target = u32::try_from(target).unwrap_or(u32::MAX);
        self.scroll_offset = target.min(self.max_offset());
    }

    /// Page down by one viewport.
    pub fn page_down(&mut self) {
        self.scroll(i64::from(self.viewport_height));
    }

    /// Page up by one viewport.
    pub fn page_up(&mut self) {
        self.scroll(-i64::from(self.viewport_height));
    }

    /// Update the viewport height, keeping the offset in bounds.
    pub fn set_viewport_height(&mut self, height: u32) {
        self.viewport_height = height;
        self.scroll_offset = self.scroll_offset.min(self.max_offset());
    }
}

/// A row produced for the current window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedRow {
    /// Index into the page.
    pub index: usize,
    /// Top edge relative to the viewport top, in units. Negative for overscan above.
    pub top: i64,
    /// Row text from [`render_row`].
    pub text: String,
}

/// Windowed list over the state's source page.
#[derive(Debug, Clone, Copy, Default)]
pub struct VirtualizedList;

impl VirtualizedList {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Produce the rows in the state's window, overscan included.
    #[must_use]
    pub fn rows(&self, state: &VirtualizedListState) -> Vec<RenderedRow> {
        let Some(page) = state.source.as_ref() else {
            return Vec::new();
        };
        let row_height = i64::from(state.row_height);
        let scroll = i64::from(state.scroll_offset);
        state
            .visible_range()
            .filter_map(|index| {
                page.get(index).map(|name| RenderedRow {
                    index,
                    top: index as i64 * row_height - scroll,
                    text: render_row(index, name),
                })
            })
            .collect()
    }

    /// Paint the rows that land inside the viewport into `frame`.
    ///
    /// Frame line `y + k` shows the row whose top falls in the `k`th
    /// row-height band of the viewport. Overscan rows are produced but fall
    /// outside the frame and are dropped.
    pub fn render(&self, frame: &mut Frame, y: u16, height: u16, state: &VirtualizedListState) {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "alphadex.virtualized.render",
            offset = state.scroll_offset,
            len = state.len()
        )
        .entered();

        if state.row_height == 0 {
            return;
        }
        let row_height = i64::from(state.row_height);
        for row in self.rows(state) {
            let line = row.top.div_euclid(row_height);
            if line < 0 || line >= i64::from(height) {
                continue;
            }
            frame.set_row(y + line as u16, &row.text);
        }
    }
}
