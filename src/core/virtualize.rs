// LogView - core/virtualize.rs
//
// Virtualization capability. A virtualizer is told how many items exist and
// calls back only for the indices it decides to materialise. Any windowing
// scheme that honours this contract can back the logs view.

use std::ops::Range;

/// Renders a window over `total_count` items.
///
/// `Surface` is whatever the item callback draws into (an `egui::Ui` for the
/// GUI, a collector in tests).
pub trait Virtualizer {
    type Surface: ?Sized;

    fn render(
        &mut self,
        total_count: usize,
        item_content: &mut dyn FnMut(&mut Self::Surface, usize),
    );
}

/// Indices visible for a viewport over fixed-height rows, widened by
/// `overscan` rows on either side and clamped to `0..total_count`.
pub fn visible_range(
    total_count: usize,
    row_height: f32,
    viewport_height: f32,
    scroll_offset: f32,
    overscan: usize,
) -> Range<usize> {
    if total_count == 0 || row_height <= 0.0 || viewport_height <= 0.0 {
        return 0..0;
    }
    let offset = scroll_offset.max(0.0);
    let first = (offset / row_height).floor() as usize;
    let last = ((offset + viewport_height) / row_height).ceil() as usize;

    let start = first.saturating_sub(overscan).min(total_count);
    let end = last.saturating_add(overscan).min(total_count);
    start..end.max(start)
}

/// Pure windowing virtualizer: fixed row height, explicit scroll offset.
///
/// Backs headless rendering (and the tests) where no GUI scroll area exists.
#[derive(Debug, Clone)]
pub struct WindowVirtualizer {
    pub row_height: f32,
    pub viewport_height: f32,
    pub scroll_offset: f32,
    pub overscan: usize,
    last_range: Range<usize>,
}

impl WindowVirtualizer {
    pub fn new(row_height: f32, viewport_height: f32) -> Self {
        Self {
            row_height,
            viewport_height,
            scroll_offset: 0.0,
            overscan: 0,
            last_range: 0..0,
        }
    }

    pub fn with_overscan(mut self, overscan: usize) -> Self {
        self.overscan = overscan;
        self
    }

    /// Scroll so that `index` is the first fully visible row.
    pub fn scroll_to_index(&mut self, index: usize) {
        self.scroll_offset = index as f32 * self.row_height;
    }

    /// Range materialised by the most recent `render` call.
    pub fn last_range(&self) -> Range<usize> {
        self.last_range.clone()
    }
}

impl Virtualizer for WindowVirtualizer {
    type Surface = Vec<usize>;

    fn render(
        &mut self,
        total_count: usize,
        item_content: &mut dyn FnMut(&mut Vec<usize>, usize),
    ) {
        let range = visible_range(
            total_count,
            self.row_height,
            self.viewport_height,
            self.scroll_offset,
            self.overscan,
        );
        let mut rendered = Vec::with_capacity(range.len());
        for index in range.clone() {
            rendered.push(index);
            item_content(&mut rendered, index);
        }
        self.last_range = range;
    }
}
