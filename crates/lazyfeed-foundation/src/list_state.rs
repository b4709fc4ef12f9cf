//! Feed list state management.
//!
//! [`FeedListState`] tracks the scroll position, caches measured item
//! heights (with a running-average estimate for rows never measured), and
//! decides when the end-reached hook should fire.

use std::cell::RefCell;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::provider::FeedItemProvider;
use crate::viewport::{self, FeedViewport};

/// Fraction of the viewport height: once the distance from the end drops
/// below it, the end-reached hook fires.
pub const DEFAULT_END_REACHED_THRESHOLD: f32 = 0.5;

/// Look-ahead distance (layout units) the render window extends beyond the
/// visible area on each side.
pub const DEFAULT_DRAW_DISTANCE: f32 = 2500.0;

/// Height assumed for rows that were never measured.
pub const DEFAULT_ITEM_HEIGHT_ESTIMATE: f32 = 120.0;

/// Surface tuning knobs, fixed at construction.
#[derive(Clone, Debug)]
pub struct FeedListConfig {
    pub end_reached_threshold: f32,
    pub draw_distance: f32,
    pub estimated_item_height: f32,
    pub spacing: f32,
}

impl Default for FeedListConfig {
    fn default() -> Self {
        Self {
            end_reached_threshold: DEFAULT_END_REACHED_THRESHOLD,
            draw_distance: DEFAULT_DRAW_DISTANCE,
            estimated_item_height: DEFAULT_ITEM_HEIGHT_ESTIMATE,
            spacing: 0.0,
        }
    }
}

/// Statistics about surface layout work. Used by tests and the demo.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FeedLayoutStats {
    /// Items inside the render window after the last pass.
    pub items_in_window: usize,
    /// Rows with a recorded measurement.
    pub measured_items: usize,
    /// Layout passes run so far.
    pub layout_passes: usize,
}

struct FeedListStateInner {
    config: FeedListConfig,
    scroll_offset: f32,
    viewport_height: f32,
    item_heights: FxHashMap<usize, f32>,
    /// Running average of first measurements, used for unmeasured rows.
    average_item_height: f32,
    last_layout: FeedViewport,
    /// Item count at which end-reached last fired; re-arms when the count
    /// changes.
    end_reached_fired_at: Option<usize>,
    stats: FeedLayoutStats,
}

/// State object for feed scroll position tracking.
///
/// Clone-able handle; all clones share state.
#[derive(Clone)]
pub struct FeedListState {
    inner: Rc<RefCell<FeedListStateInner>>,
}

impl FeedListState {
    pub fn new(config: FeedListConfig) -> Self {
        let average_item_height = config.estimated_item_height;
        Self {
            inner: Rc::new(RefCell::new(FeedListStateInner {
                config,
                scroll_offset: 0.0,
                viewport_height: 0.0,
                item_heights: FxHashMap::default(),
                average_item_height,
                last_layout: FeedViewport::default(),
                end_reached_fired_at: None,
                stats: FeedLayoutStats::default(),
            })),
        }
    }

    pub fn config(&self) -> FeedListConfig {
        self.inner.borrow().config.clone()
    }

    pub fn set_viewport_height(&self, height: f32) {
        self.inner.borrow_mut().viewport_height = height.max(0.0);
    }

    pub fn viewport_height(&self) -> f32 {
        self.inner.borrow().viewport_height
    }

    pub fn scroll_offset(&self) -> f32 {
        self.inner.borrow().scroll_offset
    }

    /// Scrolls by `delta` pixels, clamped to the scrollable range of the
    /// last layout. Returns the amount actually consumed.
    pub fn scroll_by(&self, delta: f32) -> f32 {
        let mut inner = self.inner.borrow_mut();
        let max = inner.last_layout.max_scroll;
        let target = (inner.scroll_offset + delta).clamp(0.0, max);
        let consumed = target - inner.scroll_offset;
        inner.scroll_offset = target;
        consumed
    }

    /// Records a measured row height and folds first measurements into the
    /// running average used to estimate unmeasured rows.
    pub fn record_item_height(&self, index: usize, height: f32) {
        let mut inner = self.inner.borrow_mut();
        let height = height.max(0.0);
        if inner.item_heights.insert(index, height).is_none() {
            inner.stats.measured_items += 1;
            let n = inner.stats.measured_items as f32;
            inner.average_item_height += (height - inner.average_item_height) / n;
        }
    }

    pub fn average_item_height(&self) -> f32 {
        self.inner.borrow().average_item_height
    }

    /// Runs a layout pass against the provider's current item count.
    ///
    /// Clamps the scroll offset back into range when content shrank (e.g.
    /// after a refresh replaced the items).
    pub fn layout(&self, provider: &dyn FeedItemProvider) -> FeedViewport {
        let item_count = provider.item_count();
        let mut layout = self.measure_pass(item_count);
        {
            let inner = self.inner.borrow();
            if inner.scroll_offset > layout.max_scroll {
                drop(inner);
                self.inner.borrow_mut().scroll_offset = layout.max_scroll;
                layout = self.measure_pass(item_count);
            }
        }
        let mut inner = self.inner.borrow_mut();
        inner.stats.layout_passes += 1;
        inner.stats.items_in_window = layout.window.len();
        inner.last_layout = layout.clone();
        layout
    }

    fn measure_pass(&self, item_count: usize) -> FeedViewport {
        let inner = self.inner.borrow();
        viewport::measure(
            item_count,
            inner.viewport_height,
            inner.scroll_offset,
            inner.config.spacing,
            inner.config.draw_distance,
            |index| {
                inner
                    .item_heights
                    .get(&index)
                    .copied()
                    .unwrap_or(inner.average_item_height)
            },
        )
    }

    /// Returns `true` when the end-reached hook should fire: the distance
    /// from the end dropped below `end_reached_threshold` viewports and it
    /// has not fired for this content length yet.
    pub fn take_end_reached(&self, item_count: usize) -> bool {
        let mut inner = self.inner.borrow_mut();
        if item_count == 0 {
            return false;
        }
        let threshold_px = inner.config.end_reached_threshold * inner.viewport_height;
        let near_end = inner.last_layout.distance_from_end <= threshold_px;
        if near_end && inner.end_reached_fired_at != Some(item_count) {
            inner.end_reached_fired_at = Some(item_count);
            return true;
        }
        false
    }

    pub fn stats(&self) -> FeedLayoutStats {
        self.inner.borrow().stats.clone()
    }
}

impl Default for FeedListState {
    fn default() -> Self {
        Self::new(FeedListConfig::default())
    }
}
