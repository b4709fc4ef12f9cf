//! Viewport geometry for the feed surface.
//!
//! One layout pass walks the items top to bottom and derives which indices
//! are visible, which fall inside the render window (visible plus the draw
//! distance on both sides), and how far the scroll position is from the end
//! of content.

use std::ops::Range;

/// Geometry of the list computed by one layout pass.
#[derive(Clone, Debug, PartialEq)]
pub struct FeedViewport {
    /// Indices intersecting the visible area.
    pub visible: Range<usize>,
    /// Indices to keep rendered: visible extended by the draw distance.
    pub window: Range<usize>,
    /// Total height of the content, spacing included.
    pub content_height: f32,
    /// Largest valid scroll offset (zero when content fits the viewport).
    pub max_scroll: f32,
    /// Pixels of content below the bottom edge of the viewport.
    pub distance_from_end: f32,
}

impl Default for FeedViewport {
    fn default() -> Self {
        Self {
            visible: 0..0,
            window: 0..0,
            content_height: 0.0,
            max_scroll: 0.0,
            distance_from_end: 0.0,
        }
    }
}

impl FeedViewport {
    pub fn first_visible(&self) -> Option<usize> {
        if self.visible.is_empty() {
            None
        } else {
            Some(self.visible.start)
        }
    }
}

/// Lays out `item_count` items of the given heights against the viewport.
///
/// `item_height` is consulted once per index in order; heights are clamped
/// to be non-negative. O(item_count) per pass.
pub fn measure(
    item_count: usize,
    viewport_height: f32,
    scroll_offset: f32,
    spacing: f32,
    draw_distance: f32,
    item_height: impl Fn(usize) -> f32,
) -> FeedViewport {
    if item_count == 0 {
        return FeedViewport::default();
    }

    let visible_top = scroll_offset;
    let visible_bottom = scroll_offset + viewport_height;
    let window_top = (visible_top - draw_distance).max(0.0);
    let window_bottom = visible_bottom + draw_distance;

    let mut y = 0.0f32;
    let mut visible_start = None;
    let mut visible_end = 0;
    let mut window_start = None;
    let mut window_end = 0;

    for index in 0..item_count {
        let height = item_height(index).max(0.0);
        let top = y;
        let bottom = y + height;
        if bottom > window_top && top < window_bottom {
            if window_start.is_none() {
                window_start = Some(index);
            }
            window_end = index + 1;
        }
        if bottom > visible_top && top < visible_bottom {
            if visible_start.is_none() {
                visible_start = Some(index);
            }
            visible_end = index + 1;
        }
        y = bottom + spacing;
    }

    // Drop the trailing spacing after the last item.
    let content_height = (y - spacing).max(0.0);
    let max_scroll = (content_height - viewport_height).max(0.0);
    let distance_from_end = (content_height - visible_bottom).max(0.0);

    FeedViewport {
        visible: visible_start.unwrap_or(0)..visible_end,
        window: window_start.unwrap_or(0)..window_end,
        content_height,
        max_scroll,
        distance_from_end,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform(height: f32) -> impl Fn(usize) -> f32 {
        move |_| height
    }

    #[test]
    fn test_measure_empty_list() {
        let layout = measure(0, 800.0, 0.0, 0.0, 2500.0, uniform(100.0));
        assert_eq!(layout, FeedViewport::default());
    }

    #[test]
    fn test_visible_range_tracks_scroll() {
        // 100 items x 100px, 800px viewport.
        let layout = measure(100, 800.0, 0.0, 0.0, 0.0, uniform(100.0));
        assert_eq!(layout.visible, 0..8);
        assert_eq!(layout.content_height, 10_000.0);
        assert_eq!(layout.max_scroll, 9_200.0);

        let layout = measure(100, 800.0, 250.0, 0.0, 0.0, uniform(100.0));
        assert_eq!(layout.visible, 2..11);
        assert_eq!(layout.first_visible(), Some(2));
    }

    #[test]
    fn test_window_extends_by_draw_distance() {
        let layout = measure(100, 800.0, 3000.0, 0.0, 1000.0, uniform(100.0));
        assert_eq!(layout.visible, 30..38);
        // 1000px of look-ahead on both sides adds ten items each way.
        assert_eq!(layout.window, 20..48);
    }

    #[test]
    fn test_distance_from_end_reaches_zero_at_bottom() {
        let layout = measure(10, 800.0, 0.0, 0.0, 0.0, uniform(100.0));
        assert_eq!(layout.distance_from_end, 200.0);
        let layout = measure(10, 800.0, 200.0, 0.0, 0.0, uniform(100.0));
        assert_eq!(layout.distance_from_end, 0.0);
    }

    #[test]
    fn test_spacing_counts_between_items_only() {
        // 3 items x 100px with 10px spacing: 100*3 + 10*2.
        let layout = measure(3, 800.0, 0.0, 10.0, 0.0, uniform(100.0));
        assert_eq!(layout.content_height, 320.0);
    }

    #[test]
    fn test_content_shorter_than_viewport() {
        let layout = measure(3, 800.0, 0.0, 0.0, 0.0, uniform(100.0));
        assert_eq!(layout.max_scroll, 0.0);
        assert_eq!(layout.distance_from_end, 0.0);
        assert_eq!(layout.visible, 0..3);
    }
}
