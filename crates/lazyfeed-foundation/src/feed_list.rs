//! Binds the pagination engine to the virtualized surface.

use lazyfeed_core::{Pager, PostItem};

use crate::list_state::FeedListState;
use crate::provider::FeedItemProvider;
use crate::viewport::FeedViewport;

/// What the footer slot below the list should show.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FooterContent {
    /// Loading indicator shown while a page fetch is in flight.
    Spinner,
}

/// A virtualized feed: a [`Pager`] as the data side and a [`FeedListState`]
/// as the scroll side.
///
/// The surface stays purely reactive: each [`frame`](Self::frame) lays out
/// whatever the pager currently holds and forwards end-reached into
/// [`Pager::request_next_page`], where the load guard lives.
pub struct FeedList {
    pager: Pager,
    state: FeedListState,
}

impl FeedList {
    pub fn new(pager: Pager, state: FeedListState) -> Self {
        Self { pager, state }
    }

    pub fn pager(&self) -> &Pager {
        &self.pager
    }

    pub fn state(&self) -> &FeedListState {
        &self.state
    }

    /// Key extractor handed to the list widget: the stable item id.
    pub fn key(&self, index: usize) -> Option<String> {
        FeedItemProvider::key(&self.pager, index)
    }

    /// Runs one reactive frame: lays the list out against the pager's
    /// current items and requests the next page when the scroll position
    /// crossed the end-reached threshold.
    pub fn frame(&self) -> FeedViewport {
        let item_count = FeedItemProvider::item_count(&self.pager);
        let layout = self.state.layout(&self.pager);
        if self.state.take_end_reached(item_count) {
            log::debug!("feed: end reached at {item_count} items");
            self.pager.request_next_page();
        }
        layout
    }

    /// Footer slot content; non-empty exactly while a load is in flight.
    pub fn footer(&self) -> Option<FooterContent> {
        self.pager.is_loading().then_some(FooterContent::Spinner)
    }

    /// Clones the items inside the current render window.
    pub fn window_items(&self) -> Vec<PostItem> {
        let layout = self.state.layout(&self.pager);
        layout
            .window
            .filter_map(|index| self.pager.item(index))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::list_state::FeedListConfig;
    use lazyfeed_core::{MockPostStore, PagerConfig, Scheduler, SimulatedFetcher};
    use std::rc::Rc;
    use std::time::Duration;

    fn feed_over(collection: usize) -> (Scheduler, FeedList) {
        let scheduler = Scheduler::new();
        let store = Rc::new(MockPostStore::generate(collection));
        let fetcher = Rc::new(SimulatedFetcher::new(
            store,
            scheduler.clone(),
            Duration::from_millis(800),
        ));
        let pager = Pager::new(fetcher, scheduler.clone(), PagerConfig::default());
        let state = FeedListState::new(FeedListConfig {
            draw_distance: 0.0,
            estimated_item_height: 100.0,
            ..FeedListConfig::default()
        });
        state.set_viewport_height(800.0);
        (scheduler.clone(), FeedList::new(pager, state))
    }

    #[test]
    fn test_footer_tracks_loading() {
        let (scheduler, feed) = feed_over(100);
        assert_eq!(feed.footer(), None);
        feed.pager().request_initial_load();
        assert_eq!(feed.footer(), Some(FooterContent::Spinner));
        scheduler.run_until_idle();
        assert_eq!(feed.footer(), None);
    }

    #[test]
    fn test_frame_requests_next_page_near_end() {
        let (scheduler, feed) = feed_over(100);
        feed.pager().request_initial_load();
        scheduler.run_until_idle();
        assert_eq!(feed.pager().item_count(), 15);

        // 15 items x 100px = 1500px of content; scroll to the bottom so the
        // distance from the end drops under half a viewport.
        feed.frame();
        feed.state().scroll_by(10_000.0);
        feed.frame();
        assert!(feed.pager().is_loading());
        scheduler.run_until_idle();
        assert_eq!(feed.pager().item_count(), 30);
    }

    #[test]
    fn test_repeated_frames_do_not_stack_requests() {
        let (scheduler, feed) = feed_over(100);
        feed.pager().request_initial_load();
        scheduler.run_until_idle();
        feed.frame();
        feed.state().scroll_by(10_000.0);
        for _ in 0..10 {
            feed.frame();
        }
        scheduler.run_until_idle();
        // One extra page, not ten.
        assert_eq!(feed.pager().item_count(), 30);
    }

    #[test]
    fn test_window_items_are_keyed_by_id() {
        let (scheduler, feed) = feed_over(100);
        feed.pager().request_initial_load();
        scheduler.run_until_idle();
        feed.frame();
        let items = feed.window_items();
        assert!(!items.is_empty());
        assert_eq!(items[0].id, "item-1");
        assert_eq!(feed.key(0).as_deref(), Some("item-1"));
    }
}
