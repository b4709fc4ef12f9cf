//! Scripted driver for the full feed stack.

use std::rc::Rc;
use std::time::Duration;

use lazyfeed_core::{MockPostStore, PageFetcher, Pager, PagerConfig, Scheduler, SimulatedFetcher};
use lazyfeed_foundation::{FeedList, FeedListConfig, FeedListState, FeedViewport};

const DEFAULT_VIEWPORT_HEIGHT: f32 = 800.0;
const DEFAULT_LATENCY: Duration = Duration::from_millis(800);

/// Drives a pager plus feed surface over a virtual-time scheduler.
///
/// The robot owns the whole stack; tests script user behavior (scrolling,
/// waiting) and assert on the resulting load state.
pub struct FeedRobot {
    scheduler: Scheduler,
    pager: Pager,
    list: FeedList,
}

impl FeedRobot {
    /// Stack over a generated collection with the default page length, the
    /// default 800 ms simulated latency, and an 800px viewport.
    pub fn new(collection_size: usize) -> Self {
        let scheduler = Scheduler::new();
        let store = Rc::new(MockPostStore::generate(collection_size));
        let fetcher = Rc::new(SimulatedFetcher::new(
            store,
            scheduler.clone(),
            DEFAULT_LATENCY,
        ));
        Self::with_parts(
            scheduler,
            fetcher,
            PagerConfig::default(),
            FeedListConfig::default(),
        )
    }

    /// Stack over an arbitrary fetcher, for failure and cancellation tests.
    pub fn with_parts(
        scheduler: Scheduler,
        fetcher: Rc<dyn PageFetcher>,
        pager_config: PagerConfig,
        list_config: FeedListConfig,
    ) -> Self {
        let pager = Pager::new(fetcher, scheduler.clone(), pager_config);
        let state = FeedListState::new(list_config);
        state.set_viewport_height(DEFAULT_VIEWPORT_HEIGHT);
        let list = FeedList::new(pager.clone(), state);
        Self {
            scheduler,
            pager,
            list,
        }
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn pager(&self) -> &Pager {
        &self.pager
    }

    pub fn list(&self) -> &FeedList {
        &self.list
    }

    /// Advances virtual time, running whatever comes due.
    pub fn advance_ms(&self, ms: u64) {
        self.scheduler.advance(Duration::from_millis(ms));
    }

    /// Drains every pending timer (all in-flight latency elapses).
    pub fn settle(&self) {
        self.scheduler.run_until_idle();
    }

    /// Runs one surface frame.
    pub fn frame(&self) -> FeedViewport {
        self.list.frame()
    }

    /// Lays out, scrolls by `delta` pixels, and lays out again: one step
    /// of a fling.
    pub fn scroll_by(&self, delta: f32) -> FeedViewport {
        self.list.frame();
        self.list.state().scroll_by(delta);
        self.list.frame()
    }

    /// Item ids accumulated so far, in order.
    pub fn ids(&self) -> Vec<String> {
        self.pager
            .with_items(|items| items.iter().map(|item| item.id.clone()).collect())
    }
}
