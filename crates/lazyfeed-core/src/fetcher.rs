//! Asynchronous page access.

use std::rc::Rc;
use std::time::Duration;

use crate::{FetchError, MockPostStore, PostItem, Scheduler};

/// Completion callback for [`PageFetcher::fetch_page`]. Always invoked on
/// the scheduler thread.
pub type FetchCallback = Box<dyn FnOnce(Result<Vec<PostItem>, FetchError>)>;

/// Asynchronous page-fetch capability.
///
/// The pager only ever asks for a contiguous slice, so a real implementation
/// can swap in actual network I/O without touching the state machine.
pub trait PageFetcher {
    /// Requests the items in `[offset, offset + limit)`.
    ///
    /// `on_complete` must be invoked at most once, on the scheduler thread.
    /// Dropping the callback without invoking it is allowed; the pager's
    /// timeout covers that case.
    fn fetch_page(&self, offset: usize, limit: usize, on_complete: FetchCallback);
}

/// Fetcher that serves a [`MockPostStore`] after a fixed simulated latency.
///
/// Cannot fail. Completions fire in request order because every request uses
/// the same delay and the scheduler keeps equal deadlines FIFO.
pub struct SimulatedFetcher {
    store: Rc<MockPostStore>,
    scheduler: Scheduler,
    latency: Duration,
}

impl SimulatedFetcher {
    pub fn new(store: Rc<MockPostStore>, scheduler: Scheduler, latency: Duration) -> Self {
        Self {
            store,
            scheduler,
            latency,
        }
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }
}

impl PageFetcher for SimulatedFetcher {
    fn fetch_page(&self, offset: usize, limit: usize, on_complete: FetchCallback) {
        let store = Rc::clone(&self.store);
        self.scheduler.post_delayed(self.latency, move || {
            on_complete(Ok(store.get(offset, limit).to_vec()));
        });
    }
}
