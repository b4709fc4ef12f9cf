//! Controllable fetchers for exercising the pager's hard cases.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use lazyfeed_core::{FetchCallback, FetchError, MockPostStore, PageFetcher};

/// Fetcher that parks every request until the test releases it.
///
/// Lets tests interleave completions, failures, and resets in any order.
pub struct ManualFetcher {
    store: Rc<MockPostStore>,
    pending: RefCell<VecDeque<(usize, usize, FetchCallback)>>,
}

impl ManualFetcher {
    pub fn new(store: Rc<MockPostStore>) -> Self {
        Self {
            store,
            pending: RefCell::new(VecDeque::new()),
        }
    }

    pub fn pending_count(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Completes the oldest parked request against the store. Returns
    /// `false` when nothing was pending.
    pub fn complete_next(&self) -> bool {
        let Some((offset, limit, on_complete)) = self.pending.borrow_mut().pop_front() else {
            return false;
        };
        on_complete(Ok(self.store.get(offset, limit).to_vec()));
        true
    }

    /// Fails the oldest parked request with a source error.
    pub fn fail_next(&self, message: &str) -> bool {
        let Some((_, _, on_complete)) = self.pending.borrow_mut().pop_front() else {
            return false;
        };
        on_complete(Err(FetchError::Source(message.to_owned())));
        true
    }
}

impl PageFetcher for ManualFetcher {
    fn fetch_page(&self, offset: usize, limit: usize, on_complete: FetchCallback) {
        self.pending
            .borrow_mut()
            .push_back((offset, limit, on_complete));
    }
}

/// Fetcher that never completes. For timeout coverage.
pub struct StallingFetcher;

impl PageFetcher for StallingFetcher {
    fn fetch_page(&self, _offset: usize, _limit: usize, on_complete: FetchCallback) {
        drop(on_complete);
    }
}

/// Fetcher that fails every request immediately.
pub struct FailingFetcher {
    message: String,
}

impl FailingFetcher {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_owned(),
        }
    }
}

impl PageFetcher for FailingFetcher {
    fn fetch_page(&self, _offset: usize, _limit: usize, on_complete: FetchCallback) {
        on_complete(Err(FetchError::Source(self.message.clone())));
    }
}
