//! Incremental pagination state machine.
//!
//! [`Pager`] owns the accumulated items, the page cursor, and the in-flight
//! flag. It is the only component with decision logic; the rendering surface
//! stays purely reactive to whatever the pager currently holds.
//!
//! Pages are appended rather than replacing the full list so item identity
//! is preserved across loads. A virtualized surface relies on that: identity
//! churn would force it to re-measure and re-render rows it already has.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use smallvec::SmallVec;

use crate::{FetchError, PageFetcher, PostItem, Scheduler, TimerId};

/// Default number of items per page.
pub const DEFAULT_PAGE_LENGTH: usize = 15;

/// Default budget for a single fetch before the pager gives up on it.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Pager tuning knobs, fixed at construction.
#[derive(Clone, Debug)]
pub struct PagerConfig {
    pub page_length: usize,
    pub fetch_timeout: Duration,
}

impl Default for PagerConfig {
    fn default() -> Self {
        Self {
            page_length: DEFAULT_PAGE_LENGTH,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }
}

/// Where the engine currently is in its load cycle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadPhase {
    /// No request in flight; more pages may remain.
    Idle,
    /// A request was issued and has not completed yet.
    Loading,
    /// The last completed page came back short. No further next-page
    /// requests are issued until a refresh via
    /// [`Pager::request_initial_load`] or [`Pager::reset`].
    Exhausted,
    /// The last request failed or timed out. Cleared by [`Pager::retry`] or
    /// a refresh.
    Failed(FetchError),
}

/// Handle returned by [`Pager::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SubscriptionId(u64);

struct InFlight {
    request: u64,
    page: usize,
    replace: bool,
    timeout: TimerId,
}

struct PagerInner {
    config: PagerConfig,
    items: Vec<PostItem>,
    /// 1-based page number of the most recently completed load.
    current_page: usize,
    phase: LoadPhase,
    in_flight: Option<InFlight>,
    /// Page/replace of the last failed request, kept for [`Pager::retry`].
    last_failed: Option<(usize, bool)>,
    next_request: u64,
    observers: Vec<(u64, Rc<dyn Fn()>)>,
    next_observer: u64,
}

/// Clone-able handle to the pagination engine. All clones share state.
///
/// The fetcher and scheduler are injected at construction; the pager holds
/// no global state and can be torn down with [`reset`](Self::reset).
#[derive(Clone)]
pub struct Pager {
    inner: Rc<RefCell<PagerInner>>,
    fetcher: Rc<dyn PageFetcher>,
    scheduler: Scheduler,
}

impl Pager {
    pub fn new(fetcher: Rc<dyn PageFetcher>, scheduler: Scheduler, config: PagerConfig) -> Self {
        Self {
            inner: Rc::new(RefCell::new(PagerInner {
                config,
                items: Vec::new(),
                current_page: 1,
                phase: LoadPhase::Idle,
                in_flight: None,
                last_failed: None,
                next_request: 1,
                observers: Vec::new(),
                next_observer: 1,
            })),
            fetcher,
            scheduler,
        }
    }

    pub fn config(&self) -> PagerConfig {
        self.inner.borrow().config.clone()
    }

    pub fn item_count(&self) -> usize {
        self.inner.borrow().items.len()
    }

    pub fn item(&self, index: usize) -> Option<PostItem> {
        self.inner.borrow().items.get(index).cloned()
    }

    /// Runs `f` against the accumulated items without cloning them.
    pub fn with_items<R>(&self, f: impl FnOnce(&[PostItem]) -> R) -> R {
        f(&self.inner.borrow().items)
    }

    /// Stable key of the item at `index`, the key extractor handed to the
    /// virtualized list widget.
    pub fn key(&self, index: usize) -> Option<String> {
        self.inner
            .borrow()
            .items
            .get(index)
            .map(|item| item.id.clone())
    }

    /// 1-based page number of the most recently completed load.
    pub fn current_page(&self) -> usize {
        self.inner.borrow().current_page
    }

    pub fn phase(&self) -> LoadPhase {
        self.inner.borrow().phase.clone()
    }

    /// True for the entire span between issuing a load request and that
    /// request's completion.
    pub fn is_loading(&self) -> bool {
        matches!(self.inner.borrow().phase, LoadPhase::Loading)
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self.inner.borrow().phase, LoadPhase::Exhausted)
    }

    /// Registers a change observer, invoked after every load-state mutation.
    pub fn subscribe(&self, observer: impl Fn() + 'static) -> SubscriptionId {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_observer;
        inner.next_observer += 1;
        inner.observers.push((id, Rc::new(observer)));
        SubscriptionId(id)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut inner = self.inner.borrow_mut();
        match inner.observers.iter().position(|(got, _)| *got == id.0) {
            Some(index) => {
                inner.observers.remove(index);
                true
            }
            None => false,
        }
    }

    /// Clears the accumulated items and returns to page 1, `Idle`.
    ///
    /// An in-flight request is cancelled: its timeout timer is dropped and a
    /// completion that arrives later no longer matches the current request
    /// id, so stale data cannot resurrect after the reset.
    pub fn reset(&self) {
        {
            let mut inner = self.inner.borrow_mut();
            if let Some(in_flight) = inner.in_flight.take() {
                self.scheduler.cancel(in_flight.timeout);
                log::debug!(
                    "pager: reset cancelled in-flight load of page {}",
                    in_flight.page
                );
            }
            inner.items.clear();
            inner.current_page = 1;
            inner.phase = LoadPhase::Idle;
            inner.last_failed = None;
        }
        self.notify();
    }

    /// Loads page 1, replacing the accumulated items. Also serves as a
    /// refresh from `Exhausted` or `Failed`.
    pub fn request_initial_load(&self) {
        self.load_page(1, true);
    }

    /// Loads the page after the most recently completed one, appending.
    ///
    /// Guarded by the phase: suppressed (with a diagnostic) while a load is
    /// in flight, after exhaustion, and after a failure. The guard lives
    /// here rather than in the caller, so a surface firing end-reached every
    /// frame cannot issue overlapping loads.
    pub fn request_next_page(&self) {
        let page = {
            let inner = self.inner.borrow();
            match inner.phase {
                LoadPhase::Idle => inner.current_page + 1,
                LoadPhase::Loading => {
                    log::debug!("pager: next page suppressed, a load is in flight");
                    return;
                }
                LoadPhase::Exhausted => {
                    log::debug!("pager: next page suppressed, feed is exhausted");
                    return;
                }
                LoadPhase::Failed(_) => {
                    log::debug!("pager: next page suppressed, last load failed (use retry)");
                    return;
                }
            }
        };
        self.load_page(page, false);
    }

    /// Re-issues the last failed request. Ignored unless the pager is in
    /// `Failed`.
    pub fn retry(&self) {
        let failed = {
            let inner = self.inner.borrow();
            match inner.phase {
                LoadPhase::Failed(_) => inner.last_failed,
                _ => None,
            }
        };
        match failed {
            Some((page, replace)) => {
                log::debug!("pager: retrying page {page}");
                self.load_page(page, replace);
            }
            None => log::debug!("pager: retry ignored, nothing failed"),
        }
    }

    /// Issues a load for the 1-based `page`.
    ///
    /// On completion the result replaces the accumulated items
    /// (`replace = true`) or is appended. A page that comes back with fewer
    /// than `page_length` items flips the pager to `Exhausted`.
    pub fn load_page(&self, page: usize, replace: bool) {
        let (offset, limit, request, timeout_budget) = {
            let mut inner = self.inner.borrow_mut();
            if matches!(inner.phase, LoadPhase::Loading) {
                log::warn!("pager: load of page {page} suppressed, another load is in flight");
                return;
            }
            let request = inner.next_request;
            inner.next_request += 1;
            let limit = inner.config.page_length;
            let offset = page.saturating_sub(1) * limit;
            inner.phase = LoadPhase::Loading;
            (offset, limit, request, inner.config.fetch_timeout)
        };

        let timeout = {
            let pager = self.clone();
            self.scheduler.post_delayed(timeout_budget, move || {
                pager.on_timeout(request, timeout_budget);
            })
        };
        self.inner.borrow_mut().in_flight = Some(InFlight {
            request,
            page,
            replace,
            timeout,
        });
        log::debug!("pager: loading page {page} (offset {offset}, limit {limit}, replace {replace})");
        self.notify();

        let pager = self.clone();
        self.fetcher.fetch_page(
            offset,
            limit,
            Box::new(move |result| pager.on_complete(request, result)),
        );
    }

    fn on_complete(&self, request: u64, result: Result<Vec<PostItem>, FetchError>) {
        {
            let mut inner = self.inner.borrow_mut();
            let current = inner
                .in_flight
                .as_ref()
                .is_some_and(|in_flight| in_flight.request == request);
            if !current {
                log::debug!("pager: stale completion for request {request} discarded");
                return;
            }
            let Some(in_flight) = inner.in_flight.take() else {
                return;
            };
            self.scheduler.cancel(in_flight.timeout);
            match result {
                Ok(new_items) => {
                    let short = new_items.len() < inner.config.page_length;
                    if in_flight.replace {
                        inner.items = new_items;
                    } else {
                        inner.items.extend(new_items);
                    }
                    inner.current_page = in_flight.page;
                    inner.last_failed = None;
                    inner.phase = if short {
                        LoadPhase::Exhausted
                    } else {
                        LoadPhase::Idle
                    };
                    log::debug!(
                        "pager: page {} complete, {} items accumulated, phase {:?}",
                        in_flight.page,
                        inner.items.len(),
                        inner.phase
                    );
                }
                Err(error) => {
                    log::warn!("pager: page {} failed: {error}", in_flight.page);
                    inner.last_failed = Some((in_flight.page, in_flight.replace));
                    inner.phase = LoadPhase::Failed(error);
                }
            }
        }
        self.notify();
    }

    fn on_timeout(&self, request: u64, after: Duration) {
        {
            let mut inner = self.inner.borrow_mut();
            let current = inner
                .in_flight
                .as_ref()
                .is_some_and(|in_flight| in_flight.request == request);
            if !current {
                return;
            }
            let Some(in_flight) = inner.in_flight.take() else {
                return;
            };
            log::warn!("pager: page {} timed out after {after:?}", in_flight.page);
            inner.last_failed = Some((in_flight.page, in_flight.replace));
            inner.phase = LoadPhase::Failed(FetchError::TimedOut { after });
        }
        self.notify();
    }

    fn notify(&self) {
        // Snapshot so observers can freely call back into the pager.
        let observers: SmallVec<[Rc<dyn Fn()>; 4]> = self
            .inner
            .borrow()
            .observers
            .iter()
            .map(|(_, observer)| Rc::clone(observer))
            .collect();
        for observer in observers {
            observer();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MockPostStore, SimulatedFetcher};
    use std::cell::Cell;

    const LATENCY: Duration = Duration::from_millis(800);

    fn pager_over(collection: usize) -> (Scheduler, Pager) {
        let scheduler = Scheduler::new();
        let store = Rc::new(MockPostStore::generate(collection));
        let fetcher = Rc::new(SimulatedFetcher::new(store, scheduler.clone(), LATENCY));
        let pager = Pager::new(fetcher, scheduler.clone(), PagerConfig::default());
        (scheduler, pager)
    }

    #[test]
    fn test_initial_load_fills_first_page() {
        let (scheduler, pager) = pager_over(1000);
        pager.request_initial_load();
        assert!(pager.is_loading());
        assert_eq!(pager.item_count(), 0);

        scheduler.advance(Duration::from_millis(799));
        assert!(pager.is_loading());
        scheduler.advance(Duration::from_millis(1));

        assert_eq!(pager.phase(), LoadPhase::Idle);
        assert_eq!(pager.item_count(), 15);
        assert_eq!(pager.current_page(), 1);
        assert_eq!(pager.key(0).as_deref(), Some("item-1"));
        assert_eq!(pager.key(14).as_deref(), Some("item-15"));
    }

    #[test]
    fn test_next_page_appends_in_order() {
        let (scheduler, pager) = pager_over(1000);
        pager.request_initial_load();
        scheduler.run_until_idle();
        pager.request_next_page();
        scheduler.run_until_idle();

        assert_eq!(pager.item_count(), 30);
        assert_eq!(pager.current_page(), 2);
        assert_eq!(pager.key(15).as_deref(), Some("item-16"));
    }

    #[test]
    fn test_load_page_appends_clipped_tail() {
        let (scheduler, pager) = pager_over(40);
        // Page 3 covers offsets 30..45 but only 10 items remain.
        pager.load_page(3, false);
        scheduler.run_until_idle();
        assert_eq!(pager.item_count(), 10);
        assert_eq!(pager.key(0).as_deref(), Some("item-31"));
        assert!(pager.is_exhausted());
    }

    #[test]
    fn test_short_page_exhausts_and_stops_the_cursor() {
        let (scheduler, pager) = pager_over(20);
        pager.request_initial_load();
        scheduler.run_until_idle();
        assert_eq!(pager.item_count(), 15);
        assert_eq!(pager.phase(), LoadPhase::Idle);

        pager.request_next_page();
        scheduler.run_until_idle();
        assert_eq!(pager.item_count(), 20);
        assert_eq!(pager.current_page(), 2);
        assert!(pager.is_exhausted());

        // Further requests are refused; the cursor must not keep advancing.
        pager.request_next_page();
        scheduler.run_until_idle();
        assert_eq!(pager.item_count(), 20);
        assert_eq!(pager.current_page(), 2);
        assert!(pager.is_exhausted());
    }

    #[test]
    fn test_overlapping_load_is_suppressed() {
        let (scheduler, pager) = pager_over(1000);
        pager.request_initial_load();
        pager.request_next_page();
        pager.load_page(5, false);
        scheduler.run_until_idle();

        // Only the initial load ran.
        assert_eq!(pager.item_count(), 15);
        assert_eq!(pager.current_page(), 1);
    }

    #[test]
    fn test_reset_restores_empty_state_and_drops_late_completion() {
        let (scheduler, pager) = pager_over(1000);
        pager.request_initial_load();
        scheduler.run_until_idle();
        pager.request_next_page();
        assert!(pager.is_loading());

        pager.reset();
        assert_eq!(pager.item_count(), 0);
        assert_eq!(pager.current_page(), 1);
        assert_eq!(pager.phase(), LoadPhase::Idle);

        // The cancelled request's completion still fires on the scheduler
        // but must not resurrect stale data.
        scheduler.run_until_idle();
        assert_eq!(pager.item_count(), 0);
        assert_eq!(pager.phase(), LoadPhase::Idle);
    }

    #[test]
    fn test_refresh_replaces_accumulated_items() {
        let (scheduler, pager) = pager_over(1000);
        pager.request_initial_load();
        scheduler.run_until_idle();
        pager.request_next_page();
        scheduler.run_until_idle();
        assert_eq!(pager.item_count(), 30);

        pager.request_initial_load();
        scheduler.run_until_idle();
        assert_eq!(pager.item_count(), 15);
        assert_eq!(pager.current_page(), 1);
    }

    #[test]
    fn test_observers_fire_on_every_transition() {
        let (scheduler, pager) = pager_over(1000);
        let ticks = Rc::new(Cell::new(0usize));
        let seen = Rc::clone(&ticks);
        let id = pager.subscribe(move || seen.set(seen.get() + 1));

        pager.request_initial_load(); // Loading
        scheduler.run_until_idle(); // Idle
        assert_eq!(ticks.get(), 2);

        assert!(pager.unsubscribe(id));
        pager.request_next_page();
        scheduler.run_until_idle();
        assert_eq!(ticks.get(), 2);
    }
}
