//! Single-threaded cooperative scheduler with a virtual clock.
//!
//! All deferred work in the feed runs here: the simulated fetch latency,
//! fetch timeouts, and anything a fetcher wants to post. Tasks execute on
//! the one thread that advances the clock, so there are no locks and no
//! shared-memory concerns.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

/// Identifier of a scheduled task, used for cancellation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

type Task = Box<dyn FnOnce()>;

struct TimerEntry {
    id: TimerId,
    deadline: Duration,
    /// Tie-breaker: tasks with equal deadlines run in scheduling order.
    seq: u64,
    task: Task,
}

#[derive(Default)]
struct SchedulerInner {
    now: Duration,
    next_seq: u64,
    timers: Vec<TimerEntry>,
}

/// Cheaply clonable handle to the scheduler.
///
/// All clones share one timer queue and one clock.
#[derive(Clone, Default)]
pub struct Scheduler {
    inner: Rc<RefCell<SchedulerInner>>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Virtual time elapsed since the scheduler was created.
    pub fn now(&self) -> Duration {
        self.inner.borrow().now
    }

    /// Schedules `task` to run once `delay` has elapsed on the virtual
    /// clock.
    pub fn post_delayed(&self, delay: Duration, task: impl FnOnce() + 'static) -> TimerId {
        let mut inner = self.inner.borrow_mut();
        let seq = inner.next_seq;
        inner.next_seq += 1;
        let id = TimerId(seq);
        let deadline = inner.now + delay;
        inner.timers.push(TimerEntry {
            id,
            deadline,
            seq,
            task: Box::new(task),
        });
        id
    }

    /// Schedules `task` at the current instant; it runs during the next
    /// [`advance`](Self::advance) pass.
    pub fn post(&self, task: impl FnOnce() + 'static) -> TimerId {
        self.post_delayed(Duration::ZERO, task)
    }

    /// Cancels a pending task. Returns `false` if it already ran or was
    /// cancelled before.
    pub fn cancel(&self, id: TimerId) -> bool {
        let mut inner = self.inner.borrow_mut();
        match inner.timers.iter().position(|entry| entry.id == id) {
            Some(index) => {
                inner.timers.swap_remove(index);
                true
            }
            None => false,
        }
    }

    pub fn pending_count(&self) -> usize {
        self.inner.borrow().timers.len()
    }

    pub fn has_pending(&self) -> bool {
        self.pending_count() > 0
    }

    /// Advances the clock by `by`, running every task whose deadline falls
    /// inside the advanced span, in deadline order (ties broken by
    /// scheduling order).
    ///
    /// Tasks may schedule further tasks; a newly posted task also runs in
    /// this pass when its deadline still falls inside the span. The queue
    /// borrow is released while each task runs, so re-entrant `post` and
    /// `cancel` calls are fine.
    pub fn advance(&self, by: Duration) {
        let target = self.inner.borrow().now + by;
        loop {
            let next = {
                let mut inner = self.inner.borrow_mut();
                let due = inner
                    .timers
                    .iter()
                    .enumerate()
                    .filter(|(_, entry)| entry.deadline <= target)
                    .min_by_key(|(_, entry)| (entry.deadline, entry.seq))
                    .map(|(index, _)| index);
                match due {
                    Some(index) => {
                        let entry = inner.timers.remove(index);
                        inner.now = inner.now.max(entry.deadline);
                        Some(entry.task)
                    }
                    None => None,
                }
            };
            match next {
                Some(task) => task(),
                None => break,
            }
        }
        self.inner.borrow_mut().now = target;
    }

    /// Runs until no timers remain, jumping the clock to each deadline.
    pub fn run_until_idle(&self) {
        loop {
            let next_deadline = {
                let inner = self.inner.borrow();
                inner.timers.iter().map(|entry| entry.deadline).min()
            };
            let Some(deadline) = next_deadline else {
                break;
            };
            let delta = deadline.saturating_sub(self.now());
            self.advance(delta);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorder() -> (Rc<RefCell<Vec<u32>>>, impl Fn(u32) -> Box<dyn FnOnce()>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let log_for_task = Rc::clone(&log);
        let make = move |tag: u32| -> Box<dyn FnOnce()> {
            let log = Rc::clone(&log_for_task);
            Box::new(move || log.borrow_mut().push(tag))
        };
        (log, make)
    }

    #[test]
    fn test_tasks_run_in_deadline_order() {
        let scheduler = Scheduler::new();
        let (log, task) = recorder();
        scheduler.post_delayed(Duration::from_millis(20), task(2));
        scheduler.post_delayed(Duration::from_millis(10), task(1));
        scheduler.post_delayed(Duration::from_millis(30), task(3));
        scheduler.advance(Duration::from_millis(25));
        assert_eq!(*log.borrow(), vec![1, 2]);
        scheduler.advance(Duration::from_millis(5));
        assert_eq!(*log.borrow(), vec![1, 2, 3]);
    }

    #[test]
    fn test_equal_deadlines_are_fifo() {
        let scheduler = Scheduler::new();
        let (log, task) = recorder();
        for tag in 1..=4 {
            scheduler.post_delayed(Duration::from_millis(800), task(tag));
        }
        scheduler.advance(Duration::from_millis(800));
        assert_eq!(*log.borrow(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_cancel_removes_pending_task() {
        let scheduler = Scheduler::new();
        let (log, task) = recorder();
        let id = scheduler.post_delayed(Duration::from_millis(10), task(1));
        assert!(scheduler.cancel(id));
        assert!(!scheduler.cancel(id));
        scheduler.advance(Duration::from_millis(20));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_task_can_post_follow_up() {
        let scheduler = Scheduler::new();
        let (log, task) = recorder();
        let inner = scheduler.clone();
        scheduler.post_delayed(Duration::from_millis(5), move || {
            inner.post(task(2));
        });
        scheduler.advance(Duration::from_millis(10));
        // The follow-up was posted at the 5ms mark, inside the span.
        assert_eq!(*log.borrow(), vec![2]);
        assert!(!scheduler.has_pending());
    }

    #[test]
    fn test_run_until_idle_drains_everything() {
        let scheduler = Scheduler::new();
        let (log, task) = recorder();
        scheduler.post_delayed(Duration::from_millis(100), task(1));
        scheduler.post_delayed(Duration::from_millis(300), task(2));
        scheduler.run_until_idle();
        assert_eq!(*log.borrow(), vec![1, 2]);
        assert_eq!(scheduler.now(), Duration::from_millis(300));
    }

    #[test]
    fn test_clock_is_monotonic() {
        let scheduler = Scheduler::new();
        scheduler.advance(Duration::from_millis(50));
        assert_eq!(scheduler.now(), Duration::from_millis(50));
        scheduler.advance(Duration::ZERO);
        assert_eq!(scheduler.now(), Duration::from_millis(50));
    }
}
