//! Robot-style testing utilities for lazyfeed.
//!
//! [`FeedRobot`] builds the full stack (mock store, fetcher, pager, feed
//! surface) over a virtual-time scheduler, so tests script scrolling and
//! latency deterministically:
//!
//! ```
//! use lazyfeed_testing::FeedRobot;
//!
//! let robot = FeedRobot::new(1000);
//! robot.pager().request_initial_load();
//! robot.settle();
//! assert_eq!(robot.pager().item_count(), 15);
//! ```

mod assertions;
mod fetchers;
mod robot;

pub use assertions::{assert_approx_eq, assert_contiguous_feed, assert_phase};
pub use fetchers::{FailingFetcher, ManualFetcher, StallingFetcher};
pub use robot::FeedRobot;
