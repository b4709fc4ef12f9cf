//! Fetch failure taxonomy.

use std::time::Duration;

use thiserror::Error;

/// Failure outcomes of a page fetch.
///
/// The simulated fetcher never fails, but the pager surfaces these so a real
/// network-backed [`PageFetcher`](crate::PageFetcher) can slot in without
/// changing the state machine.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum FetchError {
    /// No completion arrived within the pager's timeout budget.
    #[error("page fetch timed out after {after:?}")]
    TimedOut { after: Duration },

    /// The underlying source reported a failure.
    #[error("page source failed: {0}")]
    Source(String),
}
