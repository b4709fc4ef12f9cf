//! Core pagination engine for lazyfeed.
//!
//! The crate is built around three pieces:
//!
//! - [`MockPostStore`], a fixed deterministic collection of [`PostItem`]s
//!   addressable by offset,
//! - [`PageFetcher`], the asynchronous page-access capability (with
//!   [`SimulatedFetcher`] standing in for real network I/O),
//! - [`Pager`], the load-state machine that accumulates pages and is the
//!   only component with decision logic.
//!
//! All deferred work runs on a single cooperative [`Scheduler`] thread, so
//! state mutation needs no locking.

mod error;
mod fetcher;
mod item;
mod pager;
mod scheduler;
mod store;

pub use error::FetchError;
pub use fetcher::{FetchCallback, PageFetcher, SimulatedFetcher};
pub use item::PostItem;
pub use pager::{
    LoadPhase, Pager, PagerConfig, SubscriptionId, DEFAULT_FETCH_TIMEOUT, DEFAULT_PAGE_LENGTH,
};
pub use scheduler::{Scheduler, TimerId};
pub use store::MockPostStore;
