//! Virtualized feed surface for the lazyfeed engine.
//!
//! This crate is the list-rendering side of the feed: it knows how to turn a
//! scroll offset into a render window over the pager's items, when to ask
//! for the next page, and what the footer slot should show. It never decides
//! what to load; that stays in `lazyfeed-core`.

mod feed_list;
mod list_state;
mod provider;
mod viewport;

pub use feed_list::{FeedList, FooterContent};
pub use list_state::{
    FeedLayoutStats, FeedListConfig, FeedListState, DEFAULT_DRAW_DISTANCE,
    DEFAULT_END_REACHED_THRESHOLD, DEFAULT_ITEM_HEIGHT_ESTIMATE,
};
pub use provider::FeedItemProvider;
pub use viewport::{measure, FeedViewport};
