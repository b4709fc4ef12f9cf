//! Feed item model.

/// A single post in the feed.
///
/// Items are immutable once generated. Identity is [`id`](Self::id), which
/// stays stable across loads so a virtualized surface can keep reusing the
/// rows it already measured.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PostItem {
    /// Unique, stable identifier (`item-1`, `item-2`, ...).
    pub id: String,
    pub title: String,
    pub body: String,
}
