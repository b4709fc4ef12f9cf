//! Deterministic in-memory post collection.

use crate::PostItem;

const LOREM_BODY: &str = "Lorem ipsum dolor sit amet, consectetur adipiscing \
elit. Sed do eiusmod tempor incididunt ut labore et dolore magna aliqua. Ut \
enim ad minim veniam, quis nostrud exercitation ullamco laboris.";

/// Fixed, ordered collection of [`PostItem`]s addressable by zero-based
/// offset.
///
/// Generation is a pure function of the index: offset `i` always yields the
/// same item. The store is constructed once and handed to the fetcher; there
/// is no process-global collection.
#[derive(Clone, Debug)]
pub struct MockPostStore {
    items: Vec<PostItem>,
}

impl MockPostStore {
    /// Generates `count` posts in O(count) time and space.
    pub fn generate(count: usize) -> Self {
        let items = (0..count)
            .map(|index| PostItem {
                id: format!("item-{}", index + 1),
                title: format!("Post {}", index + 1),
                body: LOREM_BODY.to_owned(),
            })
            .collect();
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the contiguous slice `[offset, offset + limit)`, clipped to
    /// the collection bounds.
    ///
    /// Past the end this returns fewer (possibly zero) items. It never
    /// errors and never wraps around.
    pub fn get(&self, offset: usize, limit: usize) -> &[PostItem] {
        let start = offset.min(self.items.len());
        let end = offset.saturating_add(limit).min(self.items.len());
        &self.items[start..end]
    }
}
