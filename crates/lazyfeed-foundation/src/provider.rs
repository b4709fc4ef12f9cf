//! Item provider trait for the feed surface.

use lazyfeed_core::Pager;

/// Provides the info the surface needs about items it may lay out.
///
/// Implementations should be cheap to query; the surface calls them every
/// layout pass. Keys must be stable for the lifetime of an item so scroll
/// position survives appends.
pub trait FeedItemProvider {
    /// Total number of items currently available (visible or not).
    fn item_count(&self) -> usize;

    /// Stable key of the item at `index`, or `None` past the end.
    fn key(&self, index: usize) -> Option<String>;

    /// Content type of the item at `index`. Items sharing a type can reuse
    /// each other's measurements. `None` means compatible with any.
    fn content_type(&self, index: usize) -> Option<u64> {
        let _ = index;
        None
    }

    /// Index of the item with `key`, if present.
    fn index_of(&self, key: &str) -> Option<usize> {
        (0..self.item_count()).find(|&index| self.key(index).as_deref() == Some(key))
    }
}

impl FeedItemProvider for Pager {
    fn item_count(&self) -> usize {
        Pager::item_count(self)
    }

    fn key(&self, index: usize) -> Option<String> {
        Pager::key(self, index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedProvider(Vec<&'static str>);

    impl FeedItemProvider for FixedProvider {
        fn item_count(&self) -> usize {
            self.0.len()
        }

        fn key(&self, index: usize) -> Option<String> {
            self.0.get(index).map(|key| (*key).to_owned())
        }
    }

    #[test]
    fn test_index_of_finds_by_key() {
        let provider = FixedProvider(vec!["item-1", "item-2", "item-3"]);
        assert_eq!(provider.index_of("item-2"), Some(1));
        assert_eq!(provider.index_of("item-9"), None);
    }
}
