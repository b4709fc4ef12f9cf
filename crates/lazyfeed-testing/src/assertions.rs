//! Assertion helpers for feed tests.

use lazyfeed_core::{LoadPhase, Pager};

/// Asserts that a value is within an expected range. Useful for fuzzy
/// matching of scroll offsets and layout sizes.
pub fn assert_approx_eq(actual: f32, expected: f32, tolerance: f32, msg: &str) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tolerance,
        "{msg}: expected {expected} (±{tolerance}), got {actual} (diff: {diff})"
    );
}

/// Asserts the accumulated feed is an exact prefix of the mock collection:
/// ids `item-1..=item-n` in order, no duplicates, no gaps.
pub fn assert_contiguous_feed(pager: &Pager) {
    pager.with_items(|items| {
        for (index, item) in items.iter().enumerate() {
            let expected = format!("item-{}", index + 1);
            assert_eq!(
                item.id, expected,
                "feed not contiguous at position {index}: expected {expected}, got {}",
                item.id
            );
        }
    });
}

/// Asserts the pager's current phase.
pub fn assert_phase(pager: &Pager, expected: &LoadPhase) {
    let actual = pager.phase();
    assert_eq!(
        &actual, expected,
        "unexpected load phase: expected {expected:?}, got {actual:?}"
    );
}
