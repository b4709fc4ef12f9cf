//! Scripted infinite-scroll session over a 1000-post mock feed.
//!
//! Run with:
//! ```bash
//! RUST_LOG=debug cargo run --package feed-demo
//! ```
//!
//! The demo drives the whole stack on a virtual clock: each frame scrolls a
//! fixed step, lays the list out, and advances time by 16 ms so the 800 ms
//! simulated fetch latency plays out exactly as it would on screen.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use lazyfeed_core::{MockPostStore, Pager, PagerConfig, Scheduler, SimulatedFetcher};
use lazyfeed_foundation::{FeedList, FeedListConfig, FeedListState};
use web_time::Instant;

const MOCK_COLLECTION_SIZE: usize = 1000;
const FETCH_LATENCY: Duration = Duration::from_millis(800);
const VIEWPORT_HEIGHT: f32 = 800.0;
const FRAME: Duration = Duration::from_millis(16);
const SCROLL_STEP: f32 = 240.0;

/// Row heights vary a little by index, like a real feed with uneven bodies.
fn item_height(index: usize) -> f32 {
    96.0 + (index % 5) as f32 * 12.0
}

fn main() {
    env_logger::init();
    let started = Instant::now();

    println!("=== lazyfeed demo: {MOCK_COLLECTION_SIZE} posts, 800ms simulated latency ===");

    let scheduler = Scheduler::new();
    let store = Rc::new(MockPostStore::generate(MOCK_COLLECTION_SIZE));
    let fetcher = Rc::new(SimulatedFetcher::new(
        Rc::clone(&store),
        scheduler.clone(),
        FETCH_LATENCY,
    ));
    let pager = Pager::new(fetcher, scheduler.clone(), PagerConfig::default());
    let state = FeedListState::new(FeedListConfig::default());
    state.set_viewport_height(VIEWPORT_HEIGHT);
    let list = FeedList::new(pager.clone(), state.clone());

    // Narrate page completions as the load state changes.
    let last_count = Rc::new(Cell::new(0usize));
    let pager_for_observer = pager.clone();
    let seen = Rc::clone(&last_count);
    pager.subscribe(move || {
        let count = pager_for_observer.item_count();
        if count != seen.get() {
            seen.set(count);
            println!(
                "✓ page {} loaded: {} items accumulated",
                pager_for_observer.current_page(),
                count
            );
        }
    });

    pager.request_initial_load();

    let mut frames = 0u32;
    let mut footer_was_visible = false;
    while !pager.is_exhausted() {
        let layout = list.frame();
        for index in layout.window.clone() {
            state.record_item_height(index, item_height(index));
        }
        state.scroll_by(SCROLL_STEP);

        let footer_visible = list.footer().is_some();
        if footer_visible != footer_was_visible {
            println!(
                "  footer {}",
                if footer_visible { "spinner on" } else { "spinner off" }
            );
            footer_was_visible = footer_visible;
        }

        scheduler.advance(FRAME);
        frames += 1;
        if frames > 1_000_000 {
            log::error!("demo never reached the end of the feed");
            break;
        }
    }
    scheduler.run_until_idle();

    let final_layout = list.frame();
    println!(
        "✓ feed exhausted: {} items over {} pages",
        pager.item_count(),
        pager.current_page()
    );
    println!(
        "✓ final layout: window {:?}, content height {:.0}px, average row {:.1}px",
        final_layout.window,
        final_layout.content_height,
        state.average_item_height()
    );
    println!(
        "✓ {} frames ({:?} of virtual time) simulated in {:?} wall time",
        frames,
        scheduler.now(),
        started.elapsed()
    );
}
