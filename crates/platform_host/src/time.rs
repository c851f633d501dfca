//! Deletion stamps for recycle-bin items.
//!
//! Items are listed in the order they were deleted, so stamps handed out on one thread never
//! repeat or go backwards, even across a clock step.

use std::cell::Cell;

thread_local! {
    static LAST_DELETION_STAMP_MS: Cell<u64> = const { Cell::new(0) };
}

/// Wall-clock unix time in milliseconds. A clock set before the epoch reads as `0`.
pub fn wall_clock_ms() -> u64 {
    #[cfg(target_arch = "wasm32")]
    {
        js_sys::Date::now().max(0.0) as u64
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map_or(0, |elapsed| elapsed.as_millis() as u64)
    }
}

/// Stamp for an item deleted now: the wall clock, bumped past the previous stamp if needed.
pub fn next_deletion_stamp_ms() -> u64 {
    let now = wall_clock_ms();
    LAST_DELETION_STAMP_MS.with(|last| {
        let stamp = stamp_after(last.get(), now);
        last.set(stamp);
        stamp
    })
}

fn stamp_after(previous: u64, now: u64) -> u64 {
    now.max(previous.saturating_add(1))
}
