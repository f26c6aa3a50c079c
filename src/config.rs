//! Process-wide (thread-local) switch controlling whether operations record
//! graph linkage when they run.
//!
//! Recording is on by default. Scoped overrides go through [`RecordingGuard`],
//! which restores the previous value when dropped, on every exit path
//! including unwinds.

use std::cell::Cell;

thread_local! {
    static ENABLE_BACKPROP: Cell<bool> = const { Cell::new(true) };
}

/// Returns whether operations currently record graph linkage.
pub fn is_recording() -> bool {
    ENABLE_BACKPROP.with(|flag| flag.get())
}

/// RAII guard holding a scoped override of the recording flag.
///
/// Created by [`scoped_recording`] or [`no_grad`]. The previous value is
/// restored when the guard is dropped.
#[must_use = "the override ends as soon as the guard is dropped"]
#[derive(Debug)]
pub struct RecordingGuard {
    prev: bool,
}

impl Drop for RecordingGuard {
    fn drop(&mut self) {
        ENABLE_BACKPROP.with(|flag| flag.set(self.prev));
    }
}

/// Sets the recording flag to `enabled` until the returned guard is dropped.
pub fn scoped_recording(enabled: bool) -> RecordingGuard {
    let prev = ENABLE_BACKPROP.with(|flag| flag.replace(enabled));
    RecordingGuard { prev }
}

/// Disables graph recording until the returned guard is dropped.
///
/// Used for inference and for long-running loops that never call backward:
/// with recording off, no operation stores any bookkeeping, so the graph
/// cannot grow.
pub fn no_grad() -> RecordingGuard {
    scoped_recording(false)
}
