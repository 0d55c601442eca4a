//! Leak checking
//!
//! Repeats the suite while sampling a process-wide allocation counter
//! around each run.

use std::alloc::{GlobalAlloc, Layout, System};
use std::io::{self, Write};
use std::sync::atomic::{AtomicI64, Ordering};
use tracing::{debug, info, warn};

use super::TestRunner;
use crate::models::{ProcessorInfo, TestSuite};
use crate::output::{format_leak, TextReporter};

/// Live heap blocks counted by `CountingAllocator`
static LIVE_BLOCKS: AtomicI64 = AtomicI64::new(0);

/// System allocator that keeps `LIVE_BLOCKS` current
#[cfg_attr(not(feature = "refcount"), allow(dead_code))]
pub struct CountingAllocator;

unsafe impl GlobalAlloc for CountingAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ptr = System.alloc(layout);
        if !ptr.is_null() {
            LIVE_BLOCKS.fetch_add(1, Ordering::Relaxed);
        }
        ptr
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        let ptr = System.alloc_zeroed(layout);
        if !ptr.is_null() {
            LIVE_BLOCKS.fetch_add(1, Ordering::Relaxed);
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout);
        LIVE_BLOCKS.fetch_sub(1, Ordering::Relaxed);
    }

    // A reallocated block is still one block
    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        System.realloc(ptr, layout, new_size)
    }
}

/// Source of the number sampled before and after each run
pub trait AllocationCounter {
    /// Release anything cached before a snapshot
    fn reclaim(&self) {}

    fn snapshot(&self) -> i64;
}

/// Reads the blocks tracked by `CountingAllocator`
pub struct LiveBlocks;

impl AllocationCounter for LiveBlocks {
    fn snapshot(&self) -> i64 {
        LIVE_BLOCKS.load(Ordering::SeqCst)
    }
}

/// The process counter, when the counting allocator is installed
pub fn system_counter() -> Option<&'static dyn AllocationCounter> {
    if cfg!(feature = "refcount") {
        Some(&LiveBlocks)
    } else {
        None
    }
}

/// One repetition of the leak check
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LeakSample {
    pub repetition: u32,
    pub before: i64,
    pub after: i64,
}

impl LeakSample {
    pub fn delta(&self) -> i64 {
        self.after - self.before
    }
}

/// Run the suite `repeats` times, reporting the counter delta after each
pub fn run_leak_check<W: Write>(
    runner: &TestRunner,
    suite: &TestSuite,
    reporter: &mut TextReporter<W>,
    counter: &dyn AllocationCounter,
    repeats: u32,
    processor: &ProcessorInfo,
) -> io::Result<Vec<LeakSample>> {
    let mut samples = Vec::with_capacity(repeats as usize);

    for repetition in 1..=repeats {
        counter.reclaim();
        let before = counter.snapshot();

        let run = runner.run(suite, reporter, None)?;
        drop(run);

        counter.reclaim();
        let after = counter.snapshot();

        reporter.writeln(&format_leak(processor, before, after))?;
        samples.push(LeakSample {
            repetition,
            before,
            after,
        });
    }

    let mut leaking = 0;
    for sample in samples.iter().filter(|s| s.delta() > 0) {
        debug!("Repetition {} grew by {}", sample.repetition, sample.delta());
        leaking += 1;
    }
    if leaking > 0 {
        warn!("{}/{} leak-check repetition(s) grew", leaking, samples.len());
    } else {
        info!("Leak check: {} repetition(s) stable", samples.len());
    }

    Ok(samples)
}
