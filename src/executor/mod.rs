//! Test execution engine
//!
//! Provides single-run execution and the leak-check loop.

mod leaks;
mod runner;

#[cfg_attr(not(feature = "refcount"), allow(unused_imports))]
pub use leaks::CountingAllocator;
pub use leaks::{run_leak_check, system_counter, AllocationCounter};
pub use runner::TestRunner;
