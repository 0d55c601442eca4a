//! Utilities
//!
//! Logging setup and timing helpers.

mod logger;
mod timer;

pub use logger::init_logger;
pub use timer::Timer;
