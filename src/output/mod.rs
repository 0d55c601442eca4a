//! Output formatting module
//!
//! Console report, banner and leak-check lines.

mod formatter;

pub use formatter::{format_banner, format_leak, TextReporter};
