//! CLI argument parsing
//!
//! Defines command-line interface using clap.

use clap::Parser;
use std::path::PathBuf;

use crate::models::{Options, ThreadLevel, Verbosity};

/// Test-runner harness for message-passing runtime bindings
#[derive(Parser, Debug)]
#[command(name = "runtests")]
#[command(version)]
#[command(about = "Discover, filter and run the runtime binding test suite")]
#[command(long_about = None)]
#[command(args_override_self = true)]
pub struct Args {
    /// Do not print status messages
    #[arg(short, long, overrides_with = "verbose")]
    pub quiet: bool,

    /// Print status messages for every test
    #[arg(short, long, overrides_with = "quiet")]
    pub verbose: bool,

    /// Include tests matching PATTERN
    #[arg(short, long, value_name = "PATTERN")]
    pub include: Vec<String>,

    /// Exclude tests matching PATTERN
    #[arg(short, long, value_name = "PATTERN")]
    pub exclude: Vec<String>,

    /// Prepend PATH to the module search path
    #[arg(long, value_name = "PATH")]
    pub path: Vec<PathBuf>,

    /// Run tests REPEAT times in a loop to catch leaks
    #[arg(long = "refleaks", value_name = "REPEAT", default_value_t = 3)]
    pub repeats: u32,

    /// Initialize the runtime without thread support
    #[arg(long)]
    pub no_threads: bool,

    /// Initialize the runtime with required thread support
    #[arg(long, value_enum, default_value_t = ThreadLevel::Multiple)]
    pub thread_level: ThreadLevel,

    /// Use MPE for runtime profiling
    #[arg(long)]
    pub mpe: bool,

    /// Restrict execution to these tests (`Group` or `Group.case`)
    #[arg(value_name = "TEST")]
    pub tests: Vec<String>,
}

impl Args {
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else if self.verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        }
    }

    /// Split into the option snapshot and the positional test selectors
    pub fn into_parts(self) -> (Options, Vec<String>) {
        let options = Options {
            verbosity: self.verbosity(),
            include: self.include.into_iter().collect(),
            exclude: self.exclude.into_iter().collect(),
            path: self.path,
            repeats: self.repeats,
            threaded: !self.no_threads,
            thread_level: self.thread_level,
            mpe: self.mpe,
        };
        (options, self.tests)
    }
}

/// Parse options from an argument vector (program name first)
pub fn parse_options<I, T>(argv: I) -> Result<(Options, Vec<String>), clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Args::try_parse_from(argv).map(Args::into_parts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn test_defaults() {
        let (options, tests) = parse_options(["runtests"]).unwrap();
        assert_eq!(options, Options::default());
        assert!(tests.is_empty());
    }

    #[test]
    fn test_full_command_line() {
        let (options, tests) = parse_options([
            "runtests",
            "-v",
            "-i",
            "comm",
            "--include",
            "test_group",
            "-e",
            "spawn",
            "--path",
            "/opt/a",
            "--path",
            "/opt/b",
            "--refleaks",
            "0",
            "--no-threads",
            "--thread-level",
            "funneled",
            "--mpe",
            "TestCommWorld",
            "TestGroup.testSize",
        ])
        .unwrap();

        assert_eq!(options.verbosity, Verbosity::Verbose);
        assert!(options.include.contains("comm"));
        assert!(options.include.contains("test_group"));
        assert!(options.exclude.contains("spawn"));
        assert_eq!(
            options.path,
            vec![PathBuf::from("/opt/a"), PathBuf::from("/opt/b")]
        );
        assert_eq!(options.repeats, 0);
        assert!(!options.threaded);
        assert_eq!(options.thread_level, ThreadLevel::Funneled);
        assert!(options.mpe);
        assert_eq!(tests, vec!["TestCommWorld", "TestGroup.testSize"]);
    }

    #[test]
    fn test_last_verbosity_flag_wins() {
        let (options, _) = parse_options(["runtests", "-v", "-q"]).unwrap();
        assert_eq!(options.verbosity, Verbosity::Quiet);

        let (options, _) = parse_options(["runtests", "-q", "-v"]).unwrap();
        assert_eq!(options.verbosity, Verbosity::Verbose);
    }

    #[test]
    fn test_repeated_flags_keep_last_value() {
        let (options, _) = parse_options(["runtests", "-v", "-v"]).unwrap();
        assert_eq!(options.verbosity, Verbosity::Verbose);

        let (options, _) = parse_options(["runtests", "--mpe", "--mpe"]).unwrap();
        assert!(options.mpe);

        let (options, _) =
            parse_options(["runtests", "--no-threads", "--no-threads"]).unwrap();
        assert!(!options.threaded);

        let (options, _) = parse_options([
            "runtests",
            "--thread-level",
            "single",
            "--thread-level",
            "funneled",
        ])
        .unwrap();
        assert_eq!(options.thread_level, ThreadLevel::Funneled);

        let (options, _) =
            parse_options(["runtests", "--refleaks", "1", "--refleaks", "2"]).unwrap();
        assert_eq!(options.repeats, 2);
    }

    #[test]
    fn test_repeated_lists_accumulate() {
        let (options, _) =
            parse_options(["runtests", "-i", "comm", "-i", "group", "--path", "/a", "--path", "/b"])
                .unwrap();
        assert_eq!(options.include.len(), 2);
        assert_eq!(options.path.len(), 2);
    }

    #[test]
    fn test_unknown_thread_level_rejected() {
        let err = parse_options(["runtests", "--thread-level", "many"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidValue);
    }

    #[test]
    fn test_negative_refleaks_rejected() {
        assert!(parse_options(["runtests", "--refleaks", "-1"]).is_err());
        assert!(parse_options(["runtests", "--refleaks", "three"]).is_err());
    }

    #[test]
    fn test_unknown_flag_rejected() {
        let err = parse_options(["runtests", "--bogus"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
    }
}
