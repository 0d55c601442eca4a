//! Test discovery
//!
//! Finds candidate modules, applies include/exclude filters and collects
//! cases into a suite.

use std::path::Path;
use tracing::{debug, info};

use super::registry::Registry;
use super::DiscoveryError;
use crate::models::{Options, TestSuite};

/// File and module naming convention
pub const TEST_PREFIX: &str = "test_";

/// Extension of test module sources in a test directory
pub const TEST_EXTENSION: &str = "rs";

/// Whether a module name follows the `test_*` convention
pub fn is_test_module(name: &str) -> bool {
    name.starts_with(TEST_PREFIX)
}

/// Module names from `test_*` files in `dir`, sorted
pub fn scan_test_dir(dir: &Path) -> Result<Vec<String>, DiscoveryError> {
    let entries = std::fs::read_dir(dir).map_err(|source| DiscoveryError::ReadDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| DiscoveryError::ReadDir {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if path.extension().and_then(|e| e.to_str()) != Some(TEST_EXTENSION) {
            continue;
        }
        let stem = match path.file_stem().and_then(|s| s.to_str()) {
            Some(stem) => stem,
            None => continue,
        };
        if is_test_module(stem) {
            names.push(stem.to_string());
        }
    }

    names.sort();
    names.dedup();
    Ok(names)
}

/// Candidate module names, from the test directory when configured and
/// otherwise from the registry
pub fn candidate_modules(
    registry: &Registry,
    test_dir: Option<&Path>,
) -> Result<Vec<String>, DiscoveryError> {
    let mut names = match test_dir {
        Some(dir) => scan_test_dir(dir)?,
        None => registry.module_names(),
    };
    names.retain(|name| is_test_module(name));
    names.sort();
    Ok(names)
}

/// Include/exclude decision for one module. Exclude wins; an empty
/// include set admits everything.
pub fn module_selected(options: &Options, modname: &str) -> bool {
    let testname = modname.strip_prefix(TEST_PREFIX).unwrap_or(modname);

    if options.exclude.contains(modname) || options.exclude.contains(testname) {
        return false;
    }
    if !options.include.is_empty()
        && !(options.include.contains(modname) || options.include.contains(testname))
    {
        return false;
    }
    true
}

/// Build the suite for this run
pub fn discover_tests(
    registry: &Registry,
    options: &Options,
    args: &[String],
    test_dir: Option<&Path>,
) -> Result<TestSuite, DiscoveryError> {
    let mut suite = TestSuite::new();

    for modname in candidate_modules(registry, test_dir)? {
        if !module_selected(options, &modname) {
            debug!("Skipping module {}", modname);
            continue;
        }

        let module = registry
            .load(&modname)
            .ok_or_else(|| DiscoveryError::ModuleNotFound(modname.clone()))?;

        let before = suite.len();
        if args.is_empty() {
            suite.add_tests(module.all_cases());
        } else {
            for arg in args {
                match module.select(arg) {
                    Some(cases) => suite.add_tests(cases),
                    None => debug!("{} has no test named {}", modname, arg),
                }
            }
        }
        debug!("Loaded {} case(s) from {}", suite.len() - before, modname);
    }

    if suite.is_empty() {
        info!("No test cases selected");
    } else {
        info!("Discovered {} test case(s)", suite.len());
    }
    Ok(suite)
}
