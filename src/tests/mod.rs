//! Built-in test modules
//!
//! Self-tests for the local runtime, registered by name at startup.


use crate::discovery::{PackageInfo, Registry};

/// Registry holding every built-in module for `package`
pub fn builtin_registry(package: &str) -> Registry {
    Registry::new(PackageInfo::new(package, env!("CARGO_MANIFEST_DIR")))
        .register("test_environ", environ::module)
        .register("test_path", path::module)
        .register("test_threads", threads::module)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EnvBuilder, SearchPath, SEARCH_PATH_VAR};
    use crate::discovery::discover_tests;
    use crate::executor::TestRunner;
    use crate::models::{
        Options, ProcessorInfo, ProfileConfig, RuntimeConfig, TestContext, TestStatus, ThreadLevel,
        Verbosity,
    };
    use crate::output::TextReporter;
    use std::path::PathBuf;

    fn run_builtin(processor: ProcessorInfo, runtime: RuntimeConfig) -> Vec<(String, TestStatus)> {
        let search_path = SearchPath::from_entries(vec![PathBuf::from("/opt/runtests/lib")]);
        let joined = search_path.joined().unwrap().into_string().unwrap();
        let _guard = EnvBuilder::new().var(SEARCH_PATH_VAR, joined).apply_scoped();

        let registry = builtin_registry("local");
        let suite = discover_tests(&registry, &Options::default(), &[], None).unwrap();
        let runner = TestRunner::new(TestContext::new(processor, runtime, search_path));
        let mut reporter = TextReporter::new(Vec::new(), Verbosity::Quiet);

        runner
            .run(&suite, &mut reporter, None)
            .unwrap()
            .results
            .into_iter()
            .map(|r| (r.id, r.status))
            .collect()
    }

    #[test]
    fn test_registry_contents() {
        let registry = builtin_registry("local");
        assert_eq!(
            registry.module_names(),
            vec!["test_environ", "test_path", "test_threads"]
        );
        assert_eq!(registry.package().name, "local");
    }

    #[test]
    fn test_builtin_suite_passes_multiple() {
        let processor = ProcessorInfo::new(1, 2, "node01").with_provided(ThreadLevel::Multiple);
        let results = run_builtin(processor, RuntimeConfig::default());

        assert!(results
            .iter()
            .all(|(_, status)| matches!(status, TestStatus::Pass | TestStatus::Skip)));
        assert!(results.contains(&(
            "test_threads.TestThreads.testWorkerThreads".to_string(),
            TestStatus::Pass
        )));
        assert!(results.contains(&(
            "test_environ.TestProfile.testHook".to_string(),
            TestStatus::Skip
        )));
    }

    #[test]
    fn test_builtin_suite_single_threaded_with_profile() {
        let processor = ProcessorInfo::new(0, 1, "node01");
        let runtime = RuntimeConfig::new(false, ThreadLevel::Multiple)
            .with_profile(ProfileConfig::mpe("runtests-local"));
        let results = run_builtin(processor, runtime);

        assert!(results.contains(&(
            "test_threads.TestThreads.testWorkerThreads".to_string(),
            TestStatus::Skip
        )));
        assert!(results.contains(&(
            "test_environ.TestProfile.testHook".to_string(),
            TestStatus::Pass
        )));
        assert!(!results
            .iter()
            .any(|(_, status)| matches!(status, TestStatus::Fail | TestStatus::Error)));
    }

    #[test]
    fn test_mismatched_level_fails() {
        let processor = ProcessorInfo::new(0, 1, "node01").with_provided(ThreadLevel::Single);
        let results = run_builtin(processor, RuntimeConfig::default());

        assert!(results.contains(&(
            "test_environ.TestEnviron.testThreadLevel".to_string(),
            TestStatus::Fail
        )));
    }
}
