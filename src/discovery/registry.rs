//! Test module registry
//!
//! Modules are registered by name with a constructor; loading a module by
//! name is a table lookup.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::models::{TestCase, TestFn};

/// Identity of the package under test, shown on the banner
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackageInfo {
    pub name: String,
    pub path: PathBuf,
}

impl PackageInfo {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

/// A named group of cases, the analogue of a test class
#[derive(Clone, Debug)]
pub struct TestGroup {
    pub name: String,
    cases: Vec<(String, TestFn)>,
}

impl TestGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cases: Vec::new(),
        }
    }

    pub fn case(mut self, name: impl Into<String>, func: TestFn) -> Self {
        self.cases.push((name.into(), func));
        self
    }

    fn build(&self, module: &str) -> Vec<TestCase> {
        self.cases
            .iter()
            .map(|(name, func)| TestCase::new(module, &self.name, name, *func))
            .collect()
    }
}

/// A loaded test module
#[derive(Clone, Debug)]
pub struct TestModule {
    pub name: String,
    groups: Vec<TestGroup>,
}

impl TestModule {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            groups: Vec::new(),
        }
    }

    pub fn group(mut self, group: TestGroup) -> Self {
        self.groups.push(group);
        self
    }

    /// Every case in registration order
    pub fn all_cases(&self) -> Vec<TestCase> {
        self.groups
            .iter()
            .flat_map(|group| group.build(&self.name))
            .collect()
    }

    /// Resolve `Group` or `Group.case` relative to this module
    pub fn select(&self, selector: &str) -> Option<Vec<TestCase>> {
        let (group_name, case_name) = match selector.split_once('.') {
            Some((group, case)) => (group, Some(case)),
            None => (selector, None),
        };

        let group = self.groups.iter().find(|g| g.name == group_name)?;
        let cases = group.build(&self.name);

        match case_name {
            None => Some(cases),
            Some(name) => cases
                .into_iter()
                .find(|case| case.name == name)
                .map(|case| vec![case]),
        }
    }
}

/// Constructor registered for a module name
pub type ModuleCtor = fn() -> TestModule;

/// Lookup table of test modules available to the harness
#[derive(Clone, Debug)]
pub struct Registry {
    package: PackageInfo,
    modules: BTreeMap<String, ModuleCtor>,
}

impl Registry {
    pub fn new(package: PackageInfo) -> Self {
        Self {
            package,
            modules: BTreeMap::new(),
        }
    }

    pub fn register(mut self, name: impl Into<String>, ctor: ModuleCtor) -> Self {
        self.modules.insert(name.into(), ctor);
        self
    }

    pub fn package(&self) -> &PackageInfo {
        &self.package
    }

    /// Registered module names, sorted
    pub fn module_names(&self) -> Vec<String> {
        self.modules.keys().cloned().collect()
    }

    pub fn load(&self, name: &str) -> Option<TestModule> {
        self.modules.get(name).map(|ctor| ctor())
    }
}
