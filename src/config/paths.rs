//! Module search path
//!
//! Builds the ordered lookup path and exports it to the process environment.

use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::models::Options;

/// Environment variable holding the joined search path
pub const SEARCH_PATH_VAR: &str = "RUNTESTS_PATH";

/// Ordered list of directories searched for test artifacts
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchPath {
    entries: Vec<PathBuf>,
}

impl SearchPath {
    #[cfg(test)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Search path inherited from `RUNTESTS_PATH`
    pub fn inherited() -> Self {
        let entries = env::var_os(SEARCH_PATH_VAR)
            .map(|value| {
                env::split_paths(&value)
                    .filter(|p| !p.as_os_str().is_empty())
                    .collect()
            })
            .unwrap_or_default();
        Self { entries }
    }

    #[cfg(test)]
    pub fn from_entries(entries: Vec<PathBuf>) -> Self {
        Self { entries }
    }

    /// Insert a directory in front of every other entry
    pub fn prepend(&mut self, dir: impl Into<PathBuf>) {
        self.entries.insert(0, dir.into());
    }

    #[cfg(test)]
    pub fn entries(&self) -> &[PathBuf] {
        &self.entries
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First entry containing `name`
    pub fn find(&self, name: impl AsRef<Path>) -> Option<PathBuf> {
        self.entries
            .iter()
            .map(|dir| dir.join(name.as_ref()))
            .find(|candidate| candidate.exists())
    }

    /// Joined form suitable for an environment variable
    pub fn joined(&self) -> Option<OsString> {
        env::join_paths(&self.entries).ok()
    }

    /// Export to `RUNTESTS_PATH`
    pub fn export(&self) {
        match self.joined() {
            Some(value) => env::set_var(SEARCH_PATH_VAR, value),
            None => debug!("Search path contains a separator, not exported"),
        }
    }
}

/// Prepend the build directory (when it exists) and then the `--path`
/// entries, so the first `--path` ends up searched first.
pub fn prepare_search_path(
    options: &Options,
    build_dir: Option<&Path>,
    mut search_path: SearchPath,
) -> SearchPath {
    if let Some(dir) = build_dir {
        if dir.exists() {
            debug!("Using build directory {}", dir.display());
            search_path.prepend(dir);
        }
    }

    for dir in options.path.iter().rev() {
        search_path.prepend(dir.clone());
    }

    search_path
}

/// Build the search path from the inherited one and export it
pub fn prepare_environment(options: &Options, build_dir: Option<&Path>) -> SearchPath {
    let search_path = prepare_search_path(options, build_dir, SearchPath::inherited());
    search_path.export();
    search_path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EnvBuilder;
    use tempfile::TempDir;

    fn options_with_paths(paths: &[&str]) -> Options {
        Options {
            path: paths.iter().map(PathBuf::from).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_paths_keep_command_line_order() {
        let options = options_with_paths(&["/a", "/b", "/c"]);
        let path = prepare_search_path(&options, None, SearchPath::new());
        assert_eq!(
            path.entries(),
            &[PathBuf::from("/a"), PathBuf::from("/b"), PathBuf::from("/c")]
        );
    }

    #[test]
    fn test_build_dir_after_paths_before_inherited() {
        let build = TempDir::new().unwrap();
        let options = options_with_paths(&["/first"]);
        let inherited = SearchPath::from_entries(vec![PathBuf::from("/inherited")]);

        let path = prepare_search_path(&options, Some(build.path()), inherited);
        assert_eq!(
            path.entries(),
            &[
                PathBuf::from("/first"),
                build.path().to_path_buf(),
                PathBuf::from("/inherited"),
            ]
        );
    }

    #[test]
    fn test_missing_build_dir_ignored() {
        let options = Options::default();
        let path = prepare_search_path(
            &options,
            Some(Path::new("/definitely/not/a/build/dir")),
            SearchPath::new(),
        );
        assert!(path.is_empty());
    }

    #[test]
    fn test_find_first_match() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        std::fs::write(second.path().join("libdemo.so"), b"").unwrap();
        std::fs::write(first.path().join("other"), b"").unwrap();

        let path = SearchPath::from_entries(vec![
            first.path().to_path_buf(),
            second.path().to_path_buf(),
        ]);
        assert_eq!(
            path.find("libdemo.so"),
            Some(second.path().join("libdemo.so"))
        );
        assert_eq!(path.find("missing"), None);
    }

    #[test]
    fn test_prepare_environment_exports_search_path() {
        let build = TempDir::new().unwrap();
        let inherited = env::join_paths(["/inherited/one", "/inherited/two"]).unwrap();
        let _guard = EnvBuilder::new()
            .var(SEARCH_PATH_VAR, inherited.into_string().unwrap())
            .apply_scoped();

        let options = options_with_paths(&["/first", "/second"]);
        let path = prepare_environment(&options, Some(build.path()));

        let expected = vec![
            PathBuf::from("/first"),
            PathBuf::from("/second"),
            build.path().to_path_buf(),
            PathBuf::from("/inherited/one"),
            PathBuf::from("/inherited/two"),
        ];
        assert_eq!(path.entries(), expected.as_slice());
        assert_eq!(
            env::var_os(SEARCH_PATH_VAR),
            Some(env::join_paths(&expected).unwrap())
        );
    }
}
