//! Module discovery.
//!
//! Lists the entries directly inside the module directory. Nothing is
//! filtered here beyond optional `.gitignore` support; deciding whether an
//! entry is a module source is left to the identity resolver.

use crate::error::{CliResult, DiscoveryError};
use ignore::{Walk, WalkBuilder};
use std::path::{Path, PathBuf};

/// One entry of the module directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleEntry {
    /// Full path to the entry.
    pub path: PathBuf,

    /// Entry name inside the module directory.
    pub file_name: String,

    /// Name used in diagnostics, `<module dir>/<file name>`.
    pub display_name: String,

    /// Whether the entry is a directory.
    pub is_dir: bool,
}

/// Scanner for the module directory.
#[derive(Debug)]
pub struct ModuleScanner {
    /// Directory to list.
    root: PathBuf,

    /// Whether to respect .gitignore files.
    respect_gitignore: bool,
}

impl ModuleScanner {
    /// Create a new scanner for the given directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            respect_gitignore: false,
        }
    }

    /// Set whether to respect .gitignore files.
    pub fn with_gitignore(mut self, respect: bool) -> Self {
        self.respect_gitignore = respect;
        self
    }

    /// List the directory.
    ///
    /// Fails up front when the directory does not exist; entries are then
    /// produced lazily, ordered by file name.
    pub fn scan(&self) -> CliResult<ModuleEntries> {
        if !self.root.is_dir() {
            return Err(DiscoveryError::not_found(self.root.clone()).into());
        }

        let walk = WalkBuilder::new(&self.root)
            .standard_filters(false)
            .git_ignore(self.respect_gitignore)
            .git_exclude(self.respect_gitignore)
            .require_git(false)
            .max_depth(Some(1))
            .sort_by_file_name(|a, b| a.cmp(b))
            .build();

        let root_name = self
            .root
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.root.display().to_string());

        Ok(ModuleEntries { walk, root_name })
    }

    /// List the directory eagerly.
    pub fn scan_all(&self) -> CliResult<Vec<ModuleEntry>> {
        self.scan()?.collect()
    }

    /// Get the directory being scanned.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Lazy sequence of module directory entries.
pub struct ModuleEntries {
    walk: Walk,
    root_name: String,
}

impl Iterator for ModuleEntries {
    type Item = CliResult<ModuleEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.walk.next()? {
                Ok(entry) => entry,
                Err(e) => return Some(Err(DiscoveryError::Walk(e).into())),
            };

            // The walk yields the root itself first
            if entry.depth() == 0 {
                continue;
            }

            let file_name = entry.file_name().to_string_lossy().into_owned();
            let is_dir = entry.path().is_dir();

            return Some(Ok(ModuleEntry {
                display_name: format!("{}/{}", self.root_name, file_name),
                path: entry.into_path(),
                file_name,
                is_dir,
            }));
        }
    }
}
