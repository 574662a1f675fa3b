//! Module identity resolution.
//!
//! Each discovered entry is loaded as a module manifest. Its canonical name
//! comes from the `name` the manifest declares, and keys a [`ModuleInfo`]
//! describing where the module lives and what its generated file is called.
//!
//! Entries that cannot be loaded as a module are skipped with a warning.
//! Naming-convention violations, duplicate canonical names and two sources
//! sharing a base name (and so an output file) are fatal.

use crate::error::{CliResult, IdentityError, LoadError};
use crate::scanner::ModuleEntry;
use schemagen::SchemaModule;
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

/// Where a module is defined and how its output is named.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleInfo {
    /// Path to the module source (file or directory).
    pub path: PathBuf,

    /// Entry name without the source suffix.
    pub base_name_without_ext: String,

    /// Whether the module is a single file rather than a directory with an
    /// index manifest.
    pub is_single_file: bool,
}

/// An entry excluded from the identity map.
#[derive(Debug)]
pub struct SkippedEntry {
    /// Diagnostic name of the entry.
    pub display_name: String,

    /// Why it was skipped.
    pub reason: LoadError,
}

/// Outcome of resolving all discovered entries.
#[derive(Debug, Default)]
pub struct ResolvedModules {
    /// Module info keyed by canonical module name.
    pub infos: BTreeMap<String, ModuleInfo>,

    /// Loaded modules, in discovery order.
    pub modules: Vec<SchemaModule>,

    /// Entries that were not modules.
    pub skipped: Vec<SkippedEntry>,
}

impl ResolvedModules {
    /// Look up module info by canonical name.
    pub fn info(&self, name: &str) -> Option<&ModuleInfo> {
        self.infos.get(name)
    }
}

/// Whether `name` follows the single-file convention `<stem>.<suffix>`.
pub fn is_single_file_source(name: &str, suffix: &str) -> bool {
    name.strip_suffix(suffix)
        .is_some_and(|rest| rest.ends_with('.'))
}

/// Strip `.<suffix>` from a single-file entry name.
///
/// `"foo-bar.ext"` with suffix `"ext"` resolves to `"foo-bar"`. Names without
/// the suffix or with nothing before it are malformed.
pub fn strip_source_suffix<'a>(name: &'a str, suffix: &str) -> Result<&'a str, IdentityError> {
    name.strip_suffix(suffix)
        .and_then(|rest| rest.strip_suffix('.'))
        .filter(|stem| !stem.is_empty())
        .ok_or_else(|| IdentityError::malformed(name, suffix))
}

/// A module loaded from one directory entry.
#[derive(Debug)]
pub struct LoadedModule {
    pub module: SchemaModule,
    pub info: ModuleInfo,
}

/// Loads module manifests from directory entries.
#[derive(Debug, Clone)]
pub struct ModuleLoader {
    suffix: String,
    index_file: String,
}

impl ModuleLoader {
    /// Create a loader for `<name>.<suffix>` files and `<dir>/<index_file>`
    /// directories.
    pub fn new(suffix: impl Into<String>, index_file: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
            index_file: index_file.into(),
        }
    }

    /// Load one entry.
    ///
    /// The outer error is fatal; the inner one means the entry is not a
    /// module and should be skipped.
    pub fn load(
        &self,
        entry: &ModuleEntry,
    ) -> Result<Result<LoadedModule, LoadError>, IdentityError> {
        let is_single_file = !entry.is_dir && is_single_file_source(&entry.file_name, &self.suffix);

        let (manifest_path, base_name) = if is_single_file {
            let stem = strip_source_suffix(&entry.file_name, &self.suffix)?;
            (entry.path.clone(), stem.to_string())
        } else if entry.is_dir {
            let index = entry.path.join(&self.index_file);
            if !index.is_file() {
                return Ok(Err(LoadError::MissingIndex {
                    index_file: self.index_file.clone(),
                }));
            }
            (index, entry.file_name.clone())
        } else {
            return Ok(Err(LoadError::NotAModuleSource));
        };

        Ok(read_manifest(manifest_path).map(|module| LoadedModule {
            module,
            info: ModuleInfo {
                path: entry.path.clone(),
                base_name_without_ext: base_name,
                is_single_file,
            },
        }))
    }
}

fn read_manifest(path: PathBuf) -> Result<SchemaModule, LoadError> {
    let content = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(source) => return Err(LoadError::Io { path, source }),
    };

    toml::from_str(&content).map_err(|e| LoadError::InvalidManifest {
        path,
        message: e.message().to_string(),
    })
}

/// Builds the canonical name → [`ModuleInfo`] map.
#[derive(Debug, Clone)]
pub struct IdentityResolver {
    loader: ModuleLoader,
}

impl IdentityResolver {
    /// Create a resolver using `loader`.
    pub fn new(loader: ModuleLoader) -> Self {
        Self { loader }
    }

    /// Resolve every entry.
    pub fn resolve<I>(&self, entries: I) -> CliResult<ResolvedModules>
    where
        I: IntoIterator<Item = CliResult<ModuleEntry>>,
    {
        let mut resolved = ResolvedModules::default();
        let mut base_names: HashMap<String, PathBuf> = HashMap::new();

        for entry in entries {
            let entry = entry?;

            let loaded = match self.loader.load(&entry)? {
                Ok(loaded) => loaded,
                Err(reason) => {
                    tracing::warn!(
                        entry = %entry.display_name,
                        reason = %reason,
                        "skipping non-module entry"
                    );
                    resolved.skipped.push(SkippedEntry {
                        display_name: entry.display_name,
                        reason,
                    });
                    continue;
                }
            };

            let name = loaded.module.name().to_string();
            if let Some(existing) = resolved.infos.get(&name) {
                return Err(IdentityError::DuplicateModuleName {
                    name,
                    first: existing.path.clone(),
                    second: loaded.info.path,
                }
                .into());
            }

            if let Some(existing) = base_names.get(&loaded.info.base_name_without_ext) {
                return Err(IdentityError::DuplicateOutput {
                    file: loaded.info.base_name_without_ext,
                    first: existing.clone(),
                    second: loaded.info.path,
                }
                .into());
            }
            base_names.insert(
                loaded.info.base_name_without_ext.clone(),
                loaded.info.path.clone(),
            );

            tracing::debug!(
                module = %name,
                base_name = %loaded.info.base_name_without_ext,
                single_file = loaded.info.is_single_file,
                "resolved module"
            );

            resolved.infos.insert(name, loaded.info);
            resolved.modules.push(loaded.module);
        }

        Ok(resolved)
    }
}
