//! # schemagen-cli
//!
//! CLI library for generating TypeScript declarations from storage module
//! manifests.
//!
//! A regeneration pass lists the module directory, resolves every entry to
//! a canonical module name, registers all modules in one shared storage
//! registry and then writes one declaration file per module.
//!
//! ## Architecture
//!
//! - [`config`] - Configuration management and TOML parsing
//! - [`scanner`] - Module directory listing
//! - [`identity`] - Manifest loading and canonical name resolution
//! - [`generator`] - Per-module declaration files
//! - [`writer`] - File output and dry-run support
//! - [`pipeline`] - One full regeneration pass
//! - [`watcher`] - File system watching for development mode
//! - [`error`] - Error types and handling

pub mod config;
pub mod error;
pub mod generator;
pub mod identity;
pub mod pipeline;
pub mod scanner;
pub mod watcher;
pub mod writer;

pub use config::{Config, ConfigManager};
pub use error::{CliError, CliResult};
pub use generator::{GeneratedOutput, ModuleGenerator};
pub use identity::{IdentityResolver, ModuleInfo, ModuleLoader, ResolvedModules, SkippedEntry};
pub use pipeline::{CheckReport, Pipeline, RunSummary};
pub use scanner::{ModuleEntry, ModuleScanner};
pub use watcher::{ModuleWatcher, WatchEvent};
pub use writer::{OutputWriter, WriteResult};
