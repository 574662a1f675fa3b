//! Error types for the CLI.
//!
//! Fatal errors are folded into [`CliError`] and abort the run. Problems with
//! a single directory entry that merely disqualify it as a module source are
//! [`LoadError`]s; the resolver records them and carries on.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// Main error type for CLI operations.
#[derive(Debug, Error)]
pub enum CliError {
    /// Error while listing the module directory.
    #[error("Failed to discover modules: {0}")]
    Discovery(#[from] DiscoveryError),

    /// Error while resolving module identities.
    #[error("Failed to resolve modules: {0}")]
    Identity(#[from] IdentityError),

    /// Error while building the schema registry or rendering it.
    #[error("Schema error: {0}")]
    Schema(#[from] schemagen::SchemaError),

    /// Error during declaration generation.
    #[error("Failed to generate declarations: {0}")]
    Generate(#[from] GenerateError),

    /// Error loading configuration.
    #[error("Failed to load configuration: {0}")]
    Config(#[from] ConfigError),

    /// Error writing output files.
    #[error("Failed to write output: {0}")]
    Write(#[from] WriteError),

    /// Error during file watching.
    #[error("Watch error: {0}")]
    Watch(#[from] WatchError),

    /// Generated files are out of date.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Generic IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error while listing the module directory.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// Directory does not exist.
    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// Error from the directory walker.
    #[error("Walk error: {0}")]
    Walk(#[from] ignore::Error),
}

/// Fatal error while resolving module identities.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// A single-file module source does not follow the naming convention.
    #[error("Malformed module name '{entry}': expected '<name>.{suffix}'")]
    MalformedModuleName { entry: String, suffix: String },

    /// Two module sources declare the same canonical name.
    #[error("Module name '{name}' is declared by both {} and {}", .first.display(), .second.display())]
    DuplicateModuleName {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },

    /// Two module sources would generate the same output file.
    #[error("Modules at {} and {} both generate '{file}'", .first.display(), .second.display())]
    DuplicateOutput {
        file: String,
        first: PathBuf,
        second: PathBuf,
    },
}

/// Reason a directory entry is not a loadable module source.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Neither a `.<suffix>` file nor a directory.
    #[error("not a module source")]
    NotAModuleSource,

    /// Directory without an index manifest.
    #[error("directory has no {index_file}")]
    MissingIndex { index_file: String },

    /// Manifest does not describe a module.
    #[error("invalid module manifest {}: {message}", .path.display())]
    InvalidManifest { path: PathBuf, message: String },

    /// Manifest could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Error during declaration generation.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// A registered module has no discovered source.
    #[error("No module source resolved for module '{module}'")]
    MissingModuleInfo { module: String },
}

/// Error loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file not found.
    #[error("Configuration file not found: {path}")]
    NotFound { path: PathBuf },

    /// Invalid TOML syntax.
    #[error("Invalid TOML in {path}: {message}")]
    InvalidToml { path: PathBuf, message: String },

    /// IO error reading config.
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Error writing output files.
#[derive(Debug, Error)]
pub enum WriteError {
    /// Failed to create directory.
    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write file.
    #[error("Failed to write file {path}: {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Error during file watching.
#[derive(Debug, Error)]
pub enum WatchError {
    /// Failed to initialize watcher.
    #[error("Failed to initialize file watcher: {0}")]
    Init(String),
}

impl DiscoveryError {
    /// Create a directory not found error.
    pub fn not_found(path: PathBuf) -> Self {
        Self::DirectoryNotFound { path }
    }
}

impl IdentityError {
    /// Create a malformed module name error.
    pub fn malformed(entry: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self::MalformedModuleName {
            entry: entry.into(),
            suffix: suffix.into(),
        }
    }
}

impl ConfigError {
    /// Create a not found error.
    pub fn not_found(path: PathBuf) -> Self {
        Self::NotFound { path }
    }

    /// Create an invalid TOML error.
    pub fn invalid_toml(path: PathBuf, message: impl Into<String>) -> Self {
        Self::InvalidToml {
            path,
            message: message.into(),
        }
    }
}
