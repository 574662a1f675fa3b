//! Configuration management for the CLI.
//!
//! This module handles loading configuration from `schemagen.toml` files
//! and merging with command-line arguments.

use crate::error::{CliResult, ConfigError};
use schemagen::{AutoPkType, StorageConfig};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default configuration filename.
pub const CONFIG_FILENAME: &str = "schemagen.toml";

/// Main configuration structure.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where module sources are discovered.
    pub modules: ModulesConfig,

    /// Output configuration.
    pub output: OutputConfig,

    /// Declaration rendering options.
    pub generation: GenerationConfig,

    /// Storage handle options.
    pub storage: StorageConfig,
}

/// Module discovery configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModulesConfig {
    /// Directory holding one entry per module.
    pub dir: PathBuf,

    /// Suffix of single-file module sources, without the dot.
    pub suffix: String,

    /// Manifest file inside a directory-backed module.
    pub index_file: String,

    /// Whether to skip entries matched by `.gitignore` files.
    pub respect_gitignore: bool,
}

/// Output configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output directory for generated files.
    pub dir: PathBuf,

    /// Extension of generated files and of import paths, without the dot.
    pub extension: String,

    /// Whether to generate doc comments from descriptions.
    pub generate_docs: bool,
}

/// Declaration rendering configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Primary key typing policy.
    pub auto_pk_type: AutoPkType,
}

impl Default for ModulesConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("./src/storage/modules"),
            suffix: "toml".to_string(),
            index_file: "index.toml".to_string(),
            respect_gitignore: false,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("./src/types/generated"),
            extension: "ts".to_string(),
            generate_docs: true,
        }
    }
}

/// Configuration manager for loading and merging configs.
pub struct ConfigManager;

impl ConfigManager {
    /// Load configuration from a file path.
    ///
    /// Without an explicit path the default location is tried, and a missing
    /// default file yields the default configuration. An explicit path must
    /// exist.
    pub fn load(path: Option<&Path>) -> CliResult<Config> {
        let config_path = match path {
            Some(path) if !path.exists() => {
                return Err(ConfigError::not_found(path.to_path_buf()).into());
            }
            Some(path) => path.to_path_buf(),
            None => PathBuf::from(CONFIG_FILENAME),
        };

        if !config_path.exists() {
            tracing::debug!("no {} found, using defaults", CONFIG_FILENAME);
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(&config_path).map_err(|e| ConfigError::Io {
            path: config_path.clone(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| ConfigError::invalid_toml(config_path.clone(), e.to_string()))?;

        tracing::debug!(path = %config_path.display(), "loaded configuration");
        Ok(config)
    }

    /// Merge CLI arguments into configuration.
    ///
    /// CLI arguments take precedence over config file values.
    pub fn merge_cli_args(mut config: Config, args: &CliArgs) -> Config {
        if let Some(ref modules) = args.modules {
            config.modules.dir = modules.clone();
        }

        if let Some(ref output) = args.output {
            config.output.dir = output.clone();
        }

        if let Some(auto_pk_type) = args.auto_pk_type {
            config.generation.auto_pk_type = auto_pk_type;
        }

        config
    }

    /// Generate default configuration file content with comments.
    pub fn default_config_content() -> &'static str {
        r#"# schemagen configuration file

[modules]
# Directory containing one entry per storage module
dir = "./src/storage/modules"

# Suffix of single-file module manifests
suffix = "toml"

# Manifest file of a directory-backed module
index_file = "index.toml"

# Skip entries ignored by .gitignore
respect_gitignore = false

[output]
# Output directory for generated TypeScript files (one file per module)
dir = "./src/types/generated"

# Extension of generated files and of generated import paths
extension = "ts"

# Whether to generate doc comments from collection and field descriptions
generate_docs = true

[generation]
# Primary key typing: "generic" (type parameter), "number" or "string"
auto_pk_type = "generic"

[storage]
# Only the in-memory backend is supported
backend = "memory"
"#
    }
}

/// CLI arguments that can override configuration.
#[derive(Debug, Default)]
pub struct CliArgs {
    /// Module directory override.
    pub modules: Option<PathBuf>,

    /// Output directory override.
    pub output: Option<PathBuf>,

    /// Primary key typing override.
    pub auto_pk_type: Option<AutoPkType>,
}
