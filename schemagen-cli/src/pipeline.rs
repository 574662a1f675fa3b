//! One full regeneration pass.
//!
//! Discovery, identity resolution, storage construction, generation and
//! writing run strictly in sequence. The registry is complete before the
//! first module is rendered.

use crate::config::Config;
use crate::error::{CliResult, GenerateError};
use crate::generator::{GeneratedOutput, ModuleGenerator};
use crate::identity::{IdentityResolver, ModuleLoader, ResolvedModules, SkippedEntry};
use crate::scanner::ModuleScanner;
use crate::writer::{OutputWriter, WriteResult};
use schemagen::{create_storage, Storage};
use std::path::PathBuf;

/// Outcome of a regeneration pass.
#[derive(Debug)]
pub struct RunSummary {
    /// One result per module, in registration order.
    pub written: Vec<WriteResult>,

    /// Entries of the module directory that were not modules.
    pub skipped: Vec<SkippedEntry>,

    /// Whether the output directory had to be created.
    pub created_output_dir: bool,
}

/// Output files that no longer match their modules.
#[derive(Debug, Default)]
pub struct CheckReport {
    /// Files that are missing or differ from freshly generated content.
    pub stale: Vec<PathBuf>,

    /// Number of files compared.
    pub checked: usize,
}

impl CheckReport {
    /// Whether every output is current.
    pub fn is_up_to_date(&self) -> bool {
        self.stale.is_empty()
    }
}

/// Regeneration driver.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: Config,
}

struct Rendered {
    outputs: Vec<GeneratedOutput>,
    skipped: Vec<SkippedEntry>,
}

impl Pipeline {
    /// Create a pipeline for `config`.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Get the configuration in use.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Regenerate every module's declaration file.
    ///
    /// A failure aborts the pass; files already written stay in place.
    pub fn run(&self, dry_run: bool) -> CliResult<RunSummary> {
        let Rendered { outputs, skipped } = self.render()?;

        let writer = OutputWriter::new(&self.config.output.dir, dry_run);
        let created_output_dir = writer.ensure_root()?;

        let written = outputs
            .iter()
            .map(|output| writer.write(output))
            .collect::<CliResult<Vec<_>>>()?;

        tracing::info!(
            modules = written.len(),
            skipped = skipped.len(),
            dry_run,
            "regeneration finished"
        );

        Ok(RunSummary {
            written,
            skipped,
            created_output_dir,
        })
    }

    /// Generate every module's output without writing anything.
    pub fn render_all(&self) -> CliResult<Vec<GeneratedOutput>> {
        Ok(self.render()?.outputs)
    }

    /// Compare the output directory against freshly generated content.
    pub fn check(&self) -> CliResult<CheckReport> {
        let outputs = self.render_all()?;
        let writer = OutputWriter::new(&self.config.output.dir, true);

        let mut report = CheckReport::default();
        for output in &outputs {
            let path = writer.path_for(output);
            report.checked += 1;

            let current = match std::fs::read(&path) {
                Ok(bytes) => Some(bytes),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
                Err(e) => return Err(e.into()),
            };

            if current.as_deref() != Some(output.content.as_bytes()) {
                tracing::debug!(path = %path.display(), "stale output");
                report.stale.push(path);
            }
        }

        Ok(report)
    }

    fn resolve(&self) -> CliResult<ResolvedModules> {
        let modules = &self.config.modules;

        let entries = ModuleScanner::new(&modules.dir)
            .with_gitignore(modules.respect_gitignore)
            .scan()?;

        let loader = ModuleLoader::new(&modules.suffix, &modules.index_file);
        IdentityResolver::new(loader).resolve(entries)
    }

    fn render(&self) -> CliResult<Rendered> {
        let ResolvedModules {
            infos,
            modules,
            skipped,
        } = self.resolve()?;

        let storage: Storage = create_storage(self.config.storage.clone(), modules)?;
        tracing::debug!(
            modules = infos.len(),
            collections = storage.registry().len(),
            "storage ready"
        );

        let generator = ModuleGenerator::new(self.config.generation.clone(), &self.config.output);

        let outputs = storage
            .modules()
            .map(|(name, module)| {
                let info = infos
                    .get(name)
                    .ok_or_else(|| GenerateError::MissingModuleInfo {
                        module: name.to_string(),
                    })?;
                generator.generate(module, info, storage.registry())
            })
            .collect::<CliResult<Vec<_>>>()?;

        Ok(Rendered { outputs, skipped })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use std::fs;
    use tempfile::TempDir;

    fn project(files: &[(&str, &str)]) -> (TempDir, Config) {
        let dir = TempDir::new().unwrap();
        let modules = dir.path().join("modules");
        fs::create_dir(&modules).unwrap();
        for (name, content) in files {
            fs::write(modules.join(name), content).unwrap();
        }

        let mut config = Config::default();
        config.modules.dir = modules;
        config.output.dir = dir.path().join("generated");
        (dir, config)
    }

    #[test]
    fn test_run_writes_one_file_per_module() {
        let (_dir, config) = project(&[
            ("a.toml", "name = \"AModule\"\n[[collections]]\nname = \"alpha\"\n"),
            ("b.toml", "name = \"BModule\"\n[[collections]]\nname = \"beta\"\n"),
        ]);

        let summary = Pipeline::new(config.clone()).run(false).unwrap();

        assert!(summary.created_output_dir);
        assert_eq!(summary.written.len(), 2);
        assert!(config.output.dir.join("a.ts").is_file());
        assert!(config.output.dir.join("b.ts").is_file());
    }

    #[test]
    fn test_run_dry_run_writes_nothing() {
        let (_dir, config) = project(&[("a.toml", "name = \"AModule\"\n")]);

        let summary = Pipeline::new(config.clone()).run(true).unwrap();

        assert!(!summary.created_output_dir);
        assert!(summary.written.iter().all(|r| !r.was_written()));
        assert!(!config.output.dir.exists());
    }

    #[test]
    fn test_unknown_relationship_target_fails() {
        let (_dir, config) = project(&[(
            "a.toml",
            r#"
name = "AModule"

[[collections]]
name = "alpha"

[[collections.relationships]]
type = "child_of"
collection = "ghost"
"#,
        )]);

        let result = Pipeline::new(config.clone()).run(false);

        assert!(matches!(result, Err(CliError::Schema(_))));
        assert!(!config.output.dir.exists());
    }

    #[test]
    fn test_check_reports_missing_and_changed_files() {
        let (_dir, config) = project(&[
            ("a.toml", "name = \"AModule\"\n"),
            ("b.toml", "name = \"BModule\"\n"),
        ]);
        let pipeline = Pipeline::new(config.clone());

        let report = pipeline.check().unwrap();
        assert_eq!(report.checked, 2);
        assert_eq!(report.stale.len(), 2);

        pipeline.run(false).unwrap();
        assert!(pipeline.check().unwrap().is_up_to_date());

        fs::write(config.output.dir.join("b.ts"), "// edited\n").unwrap();
        let report = pipeline.check().unwrap();
        assert_eq!(report.stale, vec![config.output.dir.join("b.ts")]);
    }

    #[test]
    fn test_missing_module_directory() {
        let (dir, mut config) = project(&[]);
        config.modules.dir = dir.path().join("nope");

        let result = Pipeline::new(config).render_all();

        assert!(matches!(result, Err(CliError::Discovery(_))));
    }
}
