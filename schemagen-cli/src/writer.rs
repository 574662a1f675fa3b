//! Output writer for generated declaration files.
//!
//! Every pass rewrites each module's file in full; nothing is merged with
//! previous content and nothing is rolled back when a later write fails.

use crate::error::{CliResult, WriteError};
use crate::generator::GeneratedOutput;
use std::path::{Path, PathBuf};

/// Result of a write operation.
#[derive(Debug)]
pub enum WriteResult {
    /// File was written successfully.
    Written {
        /// Path to the written file.
        path: PathBuf,
        /// Number of bytes written.
        bytes: usize,
    },
    /// Dry run - content was not written.
    DryRun {
        /// Content that would have been written.
        content: String,
        /// Path where content would have been written.
        path: PathBuf,
    },
}

/// Writes generated files into one output directory.
#[derive(Debug)]
pub struct OutputWriter {
    /// Output directory.
    root: PathBuf,

    /// Whether to run in dry-run mode.
    dry_run: bool,
}

impl OutputWriter {
    /// Create a writer for `root`.
    pub fn new(root: impl Into<PathBuf>, dry_run: bool) -> Self {
        Self {
            root: root.into(),
            dry_run,
        }
    }

    /// Create the output directory if it is missing.
    ///
    /// Returns whether the directory was created. Nothing happens in
    /// dry-run mode.
    pub fn ensure_root(&self) -> CliResult<bool> {
        if self.dry_run || self.root.is_dir() {
            return Ok(false);
        }

        std::fs::create_dir_all(&self.root).map_err(|e| WriteError::CreateDir {
            path: self.root.clone(),
            source: e,
        })?;

        tracing::info!(path = %self.root.display(), "created output directory");
        Ok(true)
    }

    /// Write one module's output, replacing any previous file.
    ///
    /// In dry-run mode, returns the content without writing.
    pub fn write(&self, output: &GeneratedOutput) -> CliResult<WriteResult> {
        let path = self.path_for(output);

        if self.dry_run {
            return Ok(WriteResult::DryRun {
                content: output.content.clone(),
                path,
            });
        }

        std::fs::write(&path, &output.content).map_err(|e| WriteError::WriteFile {
            path: path.clone(),
            source: e,
        })?;

        tracing::debug!(path = %path.display(), bytes = output.content.len(), "wrote module output");

        Ok(WriteResult::Written {
            path,
            bytes: output.content.len(),
        })
    }

    /// Destination path of an output.
    pub fn path_for(&self, output: &GeneratedOutput) -> PathBuf {
        self.root.join(&output.file_name)
    }

    /// Get the output directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Check if running in dry-run mode.
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }
}

impl WriteResult {
    /// Get the path associated with this result.
    pub fn path(&self) -> &Path {
        match self {
            WriteResult::Written { path, .. } => path,
            WriteResult::DryRun { path, .. } => path,
        }
    }

    /// Check if the write was successful (not dry-run).
    pub fn was_written(&self) -> bool {
        matches!(self, WriteResult::Written { .. })
    }

    /// Get the number of bytes written (0 for dry-run).
    pub fn bytes(&self) -> usize {
        match self {
            WriteResult::Written { bytes, .. } => *bytes,
            WriteResult::DryRun { .. } => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn output(file_name: &str, content: &str) -> GeneratedOutput {
        GeneratedOutput {
            module_name: "TestModule".to_string(),
            file_name: file_name.to_string(),
            content: content.to_string(),
            declarations: 1,
        }
    }

    #[test]
    fn test_write_file() {
        let dir = TempDir::new().unwrap();
        let content = "export interface Test {}\n";

        let writer = OutputWriter::new(dir.path(), false);
        let result = writer.write(&output("test.ts", content)).unwrap();

        let path = dir.path().join("test.ts");
        assert!(matches!(result, WriteResult::Written { .. }));
        assert_eq!(result.path(), path);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), content);
    }

    #[test]
    fn test_write_overwrites_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("test.ts");
        std::fs::write(&path, "a much longer stale declaration file\n").unwrap();

        let writer = OutputWriter::new(dir.path(), false);
        writer.write(&output("test.ts", "fresh\n")).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "fresh\n");
    }

    #[test]
    fn test_ensure_root_creates_directories() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("nested/types");

        let writer = OutputWriter::new(&root, false);
        assert!(writer.ensure_root().unwrap());
        assert!(root.is_dir());

        // Second call is a no-op
        assert!(!writer.ensure_root().unwrap());
    }

    #[test]
    fn test_dry_run_does_not_write() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("types");
        let content = "export interface Test {}\n";

        let writer = OutputWriter::new(&root, true);
        assert!(!writer.ensure_root().unwrap());
        let result = writer.write(&output("test.ts", content)).unwrap();

        assert!(!root.exists());
        match result {
            WriteResult::DryRun {
                content: dry_content,
                path,
            } => {
                assert_eq!(dry_content, content);
                assert_eq!(path, root.join("test.ts"));
            }
            other => panic!("expected dry run, got {other:?}"),
        }
    }

    #[test]
    fn test_write_into_missing_root_fails() {
        let dir = TempDir::new().unwrap();
        let writer = OutputWriter::new(dir.path().join("missing"), false);

        let result = writer.write(&output("test.ts", ""));

        assert!(matches!(
            result,
            Err(crate::error::CliError::Write(WriteError::WriteFile { .. }))
        ));
    }

    #[test]
    fn test_write_result_accessors() {
        let written = WriteResult::Written {
            path: PathBuf::from("/test/path.ts"),
            bytes: 100,
        };
        assert_eq!(written.path(), Path::new("/test/path.ts"));
        assert!(written.was_written());
        assert_eq!(written.bytes(), 100);

        let dry_run = WriteResult::DryRun {
            content: "test".to_string(),
            path: PathBuf::from("/test/path.ts"),
        };
        assert!(!dry_run.was_written());
        assert_eq!(dry_run.bytes(), 0);
    }
}
