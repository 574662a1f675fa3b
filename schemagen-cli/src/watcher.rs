//! Module directory watcher for `generate --watch`.
//!
//! Changes to module manifests are debounced and forwarded as
//! [`WatchEvent`]s; the caller reruns the whole pipeline for each batch.

use crate::error::{CliResult, WatchError};
use notify::{RecommendedWatcher, RecursiveMode};
use notify_debouncer_mini::{new_debouncer, DebouncedEvent, Debouncer};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};
use std::time::Duration;

/// Event types for manifest changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
    /// A manifest was created or modified.
    Modified(PathBuf),
    /// A manifest was deleted.
    Deleted(PathBuf),
    /// An error occurred.
    Error(String),
}

/// Watches a module directory for manifest changes.
pub struct ModuleWatcher {
    /// Module directory to watch.
    root: PathBuf,
    /// Manifest suffix, without the dot.
    suffix: String,
    /// Debounce duration in milliseconds.
    debounce_ms: u64,
}

impl ModuleWatcher {
    /// Create a watcher for manifests ending in `.<suffix>` under `root`.
    pub fn new(root: impl Into<PathBuf>, suffix: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            suffix: suffix.into(),
            debounce_ms: 500,
        }
    }

    /// Set the debounce duration in milliseconds.
    pub fn with_debounce(mut self, ms: u64) -> Self {
        self.debounce_ms = ms;
        self
    }

    /// Start watching.
    ///
    /// The returned debouncer must be kept alive for events to arrive.
    pub fn watch(&self) -> CliResult<(Debouncer<RecommendedWatcher>, Receiver<WatchEvent>)> {
        let (tx, rx) = channel::<WatchEvent>();
        let suffix = self.suffix.clone();

        let mut debouncer = new_debouncer(
            Duration::from_millis(self.debounce_ms),
            move |result: Result<Vec<DebouncedEvent>, notify::Error>| match result {
                Ok(events) => {
                    for event in events {
                        if let Some(watch_event) = classify(event.path, &suffix) {
                            let _ = tx.send(watch_event);
                        }
                    }
                }
                Err(e) => {
                    let _ = tx.send(WatchEvent::Error(e.to_string()));
                }
            },
        )
        .map_err(|e| WatchError::Init(e.to_string()))?;

        debouncer
            .watcher()
            .watch(&self.root, RecursiveMode::Recursive)
            .map_err(|e| WatchError::Init(e.to_string()))?;

        tracing::debug!(root = %self.root.display(), debounce_ms = self.debounce_ms, "watching modules");

        Ok((debouncer, rx))
    }

    /// Get the directory being watched.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Whether `path` names a manifest with the given suffix.
pub fn is_manifest(path: &Path, suffix: &str) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .and_then(|name| name.strip_suffix(suffix))
        .is_some_and(|rest| rest.ends_with('.'))
}

fn classify(path: PathBuf, suffix: &str) -> Option<WatchEvent> {
    if !is_manifest(&path, suffix) {
        return None;
    }

    Some(if path.exists() {
        WatchEvent::Modified(path)
    } else {
        WatchEvent::Deleted(path)
    })
}

impl WatchEvent {
    /// Get the path associated with this event.
    pub fn path(&self) -> Option<&Path> {
        match self {
            WatchEvent::Modified(p) | WatchEvent::Deleted(p) => Some(p),
            WatchEvent::Error(_) => None,
        }
    }

    /// Check if this is an error event.
    pub fn is_error(&self) -> bool {
        matches!(self, WatchEvent::Error(_))
    }

    /// Get the error message if this is an error event.
    pub fn error_message(&self) -> Option<&str> {
        match self {
            WatchEvent::Error(msg) => Some(msg),
            _ => None,
        }
    }
}
