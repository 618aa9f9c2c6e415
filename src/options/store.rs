//! # Options Store
//!
//! Holds the live [`AnalogOptions`] and persists them in the background.
//!
//! Saving is fire-and-forget: [`OptionsStore::request_save`] hands a snapshot
//! to a persistence worker task and returns at once. The caller never waits
//! for the write and never retries it; failures are logged by the worker.
//! Saved options only reach the pipeline after the subsystem is set up again.

use std::path::{Path, PathBuf};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::AnalogOptions;
use crate::error::Result;

/// Mapping from option to value, with an asynchronous save.
pub trait OptionsStore {
    /// Current options.
    fn analog_options(&self) -> &AnalogOptions;

    /// Current options, for modification before a save.
    fn analog_options_mut(&mut self) -> &mut AnalogOptions;

    /// Requests that the current options be persisted. Never blocks.
    fn request_save(&mut self);
}

/// Options store backed by a TOML file.
#[derive(Debug)]
pub struct FileOptionsStore {
    path: PathBuf,
    options: AnalogOptions,
    tx: UnboundedSender<AnalogOptions>,
    worker: JoinHandle<()>,
}

impl FileOptionsStore {
    /// Loads the options file and starts the persistence worker.
    ///
    /// A missing file yields default options. Must be called from within a
    /// tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns error if an existing file cannot be read or parsed.
    pub fn open<P: Into<PathBuf>>(path: P) -> Result<Self> {
        let path = path.into();
        let options = if path.exists() {
            AnalogOptions::load(&path)?
        } else {
            info!("No options file at {}, using defaults", path.display());
            AnalogOptions::default()
        };

        let (tx, rx) = unbounded_channel();
        let worker = tokio::spawn(persistence_worker(path.clone(), rx));

        Ok(Self {
            path,
            options,
            tx,
            worker,
        })
    }

    /// Returns the options file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stops accepting saves and waits for queued ones to be written.
    pub async fn shutdown(self) {
        drop(self.tx);
        if let Err(e) = self.worker.await {
            error!("Persistence worker panicked: {}", e);
        }
    }
}

impl OptionsStore for FileOptionsStore {
    fn analog_options(&self) -> &AnalogOptions {
        &self.options
    }

    fn analog_options_mut(&mut self) -> &mut AnalogOptions {
        &mut self.options
    }

    fn request_save(&mut self) {
        if self.tx.send(self.options.clone()).is_err() {
            warn!("Persistence worker stopped, save request dropped");
        }
    }
}

/// Writes each received snapshot to `path`.
async fn persistence_worker(path: PathBuf, mut rx: UnboundedReceiver<AnalogOptions>) {
    while let Some(options) = rx.recv().await {
        let contents = match options.to_toml_string() {
            Ok(contents) => contents,
            Err(e) => {
                error!("Failed to serialize options: {}", e);
                continue;
            }
        };

        match tokio::fs::write(&path, contents).await {
            Ok(()) => debug!("Saved options to {}", path.display()),
            Err(e) => error!("Failed to save options to {}: {}", path.display(), e),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileOptionsStore::open(dir.path().join("options.toml")).unwrap();
        assert_eq!(store.analog_options(), &AnalogOptions::default());
        store.shutdown().await;
    }

    #[tokio::test]
    async fn test_request_save_persists_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("options.toml");

        let mut store = FileOptionsStore::open(&path).unwrap();
        store.analog_options_mut().enabled = true;
        store.analog_options_mut().stick1.center_x = 2061;
        store.request_save();
        store.shutdown().await;

        let saved = AnalogOptions::load(&path).unwrap();
        assert!(saved.enabled);
        assert_eq!(saved.stick1.center_x, 2061);
    }

    #[tokio::test]
    async fn test_reopen_reads_saved_options() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("options.toml");

        let mut store = FileOptionsStore::open(&path).unwrap();
        store.analog_options_mut().stick2.inner_deadzone = 8;
        store.request_save();
        store.shutdown().await;

        let store = FileOptionsStore::open(&path).unwrap();
        assert_eq!(store.analog_options().stick2.inner_deadzone, 8);
        store.shutdown().await;
    }

    #[tokio::test]
    async fn test_open_corrupt_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("options.toml");
        std::fs::write(&path, "enabled = [not toml").unwrap();

        assert!(FileOptionsStore::open(&path).is_err());
    }

    #[tokio::test]
    async fn test_unwritable_path_does_not_fail_requester() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing_dir").join("options.toml");

        let mut store = FileOptionsStore::open(&path).unwrap();
        store.request_save();
        store.shutdown().await;

        assert!(!path.exists());
    }
}
