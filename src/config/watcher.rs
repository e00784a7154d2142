// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! File watcher for regenerating on save.
//!
//! Watches a composition file (or a directory of them), debounces bursts of
//! write events from editors, and reloads the file once it settles. Editors
//! that save atomically replace the file through a create or rename, so
//! those count as writes too.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::debug;

use super::CompositionFile;

/// Default debounce window in milliseconds
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

/// Events emitted by the config watcher
#[derive(Debug, Clone)]
pub enum ConfigEvent {
    /// A composition file was modified and parsed successfully
    Reloaded(PathBuf, Box<CompositionFile>),
    /// A composition file was modified but failed to parse
    Error(String),
    /// A new file was created in the watch directory
    FileCreated(PathBuf),
    /// A file was deleted from the watch directory
    FileDeleted(PathBuf),
}

/// Composition file watcher with debouncing
pub struct ConfigWatcher {
    _watcher: RecommendedWatcher,
    event_receiver: Receiver<ConfigEvent>,
    watched_path: PathBuf,
}

impl ConfigWatcher {
    /// Create a new watcher for the specified file or directory
    ///
    /// # Arguments
    /// * `path` - Path to watch (file or directory)
    /// * `debounce_ms` - Debounce duration in milliseconds (default: 500)
    pub fn new<P: AsRef<Path>>(path: P, debounce_ms: Option<u64>) -> Result<Self> {
        let watched_path = path.as_ref().to_path_buf();
        let debounce_duration = Duration::from_millis(debounce_ms.unwrap_or(DEFAULT_DEBOUNCE_MS));

        let (event_tx, event_rx): (Sender<ConfigEvent>, Receiver<ConfigEvent>) = mpsc::channel();
        let (notify_tx, notify_rx): (Sender<Event>, Receiver<Event>) = mpsc::channel();

        let mut watcher = RecommendedWatcher::new(
            move |res: Result<Event, notify::Error>| {
                if let Ok(event) = res {
                    let _ = notify_tx.send(event);
                }
            },
            Config::default(),
        )
        .map_err(|e| anyhow!("Failed to create file watcher: {}", e))?;

        let mode = if watched_path.is_dir() {
            RecursiveMode::Recursive
        } else {
            RecursiveMode::NonRecursive
        };

        watcher
            .watch(&watched_path, mode)
            .map_err(|e| anyhow!("Failed to watch path {:?}: {}", watched_path, e))?;

        let target = watched_path.clone();
        std::thread::spawn(move || debounce_loop(notify_rx, event_tx, target, debounce_duration));

        Ok(Self {
            _watcher: watcher,
            event_receiver: event_rx,
            watched_path,
        })
    }

    /// Try to receive the next config event (non-blocking)
    pub fn try_recv(&self) -> Option<ConfigEvent> {
        self.event_receiver.try_recv().ok()
    }

    /// Receive all pending config events
    pub fn recv_all(&self) -> Vec<ConfigEvent> {
        let mut events = Vec::new();
        while let Some(event) = self.try_recv() {
            events.push(event);
        }
        events
    }

    /// Block until the next config event is received
    pub fn recv(&self) -> Option<ConfigEvent> {
        self.event_receiver.recv().ok()
    }

    /// Get the path being watched
    pub fn watched_path(&self) -> &Path {
        &self.watched_path
    }
}

/// Paths an event asks to reload
fn reload_paths(event: &Event) -> &[PathBuf] {
    match event.kind {
        EventKind::Create(_) | EventKind::Modify(_) => &event.paths,
        _ => &[],
    }
}

/// Collect write events and reload each touched file once it has been
/// quiet for `debounce`. Exits when the watcher is dropped.
fn debounce_loop(
    notify_rx: Receiver<Event>,
    event_tx: Sender<ConfigEvent>,
    target: PathBuf,
    debounce: Duration,
) {
    let mut last_event_time: Option<Instant> = None;
    let mut pending_paths: Vec<PathBuf> = Vec::new();

    loop {
        match notify_rx.recv_timeout(Duration::from_millis(50)) {
            Ok(event) => {
                let touched = reload_paths(&event);
                if !touched.is_empty() {
                    for path in touched {
                        if !pending_paths.contains(path) {
                            pending_paths.push(path.clone());
                        }
                    }
                    last_event_time = Some(Instant::now());
                }

                match event.kind {
                    EventKind::Create(_) => {
                        for path in event.paths {
                            let _ = event_tx.send(ConfigEvent::FileCreated(path));
                        }
                    }
                    EventKind::Remove(_) => {
                        for path in event.paths {
                            let _ = event_tx.send(ConfigEvent::FileDeleted(path));
                        }
                    }
                    _ => {}
                }
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {
                let settled = last_event_time.is_some_and(|t| t.elapsed() >= debounce);
                if settled {
                    for path in pending_paths.drain(..) {
                        if is_composition_file(&path) || path == target {
                            debug!(?path, "reloading composition");
                            let _ = event_tx.send(reload(path));
                        }
                    }
                    last_event_time = None;
                }
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        }
    }
}

fn is_composition_file(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext == "yaml" || ext == "yml" || ext == "toml")
}

fn reload(path: PathBuf) -> ConfigEvent {
    match CompositionFile::load(&path) {
        Ok(file) => ConfigEvent::Reloaded(path, Box::new(file)),
        Err(e) => ConfigEvent::Error(format!("Failed to load {:?}: {:#}", path, e)),
    }
}

/// Load and fully validate a composition file without generating it
pub fn validate_config<P: AsRef<Path>>(path: P) -> Result<CompositionFile> {
    let file = CompositionFile::load(path)?;
    file.to_composition()?;
    Ok(file)
}
