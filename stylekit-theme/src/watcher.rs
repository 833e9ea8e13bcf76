//! Hot reload of theme files.
//!
//! A [ThemeWatcher] watches the stylesheet files of themes registered with
//! [ThemeManager::register_theme_file]. Call [ThemeWatcher::poll] from the
//! host's event loop; changed files are re-parsed and re-registered. A file
//! that no longer parses is reported and the previous version stays in place.
//!
//! The directory holding each file is watched rather than the file itself, so
//! editors that save by writing a temporary file and renaming it over the
//! original keep being picked up.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc;

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use crate::error::{ThemeError, ThemeResult};
use crate::manager::ThemeManager;

/// Watches theme files and reloads them into a [ThemeManager].
pub struct ThemeWatcher {
    watcher: RecommendedWatcher,
    event_rx: mpsc::Receiver<notify::Result<Event>>,
    /// Canonical file path to theme id.
    watched: HashMap<PathBuf, String>,
    /// Watched directories and how many watched files live in each.
    directories: HashMap<PathBuf, usize>,
}

impl ThemeWatcher {
    /// Create a new theme watcher.
    pub fn new() -> ThemeResult<Self> {
        let (tx, rx) = mpsc::channel();
        let watcher = notify::recommended_watcher(tx).map_err(ThemeError::file_watcher_error)?;

        Ok(Self {
            watcher,
            event_rx: rx,
            watched: HashMap::new(),
            directories: HashMap::new(),
        })
    }

    /// Start watching the file theme `id` was loaded from.
    pub fn watch_theme(&mut self, manager: &ThemeManager, id: &str) -> ThemeResult<()> {
        let path = manager
            .theme_path(id)
            .ok_or_else(|| ThemeError::config(format!("theme '{}' was not loaded from a file", id)))?;
        let path = canonical(&path);
        if self.watched.get(&path).map(String::as_str) == Some(id) {
            return Ok(());
        }
        // The theme was re-registered from another file.
        self.unwatch_theme(id)?;
        let directory = parent_dir(&path).to_path_buf();

        if !self.directories.contains_key(&directory) {
            self.watcher
                .watch(&directory, RecursiveMode::NonRecursive)
                .map_err(ThemeError::file_watcher_error)?;
        }
        if self.watched.insert(path.clone(), id.to_string()).is_none() {
            *self.directories.entry(directory).or_insert(0) += 1;
        }
        log::debug!("Watching {:?} for theme '{}'", path, id);
        Ok(())
    }

    /// Stop watching the file of theme `id`.
    pub fn unwatch_theme(&mut self, id: &str) -> ThemeResult<()> {
        let path = match self.watched.iter().find(|(_, watched)| watched.as_str() == id) {
            Some((path, _)) => path.clone(),
            None => return Ok(()),
        };
        self.watched.remove(&path);

        let directory = parent_dir(&path).to_path_buf();
        let remaining = match self.directories.get_mut(&directory) {
            Some(count) => {
                *count -= 1;
                *count
            },
            None => return Ok(()),
        };
        if remaining == 0 {
            self.directories.remove(&directory);
            self.watcher.unwatch(&directory).map_err(ThemeError::file_watcher_error)?;
        }
        Ok(())
    }

    /// Ids of the themes being watched.
    pub fn watched_themes(&self) -> Vec<String> {
        self.watched.values().cloned().collect()
    }

    /// Reload every watched theme whose file changed since the last poll (non-blocking).
    ///
    /// Writes, creations and renames onto a watched path all count as changes.
    /// Returns the ids of the themes that were reloaded.
    pub fn poll(&self, manager: &ThemeManager) -> Vec<String> {
        let mut changed: Vec<String> = Vec::new();

        while let Ok(event) = self.event_rx.try_recv() {
            let event = match event {
                Ok(event) => event,
                Err(err) => {
                    log::warn!("Theme watcher error: {}", err);
                    continue;
                },
            };
            if !matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_) | EventKind::Any) {
                continue;
            }
            for path in &event.paths {
                if let Some(id) = self.watched.get(&canonical(path)) {
                    if !changed.contains(id) {
                        changed.push(id.clone());
                    }
                }
            }
        }

        changed.retain(|id| match manager.reload_theme(id) {
            Ok(()) => {
                log::info!("Reloaded theme '{}'", id);
                true
            },
            Err(err) => {
                log::warn!("{}", ThemeError::reload_error(err));
                false
            },
        });
        changed
    }
}

/// Canonicalize through the parent directory so paths of files that are
/// momentarily missing (mid-rename) still compare equal.
fn canonical(path: &Path) -> PathBuf {
    match path.file_name() {
        Some(name) => {
            let parent = parent_dir(path);
            parent
                .canonicalize()
                .unwrap_or_else(|_| parent.to_path_buf())
                .join(name)
        },
        None => path.to_path_buf(),
    }
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}
