//! Mapping hot reload.
//!
//! A `notify` watcher on the mapping file's directory re-reads the file on
//! every write or create event and swaps it into the shared mapping.  An
//! edit that fails to parse or validate is logged and the previous mapping
//! stays in effect.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc;

use notify::{Config, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, info, warn};

use todobot_intent::MappingConfig;

use crate::state::SharedMapping;

/// Start watching `path` on a dedicated thread.
pub fn spawn_mapping_watcher(path: PathBuf, mapping: SharedMapping) {
    let spawned = std::thread::Builder::new()
        .name("mapping-watcher".into())
        .spawn(move || watch_mapping_file(&path, &mapping));
    if let Err(e) = spawned {
        warn!(error = %e, "failed to start mapping watcher, hot-reload disabled");
    }
}

/// Re-read the mapping at `path` and install it.  Returns whether the
/// mapping was replaced.
///
/// Blocks on the lock, so it must not be called from async code.
pub fn reload_mapping(path: &Path, mapping: &SharedMapping) -> bool {
    match MappingConfig::load(path) {
        Ok(fresh) => {
            let projects = fresh.len();
            *mapping.blocking_write() = Arc::new(fresh);
            info!(path = %path.display(), projects, "hot-reloaded project mapping");
            true
        }
        Err(e) => {
            warn!(
                path = %path.display(),
                error = %e,
                "mapping edit rejected, keeping the previous mapping"
            );
            false
        }
    }
}

/// Watch the mapping file's directory until the watcher channel closes.
fn watch_mapping_file(path: &Path, mapping: &SharedMapping) {
    let Some(file_name) = path.file_name() else {
        warn!(path = %path.display(), "mapping path has no file name, hot-reload disabled");
        return;
    };
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    if !dir.exists() {
        debug!(dir = %dir.display(), "mapping directory does not exist, skipping file watcher");
        return;
    }

    let (tx, rx) = mpsc::channel();

    let mut watcher = match RecommendedWatcher::new(tx, Config::default()) {
        Ok(w) => w,
        Err(e) => {
            warn!(error = %e, "failed to create file watcher, hot-reload disabled");
            return;
        }
    };

    if let Err(e) = watcher.watch(dir, RecursiveMode::NonRecursive) {
        warn!(error = %e, dir = %dir.display(), "failed to watch mapping directory");
        return;
    }

    info!(path = %path.display(), "mapping hot-reload watcher started");

    for event in rx {
        let event = match event {
            Ok(e) => e,
            Err(e) => {
                warn!(error = %e, "file watcher error");
                continue;
            }
        };

        match event.kind {
            EventKind::Modify(_) | EventKind::Create(_) => {}
            _ => continue,
        }

        if event
            .paths
            .iter()
            .any(|changed| changed.file_name() == Some(file_name))
        {
            reload_mapping(path, mapping);
        }
    }
}
