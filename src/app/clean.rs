use crate::config::AppConfig;
use crate::utils::error::Result;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Local caches that `clean` removes besides the history database.
pub const CACHE_DIRS: &[&str] = &[".cache/golem"];

/// Database file plus SQLite side files and cache directories.
pub fn targets(config: &AppConfig) -> Vec<PathBuf> {
    let mut paths = Vec::new();

    let db = config.api.database_url.as_str();
    if db != ":memory:" {
        paths.push(PathBuf::from(db));
        for suffix in ["-journal", "-wal", "-shm"] {
            paths.push(PathBuf::from(format!("{}{}", db, suffix)));
        }
    }

    paths.extend(CACHE_DIRS.iter().map(PathBuf::from));
    paths
}

/// Remove each path, ignoring those already gone. Returns what was removed.
pub fn remove_all(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut removed = Vec::new();

    for path in paths {
        if remove_path(path)? {
            tracing::info!("🧹 Removed {}", path.display());
            removed.push(path.clone());
        }
    }

    Ok(removed)
}

fn remove_path(path: &Path) -> Result<bool> {
    let result = match std::fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => std::fs::remove_dir_all(path),
        Ok(_) => std::fs::remove_file(path),
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}
