//! Directory sidecar data files.
//!
//! A directory can carry metadata in a JSON file named after itself, placed
//! inside it. Two names are recognized, checked in this order:
//!
//! ```text
//! blog/
//! ├── blog.json              # <base>.json
//! ├── blog.11tydata.json     # <base>.11tydata.json
//! ├── post.html
//! └── test.png
//! ```
//!
//! Both files may exist; each is read independently.
//!
//! Reading is explicit about the three outcomes: the file is absent, it parsed,
//! or it failed to parse. Callers in the cascade walk map failure to absence so
//! a broken sidecar never aborts a build.

use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed JSON in {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Candidate sidecar paths for a directory, in lookup order.
///
/// Returns an empty list for paths with no base name (the filesystem root,
/// or a path ending in `..`).
pub fn sidecar_candidates(dir: &Path) -> Vec<PathBuf> {
    let Some(base) = dir.file_name().map(|b| b.to_string_lossy()) else {
        return Vec::new();
    };
    vec![
        dir.join(format!("{base}.json")),
        dir.join(format!("{base}.11tydata.json")),
    ]
}

/// Read and parse a single sidecar file.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn read_sidecar(path: &Path) -> Result<Option<Value>, DataError> {
    if !path.is_file() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let value = serde_json::from_str(&content).map_err(|source| DataError::Malformed {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(value))
}

/// Memoizing sidecar reader.
///
/// Sidecar content is treated as immutable for the lifetime of a build, so
/// each path is read and parsed at most once. Failures are cached as absence.
#[derive(Debug, Default)]
pub struct SidecarCache {
    entries: Mutex<HashMap<PathBuf, Option<Value>>>,
}

impl SidecarCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a sidecar, treating missing, unreadable and malformed files alike.
    pub fn get(&self, path: &Path) -> Option<Value> {
        let cached = self
            .entries
            .lock()
            .ok()
            .and_then(|entries| entries.get(path).cloned());
        if let Some(cached) = cached {
            return cached;
        }

        let value = match read_sidecar(path) {
            Ok(value) => value,
            Err(e) => {
                tracing::debug!(target: "cascade_copy", "ignoring sidecar: {e}");
                None
            }
        };

        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(path.to_path_buf(), value.clone());
        }
        value
    }

    /// Number of distinct sidecar paths looked up so far.
    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn candidates_named_after_directory() {
        let candidates = sidecar_candidates(Path::new("/site/blog"));
        assert_eq!(
            candidates,
            vec![
                PathBuf::from("/site/blog/blog.json"),
                PathBuf::from("/site/blog/blog.11tydata.json"),
            ]
        );
    }

    #[test]
    fn no_candidates_for_root() {
        assert!(sidecar_candidates(Path::new("/")).is_empty());
    }

    #[test]
    fn read_sidecar_absent_is_none() {
        let tmp = TempDir::new().unwrap();
        let result = read_sidecar(&tmp.path().join("missing.json")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn read_sidecar_parses_json() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("blog.json");
        fs::write(&path, r#"{"eleventyCopy": ["*.png"], "title": "Blog"}"#).unwrap();

        let value = read_sidecar(&path).unwrap().unwrap();
        assert_eq!(value["eleventyCopy"][0], "*.png");
        assert_eq!(value["title"], "Blog");
    }

    #[test]
    fn read_sidecar_malformed_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("blog.json");
        fs::write(&path, "{ not json").unwrap();

        let result = read_sidecar(&path);
        assert!(matches!(result, Err(DataError::Malformed { .. })));
    }

    #[test]
    fn directory_named_like_sidecar_is_absent() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("blog.json");
        fs::create_dir_all(&path).unwrap();

        assert!(read_sidecar(&path).unwrap().is_none());
    }

    #[test]
    fn cache_maps_malformed_to_none() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("blog.json");
        fs::write(&path, "[1, 2,").unwrap();

        let cache = SidecarCache::new();
        assert!(cache.get(&path).is_none());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn cache_reads_each_path_once() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("blog.json");
        fs::write(&path, r#"{"eleventyCopy": "a.png"}"#).unwrap();

        let cache = SidecarCache::new();
        let first = cache.get(&path).unwrap();

        // Content changes on disk are not observed within a session
        fs::write(&path, r#"{"eleventyCopy": "b.png"}"#).unwrap();
        let second = cache.get(&path).unwrap();

        assert_eq!(first, second);
        assert_eq!(second["eleventyCopy"], "a.png");
    }
}
