//! Logical path → fingerprinted path mapping.
//!
//! Written once per run, replacing whatever was there. Keys and values are
//! relative to the output root with `/` separators:
//!
//! ```json
//! {
//!   "assets/js/app.js": "assets/js/app-1f0c….js",
//!   "assets/style/app.css": "assets/style/app-9ab2….css"
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("IO error on manifest `{0}`")]
    Io(PathBuf, #[source] io::Error),

    #[error("malformed manifest `{0}`")]
    Json(PathBuf, #[source] serde_json::Error),
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    entries: BTreeMap<String, String>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `original → fingerprinted`. A repeated key keeps the last value.
    pub fn insert(&mut self, original: impl Into<String>, fingerprinted: impl Into<String>) {
        self.entries.insert(original.into(), fingerprinted.into());
    }

    /// Fingerprinted path for `original`, if it was built.
    pub fn resolve(&self, original: &str) -> Option<&str> {
        self.entries.get(original).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Entries that are new or map to a different file than in `previous`.
    pub fn changed_since(&self, previous: &Manifest) -> usize {
        self.iter()
            .filter(|&(original, fingerprinted)| previous.resolve(original) != Some(fingerprinted))
            .count()
    }

    /// Overwrite `path` with this manifest.
    pub fn write(&self, path: &Path) -> Result<(), ManifestError> {
        let io_err = |err| ManifestError::Io(path.to_path_buf(), err);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|err| ManifestError::Json(path.to_path_buf(), err))?;
        fs::write(path, json + "\n").map_err(io_err)
    }

    /// Load a manifest; a missing file is an empty manifest.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Self::new()),
            Err(err) => return Err(ManifestError::Io(path.to_path_buf(), err)),
        };
        serde_json::from_str(&content).map_err(|err| ManifestError::Json(path.to_path_buf(), err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("assets/manifest.json");

        let mut manifest = Manifest::new();
        manifest.insert("assets/js/app.js", "assets/js/app-aa.js");
        manifest.insert("assets/style/app.css", "assets/style/app-bb.css");
        manifest.write(&path).unwrap();

        let loaded = Manifest::load(&path).unwrap();
        assert_eq!(loaded, manifest);
        assert_eq!(loaded.resolve("assets/js/app.js"), Some("assets/js/app-aa.js"));
        assert_eq!(loaded.resolve("assets/js/other.js"), None);
    }

    #[test]
    fn test_write_overwrites() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("manifest.json");

        let mut old = Manifest::new();
        old.insert("assets/old.js", "assets/old-1.js");
        old.write(&path).unwrap();

        let mut new = Manifest::new();
        new.insert("assets/new.js", "assets/new-2.js");
        new.write(&path).unwrap();

        let loaded = Manifest::load(&path).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.resolve("assets/old.js"), None);
    }

    #[test]
    fn test_serialized_as_flat_object() {
        let mut manifest = Manifest::new();
        manifest.insert("b.css", "b-2.css");
        manifest.insert("a.js", "a-1.js");
        let json = serde_json::to_string(&manifest).unwrap();
        assert_eq!(json, r#"{"a.js":"a-1.js","b.css":"b-2.css"}"#);
    }

    #[test]
    fn test_changed_since() {
        let mut previous = Manifest::new();
        previous.insert("assets/a.js", "assets/a-1.js");
        previous.insert("assets/b.css", "assets/b-1.css");
        previous.insert("assets/gone.js", "assets/gone-1.js");

        let mut current = Manifest::new();
        current.insert("assets/a.js", "assets/a-1.js");
        current.insert("assets/b.css", "assets/b-2.css");
        current.insert("assets/new.js", "assets/new-1.js");

        assert_eq!(current.changed_since(&previous), 2);
        assert_eq!(current.changed_since(&current.clone()), 0);
        assert_eq!(current.changed_since(&Manifest::new()), 3);
    }

    #[test]
    fn test_load_missing_is_empty() {
        let dir = TempDir::new().unwrap();
        assert!(Manifest::load(&dir.path().join("none.json")).unwrap().is_empty());
    }

    #[test]
    fn test_load_malformed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("manifest.json");
        fs::write(&path, "not json").unwrap();
        assert!(matches!(Manifest::load(&path), Err(ManifestError::Json(..))));
    }
}
