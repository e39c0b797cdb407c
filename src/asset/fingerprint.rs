//! Content fingerprints for cache busting.
//!
//! A fingerprint is the blake3 digest of a file's bytes. The fingerprinted
//! copy of `style/app.css` is `style/app-<hex>.css`, so a changed stylesheet
//! gets a new URL while an unchanged one keeps its cached copy.

use std::fmt;
use std::path::{Path, PathBuf};

/// A 256-bit content hash (blake3 output).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    /// Hash a byte slice.
    pub fn of(bytes: &[u8]) -> Self {
        Self(*blake3::hash(bytes).as_bytes())
    }

    /// Full lowercase hex digest (64 chars).
    pub fn to_hex(self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Short form for log lines
        write!(f, "{}", &self.to_hex()[..16])
    }
}

/// Path of the fingerprinted copy of `path`.
///
/// `dir/name.ext` becomes `dir/name-<hex>.ext`; only the last extension
/// moves after the hash (`app.min.js` → `app.min-<hex>.js`).
pub fn fingerprinted_path(path: &Path, hash: ContentHash) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{stem}-{}.{}", hash.to_hex(), ext.to_string_lossy()),
        None => format!("{stem}-{}", hash.to_hex()),
    };
    path.with_file_name(name)
}
