//! Asset model: kinds, directive headers, resolution, fingerprints, manifest.

pub mod directive;
mod fingerprint;
mod kind;
mod manifest;
mod reader;
pub mod scan;

// Types
pub use kind::{AssetKind, CompiledKind, Handling};
pub use manifest::{Manifest, ManifestError};

// Resolution
pub use reader::{AssetReader, ResolveError, SourceReader};

// Fingerprinting (pure functions)
pub use fingerprint::{ContentHash, fingerprinted_path};
