//! Fatal pipeline failures.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::asset::{CompiledKind, ManifestError, ResolveError};

/// One variant per class of failure that stops a run.
#[derive(Debug, Error)]
pub enum BundleError {
    #[error("output tree `{output}` overlaps asset directory `{assets}`")]
    Overlap { assets: PathBuf, output: PathBuf },

    #[error("failed to prepare output root `{0}`")]
    Prepare(PathBuf, #[source] io::Error),

    #[error("failed to clean `{0}`")]
    Clean(PathBuf, #[source] io::Error),

    #[error("failed to copy `{from}` to `{to}`")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to resolve `{asset}`")]
    Resolve {
        asset: String,
        #[source]
        source: ResolveError,
    },

    #[error("failed to write bundled `{0}`")]
    Write(PathBuf, #[source] io::Error),

    #[error("minifier failed on {} files", .kind.ext())]
    Compress {
        kind: CompiledKind,
        #[source]
        source: anyhow::Error,
    },

    /// The manifest is left as it was.
    #[error("fingerprinting stopped at `{0}`, manifest not written")]
    FingerprintAborted(PathBuf, #[source] io::Error),

    #[error(transparent)]
    Manifest(#[from] ManifestError),
}

impl BundleError {
    /// Process exit status for this failure.
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::FingerprintAborted(..) => 2,
            _ => 1,
        }
    }
}
