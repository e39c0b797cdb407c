//! Asset build pipeline.
//!
//! # Stages
//!
//! ```text
//! prepare ──► clean ──► copy ──► bundle ──► compress ──► fingerprint ──► manifest
//! ```
//!
//! Stages run one after another on the calling thread. Each returns
//! `Result<_, BundleError>`; graceful outcomes ([`Prepared::Collision`],
//! [`CompressReport::Skipped`]) are values, not errors. [`run_bundle`]
//! decides the overall [`BundleOutcome`], the caller decides the exit status.

mod bundle;
mod compress;
mod error;
mod fingerprint;
mod prepare;
mod sync;

pub use bundle::BundleReport;
pub use compress::CompressReport;
pub use error::BundleError;
pub use prepare::Prepared;

use std::path::PathBuf;

use crate::asset::{AssetReader, Manifest, SourceReader};
use crate::config::TrainConfig;
use crate::log;
use crate::utils::plural_count;

/// Counts from a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub copied: usize,
    pub bundle: BundleReport,
    pub compress: CompressReport,
    pub fingerprinted: usize,
    /// Manifest entries that are new or point at a new fingerprint.
    pub changed: usize,
    pub manifest: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BundleOutcome {
    Completed(RunReport),
    /// A non-directory sits at the output root; no stage ran.
    Aborted(PathBuf),
}

/// Run the pipeline with the default source reader.
pub fn bundle(config: &TrainConfig) -> Result<BundleOutcome, BundleError> {
    let build = &config.build;
    let reader = SourceReader::new(&build.assets, &build.compilers, &build.partial_prefix);
    run_bundle(config, &reader)
}

/// Run every stage in order, resolving directives through `reader`.
pub fn run_bundle(
    config: &TrainConfig,
    reader: &dyn AssetReader,
) -> Result<BundleOutcome, BundleError> {
    let build = &config.build;
    let output = build.output_assets();
    if build.output_overlaps_source() {
        return Err(BundleError::Overlap {
            assets: build.assets.clone(),
            output,
        });
    }

    if let Prepared::Collision(path) = prepare::prepare_output_root(&build.public)? {
        log!("error"; "`{}` exists and is not a directory", path.display());
        return Ok(BundleOutcome::Aborted(path));
    }

    // Read before cleaning, the default location is inside the output tree.
    let manifest_path = build.manifest_path();
    let previous = Manifest::load(&manifest_path).unwrap_or_else(|err| {
        log!("warning"; "{:#}, treating every asset as changed", anyhow::Error::new(err));
        Manifest::new()
    });

    sync::remove_assets(&output)?;
    let copied = sync::copy_assets(&build.assets, &output)?;
    log!("copy"; "{} to {}", plural_count(copied, "file"), output.display());

    let bundle = bundle::bundle_tree(&output, build, reader)?;
    log!(
        "bundle"; "{} bundled, {} compiled, {} skipped",
        plural_count(bundle.bundled, "file"),
        plural_count(bundle.compiled, "source"),
        plural_count(bundle.partials, "partial")
    );

    let compress = compress::compress_tree(&output, &build.compress)?;
    if let CompressReport::Compressed(count) = compress {
        log!("compress"; "{}", plural_count(count, "file"));
    }

    let manifest = fingerprint::fingerprint_tree(&output, &build.public)?;
    manifest.write(&manifest_path)?;
    let changed = manifest.changed_since(&previous);
    if previous.is_empty() {
        log!(
            "manifest"; "{} written to {}",
            plural_count(manifest.len(), "asset"),
            manifest_path.display()
        );
    } else {
        log!(
            "manifest"; "{} written to {}, {} changed",
            plural_count(manifest.len(), "asset"),
            manifest_path.display(),
            changed
        );
    }

    Ok(BundleOutcome::Completed(RunReport {
        copied,
        bundle,
        compress,
        fingerprinted: manifest.len(),
        changed,
        manifest: manifest_path,
    }))
}
