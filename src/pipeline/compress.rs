//! Minification through the YUI compressor.

use std::path::Path;

use super::BundleError;
use crate::asset::CompiledKind;
use crate::asset::scan::collect_compiled;
use crate::config::CompressConfig;
use crate::logger::StageProgress;
use crate::utils::exec::{Cmd, SILENT_FILTER};
use crate::{debug, log};

/// Outcome of the compress stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompressReport {
    /// Disabled in the configuration.
    Disabled,
    /// Minifier not available; nothing was compressed.
    Skipped(String),
    /// Number of files handed to the minifier.
    Compressed(usize),
}

/// Minify every compiled asset under `dir` that is not already minified.
pub fn compress_tree(dir: &Path, compress: &CompressConfig) -> Result<CompressReport, BundleError> {
    if !compress.enable {
        return Ok(CompressReport::Disabled);
    }

    let files = collect_compiled(dir, true);
    if files.is_empty() {
        return Ok(CompressReport::Compressed(0));
    }

    if let Some(reason) = unavailable(compress) {
        log!("warning"; "{}, skipping compression", reason);
        return Ok(CompressReport::Skipped(reason));
    }

    let progress = StageProgress::new("compress", files.len());
    for kind in CompiledKind::ALL {
        let group = files.of(kind);
        if group.is_empty() {
            continue;
        }

        let ext = kind.ext();
        debug!("compress"; "{} {} files", group.len(), ext);
        Cmd::new(&compress.java)
            .arg("-jar")
            .arg(&compress.jar)
            .arg("-o")
            .arg(format!(".{ext}$:.{ext}"))
            .args(group)
            .filter(&SILENT_FILTER)
            .run()
            .map_err(|source| BundleError::Compress { kind, source })?;

        for _ in group {
            progress.inc();
        }
    }
    progress.finish();

    Ok(CompressReport::Compressed(files.len()))
}

/// Why the minifier cannot run, if it cannot.
fn unavailable(compress: &CompressConfig) -> Option<String> {
    if which::which(&compress.java).is_err() {
        return Some(format!("`{}` not found", compress.java));
    }
    if !compress.jar.is_file() {
        return Some(format!("compressor jar `{}` not found", compress.jar.display()));
    }
    None
}
