//! Directive-aware bundling of the copied asset tree.
//!
//! Scripts and stylesheets that carry a directive header are replaced by
//! their resolved content. Preprocessor sources are compiled into a sibling
//! file with the compiled extension; the source stays and partials are
//! skipped.

use std::fs;
use std::path::Path;

use super::{BundleError, sync::remove_assets};
use crate::asset::directive::has_directives;
use crate::asset::scan::{collect_files, relative_slash_path};
use crate::asset::{AssetKind, AssetReader, Handling, ResolveError};
use crate::config::BuildSectionConfig;
use crate::logger::StageProgress;
use crate::{debug, log};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BundleReport {
    /// Scripts and stylesheets rewritten with resolved content.
    pub bundled: usize,
    /// Preprocessor sources compiled.
    pub compiled: usize,
    /// Partials left alone.
    pub partials: usize,
}

/// Bundle every file under `dir` (the output asset tree).
///
/// Any failure removes `dir` before the error is returned.
pub fn bundle_tree(
    dir: &Path,
    build: &BuildSectionConfig,
    reader: &dyn AssetReader,
) -> Result<BundleReport, BundleError> {
    let files = collect_files(dir);
    let progress = StageProgress::new("bundle", files.len());
    let mut report = BundleReport::default();

    for path in &files {
        if let Err(err) = bundle_file(dir, path, build, reader, &mut report) {
            drop(progress);
            if let Err(clean_err) = remove_assets(dir) {
                log!("error"; "{:#}", anyhow::Error::new(clean_err));
            }
            return Err(err);
        }
        progress.inc();
    }

    progress.finish();
    Ok(report)
}

fn bundle_file(
    dir: &Path,
    path: &Path,
    build: &BuildSectionConfig,
    reader: &dyn AssetReader,
    report: &mut BundleReport,
) -> Result<(), BundleError> {
    let kind = AssetKind::from_path(path);
    let logical = relative_slash_path(dir, path);
    let resolve = |logical: &str| {
        reader
            .read_asset(logical)
            .map_err(|source| BundleError::Resolve {
                asset: logical.to_string(),
                source,
            })
    };

    match kind.handling() {
        Handling::Ignore => {}
        Handling::Bundle => {
            let raw = fs::read(path).map_err(|err| BundleError::Resolve {
                asset: logical.clone(),
                source: ResolveError::Io(path.to_path_buf(), err),
            })?;
            if has_directives(&String::from_utf8_lossy(&raw), kind) {
                let content = resolve(&logical)?;
                fs::write(path, content)
                    .map_err(|err| BundleError::Write(path.to_path_buf(), err))?;
                debug!("bundle"; "{}", logical);
                report.bundled += 1;
            }
        }
        Handling::Compile(_) if build.is_partial(path) => {
            debug!("bundle"; "skip partial {}", logical);
            report.partials += 1;
        }
        Handling::Compile(target) => {
            let content = resolve(&logical)?;
            let output = path.with_extension(target.ext());
            fs::write(&output, content).map_err(|err| BundleError::Write(output.clone(), err))?;
            debug!("bundle"; "{} -> {}", logical, relative_slash_path(dir, &output));
            report.compiled += 1;
        }
    }
    Ok(())
}
