//! `train bundle`: run the asset pipeline.

use crate::config::TrainConfig;
use crate::{debug, log};
use crate::pipeline::{self, BundleOutcome, CompressReport, RunReport};
use crate::utils::plural_count;

/// Run the pipeline and return the process exit status.
pub fn run(config: &TrainConfig) -> i32 {
    match pipeline::bundle(config) {
        Ok(BundleOutcome::Completed(report)) => {
            log_summary(&report);
            0
        }
        Ok(BundleOutcome::Aborted(path)) => {
            log!("error"; "bundle aborted, remove `{}` and retry", path.display());
            1
        }
        Err(err) => {
            let code = err.exit_code();
            log!("error"; "{:#}", anyhow::Error::new(err));
            code
        }
    }
}

fn log_summary(report: &RunReport) {
    let compressed = match &report.compress {
        CompressReport::Compressed(count) => plural_count(*count, "file"),
        CompressReport::Skipped(reason) => format!("skipped ({reason})"),
        CompressReport::Disabled => "disabled".to_string(),
    };
    log!(
        "done";
        "{} copied, {} bundled, {} compiled, compression {}, {} fingerprinted ({} changed)",
        plural_count(report.copied, "file"),
        report.bundle.bundled,
        report.bundle.compiled,
        compressed,
        report.fingerprinted,
        report.changed
    );
    debug!("done"; "manifest at {}", report.manifest.display());
}
