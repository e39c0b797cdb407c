//! `[build.compress]` minifier configuration.
//!
//! # Example
//!
//! ```toml
//! [build.compress]
//! enable = true
//! java = "java"                        # Java launcher (looked up on PATH)
//! jar = "yuicompressor-2.4.7.jar"      # Relative to the train executable unless absolute
//! ```

use crate::config::ConfigDiagnostics;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Jar shipped next to the executable.
const DEFAULT_COMPRESSOR_JAR: &str = "yuicompressor-2.4.7.jar";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressConfig {
    pub enable: bool,
    pub java: String,
    pub jar: PathBuf,
}

impl Default for CompressConfig {
    fn default() -> Self {
        Self {
            enable: true,
            java: "java".into(),
            jar: DEFAULT_COMPRESSOR_JAR.into(),
        }
    }
}

impl CompressConfig {
    /// Make `jar` absolute, resolving relative paths against `exe_dir`.
    pub fn normalize(&mut self, exe_dir: &Path) {
        if self.jar.is_relative() {
            self.jar = exe_dir.join(&self.jar);
        }
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if !self.enable {
            return;
        }
        if self.java.trim().is_empty() {
            diag.error("build.compress.java", "java launcher must not be empty");
        }
        if self.jar.as_os_str().is_empty() {
            diag.error_with_hint(
                "build.compress.jar",
                "compressor jar must not be empty",
                "set `enable = false` to skip minification",
            );
        }
    }
}
