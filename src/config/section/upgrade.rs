//! `[upgrade]` self-update configuration.
//!
//! # Example
//!
//! ```toml
//! [upgrade]
//! command = ["cargo", "install", "train", "--force"]
//! ```

use crate::config::ConfigDiagnostics;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpgradeConfig {
    /// Updater command line, run as-is.
    pub command: Vec<String>,
}

impl Default for UpgradeConfig {
    fn default() -> Self {
        Self {
            command: ["cargo", "install", "train", "--force"]
                .map(String::from)
                .to_vec(),
        }
    }
}

impl UpgradeConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.command.first().is_none_or(|p| p.trim().is_empty()) {
            diag.error("upgrade.command", "updater command must not be empty");
        }
    }

    /// Program name for log lines.
    pub fn display_name(&self) -> &str {
        self.command.first().map_or("updater", String::as_str)
    }
}
