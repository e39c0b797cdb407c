//! Pipeline configuration from `train.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── build      # [build]
//! │   ├── compress   # [build.compress]
//! │   ├── compilers  # [build.compilers]
//! │   └── upgrade    # [upgrade]
//! ├── types/         # ConfigError, ConfigDiagnostics
//! └── mod.rs         # TrainConfig (this file)
//! ```
//!
//! The file is optional: without one every section takes its defaults and
//! paths resolve against the current directory. CLI arguments override the
//! file. The resulting [`TrainConfig`] is built once and passed by reference.

pub mod section;
pub mod types;
mod util;

use util::{absolutize, find_config_file};

pub use section::{
    BuildSectionConfig, CompilersConfig, CompressConfig, UpgradeConfig,
};
pub use types::{ConfigDiagnostics, ConfigError};

use crate::{
    cli::{BundleArgs, Cli},
    debug, log,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Root configuration structure for `train.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrainConfig {
    /// Config file path, empty when running on defaults.
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Directory relative paths in the file resolve against.
    #[serde(skip)]
    pub root: PathBuf,

    /// Paths, compressor and compilers.
    #[serde(default)]
    pub build: BuildSectionConfig,

    /// Self-update command.
    #[serde(default)]
    pub upgrade: UpgradeConfig,
}

impl TrainConfig {
    /// Load configuration for a CLI invocation.
    ///
    /// Searches upward from cwd for the config file. The project root is the
    /// config file's parent directory, or cwd when there is no file.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;

        let mut config = match find_config_file(&cli.config) {
            Some(path) => {
                let mut config = Self::from_path(&path)?;
                config.root = path.parent().map(Path::to_path_buf).unwrap_or_default();
                config.config_path = path;
                config
            }
            None => Self {
                root: cwd.clone(),
                ..Self::default()
            },
        };

        if config.config_path.as_os_str().is_empty() {
            debug!("config"; "no {} found, using defaults", cli.config.display());
        } else {
            debug!("config"; "using {}", config.config_path.display());
        }

        config.finalize(&cli.bundle_args(), &cwd);
        if cli.is_upgrade() {
            config.validate_upgrade()?;
        } else {
            config.validate_bundle()?;
        }

        let exe_dir = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
            .unwrap_or(cwd);
        config.build.compress.normalize(&exe_dir);

        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }
        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Validate what a bundle run reads, after CLI overrides.
    pub fn validate_bundle(&self) -> Result<(), ConfigError> {
        let mut diag = ConfigDiagnostics::new();
        self.build.validate(&mut diag);
        Self::report(diag)
    }

    /// Validate what `upgrade` reads; `[build]` problems do not block it.
    pub fn validate_upgrade(&self) -> Result<(), ConfigError> {
        let mut diag = ConfigDiagnostics::new();
        self.upgrade.validate(&mut diag);
        Self::report(diag)
    }

    fn report(diag: ConfigDiagnostics) -> Result<(), ConfigError> {
        diag.print_warnings();
        diag.into_result().map_err(ConfigError::Diagnostics)
    }

    /// Make paths absolute and apply CLI overrides.
    fn finalize(&mut self, args: &BundleArgs, cwd: &Path) {
        self.normalize_paths();
        self.apply_bundle_args(args, cwd);
    }

    /// Resolve file-relative paths against the project root.
    fn normalize_paths(&mut self) {
        let root = &self.root;
        self.build.assets = absolutize(root, &self.build.assets);
        self.build.public = absolutize(root, &self.build.public);
        if let Some(manifest) = &self.build.manifest {
            self.build.manifest = Some(absolutize(root, manifest));
        }
    }

    /// CLI paths are relative to cwd, not to the config file.
    fn apply_bundle_args(&mut self, args: &BundleArgs, cwd: &Path) {
        if let Some(assets) = &args.assets {
            self.build.assets = absolutize(cwd, assets);
        }
        if let Some(public) = &args.public {
            self.build.public = absolutize(cwd, public);
        }
        if let Some(manifest) = &args.manifest {
            self.build.manifest = Some(absolutize(cwd, manifest));
        }
        if args.no_compress {
            self.build.compress.enable = false;
        }
    }

    /// Config rooted at `root` with absolute `assets` and `public` below it.
    #[cfg(test)]
    pub fn for_root(root: &Path) -> Self {
        let mut config = Self {
            root: root.to_path_buf(),
            ..Self::default()
        };
        config.normalize_paths();
        config
    }
}

// ============================================================================
// tests
// ============================================================================
