//! `[build]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [build]
//! assets = "assets"          # Source asset directory (relative to project root)
//! public = "public"          # Output root (relative to project root)
//! assets_url = "assets"      # Asset subtree under the output root
//! manifest = "public/assets/manifest.json"  # Default: <public>/<assets_url>/manifest.json
//! partial_prefix = "_"       # Preprocessor sources starting with this are never compiled alone
//! ```
//!
//! See [`CompressConfig`] and [`CompilersConfig`] for the sub-sections.

use super::{CompilersConfig, CompressConfig};
use crate::config::{ConfigDiagnostics, util::real_path};
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildSectionConfig {
    /// Source asset directory.
    pub assets: PathBuf,

    /// Output root.
    pub public: PathBuf,

    /// Asset subtree below the output root.
    pub assets_url: PathBuf,

    /// Manifest location override.
    pub manifest: Option<PathBuf>,

    /// Filename prefix marking a partial.
    pub partial_prefix: String,

    /// Minifier settings.
    pub compress: CompressConfig,

    /// Preprocessor compiler commands.
    pub compilers: CompilersConfig,
}

impl Default for BuildSectionConfig {
    fn default() -> Self {
        Self {
            assets: "assets".into(),
            public: "public".into(),
            assets_url: "assets".into(),
            manifest: None,
            partial_prefix: "_".into(),
            compress: CompressConfig::default(),
            compilers: CompilersConfig::default(),
        }
    }
}

impl BuildSectionConfig {
    /// `<public>/<assets_url>`: the tree every stage after the preparer works on.
    pub fn output_assets(&self) -> PathBuf {
        self.public.join(&self.assets_url)
    }

    /// Where the manifest is written.
    pub fn manifest_path(&self) -> PathBuf {
        self.manifest
            .clone()
            .unwrap_or_else(|| self.output_assets().join("manifest.json"))
    }

    /// Whether a file name marks a partial.
    pub fn is_partial(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|name| name.starts_with(&self.partial_prefix))
    }

    /// Whether the output asset tree and the source directory are the same
    /// directory or one lies inside the other.
    ///
    /// Cleaning the output tree would then delete sources.
    pub fn output_overlaps_source(&self) -> bool {
        let output = real_path(&self.output_assets());
        let source = real_path(&self.assets);
        output.starts_with(&source) || source.starts_with(&output)
    }

    /// Validate `[build]` once paths are final.
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.partial_prefix.is_empty() {
            diag.error_with_hint(
                "build.partial_prefix",
                "must not be empty, every file would be a partial",
                "the conventional value is \"_\"",
            );
        }

        let escapes = self
            .assets_url
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if self.assets_url.as_os_str().is_empty() || escapes {
            diag.error_with_hint(
                "build.assets_url",
                format!(
                    "`{}` must be a relative path inside the output root",
                    self.assets_url.display()
                ),
                "cleaning the asset tree deletes this directory",
            );
        }

        if self.output_overlaps_source() {
            diag.error_with_hint(
                "build.public",
                format!(
                    "output tree `{}` overlaps the asset directory `{}`",
                    self.output_assets().display(),
                    self.assets.display()
                ),
                "the output tree is deleted before every run, keep it outside the sources",
            );
        }

        self.compress.validate(diag);
        self.compilers.validate(diag);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let build = BuildSectionConfig::default();
        assert_eq!(build.output_assets(), PathBuf::from("public/assets"));
        assert_eq!(
            build.manifest_path(),
            PathBuf::from("public/assets/manifest.json")
        );
        assert!(build.is_partial(Path::new("style/_vars.scss")));
        assert!(!build.is_partial(Path::new("style/app.scss")));
    }

    #[test]
    fn test_manifest_override() {
        let build = BuildSectionConfig {
            manifest: Some("config/assets.json".into()),
            ..Default::default()
        };
        assert_eq!(build.manifest_path(), PathBuf::from("config/assets.json"));
    }

    #[test]
    fn test_validate_rejects_escaping_assets_url() {
        for bad in ["", "..", "../assets", "/abs"] {
            let build = BuildSectionConfig {
                assets_url: bad.into(),
                ..Default::default()
            };
            let mut diag = ConfigDiagnostics::new();
            build.validate(&mut diag);
            assert!(diag.has_errors(), "`{bad}` should be rejected");
        }
    }

    #[test]
    fn test_validate_rejects_empty_partial_prefix() {
        let build = BuildSectionConfig {
            partial_prefix: String::new(),
            ..Default::default()
        };
        let mut diag = ConfigDiagnostics::new();
        build.validate(&mut diag);
        assert!(diag.errors().iter().any(|e| e.field == "build.partial_prefix"));
    }

    #[test]
    fn test_overlap_detected() {
        let overlapping = [
            ("/srv/app/assets", "/srv/app"),
            ("/srv/app/assets", "/srv/app/."),
            ("/srv/app", "/srv/app/public"),
            ("/srv/app/public/assets/src", "/srv/app/public"),
            ("/srv/app/assets", "/srv/app/public/../"),
        ];
        for (assets, public) in overlapping {
            let build = BuildSectionConfig {
                assets: assets.into(),
                public: public.into(),
                ..Default::default()
            };
            assert!(build.output_overlaps_source(), "{assets} vs {public}");

            let mut diag = ConfigDiagnostics::new();
            build.validate(&mut diag);
            assert!(diag.errors().iter().any(|e| e.field == "build.public"));
        }

        let separate = BuildSectionConfig {
            assets: "/srv/app/assets".into(),
            public: "/srv/app/public".into(),
            ..Default::default()
        };
        assert!(!separate.output_overlaps_source());

        let sibling_prefix = BuildSectionConfig {
            assets: "/srv/app/assets".into(),
            public: "/srv/app/assets-out".into(),
            ..Default::default()
        };
        assert!(!sibling_prefix.output_overlaps_source());
    }

    #[test]
    fn test_validate_default_ok() {
        let mut diag = ConfigDiagnostics::new();
        BuildSectionConfig::default().validate(&mut diag);
        assert!(!diag.has_errors());
    }
}
