//! `[build.compilers]` preprocessor commands.
//!
//! Each command reads the concatenated source on stdin and writes the
//! compiled output to stdout. It runs in the source file's directory.
//!
//! # Example
//!
//! ```toml
//! [build.compilers]
//! sass = ["sass", "--stdin", "--indented", "--no-source-map", "--load-path=."]
//! scss = ["sass", "--stdin", "--no-source-map", "--load-path=."]
//! coffee = ["coffee", "--stdio", "--print", "--compile"]
//! ```

use crate::asset::AssetKind;
use crate::config::ConfigDiagnostics;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilersConfig {
    pub sass: Vec<String>,
    pub scss: Vec<String>,
    pub coffee: Vec<String>,
}

impl Default for CompilersConfig {
    fn default() -> Self {
        let sass = |extra: &[&str]| -> Vec<String> {
            ["sass", "--stdin"]
                .iter()
                .chain(extra)
                .chain(&["--no-source-map", "--load-path=."])
                .map(|s| (*s).to_string())
                .collect()
        };
        Self {
            sass: sass(&["--indented"]),
            scss: sass(&[]),
            coffee: ["coffee", "--stdio", "--print", "--compile"]
                .map(String::from)
                .to_vec(),
        }
    }
}

impl CompilersConfig {
    /// Command for a preprocessor kind; `None` for kinds that need no compiler.
    pub fn command_for(&self, kind: AssetKind) -> Option<&[String]> {
        match kind {
            AssetKind::Sass => Some(&self.sass),
            AssetKind::Scss => Some(&self.scss),
            AssetKind::CoffeeScript => Some(&self.coffee),
            AssetKind::Script | AssetKind::Stylesheet | AssetKind::Other => None,
        }
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        let commands = [
            ("build.compilers.sass", &self.sass),
            ("build.compilers.scss", &self.scss),
            ("build.compilers.coffee", &self.coffee),
        ];
        for (field, command) in commands {
            if command.first().is_none_or(|program| program.trim().is_empty()) {
                diag.error_with_hint(
                    field,
                    "compiler command must not be empty",
                    "the command reads the source on stdin and prints the result",
                );
            } else if which::which(&command[0]).is_err() {
                diag.warn(
                    field,
                    format!("`{}` not found, such sources will fail to compile", command[0]),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let compilers = CompilersConfig::default();
        assert_eq!(
            compilers.scss,
            vec!["sass", "--stdin", "--no-source-map", "--load-path=."]
        );
        assert_eq!(
            compilers.sass,
            vec!["sass", "--stdin", "--indented", "--no-source-map", "--load-path=."]
        );
        assert_eq!(compilers.coffee[0], "coffee");
    }

    #[test]
    fn test_command_for() {
        let compilers = CompilersConfig::default();
        assert!(compilers.command_for(AssetKind::Scss).is_some());
        assert!(compilers.command_for(AssetKind::CoffeeScript).is_some());
        assert!(compilers.command_for(AssetKind::Script).is_none());
        assert!(compilers.command_for(AssetKind::Other).is_none());
    }

    #[test]
    fn test_empty_command_is_error() {
        let compilers = CompilersConfig {
            coffee: vec![],
            ..Default::default()
        };
        let mut diag = ConfigDiagnostics::new();
        compilers.validate(&mut diag);
        assert!(diag.errors().iter().any(|e| e.field == "build.compilers.coffee"));
    }
}
