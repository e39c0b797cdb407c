//! Resolved asset content.
//!
//! [`AssetReader`] is the seam between the bundler and whatever knows how to
//! turn a logical asset path into final text. [`SourceReader`] is the default:
//! it follows require directives inside the source asset directory and pipes
//! preprocessor sources through the configured compiler.

use std::fs;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashSet;
use thiserror::Error;

use super::directive::{parse_header, strip_header};
use super::AssetKind;
use crate::config::CompilersConfig;
use crate::debug;
use crate::utils::exec::Cmd;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("asset `{0}` not found")]
    NotFound(String),

    #[error("`{asset}` requires `{dependency}`, which does not exist")]
    MissingDependency { asset: String, dependency: String },

    #[error("failed to read `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("failed to compile `{asset}`")]
    Compile {
        asset: String,
        #[source]
        source: anyhow::Error,
    },
}

/// Produces the final text of an asset from its logical path.
///
/// A logical path is relative to the asset root and uses `/`
/// (`style/app.scss`).
pub trait AssetReader {
    fn read_asset(&self, logical: &str) -> Result<String, ResolveError>;
}

/// Reads assets from the source directory.
pub struct SourceReader<'a> {
    root: &'a Path,
    compilers: &'a CompilersConfig,
    partial_prefix: &'a str,
}

impl<'a> SourceReader<'a> {
    pub fn new(root: &'a Path, compilers: &'a CompilersConfig, partial_prefix: &'a str) -> Self {
        Self {
            root,
            compilers,
            partial_prefix,
        }
    }

    /// Concatenate `path` after everything it requires.
    ///
    /// `seen` holds files already emitted in this resolution; requiring one
    /// of them again is a no-op, which also cuts cycles.
    fn concat(
        &self,
        path: &Path,
        logical: &str,
        seen: &mut FxHashSet<PathBuf>,
        out: &mut Vec<String>,
    ) -> Result<(), ResolveError> {
        if !seen.insert(path.to_path_buf()) {
            return Ok(());
        }

        let content =
            fs::read_to_string(path).map_err(|err| ResolveError::Io(path.to_path_buf(), err))?;
        let kind = AssetKind::from_path(path);
        let header = parse_header(&content, kind);

        for require in &header.requires {
            let dep = self
                .locate(path, require)
                .ok_or_else(|| ResolveError::MissingDependency {
                    asset: logical.to_string(),
                    dependency: require.clone(),
                })?;
            debug!("bundle"; "{} <- {}", logical, require);
            self.concat(&dep, logical, seen, out)?;
        }

        out.push(strip_header(&content, kind).to_string());
        Ok(())
    }

    /// Find the file a `require` line in `from` points to.
    ///
    /// Tried in order: as written, with the requiring file's extension,
    /// then (stylesheet sources only) the partial spelling.
    fn locate(&self, from: &Path, require: &str) -> Option<PathBuf> {
        let base = from.parent().unwrap_or(self.root);
        let target = base.join(require);
        let from_ext = from.extension().and_then(|e| e.to_str()).unwrap_or_default();

        let mut candidates = vec![target.clone()];
        if target.extension().is_none() {
            candidates.push(target.with_extension(from_ext));
        }
        if matches!(AssetKind::from_path(from), AssetKind::Scss | AssetKind::Sass)
            && let Some(name) = target.file_name().and_then(|n| n.to_str())
            && !name.starts_with(self.partial_prefix)
        {
            let partial = target.with_file_name(format!("{}{name}", self.partial_prefix));
            if partial.extension().is_none() {
                candidates.push(partial.with_extension(from_ext));
            }
            candidates.push(partial);
        }

        candidates.into_iter().find(|p| p.is_file())
    }

    fn compile(
        &self,
        kind: AssetKind,
        path: &Path,
        logical: &str,
        text: String,
    ) -> Result<String, ResolveError> {
        let Some(command) = self.compilers.command_for(kind) else {
            return Ok(text);
        };
        let dir = path.parent().unwrap_or(self.root);

        let output = Cmd::from_slice(command)
            .cwd(dir)
            .stdin(text)
            .run()
            .map_err(|source| ResolveError::Compile {
                asset: logical.to_string(),
                source,
            })?;

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl AssetReader for SourceReader<'_> {
    fn read_asset(&self, logical: &str) -> Result<String, ResolveError> {
        let path = self.root.join(logical);
        if !path.is_file() {
            return Err(ResolveError::NotFound(logical.to_string()));
        }

        let mut parts = Vec::new();
        self.concat(&path, logical, &mut FxHashSet::default(), &mut parts)?;
        let content = parts.join("\n");

        let kind = AssetKind::from_path(&path);
        if kind.is_preprocessed() {
            self.compile(kind, &path, logical, content)
        } else {
            Ok(content)
        }
    }
}
