//! Configuration utility functions.

use std::fs;
use std::path::{Component, Path, PathBuf};

/// Find config file by searching upward from current directory
///
/// Starts from cwd and walks up parent directories until finding `config_name`
/// Returns the absolute path to the config file if found
///
/// # Example
/// ```text
/// /home/user/app/assets/js/  ← cwd
/// /home/user/app/train.toml  ← found!
/// ```
pub fn find_config_file(config_name: &Path) -> Option<PathBuf> {
    if config_name.is_absolute() {
        return config_name.is_file().then(|| config_name.to_path_buf());
    }
    let cwd = std::env::current_dir().ok()?;
    find_config_from(&cwd, config_name)
}

fn find_config_from(start: &Path, config_name: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(config_name))
        .find(|candidate| candidate.is_file())
}

/// `path` if absolute, otherwise `base/path`.
pub fn absolutize(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

/// Lexically drop `.` and fold `..` into the preceding component.
pub fn clean_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other),
        }
    }
    out
}

/// Cleaned `path` with its deepest existing ancestor resolved through
/// symlinks, so paths that do not exist yet still compare against real ones.
pub fn real_path(path: &Path) -> PathBuf {
    let cleaned = clean_path(path);
    for ancestor in cleaned.ancestors() {
        if let Ok(real) = fs::canonicalize(ancestor)
            && let Ok(rest) = cleaned.strip_prefix(ancestor)
        {
            return if rest.as_os_str().is_empty() {
                real
            } else {
                real.join(rest)
            };
        }
    }
    cleaned
}

// ============================================================================
// tests
// ============================================================================
