//! Asset tree scanning (pure, no side effects).

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use jwalk::{Parallelism, WalkDir};
use regex::Regex;

use super::CompiledKind;

/// Files to ignore during traversal.
pub const IGNORED_FILES: &[&str] = &[".DS_Store"];

/// Collect every file under `dir`, depth-first, in a stable order.
///
/// Directories are not returned. A missing `dir` yields nothing.
pub fn collect_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<_> = WalkDir::new(dir)
        .sort(true)
        .skip_hidden(false)
        .parallelism(Parallelism::Serial)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            let name = e.file_name().to_str().unwrap_or_default();
            !IGNORED_FILES.contains(&name)
        })
        .map(|e| e.path())
        .collect();
    files.sort();
    files
}

/// Compiled scripts and stylesheets found in an output tree.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CompiledFiles {
    pub scripts: Vec<PathBuf>,
    pub stylesheets: Vec<PathBuf>,
}

impl CompiledFiles {
    pub fn of(&self, kind: CompiledKind) -> &[PathBuf] {
        match kind {
            CompiledKind::Script => &self.scripts,
            CompiledKind::Stylesheet => &self.stylesheets,
        }
    }

    pub fn len(&self) -> usize {
        self.scripts.len() + self.stylesheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Scripts first, then stylesheets.
    pub fn iter(&self) -> impl Iterator<Item = &PathBuf> {
        self.scripts.iter().chain(self.stylesheets.iter())
    }
}

/// Collect compiled assets under `dir`.
///
/// With `skip_minified`, files that already look minified are left out.
pub fn collect_compiled(dir: &Path, skip_minified: bool) -> CompiledFiles {
    let mut found = CompiledFiles::default();
    for path in collect_files(dir) {
        if skip_minified && is_minified(path.strip_prefix(dir).unwrap_or(&path)) {
            continue;
        }
        match CompiledKind::from_path(&path) {
            Some(CompiledKind::Script) => found.scripts.push(path),
            Some(CompiledKind::Stylesheet) => found.stylesheets.push(path),
            None => {}
        }
    }
    found
}

/// `app.min.js`, `jquery-min.css`, `vendor/min/jquery.js` and the like.
///
/// The match is purely textual: any name ending in `min.<ext>` counts,
/// including `admin.js`. Relative paths are matched as if rooted, so a
/// top-level `min/` directory counts too.
pub fn is_minified(path: &Path) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"(min\.\w+$)|/min/").unwrap());
    let rooted = format!("/{}", slash_path(path).trim_start_matches('/'));
    re.is_match(&rooted)
}

/// Path of `path` below `root`, always with `/` separators.
pub fn relative_slash_path(root: &Path, path: &Path) -> String {
    slash_path(path.strip_prefix(root).unwrap_or(path))
}

fn slash_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
        .replace("//", "/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, rel).unwrap();
    }

    #[test]
    fn test_collect_files_sorted_and_files_only() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "b.js");
        touch(dir.path(), "a/z.css");
        touch(dir.path(), "a/y.scss");
        touch(dir.path(), ".DS_Store");
        fs::create_dir_all(dir.path().join("empty")).unwrap();

        let files = collect_files(dir.path());
        let rels: Vec<_> = files
            .iter()
            .map(|p| relative_slash_path(dir.path(), p))
            .collect();
        assert_eq!(rels, vec!["a/y.scss", "a/z.css", "b.js"]);
    }

    #[test]
    fn test_collect_files_missing_dir() {
        let dir = TempDir::new().unwrap();
        assert!(collect_files(&dir.path().join("nope")).is_empty());
    }

    #[test]
    fn test_is_minified() {
        assert!(is_minified(Path::new("public/assets/app.min.js")));
        assert!(is_minified(Path::new("public/assets/jquery-min.css")));
        assert!(is_minified(Path::new("public/assets/min/app.js")));
        assert!(is_minified(Path::new("min.js")));
        assert!(is_minified(Path::new("public/assets/admin.js")));
        assert!(is_minified(Path::new("min/vendor.js")));
        assert!(!is_minified(Path::new("public/assets/app.js")));
        assert!(!is_minified(Path::new("public/assets/minimal/app.js")));
    }

    #[test]
    fn test_collect_compiled_with_and_without_filter() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "app.js");
        touch(dir.path(), "app.min.js");
        touch(dir.path(), "min/lib.js");
        touch(dir.path(), "style/app.css");
        touch(dir.path(), "style/app.scss");
        touch(dir.path(), "logo.png");

        let all = collect_compiled(dir.path(), false);
        assert_eq!(all.scripts.len(), 3);
        assert_eq!(all.stylesheets.len(), 1);

        let eligible = collect_compiled(dir.path(), true);
        assert_eq!(eligible.scripts, vec![dir.path().join("app.js")]);
        assert_eq!(eligible.stylesheets, vec![dir.path().join("style/app.css")]);
        assert_eq!(eligible.len(), 2);
    }

    #[test]
    fn test_relative_slash_path() {
        let root = Path::new("/srv/public");
        assert_eq!(
            relative_slash_path(root, Path::new("/srv/public/assets/style/app.css")),
            "assets/style/app.css"
        );
    }
}
