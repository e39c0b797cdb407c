//! Output root preparation.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::BundleError;

/// Outcome of preparing the output root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prepared {
    /// The output root is a directory.
    Ready,
    /// Something other than a directory sits at the output root. Left untouched.
    Collision(PathBuf),
}

/// Make sure `root` exists as a directory.
///
/// A missing root is created (mode 0777 before umask on unix). An existing
/// directory is left alone.
pub fn prepare_output_root(root: &Path) -> Result<Prepared, BundleError> {
    match fs::metadata(root) {
        Ok(meta) if meta.is_dir() => Ok(Prepared::Ready),
        Ok(_) => Ok(Prepared::Collision(root.to_path_buf())),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            create_dir(root).map_err(|err| BundleError::Prepare(root.to_path_buf(), err))?;
            Ok(Prepared::Ready)
        }
        Err(err) => Err(BundleError::Prepare(root.to_path_buf(), err)),
    }
}

#[cfg(unix)]
fn create_dir(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    fs::DirBuilder::new().recursive(true).mode(0o777).create(path)
}

#[cfg(not(unix))]
fn create_dir(path: &Path) -> io::Result<()> {
    fs::create_dir_all(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_creates_missing_root() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("public");
        assert_eq!(prepare_output_root(&root).unwrap(), Prepared::Ready);
        assert!(root.is_dir());
    }

    #[test]
    fn test_existing_dir_untouched() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("keep.txt"), "x").unwrap();
        assert_eq!(prepare_output_root(dir.path()).unwrap(), Prepared::Ready);
        assert!(dir.path().join("keep.txt").exists());
    }

    #[test]
    fn test_file_collision() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("public");
        fs::write(&root, "not a dir").unwrap();

        assert_eq!(
            prepare_output_root(&root).unwrap(),
            Prepared::Collision(root.clone())
        );
        assert_eq!(fs::read_to_string(&root).unwrap(), "not a dir");
    }
}
