//! Delete-then-copy of the asset tree into the output root.

use std::fs;
use std::io;
use std::path::Path;

use super::BundleError;
use crate::debug;

/// Remove `dir` recursively. A missing `dir` is fine.
pub fn remove_assets(dir: &Path) -> Result<(), BundleError> {
    match fs::remove_dir_all(dir) {
        Ok(()) => {
            debug!("clean"; "removed {}", dir.display());
            Ok(())
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(BundleError::Clean(dir.to_path_buf(), err)),
    }
}

/// Copy the tree at `from` to `to`, returning the number of files copied.
pub fn copy_assets(from: &Path, to: &Path) -> Result<usize, BundleError> {
    copy_tree(from, to).map_err(|source| BundleError::Copy {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    })
}

fn copy_tree(from: &Path, to: &Path) -> io::Result<usize> {
    // Fails with NotFound before anything is created when `from` is missing.
    let entries = fs::read_dir(from)?;
    fs::create_dir_all(to)?;

    let mut copied = 0;
    for entry in entries {
        let entry = entry?;
        let target = to.join(entry.file_name());
        let mut file_type = entry.file_type()?;
        if file_type.is_symlink() {
            // Linked directories are copied as real directories.
            file_type = fs::metadata(entry.path())?.file_type();
        }
        if file_type.is_dir() {
            copied += copy_tree(&entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target)?;
            copied += 1;
        }
    }
    Ok(copied)
}
