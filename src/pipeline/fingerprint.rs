//! Content-hashed copies of compiled assets, and the manifest mapping to them.

use std::fs;
use std::path::Path;

use super::BundleError;
use crate::asset::scan::{collect_compiled, relative_slash_path};
use crate::asset::{ContentHash, Manifest, fingerprinted_path};
use crate::debug;
use crate::logger::StageProgress;

/// Fingerprint every compiled asset under `dir`.
///
/// Manifest paths are relative to `public`. The first read or write failure
/// stops the stage, and no manifest is produced.
pub fn fingerprint_tree(dir: &Path, public: &Path) -> Result<Manifest, BundleError> {
    let files = collect_compiled(dir, false);
    let progress = StageProgress::new("fingerprint", files.len());
    let mut manifest = Manifest::new();

    for path in files.iter() {
        let bytes =
            fs::read(path).map_err(|err| BundleError::FingerprintAborted(path.clone(), err))?;
        let hash = ContentHash::of(&bytes);
        let target = fingerprinted_path(path, hash);
        fs::write(&target, &bytes)
            .map_err(|err| BundleError::FingerprintAborted(target.clone(), err))?;

        let original = relative_slash_path(public, path);
        let fingerprinted = relative_slash_path(public, &target);
        debug!("fingerprint"; "{} -> {} ({})", original, fingerprinted, hash);
        manifest.insert(original, fingerprinted);
        progress.inc();
    }

    progress.finish();
    Ok(manifest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_copies_and_maps_every_compiled_asset() {
        let dir = TempDir::new().unwrap();
        let public = dir.path();
        let assets = public.join("assets");
        fs::create_dir_all(assets.join("style")).unwrap();
        fs::write(assets.join("app.js"), "app").unwrap();
        fs::write(assets.join("app.min.js"), "min").unwrap();
        fs::write(assets.join("style/app.css"), "css").unwrap();
        fs::write(assets.join("style/app.scss"), "scss").unwrap();

        let manifest = fingerprint_tree(&assets, public).unwrap();
        assert_eq!(manifest.len(), 3);

        let hex = ContentHash::of(b"css").to_hex();
        assert_eq!(
            manifest.resolve("assets/style/app.css"),
            Some(format!("assets/style/app-{hex}.css").as_str())
        );
        for (original, fingerprinted) in manifest.iter() {
            assert!(public.join(original).is_file());
            assert_eq!(
                fs::read(public.join(fingerprinted)).unwrap(),
                fs::read(public.join(original)).unwrap()
            );
        }
    }

    #[test]
    fn test_same_bytes_same_name() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.js"), "same").unwrap();
        fs::write(dir.path().join("b.js"), "same").unwrap();

        let manifest = fingerprint_tree(dir.path(), dir.path()).unwrap();
        let hex = ContentHash::of(b"same").to_hex();
        assert_eq!(manifest.resolve("a.js"), Some(format!("a-{hex}.js").as_str()));
        assert_eq!(manifest.resolve("b.js"), Some(format!("b-{hex}.js").as_str()));
    }

    #[test]
    fn test_unwritable_target_aborts() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("app.js"), "app").unwrap();
        let hex = ContentHash::of(b"app").to_hex();
        let blocked = dir.path().join(format!("app-{hex}.js"));
        fs::create_dir(&blocked).unwrap();

        let err = fingerprint_tree(dir.path(), dir.path()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(
            matches!(&err, BundleError::FingerprintAborted(path, _) if *path == blocked),
            "got {err:?}"
        );
    }
}
