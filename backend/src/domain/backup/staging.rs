use anyhow::{Context, Result};
use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::storage::ImageKind;

/// Sub-directory holding extracted archive images
const IMAGES_DIR: &str = "images";

/// Temporary extraction directory for one analyze/restore cycle.
///
/// Each cycle gets a fresh sub-directory of the staging root. Leftovers from
/// earlier cycles are removed on `prepare`, and the sub-directory is removed
/// again when the guard is dropped, whichever way the operation ends.
#[derive(Debug)]
pub struct StagingArea {
    path: PathBuf,
}

impl StagingArea {
    pub fn prepare<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref();
        if root.is_dir() {
            clear_leftovers(root)?;
        }

        let path = root.join(Uuid::new_v4().to_string());
        fs::create_dir_all(&path)
            .with_context(|| format!("Failed to create staging directory {:?}", path))?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn images_dir(&self, kind: ImageKind) -> PathBuf {
        self.path.join(IMAGES_DIR).join(kind.dir_name())
    }

    /// Where an extracted image of the given kind is staged
    pub fn image_path(&self, kind: ImageKind, file_name: &str) -> PathBuf {
        self.images_dir(kind).join(file_name)
    }
}

/// Remove the per-cycle directories of earlier cycles. Anything else under
/// the root is left alone.
fn clear_leftovers(root: &Path) -> Result<()> {
    let entries =
        fs::read_dir(root).with_context(|| format!("Failed to read staging directory {:?}", root))?;
    for entry in entries {
        let entry = entry.with_context(|| format!("Failed to read staging directory {:?}", root))?;
        let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
        if !is_dir || !is_cycle_dir_name(&entry.file_name()) {
            continue;
        }
        let path = entry.path();
        debug!("Clearing leftover staging directory {:?}", path);
        fs::remove_dir_all(&path)
            .with_context(|| format!("Failed to clear staging directory {:?}", path))?;
    }
    Ok(())
}

fn is_cycle_dir_name(name: &OsStr) -> bool {
    name.to_str().is_some_and(|n| Uuid::parse_str(n).is_ok())
}

impl Drop for StagingArea {
    fn drop(&mut self) {
        match fs::remove_dir_all(&self.path) {
            Ok(()) => debug!("Removed staging directory {:?}", self.path),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to remove staging directory {:?}: {}", self.path, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_prepare_clears_leftovers() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("staging");
        let leftover = path.join(Uuid::new_v4().to_string()).join("images/clothes");
        fs::create_dir_all(&leftover).unwrap();
        fs::write(leftover.join("old.jpg"), b"stale").unwrap();

        let staging = StagingArea::prepare(&path).unwrap();

        assert!(staging.path().is_dir());
        assert!(staging.path().starts_with(&path));
        assert!(!leftover.join("old.jpg").exists());
    }

    #[test]
    fn test_prepare_keeps_unrelated_files_under_root() {
        let temp_dir = TempDir::new().unwrap();
        let data_dir = temp_dir.path().join("data");
        fs::create_dir_all(data_dir.join("images/clothes")).unwrap();
        fs::write(data_dir.join("wardrobe.db"), b"db").unwrap();
        fs::write(data_dir.join("images/clothes/a.jpg"), b"photo").unwrap();

        let staging = StagingArea::prepare(&data_dir).unwrap();
        drop(staging);

        assert_eq!(fs::read(data_dir.join("wardrobe.db")).unwrap(), b"db");
        assert_eq!(fs::read(data_dir.join("images/clothes/a.jpg")).unwrap(), b"photo");
    }

    #[test]
    fn test_drop_removes_directory() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("staging");

        let staging = StagingArea::prepare(&path).unwrap();
        let staged = staging.path().to_path_buf();
        fs::create_dir_all(staging.images_dir(ImageKind::Shoes)).unwrap();
        drop(staging);

        assert!(!staged.exists());
    }

    #[test]
    fn test_superseded_area_does_not_remove_newer_one() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("staging");

        let older = StagingArea::prepare(&root).unwrap();
        let newer = StagingArea::prepare(&root).unwrap();
        drop(older);

        assert!(newer.path().is_dir());
    }
}
