//! Private image storage.
//!
//! Photos live under one directory per record kind (`<root>/clothes`,
//! `<root>/shoes`). Records carry the full path of their photo as a string.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Record kinds that can carry a photo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageKind {
    Clothes,
    Shoes,
}

impl ImageKind {
    pub const ALL: [ImageKind; 2] = [ImageKind::Clothes, ImageKind::Shoes];

    /// Directory name used both on disk and inside backup archives
    pub fn dir_name(self) -> &'static str {
        match self {
            ImageKind::Clothes => "clothes",
            ImageKind::Shoes => "shoes",
        }
    }

    pub fn from_dir_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.dir_name() == name)
    }
}

/// Base file name of a stored image reference.
///
/// References may have been written on another platform, so both separators
/// are accepted.
pub fn image_file_name(reference: &str) -> Option<&str> {
    reference
        .rsplit(['/', '\\'])
        .next()
        .map(str::trim)
        .filter(|name| !name.is_empty() && *name != "." && *name != "..")
}

#[derive(Debug, Clone)]
pub struct ImageStore {
    root: PathBuf,
}

impl ImageStore {
    /// Create the store, making sure every per-kind directory exists
    pub fn new<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        for kind in ImageKind::ALL {
            let dir = root.join(kind.dir_name());
            fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create image directory {:?}", dir))?;
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn kind_directory(&self, kind: ImageKind) -> PathBuf {
        self.root.join(kind.dir_name())
    }

    /// Permanent location for an image of the given kind
    pub fn permanent_path(&self, kind: ImageKind, file_name: &str) -> PathBuf {
        self.kind_directory(kind).join(file_name)
    }

    /// Resolve a stored reference to a readable local file.
    ///
    /// The reference is tried as-is first, then by file name inside the
    /// kind's directory. Returns `None` when neither exists.
    pub fn resolve(&self, kind: ImageKind, reference: &str) -> Option<PathBuf> {
        let direct = Path::new(reference);
        if direct.is_file() {
            return Some(direct.to_path_buf());
        }

        let fallback = self.permanent_path(kind, image_file_name(reference)?);
        fallback.is_file().then_some(fallback)
    }
}
