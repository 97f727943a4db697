//! # Backup Module
//!
//! Portable backup archives of the whole catalog, and selective restore.
//!
//! Backup: store -> [`BackupDataset`] -> [`archive_codec::write_archive`] -> sink.
//!
//! Restore: source -> [`archive_codec::read_archive`] (manifest + staged
//! images) -> [`restore_planner::plan_restore`] ->
//! [`image_relocator::relocate_images`] ->
//! [`insertion_driver::insert_planned_records`] -> store.
//!
//! The orchestration, status reporting and background execution live in
//! `BackupService`.

pub mod archive_codec;
pub mod error;
pub mod image_relocator;
pub mod insertion_driver;
pub mod restore_planner;
pub mod staging;
pub mod streams;

pub use archive_codec::{read_archive, write_archive, ArchiveWriteReport, DecodedArchive};
pub use error::BackupError;
pub use image_relocator::{relocate_images, RelocationReport};
pub use insertion_driver::{insert_planned_records, InsertOutcome, InsertionReport, RecordOutcome};
pub use restore_planner::{plan_restore, RestorePlan};
pub use staging::StagingArea;
pub use streams::{ArchiveSink, ArchiveSource, FileHandle};

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use std::fmt;

use crate::domain::models::{ClothingItem, ShoeItem, User, Wardrobe};
use crate::io::rest::mappers::{ClothesMapper, ShoesMapper, UserMapper, WardrobeMapper};
use crate::storage::EntityStore;
use shared::BackupManifest;

/// The four record kinds carried by an archive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    User,
    Wardrobe,
    Clothes,
    Shoes,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RecordKind::User => "user",
            RecordKind::Wardrobe => "wardrobe",
            RecordKind::Clothes => "clothes",
            RecordKind::Shoes => "shoes",
        };
        f.write_str(label)
    }
}

/// Every record in the catalog plus the moment the snapshot was taken
#[derive(Debug, Clone, PartialEq)]
pub struct BackupDataset {
    pub users: Vec<User>,
    pub wardrobes: Vec<Wardrobe>,
    pub clothes: Vec<ClothingItem>,
    pub shoes: Vec<ShoeItem>,
    pub created_at: NaiveDateTime,
}

impl BackupDataset {
    /// Read every record from the store
    pub async fn load(store: &EntityStore, created_at: NaiveDateTime) -> Result<Self> {
        Ok(Self {
            users: store.users.list_users().await.context("Failed to read users")?,
            wardrobes: store
                .wardrobes
                .list_wardrobes()
                .await
                .context("Failed to read wardrobes")?,
            clothes: store.clothes.list_clothes().await.context("Failed to read clothes")?,
            shoes: store.shoes.list_shoes().await.context("Failed to read shoes")?,
            created_at,
        })
    }

    pub fn to_manifest(&self) -> BackupManifest {
        BackupManifest {
            users: self.users.iter().cloned().map(UserMapper::to_dto).collect(),
            wardrobes: self.wardrobes.iter().cloned().map(WardrobeMapper::to_dto).collect(),
            clothes: self.clothes.iter().cloned().map(ClothesMapper::to_dto).collect(),
            shoes: self.shoes.iter().cloned().map(ShoesMapper::to_dto).collect(),
            created_at: self.created_at,
        }
    }

    pub fn from_manifest(manifest: BackupManifest) -> Self {
        Self {
            users: manifest.users.into_iter().map(UserMapper::to_domain).collect(),
            wardrobes: manifest.wardrobes.into_iter().map(WardrobeMapper::to_domain).collect(),
            clothes: manifest.clothes.into_iter().map(ClothesMapper::to_domain).collect(),
            shoes: manifest.shoes.into_iter().map(ShoesMapper::to_domain).collect(),
            created_at: manifest.created_at,
        }
    }
}
