//! Archive container layout and (de)serialization.
//!
//! A backup is a deflate-compressed zip with:
//! - `data.json`: the [`BackupManifest`]
//! - `images/clothes/<file>` and `images/shoes/<file>`: item photos

use anyhow::Context;
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{self, Read, Seek, Write};
use tracing::{debug, info, warn};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use super::{BackupDataset, BackupError, StagingArea};
use crate::storage::images::image_file_name;
use crate::storage::{ImageKind, ImageStore};
use shared::BackupManifest;

pub const MANIFEST_ENTRY: &str = "data.json";
pub const IMAGES_PREFIX: &str = "images/";

/// Strongest deflate level
const COMPRESSION_LEVEL: i64 = 9;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArchiveWriteReport {
    pub images_written: usize,
    pub images_skipped: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DecodedArchive {
    pub dataset: BackupDataset,
    pub images_extracted: usize,
}

impl DecodedArchive {
    pub fn has_images(&self) -> bool {
        self.images_extracted > 0
    }
}

/// Archive entry name for an image
pub fn image_entry_name(kind: ImageKind, file_name: &str) -> String {
    format!("{}{}/{}", IMAGES_PREFIX, kind.dir_name(), file_name)
}

/// Split an `images/<kind>/<file>` entry name. Nested or unknown paths are rejected.
fn parse_image_entry(name: &str) -> Option<(ImageKind, &str)> {
    let rest = name.strip_prefix(IMAGES_PREFIX)?;
    let (kind, file_name) = rest.split_once('/')?;
    let kind = ImageKind::from_dir_name(kind)?;
    (image_file_name(file_name) == Some(file_name)).then_some((kind, file_name))
}

fn image_references(dataset: &BackupDataset) -> impl Iterator<Item = (ImageKind, &str)> {
    let clothes = dataset
        .clothes
        .iter()
        .filter_map(|item| item.image_url.as_deref())
        .map(|reference| (ImageKind::Clothes, reference));
    let shoes = dataset
        .shoes
        .iter()
        .filter_map(|item| item.image_url.as_deref())
        .map(|reference| (ImageKind::Shoes, reference));
    clothes.chain(shoes)
}

/// Serialize a dataset and its photos into `writer`.
///
/// Photos that cannot be found or read are skipped; the manifest still
/// carries the item's original image reference.
pub fn write_archive<W: Write + Seek>(
    writer: W,
    dataset: &BackupDataset,
    images: &ImageStore,
) -> Result<ArchiveWriteReport, BackupError> {
    let manifest = dataset.to_manifest();
    let manifest_bytes =
        serde_json::to_vec_pretty(&manifest).context("Failed to encode backup manifest")?;

    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(COMPRESSION_LEVEL));

    let mut zip = ZipWriter::new(writer);
    zip.start_file(MANIFEST_ENTRY, options)
        .context("Failed to add data.json")?;
    zip.write_all(&manifest_bytes)
        .context("Failed to write data.json")?;

    let mut report = ArchiveWriteReport::default();
    let mut written_entries = HashSet::new();

    for (kind, reference) in image_references(dataset) {
        let Some(file_name) = image_file_name(reference) else {
            warn!("Skipping image with unusable reference '{}'", reference);
            report.images_skipped += 1;
            continue;
        };

        let entry_name = image_entry_name(kind, file_name);
        if written_entries.contains(&entry_name) {
            debug!("Image entry {} already written", entry_name);
            continue;
        }

        let Some(path) = images.resolve(kind, reference) else {
            warn!("Skipping missing {} image '{}'", kind.dir_name(), reference);
            report.images_skipped += 1;
            continue;
        };

        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) => {
                let error = BackupError::ImageIo {
                    path: path.clone(),
                    reason: e.to_string(),
                };
                warn!("{}", error);
                report.images_skipped += 1;
                continue;
            }
        };

        zip.start_file(entry_name.as_str(), options)
            .with_context(|| format!("Failed to add {}", entry_name))?;
        zip.write_all(&bytes)
            .with_context(|| format!("Failed to write {}", entry_name))?;
        written_entries.insert(entry_name);
        report.images_written += 1;
    }

    let mut inner = zip.finish().context("Failed to finish backup archive")?;
    inner.flush().context("Failed to flush backup archive")?;

    info!(
        "Archive written: {} users, {} wardrobes, {} clothes, {} shoes, {} images ({} skipped)",
        dataset.users.len(),
        dataset.wardrobes.len(),
        dataset.clothes.len(),
        dataset.shoes.len(),
        report.images_written,
        report.images_skipped
    );

    Ok(report)
}

/// Decode an archive, extracting its images into `staging`.
///
/// Fails with [`BackupError::MalformedArchive`] when the container is not a
/// zip, `data.json` is absent, or the manifest does not have the expected
/// shape. An archive without images is valid.
pub fn read_archive<R: Read + Seek>(
    reader: R,
    staging: &StagingArea,
) -> Result<DecodedArchive, BackupError> {
    let mut archive = ZipArchive::new(reader)
        .map_err(|e| BackupError::MalformedArchive(format!("not a backup archive: {}", e)))?;

    let mut manifest: Option<BackupManifest> = None;
    let mut images_extracted = 0;

    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .with_context(|| format!("Failed to read archive entry {}", index))?;
        if entry.is_dir() {
            continue;
        }

        let name = entry.name().to_string();
        if name == MANIFEST_ENTRY {
            let mut bytes = Vec::new();
            entry
                .read_to_end(&mut bytes)
                .context("Failed to read data.json")?;
            let decoded = serde_json::from_slice(&bytes).map_err(|e| {
                BackupError::MalformedArchive(format!("data.json could not be decoded: {}", e))
            })?;
            manifest = Some(decoded);
        } else if let Some((kind, file_name)) = parse_image_entry(&name) {
            let target = staging.image_path(kind, file_name);
            match extract_entry(&mut entry, &target) {
                Ok(()) => images_extracted += 1,
                Err(e) => {
                    let error = BackupError::ImageIo {
                        path: target,
                        reason: e.to_string(),
                    };
                    warn!("{}", error);
                }
            }
        } else {
            debug!("Ignoring unknown archive entry {}", name);
        }
    }

    let manifest = manifest
        .ok_or_else(|| BackupError::MalformedArchive(format!("{} is missing", MANIFEST_ENTRY)))?;

    Ok(DecodedArchive {
        dataset: BackupDataset::from_manifest(manifest),
        images_extracted,
    })
}

fn extract_entry<R: Read>(entry: &mut R, target: &std::path::Path) -> io::Result<()> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut output = File::create(target)?;
    io::copy(entry, &mut output)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{ClothingItem, ShoeItem, User, Wardrobe};
    use chrono::{NaiveDate, NaiveDateTime};
    use std::io::Cursor;
    use tempfile::TempDir;

    fn at(y: i32, m: u32, d: u32, millis: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_milli_opt(14, 3, 9, millis)
            .unwrap()
    }

    fn empty_dataset() -> BackupDataset {
        BackupDataset {
            users: vec![],
            wardrobes: vec![],
            clothes: vec![],
            shoes: vec![],
            created_at: at(2024, 5, 1, 0),
        }
    }

    fn sample_dataset(images: &ImageStore) -> BackupDataset {
        BackupDataset {
            users: vec![User {
                id: 1,
                name: "Ana".to_string(),
                gender: "female".to_string(),
                birthday: at(1990, 7, 21, 0),
                created_at: at(2024, 1, 1, 500),
            }],
            wardrobes: vec![Wardrobe {
                id: 10,
                name: "Bedroom".to_string(),
                description: None,
                created_at: at(2024, 1, 2, 1),
            }],
            clothes: vec![ClothingItem {
                id: 100,
                name: "Wool coat".to_string(),
                category: "outerwear".to_string(),
                season: "winter".to_string(),
                color: Some("navy".to_string()),
                position: Some("left rail".to_string()),
                image_url: Some(
                    images
                        .permanent_path(ImageKind::Clothes, "coat.jpg")
                        .to_string_lossy()
                        .into_owned(),
                ),
                wardrobe_id: Some(10),
                user_id: Some(1),
                created_at: at(2024, 1, 3, 999),
            }],
            shoes: vec![ShoeItem {
                id: 200,
                name: "Sandals".to_string(),
                brand: None,
                size: Some("38".to_string()),
                color: None,
                shoe_type: Some("sandal".to_string()),
                season: Some("summer".to_string()),
                price: Some(35.0),
                image_url: Some("/gone/sandals.jpg".to_string()),
                wardrobe_id: None,
                user_id: Some(1),
                created_at: at(2024, 1, 4, 42),
            }],
            created_at: at(2024, 5, 1, 123),
        }
    }

    fn entry_names(bytes: &[u8]) -> Vec<String> {
        let archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        archive.file_names().map(str::to_string).collect()
    }

    fn archive_with(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut zip = ZipWriter::new(&mut cursor);
            for (name, bytes) in entries {
                zip.start_file(*name, SimpleFileOptions::default()).unwrap();
                zip.write_all(bytes).unwrap();
            }
            zip.finish().unwrap();
        }
        cursor.into_inner()
    }

    #[test]
    fn test_round_trip_preserves_records_and_images() {
        let temp_dir = TempDir::new().unwrap();
        let images = ImageStore::new(temp_dir.path().join("images")).unwrap();
        fs::write(images.permanent_path(ImageKind::Clothes, "coat.jpg"), b"coat-bytes").unwrap();
        let dataset = sample_dataset(&images);

        let mut buffer = Cursor::new(Vec::new());
        let report = write_archive(&mut buffer, &dataset, &images).unwrap();
        assert_eq!(report.images_written, 1);
        assert_eq!(report.images_skipped, 1);

        let staging = StagingArea::prepare(temp_dir.path().join("staging")).unwrap();
        let decoded = read_archive(Cursor::new(buffer.into_inner()), &staging).unwrap();

        assert_eq!(decoded.dataset, dataset);
        assert!(decoded.has_images());
        assert_eq!(
            fs::read(staging.image_path(ImageKind::Clothes, "coat.jpg")).unwrap(),
            b"coat-bytes"
        );
    }

    #[test]
    fn test_missing_image_keeps_manifest_reference() {
        let temp_dir = TempDir::new().unwrap();
        let images = ImageStore::new(temp_dir.path()).unwrap();
        let dataset = sample_dataset(&images);

        let mut buffer = Cursor::new(Vec::new());
        let report = write_archive(&mut buffer, &dataset, &images).unwrap();
        assert_eq!(report.images_written, 0);

        let bytes = buffer.into_inner();
        assert_eq!(entry_names(&bytes), vec![MANIFEST_ENTRY.to_string()]);

        let staging = StagingArea::prepare(temp_dir.path().join("staging")).unwrap();
        let decoded = read_archive(Cursor::new(bytes), &staging).unwrap();
        assert_eq!(decoded.dataset.shoes[0].image_url.as_deref(), Some("/gone/sandals.jpg"));
        assert!(!decoded.has_images());
    }

    #[test]
    fn test_empty_dataset_produces_valid_archive() {
        let temp_dir = TempDir::new().unwrap();
        let images = ImageStore::new(temp_dir.path()).unwrap();

        let mut buffer = Cursor::new(Vec::new());
        write_archive(&mut buffer, &empty_dataset(), &images).unwrap();
        let bytes = buffer.into_inner();

        let mut archive = ZipArchive::new(Cursor::new(bytes.clone())).unwrap();
        let mut json = String::new();
        archive.by_name(MANIFEST_ENTRY).unwrap().read_to_string(&mut json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["users"], serde_json::json!([]));
        assert_eq!(value["shoes"], serde_json::json!([]));
        assert_eq!(value["createdAt"], "2024-05-01T14:03:09.000Z");

        let staging = StagingArea::prepare(temp_dir.path().join("staging")).unwrap();
        let decoded = read_archive(Cursor::new(bytes), &staging).unwrap();
        assert_eq!(decoded.dataset, empty_dataset());
        assert!(!decoded.has_images());
    }

    #[test]
    fn test_entries_are_deflated() {
        let temp_dir = TempDir::new().unwrap();
        let images = ImageStore::new(temp_dir.path()).unwrap();

        let mut buffer = Cursor::new(Vec::new());
        write_archive(&mut buffer, &empty_dataset(), &images).unwrap();

        let mut archive = ZipArchive::new(Cursor::new(buffer.into_inner())).unwrap();
        let entry = archive.by_name(MANIFEST_ENTRY).unwrap();
        assert_eq!(entry.compression(), CompressionMethod::Deflated);
    }

    #[test]
    fn test_missing_manifest_is_malformed() {
        let temp_dir = TempDir::new().unwrap();
        let bytes = archive_with(&[("images/clothes/a.jpg", b"a")]);

        let staging = StagingArea::prepare(temp_dir.path().join("staging")).unwrap();
        let error = read_archive(Cursor::new(bytes), &staging).unwrap_err();
        assert!(error.is_malformed_archive());
    }

    #[test]
    fn test_manifest_with_wrong_field_type_is_malformed() {
        let temp_dir = TempDir::new().unwrap();
        let manifest = br#"{"users": "nope", "wardrobes": [], "clothes": [], "shoes": [],
                            "createdAt": "2024-05-01T14:03:09.000Z"}"#;
        let bytes = archive_with(&[(MANIFEST_ENTRY, manifest)]);

        let staging = StagingArea::prepare(temp_dir.path().join("staging")).unwrap();
        let error = read_archive(Cursor::new(bytes), &staging).unwrap_err();
        assert!(matches!(error, BackupError::MalformedArchive(_)));
    }

    #[test]
    fn test_non_zip_input_is_malformed() {
        let temp_dir = TempDir::new().unwrap();
        let staging = StagingArea::prepare(temp_dir.path().join("staging")).unwrap();

        let error = read_archive(Cursor::new(b"plain text".to_vec()), &staging).unwrap_err();
        assert!(error.is_malformed_archive());
    }

    #[test]
    fn test_unsafe_image_entries_are_ignored() {
        let temp_dir = TempDir::new().unwrap();
        let manifest = br#"{"users": [], "wardrobes": [], "clothes": [], "shoes": [],
                            "createdAt": "2024-05-01T14:03:09.000Z"}"#;
        let bytes = archive_with(&[
            (MANIFEST_ENTRY, manifest),
            ("images/clothes/../../escape.jpg", b"x"),
            ("images/hats/cap.jpg", b"x"),
            ("images/shoes/boot.jpg", b"boot"),
        ]);

        let staging = StagingArea::prepare(temp_dir.path().join("staging")).unwrap();
        let decoded = read_archive(Cursor::new(bytes), &staging).unwrap();

        assert_eq!(decoded.images_extracted, 1);
        assert!(staging.image_path(ImageKind::Shoes, "boot.jpg").is_file());
        assert!(!temp_dir.path().join("escape.jpg").exists());
    }

    #[test]
    fn test_parse_image_entry() {
        assert_eq!(parse_image_entry("images/clothes/a.jpg"), Some((ImageKind::Clothes, "a.jpg")));
        assert_eq!(parse_image_entry("images/shoes/b.png"), Some((ImageKind::Shoes, "b.png")));
        assert_eq!(parse_image_entry("images/shoes/"), None);
        assert_eq!(parse_image_entry("images/shoes/x/b.png"), None);
        assert_eq!(parse_image_entry("data.json"), None);
    }
}
