//! # Backup Service
//!
//! Boundary operations of the backup subsystem: create an archive, analyze an
//! archive without touching the store, and restore a selection from an
//! analyzed archive.
//!
//! Every operation publishes its progress on a `watch` channel of
//! [`BackupStatus`] and ends with a short human-readable message. File and
//! zip work runs on the blocking thread pool; store calls stay async.

use anyhow::Context;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::domain::backup::{
    insert_planned_records, plan_restore, read_archive, relocate_images, write_archive,
    ArchiveSink, ArchiveSource, BackupDataset, BackupError, StagingArea,
};
use crate::domain::clock;
use crate::domain::session::SessionContext;
use crate::io::rest::mappers::UserMapper;
use crate::storage::{EntityStore, ImageStore};
use shared::timestamp::format_timestamp;
use shared::{BackupOperation, BackupReport, BackupStatus, BackupSummary, RestoreRequest, RestoreSummary};

/// An archive that has been decoded and is waiting for a restore selection.
///
/// Owns the staging area holding the archive's images; dropping it removes them.
#[derive(Debug)]
pub struct AnalyzedBackup {
    pub summary: BackupSummary,
    pub dataset: BackupDataset,
    staging: StagingArea,
}

impl AnalyzedBackup {
    pub fn staging(&self) -> &StagingArea {
        &self.staging
    }
}

#[derive(Clone)]
pub struct BackupService {
    store: EntityStore,
    images: ImageStore,
    staging_dir: PathBuf,
    session: SessionContext,
    status: Arc<watch::Sender<BackupStatus>>,
}

impl BackupService {
    pub fn new(
        store: EntityStore,
        images: ImageStore,
        staging_dir: PathBuf,
        session: SessionContext,
    ) -> Self {
        let (status, _) = watch::channel(BackupStatus::Idle);
        Self {
            store,
            images,
            staging_dir,
            session,
            status: Arc::new(status),
        }
    }

    /// Latest status
    pub fn status(&self) -> BackupStatus {
        self.status.borrow().clone()
    }

    pub fn subscribe_status(&self) -> watch::Receiver<BackupStatus> {
        self.status.subscribe()
    }

    /// Claim the status channel for `operation`. Fails without touching the
    /// status when another operation holds it.
    fn begin(&self, operation: BackupOperation) -> Result<(), BackupError> {
        let claimed = self.status.send_if_modified(|status| {
            if status.is_running() {
                return false;
            }
            *status = BackupStatus::Running(operation);
            true
        });
        if claimed {
            Ok(())
        } else {
            warn!("Rejected {:?}: another backup operation is running", operation);
            Err(BackupError::AlreadyRunning)
        }
    }

    fn finish<T>(
        &self,
        result: Result<T, BackupError>,
        message: impl FnOnce(&T) -> String,
    ) -> Result<T, BackupError> {
        let status = match &result {
            Ok(value) => BackupStatus::Succeeded {
                message: message(value),
            },
            Err(e) => {
                error!("Backup operation failed: {:#}", e);
                BackupStatus::Failed {
                    message: e.user_message(),
                }
            }
        };
        self.status.send_replace(status);
        result
    }

    /// Write every record and photo to `sink`
    pub async fn create_backup(&self, sink: Arc<dyn ArchiveSink>) -> Result<BackupReport, BackupError> {
        info!("Creating backup at {}", sink.describe());
        self.begin(BackupOperation::Create)?;
        let result = self.write_backup(sink).await;
        self.finish(result, |report| report.message.clone())
    }

    /// Start [`Self::create_backup`] in the background; progress is visible
    /// through the status channel. The status is claimed before this returns,
    /// so a second call made right after fails with `AlreadyRunning`.
    pub fn spawn_create_backup(&self, sink: Arc<dyn ArchiveSink>) -> Result<JoinHandle<()>, BackupError> {
        info!("Creating backup at {} in the background", sink.describe());
        self.begin(BackupOperation::Create)?;
        let service = self.clone();
        Ok(tokio::spawn(async move {
            let result = service.write_backup(sink).await;
            if let Err(e) = service.finish(result, |report| report.message.clone()) {
                warn!("Background backup did not complete: {}", e);
            }
        }))
    }

    async fn write_backup(&self, sink: Arc<dyn ArchiveSink>) -> Result<BackupReport, BackupError> {
        let dataset = BackupDataset::load(&self.store, clock::now_local_millis()).await?;
        let images = self.images.clone();

        let counts = (
            dataset.users.len(),
            dataset.wardrobes.len(),
            dataset.clothes.len(),
            dataset.shoes.len(),
        );

        let written = tokio::task::spawn_blocking(move || -> Result<_, BackupError> {
            let writer = sink
                .open_for_write()
                .with_context(|| format!("Failed to open {} for writing", sink.describe()))?;
            write_archive(writer, &dataset, &images)
        })
        .await
        .context("Backup task failed")??;

        let (users, wardrobes, clothes, shoes) = counts;
        Ok(BackupReport {
            users_count: users,
            wardrobes_count: wardrobes,
            clothes_count: clothes,
            shoes_count: shoes,
            images_count: written.images_written,
            message: format!(
                "Backup created: {} users, {} wardrobes, {} clothes, {} shoes, {} images",
                users, wardrobes, clothes, shoes, written.images_written
            ),
        })
    }

    /// Decode an archive and describe its contents. The store is not touched.
    pub async fn analyze_backup(&self, source: Arc<dyn ArchiveSource>) -> Result<AnalyzedBackup, BackupError> {
        info!("Analyzing backup {}", source.describe());
        self.begin(BackupOperation::Analyze)?;
        let result = self.read_backup(source).await;
        self.finish(result, |analyzed| {
            format!(
                "Backup from {} contains {} users",
                analyzed.summary.created_at, analyzed.summary.users_count
            )
        })
    }

    async fn read_backup(&self, source: Arc<dyn ArchiveSource>) -> Result<AnalyzedBackup, BackupError> {
        let staging_dir = self.staging_dir.clone();

        tokio::task::spawn_blocking(move || -> Result<AnalyzedBackup, BackupError> {
            let staging = StagingArea::prepare(&staging_dir)?;
            let reader = source
                .open_for_read()
                .with_context(|| format!("Failed to open {} for reading", source.describe()))?;
            let decoded = read_archive(reader, &staging)?;
            let summary = summarize(&decoded.dataset, decoded.has_images());

            info!(
                "Backup analyzed: {} users, {} wardrobes, {} clothes, {} shoes, {} images",
                summary.users_count,
                summary.wardrobes_count,
                summary.clothes_count,
                summary.shoes_count,
                decoded.images_extracted
            );

            Ok(AnalyzedBackup {
                summary,
                dataset: decoded.dataset,
                staging,
            })
        })
        .await
        .context("Analyze task failed")?
    }

    /// Restore the selected users and their records from an analyzed archive.
    ///
    /// Individual records that fail to insert are skipped and reported in the
    /// summary. Nothing is rolled back if the operation fails midway.
    pub async fn restore_selected_data(
        &self,
        analyzed: AnalyzedBackup,
        request: RestoreRequest,
    ) -> Result<RestoreSummary, BackupError> {
        info!(
            "Restoring users {:?} (clothes: {}, shoes: {}, wardrobes: {})",
            request.selected_user_ids, request.include_clothes, request.include_shoes, request.include_wardrobes
        );
        self.begin(BackupOperation::Restore)?;
        let result = self.restore(analyzed, request).await;
        self.finish(result, |summary| summary.message.clone())
    }

    async fn restore(&self, analyzed: AnalyzedBackup, request: RestoreRequest) -> Result<RestoreSummary, BackupError> {
        let mut plan = plan_restore(&analyzed.dataset, &request);
        info!("Restore plan has {} records", plan.record_count());

        let images = self.images.clone();
        let (plan, relocation) = tokio::task::spawn_blocking(move || {
            let relocation = relocate_images(&mut plan, analyzed.staging(), &images);
            (plan, relocation)
        })
        .await
        .context("Image restore task failed")?;

        info!(
            "Images restored: {} copied, {} missing, {} failed",
            relocation.copied, relocation.missing, relocation.failed
        );

        let report = insert_planned_records(&plan, &self.store, &self.session).await;

        if let Some(user) = &report.active_user {
            if let Err(e) = self.store.users.set_active_user(user.id).await {
                warn!("Failed to persist active user {}: {:#}", user.id, e);
            }
        }

        let summary = report.to_summary();
        info!("{}", summary.message);
        Ok(summary)
    }
}

fn summarize(dataset: &BackupDataset, has_images: bool) -> BackupSummary {
    BackupSummary {
        created_at: format_timestamp(&dataset.created_at),
        users_count: dataset.users.len(),
        wardrobes_count: dataset.wardrobes.len(),
        clothes_count: dataset.clothes.len(),
        shoes_count: dataset.shoes.len(),
        has_images,
        users: dataset
            .users
            .iter()
            .map(|user| UserMapper::to_backup_user_info(&UserMapper::to_dto(user.clone())))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{ClothingItem, ShoeItem, User, Wardrobe, UNASSIGNED_ID};
    use crate::storage::{DbConnection, ImageKind};
    use chrono::NaiveDate;
    use std::fs;
    use std::io::Write;
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    use crate::domain::backup::FileHandle;

    struct Fixture {
        temp_dir: TempDir,
        service: BackupService,
        store: EntityStore,
        images: ImageStore,
        session: SessionContext,
    }

    async fn fixture() -> Fixture {
        let temp_dir = TempDir::new().unwrap();
        let db = DbConnection::init_test().await.unwrap();
        let store = EntityStore::sqlite(db);
        let images = ImageStore::new(temp_dir.path().join("images")).unwrap();
        let session = SessionContext::new();
        let service = BackupService::new(
            store.clone(),
            images.clone(),
            temp_dir.path().join("staging"),
            session.clone(),
        );
        Fixture {
            temp_dir,
            service,
            store,
            images,
            session,
        }
    }

    fn day(d: u32) -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, 11, d).unwrap().and_hms_milli_opt(18, 45, 3, 250).unwrap()
    }

    async fn seed(fixture: &Fixture) {
        let store = &fixture.store;
        for (id, name) in [(1, "Ana"), (2, "Ben")] {
            store
                .users
                .insert_user(&User {
                    id,
                    name: name.to_string(),
                    gender: "female".to_string(),
                    birthday: day(1),
                    created_at: day(2),
                })
                .await
                .unwrap();
        }
        store
            .wardrobes
            .insert_wardrobe(&Wardrobe {
                id: 5,
                name: "Hallway".to_string(),
                description: Some("By the door".to_string()),
                created_at: day(3),
            })
            .await
            .unwrap();

        let photo = fixture.images.permanent_path(ImageKind::Clothes, "parka.jpg");
        fs::write(&photo, b"parka-photo").unwrap();
        store
            .clothes
            .insert_clothes(&ClothingItem {
                id: 50,
                name: "Parka".to_string(),
                category: "outerwear".to_string(),
                season: "winter".to_string(),
                color: Some("green".to_string()),
                position: Some("hook".to_string()),
                image_url: Some(photo.to_string_lossy().into_owned()),
                wardrobe_id: Some(5),
                user_id: Some(1),
                created_at: day(4),
            })
            .await
            .unwrap();
        store
            .shoes
            .insert_shoes(&ShoeItem {
                id: UNASSIGNED_ID,
                name: "Loafers".to_string(),
                brand: Some("Acme".to_string()),
                size: Some("44".to_string()),
                color: None,
                shoe_type: Some("loafer".to_string()),
                season: None,
                price: Some(120.0),
                image_url: None,
                wardrobe_id: None,
                user_id: Some(2),
                created_at: day(5),
            })
            .await
            .unwrap();
    }

    fn select(users: &[i64]) -> RestoreRequest {
        RestoreRequest {
            selected_user_ids: users.to_vec(),
            include_clothes: true,
            include_shoes: true,
            include_wardrobes: false,
        }
    }

    #[tokio::test]
    async fn test_backup_then_restore_into_empty_install() {
        let source = fixture().await;
        seed(&source).await;
        let archive = Arc::new(FileHandle::new(source.temp_dir.path().join("out/backup.zip")));

        let report = source.service.create_backup(archive.clone()).await.unwrap();
        assert_eq!(report.users_count, 2);
        assert_eq!(report.images_count, 1);
        assert_eq!(source.service.status(), BackupStatus::Succeeded { message: report.message.clone() });

        let target = fixture().await;
        let analyzed = target.service.analyze_backup(archive).await.unwrap();
        assert_eq!(analyzed.summary.users_count, 2);
        assert_eq!(analyzed.summary.clothes_count, 1);
        assert!(analyzed.summary.has_images);
        assert_eq!(analyzed.summary.users[0].birthday, "2023-11-01");
        assert!(target.store.users.list_users().await.unwrap().is_empty());

        let staged = analyzed.staging().path().to_path_buf();
        let summary = target.service.restore_selected_data(analyzed, select(&[1])).await.unwrap();

        assert_eq!(summary.users_count, 1);
        assert_eq!(summary.wardrobes_count, 1);
        assert_eq!(summary.clothes_count, 1);
        assert_eq!(summary.shoes_count, 0);
        assert_eq!(summary.active_user_id, Some(1));
        assert_eq!(target.session.current().map(|u| u.id), Some(1));
        assert_eq!(target.store.users.get_active_user().await.unwrap(), Some(1));
        assert!(!staged.exists());

        let parka = target.store.clothes.get_clothes(50).await.unwrap().unwrap();
        let restored_photo = target.images.permanent_path(ImageKind::Clothes, "parka.jpg");
        assert_eq!(parka.image_url.as_deref(), restored_photo.to_str());
        assert_eq!(fs::read(restored_photo).unwrap(), b"parka-photo");
        assert_eq!(parka.created_at, day(4));
    }

    #[tokio::test]
    async fn test_empty_store_backup_analyzes_as_empty() {
        let fixture = fixture().await;
        let archive = Arc::new(FileHandle::new(fixture.temp_dir.path().join("empty.zip")));

        fixture.service.create_backup(archive.clone()).await.unwrap();
        let analyzed = fixture.service.analyze_backup(archive).await.unwrap();

        assert_eq!(analyzed.summary.users_count, 0);
        assert_eq!(analyzed.summary.wardrobes_count, 0);
        assert_eq!(analyzed.summary.clothes_count, 0);
        assert_eq!(analyzed.summary.shoes_count, 0);
        assert!(!analyzed.summary.has_images);
    }

    #[tokio::test]
    async fn test_restoring_twice_replaces_instead_of_duplicating() {
        let fixture = fixture().await;
        seed(&fixture).await;
        let archive = Arc::new(FileHandle::new(fixture.temp_dir.path().join("backup.zip")));
        fixture.service.create_backup(archive.clone()).await.unwrap();

        for _ in 0..2 {
            let analyzed = fixture.service.analyze_backup(archive.clone()).await.unwrap();
            let summary = fixture
                .service
                .restore_selected_data(analyzed, select(&[1, 2]))
                .await
                .unwrap();
            assert!(summary.skipped.is_empty());
            assert_eq!(summary.shoes_count, 1);
        }

        assert_eq!(fixture.store.users.list_users().await.unwrap().len(), 2);
        assert_eq!(fixture.store.wardrobes.list_wardrobes().await.unwrap().len(), 1);
        assert_eq!(fixture.store.clothes.list_clothes().await.unwrap().len(), 1);
        assert_eq!(fixture.store.shoes.list_shoes().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_archive_without_manifest_fails_before_any_insert() {
        let fixture = fixture().await;
        let path = fixture.temp_dir.path().join("broken.zip");
        {
            let mut zip = ZipWriter::new(fs::File::create(&path).unwrap());
            zip.start_file("images/clothes/a.jpg", SimpleFileOptions::default()).unwrap();
            zip.write_all(b"a").unwrap();
            zip.finish().unwrap();
        }

        let error = fixture
            .service
            .analyze_backup(Arc::new(FileHandle::new(&path)))
            .await
            .unwrap_err();

        assert!(error.is_malformed_archive());
        assert_eq!(
            fixture.service.status(),
            BackupStatus::Failed { message: "Invalid backup file".to_string() }
        );
        assert_eq!(fixture.service.status().error_message(), Some("Invalid backup file"));
        assert!(fixture.store.users.list_users().await.unwrap().is_empty());
        assert!(!fixture.temp_dir.path().join("staging").read_dir().unwrap().any(|_| true));
    }

    #[tokio::test]
    async fn test_missing_source_is_unexpected_failure() {
        let fixture = fixture().await;
        let missing = Arc::new(FileHandle::new(fixture.temp_dir.path().join("nope.zip")));

        let error = fixture.service.analyze_backup(missing).await.unwrap_err();

        assert!(matches!(error, BackupError::Unexpected(_)));
        assert!(fixture
            .service
            .status()
            .error_message()
            .is_some_and(|m| m.starts_with("Operation failed: Failed to open")));
    }

    #[tokio::test]
    async fn test_spawned_backup_reports_through_status() {
        let fixture = fixture().await;
        seed(&fixture).await;
        let mut status = fixture.service.subscribe_status();
        let archive = Arc::new(FileHandle::new(fixture.temp_dir.path().join("bg.zip")));

        let handle = fixture.service.spawn_create_backup(archive.clone()).unwrap();
        handle.await.unwrap();

        assert!(matches!(*status.borrow_and_update(), BackupStatus::Succeeded { .. }));
        assert!(archive.path().is_file());
    }

    #[tokio::test]
    async fn test_second_operation_is_rejected_while_backup_runs() {
        let fixture = fixture().await;
        seed(&fixture).await;
        let archive = Arc::new(FileHandle::new(fixture.temp_dir.path().join("first.zip")));

        let handle = fixture.service.spawn_create_backup(archive.clone()).unwrap();
        assert_eq!(fixture.service.status(), BackupStatus::Running(BackupOperation::Create));

        let second = FileHandle::new(fixture.temp_dir.path().join("second.zip"));
        let error = fixture.service.spawn_create_backup(Arc::new(second.clone())).unwrap_err();
        assert!(error.is_already_running());
        let error = fixture.service.analyze_backup(archive.clone()).await.unwrap_err();
        assert!(error.is_already_running());

        handle.await.unwrap();
        assert!(matches!(fixture.service.status(), BackupStatus::Succeeded { .. }));
        assert!(!second.path().exists());
        assert!(fixture.service.analyze_backup(archive).await.is_ok());
    }
}
