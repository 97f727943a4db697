use fs_extra::file::{self as fs_file, CopyOptions};
use std::path::Path;
use tracing::{debug, warn};

use super::{BackupError, RestorePlan, StagingArea};
use crate::storage::images::image_file_name;
use crate::storage::{ImageKind, ImageStore};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RelocationReport {
    pub copied: usize,
    pub missing: usize,
    pub failed: usize,
}

/// Copy staged images into permanent storage and point every planned record
/// at its permanent path.
///
/// References are rewritten even when the staged file is missing or the copy
/// fails; the record then carries a dangling reference.
pub fn relocate_images(
    plan: &mut RestorePlan,
    staging: &StagingArea,
    images: &ImageStore,
) -> RelocationReport {
    let mut report = RelocationReport::default();

    let references = plan
        .clothes
        .iter_mut()
        .map(|item| (ImageKind::Clothes, &mut item.image_url))
        .chain(
            plan.shoes
                .iter_mut()
                .map(|item| (ImageKind::Shoes, &mut item.image_url)),
        );

    for (kind, image_url) in references {
        let Some(reference) = image_url.as_deref() else {
            continue;
        };
        let Some(file_name) = image_file_name(reference) else {
            warn!("Image reference '{}' has no file name, leaving it as is", reference);
            report.missing += 1;
            continue;
        };

        let staged = staging.image_path(kind, file_name);
        let target = images.permanent_path(kind, file_name);

        if staged.is_file() {
            match copy_image(&staged, &target) {
                Ok(()) => {
                    debug!("Restored image {:?}", target);
                    report.copied += 1;
                }
                Err(e) => {
                    warn!("{}", e);
                    report.failed += 1;
                }
            }
        } else {
            debug!("No staged {} image for '{}'", kind.dir_name(), file_name);
            report.missing += 1;
        }

        *image_url = Some(target.to_string_lossy().into_owned());
    }

    report
}

fn copy_image(staged: &Path, target: &Path) -> Result<(), BackupError> {
    let io_error = |reason: String| BackupError::ImageIo {
        path: staged.to_path_buf(),
        reason,
    };

    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io_error(e.to_string()))?;
    }

    let mut options = CopyOptions::new();
    options.overwrite = true;
    fs_file::copy(staged, target, &options).map_err(|e| io_error(e.to_string()))?;
    Ok(())
}
