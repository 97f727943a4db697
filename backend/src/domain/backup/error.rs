use std::path::PathBuf;
use thiserror::Error;

use super::RecordKind;

/// Failures of the backup subsystem.
///
/// `ImageIo` and `RecordInsert` describe a single file or record; they are
/// logged and counted but never abort an operation. The others abort.
#[derive(Debug, Error)]
pub enum BackupError {
    #[error("Invalid backup file: {0}")]
    MalformedArchive(String),

    #[error("Image {path:?} could not be copied: {reason}")]
    ImageIo { path: PathBuf, reason: String },

    #[error("Failed to insert {kind} '{name}': {reason}")]
    RecordInsert {
        kind: RecordKind,
        name: String,
        reason: String,
    },

    #[error("A backup operation is already running")]
    AlreadyRunning,

    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl BackupError {
    pub fn is_malformed_archive(&self) -> bool {
        matches!(self, BackupError::MalformedArchive(_))
    }

    pub fn is_already_running(&self) -> bool {
        matches!(self, BackupError::AlreadyRunning)
    }

    /// Short status text shown to the user
    pub fn user_message(&self) -> String {
        match self {
            BackupError::MalformedArchive(_) => "Invalid backup file".to_string(),
            BackupError::AlreadyRunning => "A backup operation is already running".to_string(),
            other => format!("Operation failed: {:#}", other),
        }
    }
}
