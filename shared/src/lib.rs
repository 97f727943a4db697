use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

pub mod timestamp;

// ---------------------------------------------------------------------------
// Archive DTOs
//
// These are the record shapes written into `data.json` inside a backup archive.
// Field names are camelCase and timestamps use the fixed manifest format.
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub user_id: i64,
    pub name: String,
    /// Free-form gender tag as entered in the profile form
    pub gender: String,
    #[serde(with = "timestamp")]
    pub birthday: NaiveDateTime,
    #[serde(with = "timestamp")]
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WardrobeDto {
    pub wardrobe_id: i64,
    pub name: String,
    pub description: Option<String>,
    #[serde(with = "timestamp")]
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClothesDto {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub color: Option<String>,
    pub season: String,
    /// Where the item sits inside its wardrobe (shelf, drawer, hanger...)
    pub position: Option<String>,
    pub wardrobe_id: Option<i64>,
    pub user_id: Option<i64>,
    pub image_url: Option<String>,
    #[serde(with = "timestamp")]
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoesDto {
    pub id: i64,
    pub name: String,
    pub brand: Option<String>,
    pub size: Option<String>,
    pub wardrobe_id: Option<i64>,
    pub user_id: Option<i64>,
    pub color: Option<String>,
    #[serde(rename = "type")]
    pub shoe_type: Option<String>,
    pub season: Option<String>,
    pub price: Option<f64>,
    pub image_url: Option<String>,
    #[serde(with = "timestamp")]
    pub created_at: NaiveDateTime,
}

/// Contents of the `data.json` manifest entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupManifest {
    pub users: Vec<UserDto>,
    pub wardrobes: Vec<WardrobeDto>,
    pub clothes: Vec<ClothesDto>,
    pub shoes: Vec<ShoesDto>,
    #[serde(with = "timestamp")]
    pub created_at: NaiveDateTime,
}

// ---------------------------------------------------------------------------
// Catalog requests and responses
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub gender: String,
    /// Birth date (YYYY-MM-DD)
    pub birthday: NaiveDate,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub gender: Option<String>,
    pub birthday: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserListResponse {
    pub users: Vec<UserDto>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveUserResponse {
    pub active_user: Option<UserDto>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateWardrobeRequest {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateWardrobeRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WardrobeListResponse {
    pub wardrobes: Vec<WardrobeDto>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateClothesRequest {
    pub name: String,
    pub category: String,
    pub season: String,
    pub color: Option<String>,
    pub position: Option<String>,
    pub image_url: Option<String>,
    pub wardrobe_id: Option<i64>,
    pub user_id: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateClothesRequest {
    pub name: Option<String>,
    pub category: Option<String>,
    pub season: Option<String>,
    pub color: Option<String>,
    pub position: Option<String>,
    pub image_url: Option<String>,
    pub wardrobe_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClothesListResponse {
    pub clothes: Vec<ClothesDto>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateShoesRequest {
    pub name: String,
    pub brand: Option<String>,
    pub size: Option<String>,
    pub color: Option<String>,
    pub shoe_type: Option<String>,
    pub season: Option<String>,
    pub price: Option<f64>,
    pub image_url: Option<String>,
    pub wardrobe_id: Option<i64>,
    pub user_id: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateShoesRequest {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub size: Option<String>,
    pub color: Option<String>,
    pub shoe_type: Option<String>,
    pub season: Option<String>,
    pub price: Option<f64>,
    pub image_url: Option<String>,
    pub wardrobe_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoesListResponse {
    pub shoes: Vec<ShoesDto>,
}

/// Search criteria for clothing items. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClothesFilter {
    /// Case-insensitive substring of the name or color
    pub query: Option<String>,
    pub category: Option<String>,
    pub season: Option<String>,
    pub wardrobe_id: Option<i64>,
    pub user_id: Option<i64>,
}

/// Search criteria for shoes. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShoesFilter {
    /// Case-insensitive substring of the name, brand or color
    pub query: Option<String>,
    pub shoe_type: Option<String>,
    pub season: Option<String>,
    pub wardrobe_id: Option<i64>,
    pub user_id: Option<i64>,
}

// ---------------------------------------------------------------------------
// Backup and restore
// ---------------------------------------------------------------------------

/// Location of an archive chosen by the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupPathRequest {
    pub path: String,
}

/// Outcome of writing a backup archive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupReport {
    pub users_count: usize,
    pub wardrobes_count: usize,
    pub clothes_count: usize,
    pub shoes_count: usize,
    pub images_count: usize,
    pub message: String,
}

/// User entry listed in a backup summary so the user can pick whom to restore
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupUserInfo {
    pub user_id: i64,
    pub name: String,
    pub gender: String,
    pub birthday: String,
}

/// Read-only description of an archive produced by analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupSummary {
    pub created_at: String,
    pub users_count: usize,
    pub wardrobes_count: usize,
    pub clothes_count: usize,
    pub shoes_count: usize,
    pub has_images: bool,
    pub users: Vec<BackupUserInfo>,
}

/// What to restore from an analyzed archive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestoreRequest {
    pub selected_user_ids: Vec<i64>,
    pub include_clothes: bool,
    pub include_shoes: bool,
    pub include_wardrobes: bool,
}

/// Record that could not be restored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedRecord {
    pub kind: String,
    pub name: String,
    pub reason: String,
}

/// Outcome of a selective restore
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestoreSummary {
    pub users_count: usize,
    pub wardrobes_count: usize,
    pub clothes_count: usize,
    pub shoes_count: usize,
    pub skipped: Vec<SkippedRecord>,
    pub active_user_id: Option<i64>,
    pub message: String,
}

/// Which boundary operation is running
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BackupOperation {
    Create,
    Analyze,
    Restore,
}

/// Observable state of the backup subsystem
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BackupStatus {
    Idle,
    Running(BackupOperation),
    Succeeded { message: String },
    Failed { message: String },
}

impl BackupStatus {
    pub fn is_running(&self) -> bool {
        matches!(self, BackupStatus::Running(_))
    }

    /// Error text if the last operation failed
    pub fn error_message(&self) -> Option<&str> {
        match self {
            BackupStatus::Failed { message } => Some(message),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_milli_opt(10, 30, 0, 125)
            .unwrap()
    }

    #[test]
    fn test_shoes_dto_uses_archive_field_names() {
        let shoes = ShoesDto {
            id: 7,
            name: "Trail runners".to_string(),
            brand: Some("Acme".to_string()),
            size: Some("42".to_string()),
            wardrobe_id: None,
            user_id: Some(1),
            color: None,
            shoe_type: Some("sneaker".to_string()),
            season: None,
            price: Some(89.5),
            image_url: None,
            created_at: at(2024, 1, 2),
        };

        let json = serde_json::to_value(&shoes).unwrap();
        assert_eq!(json["type"], "sneaker");
        assert_eq!(json["wardrobeId"], serde_json::Value::Null);
        assert_eq!(json["userId"], 1);
        assert_eq!(json["imageUrl"], serde_json::Value::Null);
        assert_eq!(json["createdAt"], "2024-01-02T10:30:00.125Z");
    }

    #[test]
    fn test_manifest_ignores_unknown_fields() {
        let json = r#"{
            "users": [{"userId": 1, "name": "Ana", "gender": "female",
                       "birthday": "1990-05-01T00:00:00.000Z",
                       "createdAt": "2024-01-01T08:00:00.000Z",
                       "avatar": "ignored"}],
            "wardrobes": [],
            "clothes": [],
            "shoes": [],
            "createdAt": "2024-02-01T12:00:00.000Z",
            "appVersion": "3.1"
        }"#;

        let manifest: BackupManifest = serde_json::from_str(json).unwrap();
        assert_eq!(manifest.users.len(), 1);
        assert_eq!(manifest.users[0].name, "Ana");
    }

    #[test]
    fn test_manifest_rejects_missing_required_field() {
        let json = r#"{"users": [], "wardrobes": [], "clothes": [], "createdAt": "2024-02-01T12:00:00.000Z"}"#;
        assert!(serde_json::from_str::<BackupManifest>(json).is_err());
    }

    #[test]
    fn test_backup_status_error_message() {
        let failed = BackupStatus::Failed { message: "Invalid backup file".to_string() };
        assert_eq!(failed.error_message(), Some("Invalid backup file"));
        assert!(!failed.is_running());
        assert!(BackupStatus::Running(BackupOperation::Restore).is_running());
        assert_eq!(BackupStatus::Idle.error_message(), None);
    }
}
