use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClothingItem {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub season: String,
    pub color: Option<String>,
    pub position: Option<String>,
    /// Stored path of the item's photo in private image storage
    pub image_url: Option<String>,
    pub wardrobe_id: Option<i64>,
    pub user_id: Option<i64>,
    pub created_at: NaiveDateTime,
}

/// Validation failures shared by clothing and shoe items
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ItemValidationError {
    #[error("Item name cannot be empty")]
    EmptyName,
    #[error("Item name cannot exceed {0} characters")]
    NameTooLong(usize),
    #[error("Category cannot be empty")]
    EmptyCategory,
    #[error("Season cannot be empty")]
    EmptySeason,
    #[error("Price cannot be negative")]
    NegativePrice,
    #[error("Wardrobe {0} does not exist")]
    UnknownWardrobe(i64),
    #[error("User {0} does not exist")]
    UnknownUser(i64),
}
