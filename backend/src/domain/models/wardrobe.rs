use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A container that clothing and shoe items can be assigned to.
///
/// Deleting a wardrobe deletes every item assigned to it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Wardrobe {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum WardrobeValidationError {
    #[error("Wardrobe name cannot be empty")]
    EmptyName,
    #[error("Wardrobe name cannot exceed {0} characters")]
    NameTooLong(usize),
}
