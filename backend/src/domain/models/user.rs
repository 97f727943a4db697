use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A person whose clothes and shoes are tracked. Root of item ownership.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub gender: String,
    pub birthday: NaiveDateTime,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum UserValidationError {
    #[error("User name cannot be empty")]
    EmptyName,
    #[error("User name cannot exceed {0} characters")]
    NameTooLong(usize),
    #[error("Birthday cannot be in the future")]
    BirthdayInFuture,
}
