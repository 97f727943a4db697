//! # REST API Interface Layer
//!
//! Axum handlers for the `/api` routes, one module per resource, plus the
//! mappers converting domain models to shared DTOs.
//!
//! Error translation:
//! - validation failures → 400
//! - missing records → 404
//! - anything else → 500

use axum::http::StatusCode;

use crate::domain::models::{ItemValidationError, UserValidationError, WardrobeValidationError};

pub mod backup_apis;
pub mod clothes_apis;
pub mod mappers;
pub mod shoes_apis;
pub mod user_apis;
pub mod wardrobe_apis;

pub use backup_apis::*;
pub use clothes_apis::*;
pub use shoes_apis::*;
pub use user_apis::*;
pub use wardrobe_apis::*;

/// HTTP status for a failed catalog operation
pub(crate) fn error_status(error: &anyhow::Error) -> StatusCode {
    let is_validation = error.downcast_ref::<UserValidationError>().is_some()
        || error.downcast_ref::<WardrobeValidationError>().is_some()
        || error.downcast_ref::<ItemValidationError>().is_some();

    if is_validation {
        StatusCode::BAD_REQUEST
    } else if error.to_string().contains("not found") {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}
