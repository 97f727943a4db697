//! # Domain Module
//!
//! Business logic of the wardrobe tracker, independent of HTTP and of the
//! storage backend.
//!
//! ## Module Organization
//!
//! - **models**: users, wardrobes, clothing items and shoes
//! - **user_service / wardrobe_service / clothes_service / shoes_service**:
//!   validated CRUD over the entity store
//! - **catalog_filter**: search criteria and the live filtered view
//! - **session**: the user the app is currently acting for
//! - **backup**: archive format, selective restore planning, image relocation
//!   and record insertion
//! - **backup_service**: create / analyze / restore entry points with an
//!   observable status
//!
//! ## Business Rules
//!
//! - Names are non-empty and at most 100 characters
//! - Items may only reference wardrobes and users that exist
//! - Deleting a wardrobe or a user deletes the items that belong to it
//! - A restore never renumbers records; restoring the same archive twice
//!   replaces the earlier copies

pub mod backup;
pub mod backup_service;
pub mod catalog_filter;
pub mod clock;
pub mod clothes_service;
pub mod models;
pub mod session;
pub mod shoes_service;
pub mod user_service;
pub mod wardrobe_service;

pub use backup_service::{AnalyzedBackup, BackupService};
pub use catalog_filter::{apply_filter, CatalogFilter, CatalogView};
pub use clothes_service::ClothesService;
pub use session::{SessionContext, SessionUser};
pub use shoes_service::ShoesService;
pub use user_service::UserService;
pub use wardrobe_service::WardrobeService;
