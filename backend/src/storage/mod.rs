//! # Storage Module
//!
//! Handles all data persistence for the wardrobe tracker.
//!
//! The domain layer talks to storage only through the traits in [`traits`],
//! bundled together as an [`EntityStore`]. The current implementation is
//! SQLite via SQLx, with photos kept as plain files in [`images::ImageStore`].
//!
//! - **connection.rs** - SQLite pool and schema setup
//! - **repositories/** - one repository per record kind
//! - **images.rs** - per-kind private image directories

pub mod connection;
pub mod entity_store;
pub mod images;
pub mod repositories;
pub mod traits;

pub use connection::DbConnection;
pub use entity_store::EntityStore;
pub use images::{ImageKind, ImageStore};
pub use repositories::{ClothesRepository, ShoesRepository, UserRepository, WardrobeRepository};
pub use traits::{ClothesStorage, ShoesStorage, UserStorage, WardrobeStorage};
