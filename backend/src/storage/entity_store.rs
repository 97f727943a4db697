use std::sync::Arc;

use super::connection::DbConnection;
use super::repositories::{ClothesRepository, ShoesRepository, UserRepository, WardrobeRepository};
use super::traits::{ClothesStorage, ShoesStorage, UserStorage, WardrobeStorage};

/// Handle to every record kind in the store.
///
/// Services and the backup subsystem depend on this bundle of trait objects
/// rather than on a concrete backend, so tests can swap single repositories.
#[derive(Clone)]
pub struct EntityStore {
    pub users: Arc<dyn UserStorage>,
    pub wardrobes: Arc<dyn WardrobeStorage>,
    pub clothes: Arc<dyn ClothesStorage>,
    pub shoes: Arc<dyn ShoesStorage>,
}

impl EntityStore {
    /// Build a store backed by SQLite repositories sharing one connection pool
    pub fn sqlite(db: DbConnection) -> Self {
        Self {
            users: Arc::new(UserRepository::new(db.clone())),
            wardrobes: Arc::new(WardrobeRepository::new(db.clone())),
            clothes: Arc::new(ClothesRepository::new(db.clone())),
            shoes: Arc::new(ShoesRepository::new(db)),
        }
    }
}
