//! # Storage Traits
//!
//! This module defines the storage abstraction traits that allow different
//! storage backends to be used interchangeably in the domain layer.
//!
//! Every `insert_*` operation follows the same contract: a record whose id is
//! `0` gets a fresh id from the store, any other id is written as-is and
//! replaces the existing row with that id. The assigned id is returned.

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::models::{ClothingItem, ShoeItem, User, Wardrobe};

/// Trait defining the interface for user storage operations
#[async_trait]
pub trait UserStorage: Send + Sync {
    /// Insert a user, replacing any existing user with the same id
    async fn insert_user(&self, user: &User) -> Result<i64>;

    /// Retrieve a specific user by ID
    async fn get_user(&self, user_id: i64) -> Result<Option<User>>;

    /// List all users ordered by name
    async fn list_users(&self) -> Result<Vec<User>>;

    /// Update an existing user
    async fn update_user(&self, user: &User) -> Result<()>;

    /// Delete a user and, through the store's cascade rules, their items.
    /// Returns true if the user existed.
    async fn delete_user(&self, user_id: i64) -> Result<bool>;

    /// Get the persisted active user ID
    async fn get_active_user(&self) -> Result<Option<i64>>;

    /// Persist the active user
    async fn set_active_user(&self, user_id: i64) -> Result<()>;
}

/// Trait defining the interface for wardrobe storage operations
#[async_trait]
pub trait WardrobeStorage: Send + Sync {
    async fn insert_wardrobe(&self, wardrobe: &Wardrobe) -> Result<i64>;

    async fn get_wardrobe(&self, wardrobe_id: i64) -> Result<Option<Wardrobe>>;

    /// List all wardrobes ordered by creation time
    async fn list_wardrobes(&self) -> Result<Vec<Wardrobe>>;

    async fn update_wardrobe(&self, wardrobe: &Wardrobe) -> Result<()>;

    /// Delete a wardrobe together with every item assigned to it
    async fn delete_wardrobe(&self, wardrobe_id: i64) -> Result<bool>;
}

/// Trait defining the interface for clothing item storage operations
#[async_trait]
pub trait ClothesStorage: Send + Sync {
    async fn insert_clothes(&self, item: &ClothingItem) -> Result<i64>;

    async fn get_clothes(&self, item_id: i64) -> Result<Option<ClothingItem>>;

    /// List all clothing items, newest first
    async fn list_clothes(&self) -> Result<Vec<ClothingItem>>;

    async fn update_clothes(&self, item: &ClothingItem) -> Result<()>;

    async fn delete_clothes(&self, item_id: i64) -> Result<bool>;
}

/// Trait defining the interface for shoe storage operations
#[async_trait]
pub trait ShoesStorage: Send + Sync {
    async fn insert_shoes(&self, item: &ShoeItem) -> Result<i64>;

    async fn get_shoes(&self, item_id: i64) -> Result<Option<ShoeItem>>;

    /// List all shoes, newest first
    async fn list_shoes(&self) -> Result<Vec<ShoeItem>>;

    async fn update_shoes(&self, item: &ShoeItem) -> Result<()>;

    async fn delete_shoes(&self, item_id: i64) -> Result<bool>;
}
