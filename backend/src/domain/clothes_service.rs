use anyhow::{anyhow, Context, Result};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info};

use crate::domain::catalog_filter::{apply_filter, CatalogView};
use crate::domain::clock;
use crate::domain::models::{ClothingItem, ItemValidationError, UNASSIGNED_ID};
use crate::storage::EntityStore;
use shared::{ClothesFilter, CreateClothesRequest, UpdateClothesRequest};

const MAX_NAME_LENGTH: usize = 100;

/// Service for managing clothing items.
///
/// The full item list is published on a watch channel after every change made
/// through this service and after [`ClothesService::refresh`].
#[derive(Clone)]
pub struct ClothesService {
    store: EntityStore,
    items: Arc<watch::Sender<Vec<ClothingItem>>>,
}

impl ClothesService {
    pub fn new(store: EntityStore) -> Self {
        let (items, _) = watch::channel(Vec::new());
        Self {
            store,
            items: Arc::new(items),
        }
    }

    /// Reload the published item list from the store
    pub async fn refresh(&self) -> Result<()> {
        let items = self.store.clothes.list_clothes().await?;
        debug!("Publishing {} clothing items", items.len());
        self.items.send_replace(items);
        Ok(())
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<ClothingItem>> {
        self.items.subscribe()
    }

    /// Live view of the items matching the latest filter
    pub fn view(&self, filter: watch::Receiver<ClothesFilter>) -> CatalogView<ClothingItem> {
        CatalogView::new(self.subscribe(), filter)
    }

    pub async fn create_clothes(&self, request: CreateClothesRequest) -> Result<ClothingItem> {
        info!("Creating clothing item: name={}, category={}", request.name, request.category);

        let mut item = ClothingItem {
            id: UNASSIGNED_ID,
            name: request.name.trim().to_string(),
            category: request.category.trim().to_string(),
            season: request.season.trim().to_string(),
            color: request.color,
            position: request.position,
            image_url: request.image_url,
            wardrobe_id: request.wardrobe_id,
            user_id: request.user_id,
            created_at: clock::now_local_millis(),
        };
        self.validate(&item).await?;

        item.id = self
            .store
            .clothes
            .insert_clothes(&item)
            .await
            .context("Failed to store clothing item")?;
        self.refresh().await?;

        info!("Created clothing item: {} with ID: {}", item.name, item.id);
        Ok(item)
    }

    pub async fn get_clothes(&self, item_id: i64) -> Result<Option<ClothingItem>> {
        self.store.clothes.get_clothes(item_id).await
    }

    /// List all clothing items, newest first
    pub async fn list_clothes(&self) -> Result<Vec<ClothingItem>> {
        self.store.clothes.list_clothes().await
    }

    pub async fn update_clothes(&self, item_id: i64, request: UpdateClothesRequest) -> Result<ClothingItem> {
        info!("Updating clothing item: {}", item_id);

        let mut item = self
            .store
            .clothes
            .get_clothes(item_id)
            .await?
            .ok_or_else(|| anyhow!("Clothing item not found: {}", item_id))?;

        if let Some(name) = request.name {
            item.name = name.trim().to_string();
        }
        if let Some(category) = request.category {
            item.category = category.trim().to_string();
        }
        if let Some(season) = request.season {
            item.season = season.trim().to_string();
        }
        if request.color.is_some() {
            item.color = request.color;
        }
        if request.position.is_some() {
            item.position = request.position;
        }
        if request.image_url.is_some() {
            item.image_url = request.image_url;
        }
        if request.wardrobe_id.is_some() {
            item.wardrobe_id = request.wardrobe_id;
        }
        self.validate(&item).await?;

        self.store.clothes.update_clothes(&item).await?;
        self.refresh().await?;
        Ok(item)
    }

    pub async fn delete_clothes(&self, item_id: i64) -> Result<()> {
        info!("Deleting clothing item: {}", item_id);

        if !self.store.clothes.delete_clothes(item_id).await? {
            return Err(anyhow!("Clothing item not found: {}", item_id));
        }
        self.refresh().await
    }

    /// Items matching every set field of `filter`
    pub async fn search(&self, filter: &ClothesFilter) -> Result<Vec<ClothingItem>> {
        let items = self.store.clothes.list_clothes().await?;
        let matched = apply_filter(&items, filter);
        debug!("Search matched {} of {} clothing items", matched.len(), items.len());
        Ok(matched)
    }

    async fn validate(&self, item: &ClothingItem) -> Result<()> {
        if item.name.is_empty() {
            return Err(ItemValidationError::EmptyName.into());
        }
        if item.name.chars().count() > MAX_NAME_LENGTH {
            return Err(ItemValidationError::NameTooLong(MAX_NAME_LENGTH).into());
        }
        if item.category.is_empty() {
            return Err(ItemValidationError::EmptyCategory.into());
        }
        if item.season.is_empty() {
            return Err(ItemValidationError::EmptySeason.into());
        }
        if let Some(wardrobe_id) = item.wardrobe_id {
            if self.store.wardrobes.get_wardrobe(wardrobe_id).await?.is_none() {
                return Err(ItemValidationError::UnknownWardrobe(wardrobe_id).into());
            }
        }
        if let Some(user_id) = item.user_id {
            if self.store.users.get_user(user_id).await?.is_none() {
                return Err(ItemValidationError::UnknownUser(user_id).into());
            }
        }
        Ok(())
    }
}
