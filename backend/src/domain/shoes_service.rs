use anyhow::{anyhow, Context, Result};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info};

use crate::domain::catalog_filter::{apply_filter, CatalogView};
use crate::domain::clock;
use crate::domain::models::{ItemValidationError, ShoeItem, UNASSIGNED_ID};
use crate::storage::EntityStore;
use shared::{CreateShoesRequest, ShoesFilter, UpdateShoesRequest};

const MAX_NAME_LENGTH: usize = 100;

/// Service for managing shoes. Publishes the full list like `ClothesService`.
#[derive(Clone)]
pub struct ShoesService {
    store: EntityStore,
    items: Arc<watch::Sender<Vec<ShoeItem>>>,
}

fn trimmed(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

impl ShoesService {
    pub fn new(store: EntityStore) -> Self {
        let (items, _) = watch::channel(Vec::new());
        Self {
            store,
            items: Arc::new(items),
        }
    }

    pub async fn refresh(&self) -> Result<()> {
        let items = self.store.shoes.list_shoes().await?;
        self.items.send_replace(items);
        Ok(())
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<ShoeItem>> {
        self.items.subscribe()
    }

    pub fn view(&self, filter: watch::Receiver<ShoesFilter>) -> CatalogView<ShoeItem> {
        CatalogView::new(self.subscribe(), filter)
    }

    pub async fn create_shoes(&self, request: CreateShoesRequest) -> Result<ShoeItem> {
        info!("Creating shoes: name={}", request.name);

        let mut item = ShoeItem {
            id: UNASSIGNED_ID,
            name: request.name.trim().to_string(),
            brand: trimmed(request.brand),
            size: trimmed(request.size),
            color: trimmed(request.color),
            shoe_type: trimmed(request.shoe_type),
            season: trimmed(request.season),
            price: request.price,
            image_url: request.image_url,
            wardrobe_id: request.wardrobe_id,
            user_id: request.user_id,
            created_at: clock::now_local_millis(),
        };
        self.validate(&item).await?;

        item.id = self
            .store
            .shoes
            .insert_shoes(&item)
            .await
            .context("Failed to store shoes")?;
        self.refresh().await?;

        info!("Created shoes: {} with ID: {}", item.name, item.id);
        Ok(item)
    }

    pub async fn get_shoes(&self, item_id: i64) -> Result<Option<ShoeItem>> {
        self.store.shoes.get_shoes(item_id).await
    }

    pub async fn list_shoes(&self) -> Result<Vec<ShoeItem>> {
        self.store.shoes.list_shoes().await
    }

    pub async fn update_shoes(&self, item_id: i64, request: UpdateShoesRequest) -> Result<ShoeItem> {
        info!("Updating shoes: {}", item_id);

        let mut item = self
            .store
            .shoes
            .get_shoes(item_id)
            .await?
            .ok_or_else(|| anyhow!("Shoes not found: {}", item_id))?;

        if let Some(name) = request.name {
            item.name = name.trim().to_string();
        }
        if request.brand.is_some() {
            item.brand = trimmed(request.brand);
        }
        if request.size.is_some() {
            item.size = trimmed(request.size);
        }
        if request.color.is_some() {
            item.color = trimmed(request.color);
        }
        if request.shoe_type.is_some() {
            item.shoe_type = trimmed(request.shoe_type);
        }
        if request.season.is_some() {
            item.season = trimmed(request.season);
        }
        if request.price.is_some() {
            item.price = request.price;
        }
        if request.image_url.is_some() {
            item.image_url = request.image_url;
        }
        if request.wardrobe_id.is_some() {
            item.wardrobe_id = request.wardrobe_id;
        }
        self.validate(&item).await?;

        self.store.shoes.update_shoes(&item).await?;
        self.refresh().await?;
        Ok(item)
    }

    pub async fn delete_shoes(&self, item_id: i64) -> Result<()> {
        info!("Deleting shoes: {}", item_id);

        if !self.store.shoes.delete_shoes(item_id).await? {
            return Err(anyhow!("Shoes not found: {}", item_id));
        }
        self.refresh().await
    }

    pub async fn search(&self, filter: &ShoesFilter) -> Result<Vec<ShoeItem>> {
        let items = self.store.shoes.list_shoes().await?;
        let matched = apply_filter(&items, filter);
        debug!("Search matched {} of {} shoes", matched.len(), items.len());
        Ok(matched)
    }

    async fn validate(&self, item: &ShoeItem) -> Result<()> {
        if item.name.is_empty() {
            return Err(ItemValidationError::EmptyName.into());
        }
        if item.name.chars().count() > MAX_NAME_LENGTH {
            return Err(ItemValidationError::NameTooLong(MAX_NAME_LENGTH).into());
        }
        if item.price.is_some_and(|price| price < 0.0) {
            return Err(ItemValidationError::NegativePrice.into());
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
