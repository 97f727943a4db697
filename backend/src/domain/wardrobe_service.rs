use anyhow::{anyhow, Context, Result};
use std::sync::Arc;
use tracing::{debug, info};

use crate::domain::clock;
use crate::domain::models::{Wardrobe, WardrobeValidationError, UNASSIGNED_ID};
use crate::storage::{EntityStore, WardrobeStorage};
use shared::{CreateWardrobeRequest, UpdateWardrobeRequest};

const MAX_NAME_LENGTH: usize = 100;

/// Service for managing wardrobes
#[derive(Clone)]
pub struct WardrobeService {
    wardrobes: Arc<dyn WardrobeStorage>,
}

impl WardrobeService {
    pub fn new(store: &EntityStore) -> Self {
        Self {
            wardrobes: store.wardrobes.clone(),
        }
    }

    pub async fn create_wardrobe(&self, request: CreateWardrobeRequest) -> Result<Wardrobe> {
        info!("Creating wardrobe: name={}", request.name);

        validate_name(&request.name)?;

        let mut wardrobe = Wardrobe {
            id: UNASSIGNED_ID,
            name: request.name.trim().to_string(),
            description: normalize_description(request.description),
            created_at: clock::now_local_millis(),
        };
        wardrobe.id = self
            .wardrobes
            .insert_wardrobe(&wardrobe)
            .await
            .context("Failed to store wardrobe")?;

        info!("Created wardrobe: {} with ID: {}", wardrobe.name, wardrobe.id);
        Ok(wardrobe)
    }

    pub async fn get_wardrobe(&self, wardrobe_id: i64) -> Result<Option<Wardrobe>> {
        debug!("Getting wardrobe: {}", wardrobe_id);
        self.wardrobes.get_wardrobe(wardrobe_id).await
    }

    pub async fn list_wardrobes(&self) -> Result<Vec<Wardrobe>> {
        self.wardrobes.list_wardrobes().await
    }

    pub async fn update_wardrobe(&self, wardrobe_id: i64, request: UpdateWardrobeRequest) -> Result<Wardrobe> {
        info!("Updating wardrobe: {}", wardrobe_id);

        let mut wardrobe = self
            .wardrobes
            .get_wardrobe(wardrobe_id)
            .await?
            .ok_or_else(|| anyhow!("Wardrobe not found: {}", wardrobe_id))?;

        if let Some(name) = request.name {
            validate_name(&name)?;
            wardrobe.name = name.trim().to_string();
        }
        if request.description.is_some() {
            wardrobe.description = normalize_description(request.description);
        }

        self.wardrobes.update_wardrobe(&wardrobe).await?;
        Ok(wardrobe)
    }

    /// Delete a wardrobe and every item assigned to it
    pub async fn delete_wardrobe(&self, wardrobe_id: i64) -> Result<()> {
        info!("Deleting wardrobe: {}", wardrobe_id);

        if !self.wardrobes.delete_wardrobe(wardrobe_id).await? {
            return Err(anyhow!("Wardrobe not found: {}", wardrobe_id));
        }
        Ok(())
    }
}

/// Blank descriptions are stored as absent
fn normalize_description(description: Option<String>) -> Option<String> {
    description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
}

fn validate_name(name: &str) -> Result<(), WardrobeValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(WardrobeValidationError::EmptyName);
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(WardrobeValidationError::NameTooLong(MAX_NAME_LENGTH));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::DbConnection;

    async fn setup_test() -> WardrobeService {
        let db = DbConnection::init_test().await.unwrap();
        WardrobeService::new(&EntityStore::sqlite(db))
    }

    fn request(name: &str, description: Option<&str>) -> CreateWardrobeRequest {
        CreateWardrobeRequest {
            name: name.to_string(),
            description: description.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_create_and_list_wardrobes() {
        let service = setup_test().await;

        let hall = service.create_wardrobe(request("Hall", Some("  "))).await.unwrap();
        service.create_wardrobe(request("Attic", Some("Seasonal"))).await.unwrap();

        assert_eq!(hall.description, None);
        let names: Vec<String> = service
            .list_wardrobes()
            .await
            .unwrap()
            .into_iter()
            .map(|w| w.name)
            .collect();
        assert_eq!(names.len(), 2);
        assert!(names.contains(&"Attic".to_string()));
    }

    #[tokio::test]
    async fn test_empty_name_is_rejected() {
        let service = setup_test().await;

        let error = service.create_wardrobe(request("", None)).await.unwrap_err();

        assert_eq!(
            error.downcast_ref::<WardrobeValidationError>(),
            Some(&WardrobeValidationError::EmptyName)
        );
    }

    #[tokio::test]
    async fn test_update_and_delete_wardrobe() {
        let service = setup_test().await;
        let wardrobe = service.create_wardrobe(request("Hall", None)).await.unwrap();

        let updated = service
            .update_wardrobe(
                wardrobe.id,
                UpdateWardrobeRequest {
                    name: None,
                    description: Some("Coats only".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Hall");
        assert_eq!(updated.description.as_deref(), Some("Coats only"));

        service.delete_wardrobe(wardrobe.id).await.unwrap();
        assert_eq!(service.get_wardrobe(wardrobe.id).await.unwrap(), None);
        assert!(service.delete_wardrobe(wardrobe.id).await.is_err());
    }
}
