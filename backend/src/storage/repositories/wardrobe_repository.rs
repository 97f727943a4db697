use anyhow::Result;
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::domain::models::{Wardrobe, UNASSIGNED_ID};
use crate::storage::connection::DbConnection;
use crate::storage::traits::WardrobeStorage;

/// Repository for wardrobe operations
#[derive(Clone)]
pub struct WardrobeRepository {
    db: DbConnection,
}

impl WardrobeRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn from_row(row: &SqliteRow) -> Result<Wardrobe> {
        Ok(Wardrobe {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

#[async_trait]
impl WardrobeStorage for WardrobeRepository {
    async fn insert_wardrobe(&self, wardrobe: &Wardrobe) -> Result<i64> {
        if wardrobe.id == UNASSIGNED_ID {
            let result = sqlx::query(
                r#"
                INSERT INTO wardrobes (name, description, created_at)
                VALUES (?, ?, ?)
                "#,
            )
            .bind(&wardrobe.name)
            .bind(&wardrobe.description)
            .bind(wardrobe.created_at)
            .execute(self.db.pool())
            .await?;
            return Ok(result.last_insert_rowid());
        }

        sqlx::query(
            r#"
            INSERT INTO wardrobes (id, name, description, created_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                description = excluded.description,
                created_at = excluded.created_at
            "#,
        )
        .bind(wardrobe.id)
        .bind(&wardrobe.name)
        .bind(&wardrobe.description)
        .bind(wardrobe.created_at)
        .execute(self.db.pool())
        .await?;
        Ok(wardrobe.id)
    }

    async fn get_wardrobe(&self, wardrobe_id: i64) -> Result<Option<Wardrobe>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, description, created_at
            FROM wardrobes
            WHERE id = ?
            "#,
        )
        .bind(wardrobe_id)
        .fetch_optional(self.db.pool())
        .await?;

        row.as_ref().map(Self::from_row).transpose()
    }

    async fn list_wardrobes(&self) -> Result<Vec<Wardrobe>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, description, created_at
            FROM wardrobes
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(Self::from_row).collect()
    }

    async fn update_wardrobe(&self, wardrobe: &Wardrobe) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE wardrobes
            SET name = ?, description = ?
            WHERE id = ?
            "#,
        )
        .bind(&wardrobe.name)
        .bind(&wardrobe.description)
        .bind(wardrobe.id)
        .execute(self.db.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(anyhow::anyhow!("Wardrobe not found: {}", wardrobe.id));
        }
        Ok(())
    }

    async fn delete_wardrobe(&self, wardrobe_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM wardrobes WHERE id = ?")
            .bind(wardrobe_id)
            .execute(self.db.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::ClothingItem;
    use crate::storage::repositories::ClothesRepository;
    use crate::storage::traits::ClothesStorage;
    use chrono::NaiveDate;

    fn created() -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 2, 1).unwrap().and_hms_opt(12, 0, 0).unwrap()
    }

    fn sample_wardrobe(id: i64, name: &str) -> Wardrobe {
        Wardrobe {
            id,
            name: name.to_string(),
            description: Some("Hallway closet".to_string()),
            created_at: created(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_get_wardrobe() {
        let db = DbConnection::init_test().await.unwrap();
        let repo = WardrobeRepository::new(db);

        let id = repo.insert_wardrobe(&sample_wardrobe(0, "Main")).await.unwrap();
        let stored = repo.get_wardrobe(id).await.unwrap().unwrap();

        assert_eq!(stored.name, "Main");
        assert_eq!(stored.description.as_deref(), Some("Hallway closet"));
    }

    #[tokio::test]
    async fn test_reinsert_keeps_assigned_items() {
        let db = DbConnection::init_test().await.unwrap();
        let wardrobes = WardrobeRepository::new(db.clone());
        let clothes = ClothesRepository::new(db);

        wardrobes.insert_wardrobe(&sample_wardrobe(3, "Main")).await.unwrap();
        clothes
            .insert_clothes(&ClothingItem {
                id: 0,
                name: "Coat".to_string(),
                category: "outerwear".to_string(),
                season: "winter".to_string(),
                color: None,
                position: None,
                image_url: None,
                wardrobe_id: Some(3),
                user_id: None,
                created_at: created(),
            })
            .await
            .unwrap();

        // Replacing the wardrobe must not cascade-delete its items
        wardrobes.insert_wardrobe(&sample_wardrobe(3, "Renamed")).await.unwrap();

        assert_eq!(clothes.list_clothes().await.unwrap().len(), 1);
        assert_eq!(wardrobes.get_wardrobe(3).await.unwrap().unwrap().name, "Renamed");
    }

    #[tokio::test]
    async fn test_delete_wardrobe_cascades_to_items() {
        let db = DbConnection::init_test().await.unwrap();
        let wardrobes = WardrobeRepository::new(db.clone());
        let clothes = ClothesRepository::new(db);

        let wardrobe_id = wardrobes.insert_wardrobe(&sample_wardrobe(0, "Main")).await.unwrap();
        clothes
            .insert_clothes(&ClothingItem {
                id: 0,
                name: "Scarf".to_string(),
                category: "accessory".to_string(),
                season: "winter".to_string(),
                color: Some("red".to_string()),
                position: None,
                image_url: None,
                wardrobe_id: Some(wardrobe_id),
                user_id: None,
                created_at: created(),
            })
            .await
            .unwrap();

        assert!(wardrobes.delete_wardrobe(wardrobe_id).await.unwrap());
        assert!(clothes.list_clothes().await.unwrap().is_empty());
    }
}
