use anyhow::Result;
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::domain::models::{ClothingItem, UNASSIGNED_ID};
use crate::storage::connection::DbConnection;
use crate::storage::traits::ClothesStorage;

const SELECT_COLUMNS: &str = "SELECT id, name, category, season, color, position, image_url, \
                              wardrobe_id, user_id, created_at FROM clothes";

/// Repository for clothing item operations
#[derive(Clone)]
pub struct ClothesRepository {
    db: DbConnection,
}

impl ClothesRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn from_row(row: &SqliteRow) -> Result<ClothingItem> {
        Ok(ClothingItem {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            category: row.try_get("category")?,
            season: row.try_get("season")?,
            color: row.try_get("color")?,
            position: row.try_get("position")?,
            image_url: row.try_get("image_url")?,
            wardrobe_id: row.try_get("wardrobe_id")?,
            user_id: row.try_get("user_id")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

#[async_trait]
impl ClothesStorage for ClothesRepository {
    async fn insert_clothes(&self, item: &ClothingItem) -> Result<i64> {
        // NULL id lets SQLite assign the next rowid
        let id = (item.id != UNASSIGNED_ID).then_some(item.id);

        let result = sqlx::query(
            r#"
            INSERT INTO clothes (id, name, category, season, color, position, image_url,
                                 wardrobe_id, user_id, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                category = excluded.category,
                season = excluded.season,
                color = excluded.color,
                position = excluded.position,
                image_url = excluded.image_url,
                wardrobe_id = excluded.wardrobe_id,
                user_id = excluded.user_id,
                created_at = excluded.created_at
            "#,
        )
        .bind(id)
        .bind(&item.name)
        .bind(&item.category)
        .bind(&item.season)
        .bind(&item.color)
        .bind(&item.position)
        .bind(&item.image_url)
        .bind(item.wardrobe_id)
        .bind(item.user_id)
        .bind(item.created_at)
        .execute(self.db.pool())
        .await?;

        Ok(id.unwrap_or_else(|| result.last_insert_rowid()))
    }

    async fn get_clothes(&self, item_id: i64) -> Result<Option<ClothingItem>> {
        let row = sqlx::query(&format!("{} WHERE id = ?", SELECT_COLUMNS))
            .bind(item_id)
            .fetch_optional(self.db.pool())
            .await?;

        row.as_ref().map(Self::from_row).transpose()
    }

    async fn list_clothes(&self) -> Result<Vec<ClothingItem>> {
        let rows = sqlx::query(&format!("{} ORDER BY created_at DESC, id DESC", SELECT_COLUMNS))
            .fetch_all(self.db.pool())
            .await?;

        rows.iter().map(Self::from_row).collect()
    }

    async fn update_clothes(&self, item: &ClothingItem) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE clothes
            SET name = ?, category = ?, season = ?, color = ?, position = ?,
                image_url = ?, wardrobe_id = ?, user_id = ?
            WHERE id = ?
            "#,
        )
        .bind(&item.name)
        .bind(&item.category)
        .bind(&item.season)
        .bind(&item.color)
        .bind(&item.position)
        .bind(&item.image_url)
        .bind(item.wardrobe_id)
        .bind(item.user_id)
        .bind(item.id)
        .execute(self.db.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(anyhow::anyhow!("Clothing item not found: {}", item.id));
        }
        Ok(())
    }

    async fn delete_clothes(&self, item_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM clothes WHERE id = ?")
            .bind(item_id)
            .execute(self.db.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
