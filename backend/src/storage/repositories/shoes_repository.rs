use anyhow::Result;
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::domain::models::{ShoeItem, UNASSIGNED_ID};
use crate::storage::connection::DbConnection;
use crate::storage::traits::ShoesStorage;

const SELECT_COLUMNS: &str = "SELECT id, name, brand, size, color, shoe_type, season, price, \
                              image_url, wardrobe_id, user_id, created_at FROM shoes";

/// Repository for shoe operations
#[derive(Clone)]
pub struct ShoesRepository {
    db: DbConnection,
}

impl ShoesRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn from_row(row: &SqliteRow) -> Result<ShoeItem> {
        Ok(ShoeItem {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            brand: row.try_get("brand")?,
            size: row.try_get("size")?,
            color: row.try_get("color")?,
            shoe_type: row.try_get("shoe_type")?,
            season: row.try_get("season")?,
            price: row.try_get("price")?,
            image_url: row.try_get("image_url")?,
            wardrobe_id: row.try_get("wardrobe_id")?,
            user_id: row.try_get("user_id")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

#[async_trait]
impl ShoesStorage for ShoesRepository {
    async fn insert_shoes(&self, item: &ShoeItem) -> Result<i64> {
        let id = (item.id != UNASSIGNED_ID).then_some(item.id);

        let result = sqlx::query(
            r#"
            INSERT INTO shoes (id, name, brand, size, color, shoe_type, season, price,
                               image_url, wardrobe_id, user_id, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                brand = excluded.brand,
                size = excluded.size,
                color = excluded.color,
                shoe_type = excluded.shoe_type,
                season = excluded.season,
                price = excluded.price,
                image_url = excluded.image_url,
                wardrobe_id = excluded.wardrobe_id,
                user_id = excluded.user_id,
                created_at = excluded.created_at
            "#,
        )
        .bind(id)
        .bind(&item.name)
        .bind(&item.brand)
        .bind(&item.size)
        .bind(&item.color)
        .bind(&item.shoe_type)
        .bind(&item.season)
        .bind(item.price)
        .bind(&item.image_url)
        .bind(item.wardrobe_id)
        .bind(item.user_id)
        .bind(item.created_at)
        .execute(self.db.pool())
        .await?;

        Ok(id.unwrap_or_else(|| result.last_insert_rowid()))
    }

    async fn get_shoes(&self, item_id: i64) -> Result<Option<ShoeItem>> {
        let row = sqlx::query(&format!("{} WHERE id = ?", SELECT_COLUMNS))
            .bind(item_id)
            .fetch_optional(self.db.pool())
            .await?;

        row.as_ref().map(Self::from_row).transpose()
    }

    async fn list_shoes(&self) -> Result<Vec<ShoeItem>> {
        let rows = sqlx::query(&format!("{} ORDER BY created_at DESC, id DESC", SELECT_COLUMNS))
            .fetch_all(self.db.pool())
            .await?;

        rows.iter().map(Self::from_row).collect()
    }

    async fn update_shoes(&self, item: &ShoeItem) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE shoes
            SET name = ?, brand = ?, size = ?, color = ?, shoe_type = ?, season = ?,
                price = ?, image_url = ?, wardrobe_id = ?, user_id = ?
            WHERE id = ?
            "#,
        )
        .bind(&item.name)
        .bind(&item.brand)
        .bind(&item.size)
        .bind(&item.color)
        .bind(&item.shoe_type)
        .bind(&item.season)
        .bind(item.price)
        .bind(&item.image_url)
        .bind(item.wardrobe_id)
        .bind(item.user_id)
        .bind(item.id)
        .execute(self.db.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(anyhow::anyhow!("Shoe item not found: {}", item.id));
        }
        Ok(())
    }

    async fn delete_shoes(&self, item_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM shoes WHERE id = ?")
            .bind(item_id)
            .execute(self.db.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
