use anyhow::Result;
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::domain::models::{User, UNASSIGNED_ID};
use crate::storage::connection::DbConnection;
use crate::storage::traits::UserStorage;

/// Repository for user operations
#[derive(Clone)]
pub struct UserRepository {
    db: DbConnection,
}

impl UserRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn from_row(row: &SqliteRow) -> Result<User> {
        Ok(User {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            gender: row.try_get("gender")?,
            birthday: row.try_get("birthday")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

#[async_trait]
impl UserStorage for UserRepository {
    async fn insert_user(&self, user: &User) -> Result<i64> {
        if user.id == UNASSIGNED_ID {
            let result = sqlx::query(
                r#"
                INSERT INTO users (name, gender, birthday, created_at)
                VALUES (?, ?, ?, ?)
                "#,
            )
            .bind(&user.name)
            .bind(&user.gender)
            .bind(user.birthday)
            .bind(user.created_at)
            .execute(self.db.pool())
            .await?;
            return Ok(result.last_insert_rowid());
        }

        sqlx::query(
            r#"
            INSERT INTO users (id, name, gender, birthday, created_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                gender = excluded.gender,
                birthday = excluded.birthday,
                created_at = excluded.created_at
            "#,
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.gender)
        .bind(user.birthday)
        .bind(user.created_at)
        .execute(self.db.pool())
        .await?;
        Ok(user.id)
    }

    async fn get_user(&self, user_id: i64) -> Result<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, gender, birthday, created_at
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(user_id)
        .fetch_optional(self.db.pool())
        .await?;

        row.as_ref().map(Self::from_row).transpose()
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, gender, birthday, created_at
            FROM users
            ORDER BY name ASC, id ASC
            "#,
        )
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(Self::from_row).collect()
    }

    async fn update_user(&self, user: &User) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET name = ?, gender = ?, birthday = ?
            WHERE id = ?
            "#,
        )
        .bind(&user.name)
        .bind(&user.gender)
        .bind(user.birthday)
        .bind(user.id)
        .execute(self.db.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(anyhow::anyhow!("User not found: {}", user.id));
        }
        Ok(())
    }

    async fn delete_user(&self, user_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(user_id)
            .execute(self.db.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn get_active_user(&self) -> Result<Option<i64>> {
        let row = sqlx::query("SELECT user_id FROM active_user WHERE id = 1")
            .fetch_optional(self.db.pool())
            .await?;

        match row {
            Some(r) => Ok(Some(r.try_get("user_id")?)),
            None => Ok(None),
        }
    }

    async fn set_active_user(&self, user_id: i64) -> Result<()> {
        // First verify the user exists
        let user_exists = sqlx::query("SELECT 1 FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_optional(self.db.pool())
            .await?
            .is_some();

        if !user_exists {
            return Err(anyhow::anyhow!("User not found: {}", user_id));
        }

        sqlx::query(
            r#"
            INSERT OR REPLACE INTO active_user (id, user_id, updated_at)
            VALUES (1, ?, CURRENT_TIMESTAMP)
            "#,
        )
        .bind(user_id)
        .execute(self.db.pool())
        .await?;

        Ok(())
    }
}
