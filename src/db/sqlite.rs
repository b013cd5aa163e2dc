use std::str::FromStr;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Pool, Row, Sqlite};

use crate::db::schema::SQLITE_INIT;
use crate::error::ApiError;
use crate::store::{Item, ItemPatch, ItemStore, NewUser, User, UserStore};

pub type SqlitePool = Pool<Sqlite>;

/// Production store adapter. Every operation acquires its own pooled
/// connection, scoped to that operation: the pool reclaims the handle when
/// the guard drops, on success and error paths alike, and a failed acquire
/// surfaces before any business logic runs.
#[derive(Clone)]
pub struct SqliteStorage {
    pool: SqlitePool,
}

impl SqliteStorage {
    pub async fn connect(database_url: &str) -> Result<Self, ApiError> {
        let opts = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new().connect_with(opts).await?;
        let storage = Self { pool };
        storage.init_schema().await?;
        Ok(storage)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Initialize the schema by executing the bundled DDL.
    pub async fn init_schema(&self) -> Result<(), ApiError> {
        // execute multiple statements safely (SQLite supports multi-commands but sqlx::query doesn't)
        for stmt in SQLITE_INIT.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&self.pool).await?;
        }
        Ok(())
    }

    fn row_to_item(row: SqliteRow) -> Result<Item, ApiError> {
        Ok(Item {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            price: row.try_get("price")?,
        })
    }

    fn row_to_user(row: SqliteRow) -> Result<User, ApiError> {
        Ok(User {
            id: row.try_get("id")?,
            username: row.try_get("username")?,
            password_hash: row.try_get("password_hash")?,
            full_name: row.try_get("full_name")?,
            email: row.try_get("email")?,
        })
    }
}

#[async_trait]
impl ItemStore for SqliteStorage {
    async fn create(&self, name: &str, price: f64) -> Result<Item, ApiError> {
        let mut conn = self.pool.acquire().await?;
        let result = sqlx::query("INSERT INTO items (name, price) VALUES (?, ?)")
            .bind(name)
            .bind(price)
            .execute(&mut *conn)
            .await?;
        Ok(Item {
            id: result.last_insert_rowid(),
            name: name.to_owned(),
            price,
        })
    }

    async fn list(&self) -> Result<Vec<Item>, ApiError> {
        let mut conn = self.pool.acquire().await?;
        let rows = sqlx::query("SELECT id, name, price FROM items ORDER BY id")
            .fetch_all(&mut *conn)
            .await?;
        rows.into_iter().map(Self::row_to_item).collect()
    }

    async fn get(&self, id: i64) -> Result<Option<Item>, ApiError> {
        let mut conn = self.pool.acquire().await?;
        let row = sqlx::query("SELECT id, name, price FROM items WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;
        row.map(Self::row_to_item).transpose()
    }

    async fn update(&self, id: i64, patch: ItemPatch) -> Result<Option<Item>, ApiError> {
        let mut conn = self.pool.acquire().await?;
        let row = sqlx::query("SELECT id, name, price FROM items WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;
        let Some(current) = row.map(Self::row_to_item).transpose()? else {
            return Ok(None);
        };

        let name = patch.name.unwrap_or(current.name);
        let price = patch.price.unwrap_or(current.price);
        sqlx::query("UPDATE items SET name = ?, price = ? WHERE id = ?")
            .bind(&name)
            .bind(price)
            .bind(id)
            .execute(&mut *conn)
            .await?;
        Ok(Some(Item { id, name, price }))
    }

    async fn delete(&self, id: i64) -> Result<bool, ApiError> {
        let mut conn = self.pool.acquire().await?;
        let result = sqlx::query("DELETE FROM items WHERE id = ?")
            .bind(id)
            .execute(&mut *conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<i64, ApiError> {
        let mut conn = self.pool.acquire().await?;
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM items")
            .fetch_one(&mut *conn)
            .await?;
        Ok(count)
    }
}

#[async_trait]
impl UserStore for SqliteStorage {
    async fn create(&self, user: NewUser) -> Result<User, ApiError> {
        let mut conn = self.pool.acquire().await?;
        let result = sqlx::query(
            "INSERT INTO users (username, password_hash, full_name, email) VALUES (?, ?, ?, ?)",
        )
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(&user.full_name)
        .bind(&user.email)
        .execute(&mut *conn)
        .await?;
        Ok(User {
            id: result.last_insert_rowid(),
            username: user.username,
            password_hash: user.password_hash,
            full_name: user.full_name,
            email: user.email,
        })
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, ApiError> {
        let mut conn = self.pool.acquire().await?;
        let row = sqlx::query(
            "SELECT id, username, password_hash, full_name, email FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&mut *conn)
        .await?;
        row.map(Self::row_to_user).transpose()
    }

    async fn set_email(&self, username: &str, email: Option<&str>) -> Result<bool, ApiError> {
        let mut conn = self.pool.acquire().await?;
        let result = sqlx::query("UPDATE users SET email = ? WHERE username = ?")
            .bind(email)
            .bind(username)
            .execute(&mut *conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, username: &str) -> Result<bool, ApiError> {
        let mut conn = self.pool.acquire().await?;
        let result = sqlx::query("DELETE FROM users WHERE username = ?")
            .bind(username)
            .execute(&mut *conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<i64, ApiError> {
        let mut conn = self.pool.acquire().await?;
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&mut *conn)
            .await?;
        Ok(count)
    }
}
