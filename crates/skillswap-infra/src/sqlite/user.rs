//! SQLite user and category storage.
//!
//! Profile and category management live outside this service; these
//! repositories only insert and fetch the rows other tables reference.

use chrono::Utc;
use skillswap_types::category::{Category, CategoryId};
use skillswap_types::error::RepositoryError;
use skillswap_types::user::{User, UserId};
use sqlx::Row;

use super::pool::DatabasePool;
use super::row::{format_datetime, map_sqlx_error, parse_datetime, parse_id};

pub struct SqliteUserRepository {
    pool: DatabasePool,
}

impl SqliteUserRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, user: &User) -> Result<User, RepositoryError> {
        sqlx::query(
            "INSERT INTO users (id, email, name, avatar, bio, location, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(user.id.to_string())
        .bind(&user.email)
        .bind(&user.name)
        .bind(&user.avatar)
        .bind(&user.bio)
        .bind(&user.location)
        .bind(format_datetime(&user.created_at))
        .bind(format_datetime(&user.updated_at))
        .execute(&self.pool.writer)
        .await
        .map_err(map_sqlx_error)?;

        Ok(user.clone())
    }

    pub async fn get_by_id(&self, id: &UserId) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query(
            "SELECT * FROM users WHERE id = ? AND is_active = 1 AND deleted_at IS NULL",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool.reader)
        .await
        .map_err(map_sqlx_error)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let get = |col: &str| -> Result<String, RepositoryError> {
            row.try_get(col)
                .map_err(|e| RepositoryError::Query(e.to_string()))
        };
        let get_opt = |col: &str| -> Result<Option<String>, RepositoryError> {
            row.try_get(col)
                .map_err(|e| RepositoryError::Query(e.to_string()))
        };

        Ok(Some(User {
            id: parse_id(&get("id")?, "user")?,
            email: get("email")?,
            name: get("name")?,
            avatar: get_opt("avatar")?,
            bio: get_opt("bio")?,
            location: get_opt("location")?,
            created_at: parse_datetime(&get("created_at")?)?,
            updated_at: parse_datetime(&get("updated_at")?)?,
        }))
    }

    /// Insert a category, returning it with its assigned id.
    pub async fn create_category(&self, name: &str) -> Result<Category, RepositoryError> {
        let result = sqlx::query("INSERT INTO categories (name) VALUES (?)")
            .bind(name)
            .execute(&self.pool.writer)
            .await
            .map_err(map_sqlx_error)?;

        Ok(Category {
            id: CategoryId(result.last_insert_rowid()),
            name: name.to_string(),
        })
    }
}

/// A user with only the required fields set, timestamped now.
pub fn new_user(name: &str, email: &str) -> User {
    let now = Utc::now();
    User {
        id: UserId::new(),
        email: email.to_string(),
        name: name.to_string(),
        avatar: None,
        bio: None,
        location: None,
        created_at: now,
        updated_at: now,
    }
}
