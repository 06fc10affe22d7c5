//! SQLite skill repository implementation.
//!
//! Implements `SkillRepository` from `skillswap-core` using sqlx with split
//! read/write pools.

use skillswap_core::repository::Window;
use skillswap_core::repository::skill::{SkillFilter, SkillListing, SkillRepository};
use skillswap_types::category::CategoryId;
use skillswap_types::error::RepositoryError;
use skillswap_types::skill::{Skill, SkillId, fold_for_search};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use super::pool::DatabasePool;
use super::row::{format_datetime, map_sqlx_error, parse_datetime, parse_id};

/// SQLite-backed implementation of `SkillRepository`.
pub struct SqliteSkillRepository {
    pool: DatabasePool,
}

impl SqliteSkillRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

/// Internal row type for mapping SQLite rows to domain Skill.
struct SkillRow {
    id: String,
    user_id: String,
    category_id: i64,
    title: String,
    description: String,
    created_at: String,
    updated_at: String,
}

impl SkillRow {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            category_id: row.try_get("category_id")?,
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn into_skill(self) -> Result<Skill, RepositoryError> {
        Ok(Skill {
            id: parse_id(&self.id, "skill")?,
            user_id: parse_id(&self.user_id, "user")?,
            category_id: CategoryId(self.category_id),
            title: self.title,
            description: self.description,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}

const LIVE: &str = "is_active = 1 AND deleted_at IS NULL";

/// A value for one `?` placeholder.
#[derive(Clone)]
enum Bind {
    Text(String),
    Int(i64),
}

/// WHERE clause for `filter` and its bind values, in placeholder order.
fn where_clause(filter: &SkillFilter) -> (String, Vec<Bind>) {
    let mut conditions = vec![LIVE.to_string()];
    let mut binds = Vec::new();

    if let Some(search) = filter.search.as_deref() {
        conditions.push(
            "(instr(title_folded, ?) > 0 OR instr(description_folded, ?) > 0)".to_string(),
        );
        let needle = fold_for_search(search);
        binds.push(Bind::Text(needle.clone()));
        binds.push(Bind::Text(needle));
    }
    if let Some(category_id) = filter.category_id {
        conditions.push("category_id = ?".to_string());
        binds.push(Bind::Int(category_id.0));
    }

    (format!(" WHERE {}", conditions.join(" AND ")), binds)
}

fn bind_all<'q>(
    mut query: sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>>,
    binds: Vec<Bind>,
) -> sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>> {
    for bind in binds {
        query = match bind {
            Bind::Text(s) => query.bind(s),
            Bind::Int(i) => query.bind(i),
        };
    }
    query
}

impl SkillRepository for SqliteSkillRepository {
    async fn create(&self, skill: &Skill) -> Result<Skill, RepositoryError> {
        sqlx::query(
            "INSERT INTO skills (id, user_id, category_id, title, description,
                                 title_folded, description_folded, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(skill.id.to_string())
        .bind(skill.user_id.to_string())
        .bind(skill.category_id.0)
        .bind(&skill.title)
        .bind(&skill.description)
        .bind(fold_for_search(&skill.title))
        .bind(fold_for_search(&skill.description))
        .bind(format_datetime(&skill.created_at))
        .bind(format_datetime(&skill.updated_at))
        .execute(&self.pool.writer)
        .await
        .map_err(map_sqlx_error)?;

        Ok(skill.clone())
    }

    async fn get_by_id(&self, id: &SkillId) -> Result<Option<Skill>, RepositoryError> {
        let row = sqlx::query(&format!("SELECT * FROM skills WHERE id = ? AND {LIVE}"))
            .bind(id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(map_sqlx_error)?;

        match row {
            Some(row) => {
                let skill_row =
                    SkillRow::from_row(&row).map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(skill_row.into_skill()?))
            }
            None => Ok(None),
        }
    }

    async fn list(
        &self,
        filter: &SkillFilter,
        window: Option<Window>,
    ) -> Result<SkillListing, RepositoryError> {
        let (clause, binds) = where_clause(filter);
        let count_sql = format!("SELECT COUNT(*) AS n FROM skills{clause}");
        let mut list_sql = format!("SELECT * FROM skills{clause} ORDER BY created_at DESC, id DESC");

        let mut list_binds = binds.clone();
        if let Some(window) = window {
            list_sql.push_str(" LIMIT ? OFFSET ?");
            list_binds.push(Bind::Int(i64::try_from(window.limit).unwrap_or(i64::MAX)));
            list_binds.push(Bind::Int(i64::try_from(window.offset).unwrap_or(i64::MAX)));
        }

        tracing::debug!(sql = %list_sql, "listing skills");

        // One read transaction, so the count and the rows see the same snapshot.
        let mut tx = self.pool.reader.begin().await.map_err(map_sqlx_error)?;

        let row = bind_all(sqlx::query(&count_sql), binds)
            .fetch_one(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;
        let n: i64 = row
            .try_get("n")
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let rows = bind_all(sqlx::query(&list_sql), list_binds)
            .fetch_all(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;

        let mut skills = Vec::with_capacity(rows.len());
        for row in &rows {
            let skill_row =
                SkillRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            skills.push(skill_row.into_skill()?);
        }

        Ok(SkillListing {
            total: u64::try_from(n).unwrap_or_default(),
            skills,
        })
    }
}
