use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow},
    Pool, Row, Sqlite,
};
use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use shared::domain::{Condition, Item, ItemId, ListName, NewItem};

/// Persistence operations over the single `items` table.
///
/// Every mutating call is committed before it returns; nothing spans more
/// than one statement.
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Inserts an item. The store assigns `id` and stamps `time`.
    async fn create_item(&self, item: NewItem) -> Result<Item>;
    /// All items in insertion order.
    async fn list_items(&self) -> Result<Vec<Item>>;
    /// Raw list keys currently referenced by at least one item, ordered by
    /// first appearance.
    async fn distinct_list_names(&self) -> Result<Vec<ListName>>;
    async fn find_item(&self, item_id: ItemId) -> Result<Option<Item>>;
    /// Returns `false` when no item has that id.
    async fn update_condition(&self, item_id: ItemId, condition: Condition) -> Result<bool>;
    /// Returns `false` when no item has that id.
    async fn delete_item(&self, item_id: ItemId) -> Result<bool>;
    /// Removes every item of the list and returns how many went.
    async fn delete_items_in_list(&self, list_name: &ListName) -> Result<u64>;
    async fn count_items(&self) -> Result<i64>;
    async fn health_check(&self) -> Result<()>;
}

#[derive(Clone)]
pub struct Storage {
    pool: Pool<Sqlite>,
}

impl Storage {
    pub async fn new(database_url: &str) -> Result<Self> {
        ensure_sqlite_parent_dir_exists(database_url)?;

        let connect_options = SqliteConnectOptions::from_str(database_url)
            .with_context(|| format!("invalid sqlite url '{database_url}'"))?
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(connect_options)
            .await
            .with_context(|| format!("failed to open sqlite database '{database_url}'"))?;
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("failed to run item migrations")?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }
}

/// Creation stamp: Unix seconds with two decimal places.
pub fn timestamp_now() -> String {
    let micros = Utc::now().timestamp_micros();
    format!("{:.2}", micros as f64 / 1_000_000.0)
}

fn item_from_row(row: &SqliteRow) -> Result<Item> {
    let raw_condition: String = row.try_get("condition")?;
    let condition = raw_condition
        .parse::<Condition>()
        .with_context(|| format!("corrupt condition column '{raw_condition}'"))?;
    Ok(Item {
        id: ItemId(row.try_get("id")?),
        text: row.try_get("text")?,
        list_name: ListName::from_stored(row.try_get::<String, _>("list_name")?),
        date: row.try_get("date")?,
        time: row.try_get("time")?,
        condition,
    })
}

fn ensure_sqlite_parent_dir_exists(database_url: &str) -> Result<()> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent() else {
        return Ok(());
    };
    if parent.as_os_str().is_empty() {
        return Ok(());
    }

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for database url '{database_url}'",
            parent.display()
        )
    })?;

    Ok(())
}

fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    if database_url.starts_with("sqlite::memory:") || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() || path == ":memory:" {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}

#[async_trait]
impl ItemStore for Storage {
    async fn create_item(&self, item: NewItem) -> Result<Item> {
        let time = timestamp_now();
        let row = sqlx::query(
            "INSERT INTO items (text, list_name, date, time, condition)
             VALUES (?, ?, ?, ?, ?)
             RETURNING id, text, list_name, date, time, condition",
        )
        .bind(item.text.as_str())
        .bind(item.list_name.as_key())
        .bind(item.date.as_deref())
        .bind(time.as_str())
        .bind(item.condition.as_str())
        .fetch_one(&self.pool)
        .await
        .context("failed to insert item")?;
        item_from_row(&row)
    }

    async fn list_items(&self) -> Result<Vec<Item>> {
        let rows = sqlx::query(
            "SELECT id, text, list_name, date, time, condition FROM items ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .context("failed to list items")?;
        rows.iter().map(item_from_row).collect()
    }

    async fn distinct_list_names(&self) -> Result<Vec<ListName>> {
        let rows = sqlx::query(
            "SELECT list_name FROM items GROUP BY list_name ORDER BY MIN(id)",
        )
        .fetch_all(&self.pool)
        .await
        .context("failed to list distinct list names")?;
        rows.into_iter()
            .map(|r| -> Result<ListName> { Ok(ListName::from_stored(r.try_get::<String, _>(0)?)) })
            .collect()
    }

    async fn find_item(&self, item_id: ItemId) -> Result<Option<Item>> {
        let row = sqlx::query(
            "SELECT id, text, list_name, date, time, condition FROM items WHERE id = ?",
        )
        .bind(item_id.0)
        .fetch_optional(&self.pool)
        .await
        .context("failed to load item")?;
        row.as_ref().map(item_from_row).transpose()
    }

    async fn update_condition(&self, item_id: ItemId, condition: Condition) -> Result<bool> {
        let result = sqlx::query("UPDATE items SET condition = ? WHERE id = ?")
            .bind(condition.as_str())
            .bind(item_id.0)
            .execute(&self.pool)
            .await
            .context("failed to update item condition")?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_item(&self, item_id: ItemId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM items WHERE id = ?")
            .bind(item_id.0)
            .execute(&self.pool)
            .await
            .context("failed to delete item")?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_items_in_list(&self, list_name: &ListName) -> Result<u64> {
        let result = sqlx::query("DELETE FROM items WHERE list_name = ?")
            .bind(list_name.as_key())
            .execute(&self.pool)
            .await
            .context("failed to delete list items")?;
        Ok(result.rows_affected())
    }

    async fn count_items(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM items")
            .fetch_one(&self.pool)
            .await
            .context("failed to count items")?;
        Ok(count)
    }

    async fn health_check(&self) -> Result<()> {
        let _: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("sqlite ping failed")?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
