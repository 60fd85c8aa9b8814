//! Repository for spare part operations

use std::collections::{HashMap, HashSet};

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

use crate::storage::{NewSparePart, PartId, PartStore, SparePartUpdate};

/// SQLite-backed spare part store
pub struct SqlitePartStore {
    pool: SqlitePool,
}

impl SqlitePartStore {
    pub fn new(pool: SqlitePool) -> Self {
        SqlitePartStore { pool }
    }
}

#[async_trait]
impl PartStore for SqlitePartStore {
    async fn list_keys(&self) -> Result<HashSet<String>> {
        let rows = sqlx::query("SELECT part_id FROM spare_parts")
            .fetch_all(&self.pool)
            .await
            .context("Failed to list part ids")?;

        let mut keys = HashSet::new();
        for row in rows {
            let part_id: String = row.try_get("part_id")?;
            keys.insert(part_id.to_lowercase());
        }
        Ok(keys)
    }

    async fn key_map(&self) -> Result<HashMap<String, PartId>> {
        let rows = sqlx::query("SELECT id, part_id FROM spare_parts")
            .fetch_all(&self.pool)
            .await
            .context("Failed to load part id map")?;

        let mut map = HashMap::new();
        for row in rows {
            let id: i64 = row.try_get("id")?;
            let part_id: String = row.try_get("part_id")?;
            map.insert(part_id.to_lowercase(), id);
        }
        Ok(map)
    }

    async fn find_by_key(&self, part_id: &str) -> Result<Option<PartId>> {
        let row = sqlx::query("SELECT id FROM spare_parts WHERE LOWER(part_id) = LOWER(?)")
            .bind(part_id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to look up part")?;

        Ok(match row {
            Some(row) => Some(row.try_get("id")?),
            None => None,
        })
    }

    async fn create(&self, part: &NewSparePart) -> Result<PartId> {
        let result = sqlx::query(
            r#"
            INSERT INTO spare_parts
                (part_id, name, description, specifications, price, image_url,
                 status, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, 'active', datetime('now'), datetime('now'))
            "#,
        )
        .bind(&part.part_id)
        .bind(&part.name)
        .bind(&part.description)
        .bind(&part.specifications)
        .bind(part.price)
        .bind(&part.image_url)
        .execute(&self.pool)
        .await
        .with_context(|| format!("Failed to create spare part {}", part.part_id))?;

        Ok(result.last_insert_rowid())
    }

    async fn update(&self, id: PartId, fields: &SparePartUpdate) -> Result<()> {
        // image_url is only touched when a new image was resolved
        if let Some(ref image_url) = fields.image_url {
            sqlx::query(
                r#"
                UPDATE spare_parts
                SET name = ?, description = ?, specifications = ?, image_url = ?,
                    updated_at = datetime('now')
                WHERE id = ?
                "#,
            )
            .bind(&fields.name)
            .bind(&fields.description)
            .bind(&fields.specifications)
            .bind(image_url)
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to update spare part")?;
        } else {
            sqlx::query(
                r#"
                UPDATE spare_parts
                SET name = ?, description = ?, specifications = ?,
                    updated_at = datetime('now')
                WHERE id = ?
                "#,
            )
            .bind(&fields.name)
            .bind(&fields.description)
            .bind(&fields.specifications)
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to update spare part")?;
        }
        Ok(())
    }
}
