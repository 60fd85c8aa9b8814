//! External collaborator contracts: part persistence and image storage
//!
//! The engine only sees these traits; the SQLite repository and the
//! filesystem image store are the in-repo implementations.

pub mod images;

use std::collections::{HashMap, HashSet};

use anyhow::Result;
use async_trait::async_trait;

use crate::import::types::SheetImage;

/// Surrogate identifier for a stored spare part
pub type PartId = i64;

/// Fields for a newly created spare part
#[derive(Debug, Clone)]
pub struct NewSparePart {
    pub part_id: String,
    pub name: String,
    pub description: Option<String>,
    pub specifications: Option<String>,
    pub price: f64,
    pub image_url: Option<String>,
}

/// Fields applied when updating an existing spare part. `image_url = None`
/// leaves the stored image untouched.
#[derive(Debug, Clone)]
pub struct SparePartUpdate {
    pub name: String,
    pub description: Option<String>,
    pub specifications: Option<String>,
    pub image_url: Option<String>,
}

/// Spare part persistence as consumed by the import engine
#[async_trait]
pub trait PartStore: Send + Sync {
    /// All existing part ids, lower-cased, for preview reconciliation
    async fn list_keys(&self) -> Result<HashSet<String>>;

    /// Lower-cased part id -> identifier map for the commit path
    async fn key_map(&self) -> Result<HashMap<String, PartId>>;

    /// Point lookup by natural key, case-insensitive
    async fn find_by_key(&self, part_id: &str) -> Result<Option<PartId>>;

    /// Create a part (status defaults to active), returning its identifier
    async fn create(&self, part: &NewSparePart) -> Result<PartId>;

    async fn update(&self, id: PartId, fields: &SparePartUpdate) -> Result<()>;
}

/// Image persistence with downscaling and recompression
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Persist an extracted image, returning its public URL
    async fn store(&self, image: &SheetImage, key_hint: &str) -> Result<String>;
}
