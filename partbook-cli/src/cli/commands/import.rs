//! Import command handlers: preview, commit and template download
//!
//! These drive the same engine contracts the platform's HTTP layer would:
//! preview returns the dry-run JSON, commit runs the executor against the
//! configured stores.

use std::path::Path;

use anyhow::{Context, Result};

use crate::config::repository::parts::SqlitePartStore;
use crate::config::{Config, repository};
use crate::import::{executor, preview, template};
use crate::storage::PartStore;
use crate::storage::images::FsImageStore;

/// Accepted workbook content types for upload intake
const ALLOWED_CONTENT_TYPES: &[&str] = &[
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "application/vnd.ms-excel",
];

/// Read and gate the uploaded file: extension and size limits mirror the
/// platform's upload intake.
fn read_upload(path: &Path, config: &Config) -> Result<Vec<u8>> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    if extension != "xlsx" && extension != "xls" {
        anyhow::bail!(
            "Unsupported file type '.{}' (accepted: {})",
            extension,
            ALLOWED_CONTENT_TYPES.join(", ")
        );
    }

    let metadata = std::fs::metadata(path)
        .with_context(|| format!("Cannot read {}", path.display()))?;
    if metadata.len() > config.max_upload_bytes {
        anyhow::bail!(
            "File exceeds the {} byte upload limit",
            config.max_upload_bytes
        );
    }

    std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Dry-run a workbook and print the PreviewResult as JSON
pub async fn handle_preview(file: &Path) -> Result<()> {
    let config = Config::load()?;
    let bytes = read_upload(file, &config)?;

    let pool = repository::open_pool(&config.database_path).await?;
    let store = SqlitePartStore::new(pool);
    let existing = store.list_keys().await?;

    let result = preview::build_preview(&bytes, &existing)?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

/// Commit a workbook: persist images, upsert parts, print the outcome
pub async fn handle_commit(file: &Path) -> Result<()> {
    let config = Config::load()?;
    let bytes = read_upload(file, &config)?;

    let pool = repository::open_pool(&config.database_path).await?;
    let store = SqlitePartStore::new(pool);
    let image_store = FsImageStore::new(
        config.image_dir.clone(),
        config.image_url_prefix.clone(),
        config.image_max_dimension,
        config.image_jpeg_quality,
    );

    let (rows, images_found) = preview::parse_workbook(&bytes)?;
    log::info!(
        "Committing {} rows ({} images) from {}",
        rows.len(),
        images_found,
        file.display()
    );

    let mut key_map = store.key_map().await?;
    let outcome = executor::execute_import(&rows, &mut key_map, &store, &image_store).await;
    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}

/// Write the blank import template workbook
pub fn handle_template(out: &Path) -> Result<()> {
    let bytes = template::template_workbook()?;
    std::fs::write(out, &bytes).with_context(|| format!("Failed to write {}", out.display()))?;
    println!("Template written to {}", out.display());
    Ok(())
}
