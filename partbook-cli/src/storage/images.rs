//! Filesystem image store with resize and recompression

use std::io::Cursor;
use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use image::ImageFormat;
use image::codecs::jpeg::JpegEncoder;
use sha2::{Digest, Sha256};

use super::ImageStore;
use crate::import::types::SheetImage;

/// Stores extracted part images under a local directory served at
/// `url_prefix`.
pub struct FsImageStore {
    root: PathBuf,
    url_prefix: String,
    max_dimension: u32,
    jpeg_quality: u8,
}

impl FsImageStore {
    pub fn new(root: PathBuf, url_prefix: String, max_dimension: u32, jpeg_quality: u8) -> Self {
        FsImageStore {
            root,
            url_prefix,
            max_dimension,
            jpeg_quality,
        }
    }

    /// Derive the stored file name from the part id, a content-hash prefix
    /// and a timestamp, so two imports of the same part never overwrite
    /// each other's files.
    fn derive_name(&self, image: &SheetImage, key_hint: &str) -> String {
        let digest = format!("{:x}", Sha256::digest(&image.bytes));
        let slug: String = key_hint
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_lowercase()
                } else {
                    '-'
                }
            })
            .collect();
        let ext = if image.mime == "image/png" { "png" } else { "jpg" };
        format!(
            "{}-{}-{}.{}",
            slug,
            &digest[..8],
            Utc::now().timestamp_millis(),
            ext
        )
    }

    fn encode(&self, image: &SheetImage) -> Result<Vec<u8>> {
        let decoded = image::load_from_memory(&image.bytes).context("Failed to decode image")?;
        let resized = if decoded.width() > self.max_dimension || decoded.height() > self.max_dimension
        {
            decoded.thumbnail(self.max_dimension, self.max_dimension)
        } else {
            decoded
        };

        let mut encoded = Vec::new();
        if image.mime == "image/png" {
            resized
                .write_to(&mut Cursor::new(&mut encoded), ImageFormat::Png)
                .context("Failed to encode PNG")?;
        } else {
            let encoder = JpegEncoder::new_with_quality(&mut encoded, self.jpeg_quality);
            resized
                .to_rgb8()
                .write_with_encoder(encoder)
                .context("Failed to encode JPEG")?;
        }
        Ok(encoded)
    }
}

#[async_trait]
impl ImageStore for FsImageStore {
    async fn store(&self, image: &SheetImage, key_hint: &str) -> Result<String> {
        let encoded = self.encode(image)?;
        let file_name = self.derive_name(image, key_hint);
        let path = self.root.join(&file_name);

        tokio::fs::create_dir_all(&self.root)
            .await
            .with_context(|| format!("Failed to create image dir {}", self.root.display()))?;
        tokio::fs::write(&path, &encoded)
            .await
            .with_context(|| format!("Failed to write image {}", path.display()))?;

        Ok(format!(
            "{}/{}",
            self.url_prefix.trim_end_matches('/'),
            file_name
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> FsImageStore {
        FsImageStore::new(
            std::env::temp_dir().join("partbook-test-images"),
            "/uploads/spare-parts".to_string(),
            800,
            80,
        )
    }

    fn png_image() -> SheetImage {
        use base64::Engine as _;
        SheetImage {
            mime: "image/png".to_string(),
            bytes: base64::engine::general_purpose::STANDARD
                .decode(
                    "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==",
                )
                .unwrap(),
        }
    }

    #[test]
    fn test_derived_names_are_collision_safe() {
        let store = store();
        let image = png_image();

        let a = store.derive_name(&image, "SP-1001");
        assert!(a.starts_with("sp-1001-"));
        assert!(a.ends_with(".png"));

        // Same content hash, but the timestamp keeps names apart across
        // repeated stores
        let hash_a = a.split('-').nth(2).map(String::from);
        let b = store.derive_name(&image, "SP-1001");
        let hash_b = b.split('-').nth(2).map(String::from);
        assert_eq!(hash_a, hash_b);
    }

    #[test]
    fn test_key_hint_is_slugged() {
        let store = store();
        let name = store.derive_name(&png_image(), "SP 10/01");
        assert!(name.starts_with("sp-10-01-"));
    }

    #[tokio::test]
    async fn test_store_writes_file_and_returns_url() {
        let store = store();
        let url = store.store(&png_image(), "SP-1").await.unwrap();
        assert!(url.starts_with("/uploads/spare-parts/sp-1-"));
        assert!(url.ends_with(".png"));
    }
}
