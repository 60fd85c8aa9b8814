//! Configuration loading and the persistence layer

pub mod repository;

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Application configuration, read from `config.toml` in the platform
/// config directory. A missing file or missing fields fall back to
/// defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// SQLite database path
    pub database_path: PathBuf,
    /// Directory where imported part images are written
    pub image_dir: PathBuf,
    /// Public URL prefix for stored images
    pub image_url_prefix: String,
    /// Bounding box for stored images (longest side, pixels)
    pub image_max_dimension: u32,
    /// JPEG recompression quality (1-100)
    pub image_jpeg_quality: u8,
    /// Maximum accepted upload size in bytes
    pub max_upload_bytes: u64,
}

impl Default for Config {
    fn default() -> Self {
        let data = data_dir();
        Config {
            database_path: data.join("partbook.db"),
            image_dir: data.join("images").join("spare-parts"),
            image_url_prefix: "/uploads/spare-parts".to_string(),
            image_max_dimension: 800,
            image_jpeg_quality: 80,
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = config_file_path();
        if !path.exists() {
            return Ok(Config::default());
        }

        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("Invalid config: {}", path.display()))
    }
}

fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("partbook")
        .join("config.toml")
}

fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("partbook")
}
