//! Blob storage configuration.

use serde::{Deserialize, Serialize};

/// Top-level blob storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Blob provider to use: `"s3"`, `"local"`, or `"memory"`.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Thumbnail encoding settings.
    #[serde(default)]
    pub thumbnail: ThumbnailConfig,
    /// Local filesystem storage configuration.
    #[serde(default)]
    pub local: LocalStorageConfig,
    /// S3-compatible storage configuration.
    #[serde(default)]
    pub s3: S3StorageConfig,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            thumbnail: ThumbnailConfig::default(),
            local: LocalStorageConfig::default(),
            s3: S3StorageConfig::default(),
        }
    }
}

/// Thumbnail encoding configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThumbnailConfig {
    /// Output width in pixels.
    #[serde(default = "default_thumb_width")]
    pub width: u32,
    /// Output height in pixels.
    #[serde(default = "default_thumb_height")]
    pub height: u32,
    /// JPEG quality (1-100).
    #[serde(default = "default_thumb_quality")]
    pub quality: u8,
}

impl Default for ThumbnailConfig {
    fn default() -> Self {
        Self {
            width: default_thumb_width(),
            height: default_thumb_height(),
            quality: default_thumb_quality(),
        }
    }
}

/// Local filesystem storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalStorageConfig {
    /// Root path for locally stored blobs.
    #[serde(default = "default_local_root")]
    pub root_path: String,
}

impl Default for LocalStorageConfig {
    fn default() -> Self {
        Self {
            root_path: default_local_root(),
        }
    }
}

/// S3-compatible storage configuration.
///
/// Bucket name, endpoint, and credentials are supplied here, never read
/// from process-global state inside the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3StorageConfig {
    /// S3 endpoint URL.
    #[serde(default)]
    pub endpoint: String,
    /// Region name.
    #[serde(default = "default_region")]
    pub region: String,
    /// Bucket name.
    #[serde(default)]
    pub bucket: String,
    /// Access key ID.
    #[serde(default)]
    pub access_key: String,
    /// Secret access key.
    #[serde(default)]
    pub secret_key: String,
    /// Public base URL used to build blob locators. Falls back to
    /// `{endpoint}/{bucket}` when empty.
    #[serde(default)]
    pub public_base_url: String,
}

impl Default for S3StorageConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            region: default_region(),
            bucket: String::new(),
            access_key: String::new(),
            secret_key: String::new(),
            public_base_url: String::new(),
        }
    }
}

fn default_provider() -> String {
    "s3".to_string()
}

fn default_thumb_width() -> u32 {
    280
}

fn default_thumb_height() -> u32 {
    210
}

fn default_thumb_quality() -> u8 {
    80
}

fn default_local_root() -> String {
    "data/blobs".to_string()
}

fn default_region() -> String {
    "global".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn s3_default_matches_the_serde_defaults() {
        let config = S3StorageConfig::default();
        assert_eq!(config.region, default_region());
        assert!(config.endpoint.is_empty());
        assert!(config.public_base_url.is_empty());
    }
}
