use std::path::{Path, PathBuf};

use chrono::Utc;
use thiserror::Error;
use tokio::fs;
use uuid::Uuid;

use crate::config::StorageConfig;

pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;
pub const PRODUCTS_PREFIX: &str = "products";
/// Route prefix the bucket is served under.
pub const PUBLIC_PREFIX: &str = "/storage";

const EXTENSIONS: [&str; 3] = ["jpg", "png", "webp"];

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("unsupported content type {0}")]
    UnsupportedType(String),

    #[error("image is empty")]
    Empty,

    #[error("image exceeds the 5 MiB limit")]
    TooLarge,

    #[error("storage io: {0}")]
    Io(#[from] std::io::Error),
}

/// Public object bucket on local disk. Objects are addressed by key and
/// overwritten on conflict.
#[derive(Debug, Clone)]
pub struct ImageBucket {
    root: PathBuf,
    public_base_url: String,
}

impl ImageBucket {
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            root: config.root.clone(),
            public_base_url: config.public_base_url.clone(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Store the already-resized image for a product and return its public URL.
    pub async fn put_product_image(
        &self,
        product_id: Uuid,
        content_type: &str,
        bytes: &[u8],
    ) -> Result<String, StorageError> {
        let ext = extension_for(content_type)?;
        if bytes.is_empty() {
            return Err(StorageError::Empty);
        }
        if bytes.len() > MAX_IMAGE_BYTES {
            return Err(StorageError::TooLarge);
        }

        let dir = self.root.join(PRODUCTS_PREFIX);
        fs::create_dir_all(&dir).await?;

        let key = format!("{PRODUCTS_PREFIX}/{product_id}.{ext}");
        let target = self.root.join(&key);
        let staged = dir.join(format!("{product_id}.{ext}.upload"));
        fs::write(&staged, bytes).await?;
        if let Err(err) = fs::rename(&staged, &target).await {
            let _ = fs::remove_file(&staged).await;
            return Err(err.into());
        }

        // one object per product regardless of format
        for other in EXTENSIONS.iter().filter(|e| **e != ext) {
            let stale = dir.join(format!("{product_id}.{other}"));
            match fs::remove_file(&stale).await {
                Ok(()) => tracing::debug!(path = %stale.display(), "removed stale image"),
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
                Err(err) => tracing::warn!(path = %stale.display(), error = %err, "stale image left behind"),
            }
        }

        tracing::info!(%key, size = bytes.len(), "stored product image");

        Ok(format!(
            "{}{PUBLIC_PREFIX}/{key}?v={}",
            self.public_base_url,
            Utc::now().timestamp_millis()
        ))
    }
}

fn extension_for(content_type: &str) -> Result<&'static str, StorageError> {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    match mime.as_str() {
        "image/jpeg" | "image/jpg" => Ok("jpg"),
        "image/png" => Ok("png"),
        "image/webp" => Ok("webp"),
        _ => Err(StorageError::UnsupportedType(mime)),
    }
}
