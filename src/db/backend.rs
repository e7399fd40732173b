use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, info};

use crate::models::Product;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid product document {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Whole-collection persistence. Every call reads or replaces the full product list.
#[async_trait]
pub trait ProductStorage: Send + Sync {
    async fn load(&self) -> Result<Vec<Product>, StorageError>;
    async fn save(&self, products: &[Product]) -> Result<(), StorageError>;
}

// ── JSON file ─────────────────────────────────────────────────────────────────

/// A single JSON array on disk, pretty-printed with 2-space indentation.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates the document as an empty array when it does not exist yet.
    /// Returns `true` if a new file was written.
    pub async fn ensure_exists(&self) -> Result<bool, StorageError> {
        let exists = tokio::fs::try_exists(&self.path)
            .await
            .map_err(|source| self.io_error(source))?;
        if exists {
            return Ok(false);
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| self.io_error(source))?;
        }
        self.save(&[]).await?;
        info!(path = %self.path.display(), "Created empty product document");
        Ok(true)
    }

    // Sibling file so the final rename stays on one filesystem.
    fn staging_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

#[async_trait]
impl ProductStorage for JsonFileStorage {
    async fn load(&self) -> Result<Vec<Product>, StorageError> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|source| self.io_error(source))?;

        serde_json::from_slice(&bytes).map_err(|source| StorageError::Json {
            path: self.path.clone(),
            source,
        })
    }

    async fn save(&self, products: &[Product]) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(products).map_err(|source| StorageError::Json {
            path: self.path.clone(),
            source,
        })?;

        // Write-then-rename: readers see either the old document or the new one.
        let staging = self.staging_path();
        tokio::fs::write(&staging, json)
            .await
            .map_err(|source| StorageError::Io {
                path: staging.clone(),
                source,
            })?;
        tokio::fs::rename(&staging, &self.path)
            .await
            .map_err(|source| self.io_error(source))?;

        debug!(path = %self.path.display(), count = products.len(), "Persisted products");
        Ok(())
    }
}

// ── In-memory ─────────────────────────────────────────────────────────────────

/// Volatile backend holding the collection in memory.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryStorage {
    products: tokio::sync::RwLock<Vec<Product>>,
}

#[cfg(test)]
impl MemoryStorage {
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            products: tokio::sync::RwLock::new(products),
        }
    }
}

#[cfg(test)]
#[async_trait]
impl ProductStorage for MemoryStorage {
    async fn load(&self) -> Result<Vec<Product>, StorageError> {
        Ok(self.products.read().await.clone())
    }

    async fn save(&self, products: &[Product]) -> Result<(), StorageError> {
        *self.products.write().await = products.to_vec();
        Ok(())
    }
}
