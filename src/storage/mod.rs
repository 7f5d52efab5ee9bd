//! Blob storage seam
//!
//! The core treats the object store as opaque get/put/delete-by-key.
//! Keys are namespaced `wells/{well_id}/{file_name}`. Two implementations:
//! a local-filesystem store for normal operation and an in-memory store as
//! the injectable test double.

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::errors::{BlobError, BlobResult};

/// Namespaced blob key for a well's file.
pub fn blob_key(well_id: i32, file_name: &str) -> String {
    format!("wells/{}/{}", well_id, file_name)
}

#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn put(&self, key: &str, bytes: &[u8]) -> BlobResult<()>;
    async fn get(&self, key: &str) -> BlobResult<Vec<u8>>;
    /// Delete is ok-or-absent: removing a missing key is not an error.
    async fn delete(&self, key: &str) -> BlobResult<()>;
}

/// Blob store backed by a directory on the local filesystem.
pub struct LocalBlobStore {
    root: PathBuf,
}

impl LocalBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, key: &str) -> BlobResult<PathBuf> {
        let rel = Path::new(key);
        let escapes = rel.components().any(|c| {
            !matches!(c, Component::Normal(_))
        });
        if key.is_empty() || escapes {
            return Err(BlobError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(rel))
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn put(&self, key: &str, bytes: &[u8]) -> BlobResult<()> {
        let path = self.resolve(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, bytes).await?;
        Ok(())
    }

    async fn get(&self, key: &str) -> BlobResult<Vec<u8>> {
        let path = self.resolve(key)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(BlobError::NotFound(key.to_string()))
            }
            Err(e) => Err(BlobError::Io(e)),
        }
    }

    async fn delete(&self, key: &str) -> BlobResult<()> {
        let path = self.resolve(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(BlobError::Io(e)),
        }
    }
}

/// In-memory blob store used as a test double.
#[derive(Default)]
pub struct MemoryBlobStore {
    blobs: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.blobs.lock().expect("blob map poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(&self, key: &str, bytes: &[u8]) -> BlobResult<()> {
        self.blobs
            .lock()
            .expect("blob map poisoned")
            .insert(key.to_string(), bytes.to_vec());
        Ok(())
    }

    async fn get(&self, key: &str) -> BlobResult<Vec<u8>> {
        self.blobs
            .lock()
            .expect("blob map poisoned")
            .get(key)
            .cloned()
            .ok_or_else(|| BlobError::NotFound(key.to_string()))
    }

    async fn delete(&self, key: &str) -> BlobResult<()> {
        self.blobs.lock().expect("blob map poisoned").remove(key);
        Ok(())
    }
}
