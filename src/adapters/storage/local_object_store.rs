//! Local Directory Object Store Adapter
//!
//! Serves objects from `{root}/{bucket}/{key}` on disk, so the model artifact
//! can be used offline during development.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tokio::fs;

use crate::ports::{ObjectLocation, ObjectStore, StorageError};

/// File-based object storage
#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    root: PathBuf,
    max_object_bytes: u64,
}

impl LocalObjectStore {
    /// Create a store rooted at the given directory
    ///
    /// # Example
    /// ```ignore
    /// let store = LocalObjectStore::new("./models", 16 * 1024 * 1024);
    /// ```
    pub fn new<P: AsRef<Path>>(root: P, max_object_bytes: u64) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            max_object_bytes,
        }
    }

    /// Resolve the on-disk path, refusing keys that escape the bucket
    fn object_path(&self, location: &ObjectLocation) -> Result<PathBuf, StorageError> {
        let relative = Path::new(&location.bucket).join(&location.key);
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            return Err(StorageError::InvalidConfig(format!(
                "object path '{}' must stay inside the storage root",
                location
            )));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn get_object(&self, location: &ObjectLocation) -> Result<Vec<u8>, StorageError> {
        let path = self.object_path(location)?;

        let metadata = fs::metadata(&path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => StorageError::NotFound(location.clone()),
            ErrorKind::PermissionDenied => StorageError::AccessDenied(location.clone()),
            _ => StorageError::io(format!("{}: {}", path.display(), e)),
        })?;

        if metadata.len() > self.max_object_bytes {
            return Err(StorageError::TooLarge {
                location: location.clone(),
                size: metadata.len(),
                max: self.max_object_bytes,
            });
        }

        tracing::debug!(path = %path.display(), bytes = metadata.len(), "reading local object");

        fs::read(&path)
            .await
            .map_err(|e| StorageError::io(format!("{}: {}", path.display(), e)))
    }
}
