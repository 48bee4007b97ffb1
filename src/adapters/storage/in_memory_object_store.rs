//! In-Memory Object Store Adapter
//!
//! Keeps objects in a map. Useful for testing and development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::ports::{ObjectLocation, ObjectStore, StorageError};

/// In-memory object storage
#[derive(Debug, Clone, Default)]
pub struct InMemoryObjectStore {
    objects: Arc<RwLock<HashMap<ObjectLocation, Vec<u8>>>>,
}

impl InMemoryObjectStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an object, replacing any previous content
    pub async fn put_object(&self, location: ObjectLocation, bytes: impl Into<Vec<u8>>) {
        self.objects.write().await.insert(location, bytes.into());
    }

    /// Number of stored objects
    pub async fn object_count(&self) -> usize {
        self.objects.read().await.len()
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn get_object(&self, location: &ObjectLocation) -> Result<Vec<u8>, StorageError> {
        self.objects
            .read()
            .await
            .get(location)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(location.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn returns_stored_bytes() {
        let store = InMemoryObjectStore::new();
        let location = ObjectLocation::new("biegacz", "model.json");
        store.put_object(location.clone(), b"{}".to_vec()).await;

        assert_eq!(store.get_object(&location).await.unwrap(), b"{}");
        assert_eq!(store.object_count().await, 1);
    }

    #[tokio::test]
    async fn missing_object_is_not_found() {
        let store = InMemoryObjectStore::new();
        let err = store
            .get_object(&ObjectLocation::new("biegacz", "missing.json"))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));
    }
}
