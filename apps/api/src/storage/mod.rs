//! Object retrieval: resolves `s3://bucket/key` locators into raw bytes.

pub mod locator;
pub mod s3;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

pub use locator::Locator;
pub use s3::{build_s3_client, S3ObjectStore};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Invalid locator: {0}")]
    InvalidLocator(String),

    #[error("Failed to retrieve {locator}: {reason}")]
    Retrieval { locator: String, reason: String },
}

/// Read-only access to an object store. A single attempt per call; no retries.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn fetch(&self, locator: &Locator) -> Result<Bytes, StorageError>;
}

#[cfg(test)]
pub mod memory {
    use std::collections::HashMap;

    use super::*;

    /// In-memory store keyed by the locator's display form.
    #[derive(Default)]
    pub struct MemoryObjectStore {
        objects: HashMap<String, Bytes>,
    }

    impl MemoryObjectStore {
        pub fn with(mut self, locator: &str, data: impl Into<Bytes>) -> Self {
            self.objects.insert(locator.to_string(), data.into());
            self
        }
    }

    #[async_trait]
    impl ObjectStore for MemoryObjectStore {
        async fn fetch(&self, locator: &Locator) -> Result<Bytes, StorageError> {
            let name = locator.to_string();
            self.objects
                .get(&name)
                .cloned()
                .ok_or_else(|| StorageError::Retrieval {
                    locator: name,
                    reason: "NoSuchKey".to_string(),
                })
        }
    }
}
