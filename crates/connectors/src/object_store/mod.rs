use crate::error::StorageError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub mod opendal_sink;

/// Object-storage "put": one key, one payload, all or nothing.
#[async_trait]
pub trait ObjectSink: Send + Sync {
    async fn put_object(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<(), StorageError>;
}

/// Where objects end up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StorageBackend {
    /// AWS S3 or an S3-compatible endpoint. Credentials come from the
    /// standard AWS environment.
    S3 {
        region: Option<String>,
        endpoint: Option<String>,
    },
    /// Local directory; each bucket becomes a subdirectory of `root`.
    Fs { root: PathBuf },
    /// Process-local storage, mainly for tests and dry runs.
    Memory,
}

impl Default for StorageBackend {
    fn default() -> Self {
        StorageBackend::S3 {
            region: None,
            endpoint: None,
        }
    }
}

impl StorageBackend {
    pub fn name(&self) -> &'static str {
        match self {
            StorageBackend::S3 { .. } => "s3",
            StorageBackend::Fs { .. } => "fs",
            StorageBackend::Memory => "memory",
        }
    }
}
