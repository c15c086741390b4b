use crate::{
    error::StorageError,
    object_store::{ObjectSink, StorageBackend},
};
use async_trait::async_trait;
use opendal::{
    Operator,
    services::{Fs, Memory, S3},
};
use std::{collections::HashMap, sync::Mutex};
use tracing::{debug, info};

/// `ObjectSink` backed by OpenDAL. One operator per bucket, created on
/// first use and cached for the lifetime of the sink.
pub struct OpendalSink {
    backend: StorageBackend,
    operators: Mutex<HashMap<String, Operator>>,
}

impl OpendalSink {
    pub fn new(backend: StorageBackend) -> Self {
        OpendalSink {
            backend,
            operators: Mutex::new(HashMap::new()),
        }
    }

    pub fn memory() -> Self {
        Self::new(StorageBackend::Memory)
    }

    pub fn backend(&self) -> &StorageBackend {
        &self.backend
    }

    /// Operator bound to `bucket`.
    pub fn operator(&self, bucket: &str) -> Result<Operator, StorageError> {
        let mut operators = self
            .operators
            .lock()
            .map_err(|_| StorageError::LockError("Failed to lock operator cache".into()))?;

        if let Some(op) = operators.get(bucket) {
            return Ok(op.clone());
        }

        let op = self.build_operator(bucket)?;
        debug!(bucket, backend = self.backend.name(), "Created storage operator");
        operators.insert(bucket.to_string(), op.clone());
        Ok(op)
    }

    fn build_operator(&self, bucket: &str) -> Result<Operator, StorageError> {
        if bucket.is_empty() {
            return Err(StorageError::InvalidConfiguration(
                "bucket name must not be empty".into(),
            ));
        }

        let op = match &self.backend {
            StorageBackend::S3 { region, endpoint } => {
                let mut builder = S3::default();
                builder.bucket(bucket);
                if let Some(region) = region {
                    builder.region(region);
                }
                if let Some(endpoint) = endpoint {
                    builder.endpoint(endpoint);
                }
                Operator::new(builder)?.finish()
            }
            StorageBackend::Fs { root } => {
                let dir = root.join(bucket);
                let mut builder = Fs::default();
                builder.root(&dir.to_string_lossy());
                Operator::new(builder)?.finish()
            }
            StorageBackend::Memory => Operator::new(Memory::default())?.finish(),
        };

        Ok(op)
    }
}

#[async_trait]
impl ObjectSink for OpendalSink {
    async fn put_object(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<(), StorageError> {
        let op = self.operator(bucket)?;
        let bytes = body.len();

        op.write(key, body)
            .await
            .map_err(|source| StorageError::Write {
                bucket: bucket.to_string(),
                key: key.to_string(),
                source,
            })?;

        info!(bucket, key, bytes, "Wrote object.");
        Ok(())
    }
}
