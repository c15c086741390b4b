use crate::{env::EnvContext, error::ConfigError};
use connectors::object_store::{StorageBackend, opendal_sink::OpendalSink};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_BUCKET: &str = "nyc-311-raw";
pub const DEFAULT_PREFIX: &str = "nyc_311/service_requests";
pub const DEFAULT_REGION: &str = "us-east-1";

/// Bucket, key prefix and backend the encoded pages are written to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageSettings {
    pub bucket: String,
    pub prefix: String,
    pub backend: StorageBackend,
}

impl Default for StorageSettings {
    fn default() -> Self {
        StorageSettings {
            bucket: DEFAULT_BUCKET.to_string(),
            prefix: DEFAULT_PREFIX.to_string(),
            backend: StorageBackend::S3 {
                region: Some(DEFAULT_REGION.to_string()),
                endpoint: None,
            },
        }
    }
}

impl StorageSettings {
    pub fn from_env(env: &EnvContext) -> Result<Self, ConfigError> {
        let backend = match env.get_non_empty("LOADER_STORAGE") {
            Some(spec) => parse_backend(&spec, env)?,
            None => s3_backend(env),
        };

        Ok(StorageSettings {
            bucket: env.get_or("LOADER_BUCKET", DEFAULT_BUCKET),
            prefix: env
                .get_or("LOADER_PREFIX", DEFAULT_PREFIX)
                .trim_matches('/')
                .to_string(),
            backend,
        })
    }

    pub fn sink(&self) -> OpendalSink {
        OpendalSink::new(self.backend.clone())
    }
}

fn s3_backend(env: &EnvContext) -> StorageBackend {
    StorageBackend::S3 {
        region: Some(env.get_or("AWS_REGION", DEFAULT_REGION)),
        endpoint: env.get_non_empty("LOADER_S3_ENDPOINT"),
    }
}

/// `s3`, `memory` or `fs:<dir>`.
fn parse_backend(spec: &str, env: &EnvContext) -> Result<StorageBackend, ConfigError> {
    match spec.split_once(':') {
        None if spec.eq_ignore_ascii_case("s3") => Ok(s3_backend(env)),
        None if spec.eq_ignore_ascii_case("memory") => Ok(StorageBackend::Memory),
        Some((kind, dir)) if kind.eq_ignore_ascii_case("fs") && !dir.is_empty() => {
            Ok(StorageBackend::Fs {
                root: PathBuf::from(dir),
            })
        }
        _ => Err(ConfigError::InvalidValue {
            key: "LOADER_STORAGE".into(),
            message: format!("expected 's3', 'memory' or 'fs:<dir>', got '{spec}'"),
        }),
    }
}
