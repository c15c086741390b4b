use crate::{env::EnvContext, error::ConfigError};
use run::{DEFAULT_BATCH_SIZE, parse_batch_size};
use serde::Serialize;
use source::SourceSettings;
use storage::StorageSettings;

pub mod run;
pub mod source;
pub mod storage;

/// Everything a run needs except the run date, read once at startup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoaderConfig {
    pub source: SourceSettings,
    pub storage: StorageSettings,
    pub batch_size: usize,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        LoaderConfig {
            source: SourceSettings::default(),
            storage: StorageSettings::default(),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl LoaderConfig {
    pub fn from_env(env: &EnvContext) -> Result<Self, ConfigError> {
        let batch_size = match env.get_non_empty("LOADER_BATCH_SIZE") {
            Some(raw) => parse_batch_size(&raw)?,
            None => DEFAULT_BATCH_SIZE,
        };

        Ok(LoaderConfig {
            source: SourceSettings::from_env(env),
            storage: StorageSettings::from_env(env)?,
            batch_size,
        })
    }
}
