use crate::env::EnvContext;
use connectors::http::{DEFAULT_DATE_FIELD, STRIPPED_FIELD, fetcher::PageFetcher};
use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "https://data.cityofnewyork.us/resource/erm2-nwe9.json";

/// Remote API the records are read from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceSettings {
    pub base_url: String,
    pub date_field: String,
    pub strip_fields: Vec<String>,
}

impl Default for SourceSettings {
    fn default() -> Self {
        SourceSettings {
            base_url: DEFAULT_BASE_URL.to_string(),
            date_field: DEFAULT_DATE_FIELD.to_string(),
            strip_fields: vec![STRIPPED_FIELD.to_string()],
        }
    }
}

impl SourceSettings {
    pub fn from_env(env: &EnvContext) -> Self {
        let defaults = Self::default();
        SourceSettings {
            base_url: env.get_or("LOADER_BASE_URL", &defaults.base_url),
            ..defaults
        }
    }

    pub fn fetcher(&self) -> PageFetcher {
        PageFetcher::new(self.base_url.clone())
            .with_date_field(self.date_field.clone())
            .with_strip_fields(self.strip_fields.clone())
    }
}
