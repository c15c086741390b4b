use model::core::run_date::RunDate;
use serde::Serialize;
use std::fmt;

/// Width the offset is zero-padded to inside a key.
const OFFSET_WIDTH: usize = 12;

/// Object key of one page: `{prefix}/{run_date}/offset={offset}.csv`.
///
/// Distinct `(run_date, offset)` pairs always give distinct keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct StorageKey(String);

impl StorageKey {
    pub fn new(prefix: &str, run_date: RunDate, offset: usize) -> Self {
        let prefix = prefix.trim_matches('/');
        let name = format!("{run_date}/offset={offset:0width$}.csv", width = OFFSET_WIDTH);
        if prefix.is_empty() {
            StorageKey(name)
        } else {
            StorageKey(format!("{prefix}/{name}"))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<StorageKey> for String {
    fn from(key: StorageKey) -> Self {
        key.0
    }
}
