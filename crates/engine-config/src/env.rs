use crate::error::ConfigError;
use std::{collections::HashMap, fs, path::Path};

/// Snapshot of environment variables, taken once at startup.
///
/// Values from a `.env` file override the process environment.
#[derive(Debug, Clone, Default)]
pub struct EnvContext {
    vars: HashMap<String, String>,
}

impl EnvContext {
    pub fn from_system() -> Self {
        Self {
            vars: std::env::vars().collect(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }

    /// Like `get`, but blank values count as unset.
    pub fn get_non_empty(&self, key: &str) -> Option<String> {
        self.vars
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    pub fn get_or(&self, key: &str, default: &str) -> String {
        self.get_non_empty(key)
            .unwrap_or_else(|| default.to_string())
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(key.into(), value.into());
    }

    pub fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::EnvFile {
            path: path.display().to_string(),
            source,
        })?;
        self.parse_env_content(&content)
    }

    fn parse_env_content(&mut self, content: &str) -> Result<(), ConfigError> {
        for (line_num, line) in content.lines().enumerate() {
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let line = line.strip_prefix("export ").unwrap_or(line);
            let Some((key, value)) = line.split_once('=') else {
                return Err(ConfigError::EnvFormat(format!(
                    "malformed line {} (expected KEY=VALUE)",
                    line_num + 1
                )));
            };

            let key = key.trim();
            if key.is_empty() {
                return Err(ConfigError::EnvFormat(format!(
                    "empty key at line {}",
                    line_num + 1
                )));
            }

            self.vars.insert(key.to_string(), unquote(value.trim()));
        }

        Ok(())
    }
}

fn unquote(value: &str) -> String {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return value[1..value.len() - 1].to_string();
        }
    }
    value.to_string()
}
