use crate::error::ConfigError;
use chrono::{Local, NaiveDate};
use model::core::run_date::RunDate;
use serde::Serialize;
use tracing::info;

pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// How far back the default run date lies.
pub const DEFAULT_LOOKBACK_DAYS: u64 = 7;

/// Parameters of one run, resolved once and never recomputed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunSettings {
    pub run_date: RunDate,
    pub batch_size: usize,
}

impl RunSettings {
    pub fn new(run_date: RunDate, batch_size: usize) -> Result<Self, ConfigError> {
        if batch_size == 0 {
            return Err(ConfigError::InvalidBatchSize(batch_size.to_string()));
        }
        Ok(RunSettings {
            run_date,
            batch_size,
        })
    }

    /// Uses `run_date` when given, otherwise `today` minus the lookback.
    pub fn resolve(
        run_date: Option<&str>,
        batch_size: usize,
        today: NaiveDate,
    ) -> Result<Self, ConfigError> {
        let run_date = match run_date.map(str::trim).filter(|s| !s.is_empty()) {
            Some(s) => s.parse::<RunDate>()?,
            None => RunDate::days_before(today, DEFAULT_LOOKBACK_DAYS)?,
        };

        let settings = Self::new(run_date, batch_size)?;
        info!(
            run_date = %settings.run_date,
            batch_size = settings.batch_size,
            "Resolved run settings."
        );
        Ok(settings)
    }

    /// `resolve` against the local calendar date.
    pub fn resolve_now(run_date: Option<&str>, batch_size: usize) -> Result<Self, ConfigError> {
        Self::resolve(run_date, batch_size, Local::now().date_naive())
    }
}

pub fn parse_batch_size(raw: &str) -> Result<usize, ConfigError> {
    match raw.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ConfigError::InvalidBatchSize(raw.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 10, 28).unwrap()
    }

    #[test]
    fn test_default_is_seven_days_back() {
        let s = RunSettings::resolve(None, 10, today()).unwrap();
        assert_eq!(s.run_date.to_string(), "2023-10-21");
        assert_eq!(s.batch_size, 10);
    }

    #[test]
    fn test_override_wins() {
        let s = RunSettings::resolve(Some("2020-01-02"), 10, today()).unwrap();
        assert_eq!(s.run_date.to_string(), "2020-01-02");
    }

    #[test]
    fn test_blank_override_uses_default() {
        let s = RunSettings::resolve(Some("  "), 10, today()).unwrap();
        assert_eq!(s.run_date.to_string(), "2023-10-21");
    }

    #[test]
    fn test_bad_override() {
        let err = RunSettings::resolve(Some("yesterday"), 10, today()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidRunDate(_)));
    }

    #[test]
    fn test_zero_batch_size() {
        let err = RunSettings::resolve(None, 0, today()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBatchSize(_)));
    }

    #[test]
    fn test_parse_batch_size() {
        assert_eq!(parse_batch_size("250").unwrap(), 250);
        assert!(parse_batch_size("0").is_err());
        assert!(parse_batch_size("-1").is_err());
        assert!(parse_batch_size("ten").is_err());
    }
}
