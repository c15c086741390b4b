use crate::error::ModelError;
use chrono::{Days, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

const RUN_DATE_FORMAT: &str = "%Y-%m-%d";
const FILTER_TS_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

/// Logical calendar date a run extracts records for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RunDate(NaiveDate);

impl RunDate {
    pub fn new(date: NaiveDate) -> Self {
        RunDate(date)
    }

    /// The date `days` before `today`.
    pub fn days_before(today: NaiveDate, days: u64) -> Result<Self, ModelError> {
        today
            .checked_sub_days(Days::new(days))
            .map(RunDate)
            .ok_or_else(|| ModelError::InvalidRunDate(format!("{today} minus {days} days")))
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// Inclusive bounds of the day with millisecond precision,
    /// `00:00:00.000` through `23:59:59.999`.
    pub fn day_bounds(&self) -> (String, String) {
        let start = self.0.and_time(NaiveTime::MIN);
        let end = self
            .0
            .and_hms_milli_opt(23, 59, 59, 999)
            .unwrap_or(start);
        (
            start.format(FILTER_TS_FORMAT).to_string(),
            end.format(FILTER_TS_FORMAT).to_string(),
        )
    }
}

impl FromStr for RunDate {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s.trim(), RUN_DATE_FORMAT)
            .map(RunDate)
            .map_err(|e| ModelError::InvalidRunDate(format!("'{s}': {e}")))
    }
}

impl TryFrom<String> for RunDate {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RunDate> for String {
    fn from(value: RunDate) -> Self {
        value.to_string()
    }
}

impl fmt::Display for RunDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(RUN_DATE_FORMAT))
    }
}
