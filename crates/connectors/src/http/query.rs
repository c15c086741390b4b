use crate::error::FetchError;
use model::{core::run_date::RunDate, records::page::PageWindow};
use reqwest::Url;

/// SoQL query for one window of records closed on a given day.
#[derive(Debug, Clone)]
pub struct PageQuery {
    pub date_field: String,
    pub run_date: RunDate,
    pub window: PageWindow,
}

impl PageQuery {
    pub fn new(date_field: &str, run_date: RunDate, window: PageWindow) -> Self {
        PageQuery {
            date_field: date_field.to_string(),
            run_date,
            window,
        }
    }

    /// `$where` expression covering the whole day, both ends inclusive.
    pub fn where_clause(&self) -> String {
        let (start, end) = self.run_date.day_bounds();
        format!("{} between '{start}' and '{end}'", self.date_field)
    }

    pub fn params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("$where", self.where_clause()),
            ("$limit", self.window.limit.to_string()),
            ("$offset", self.window.offset.to_string()),
        ]
    }

    pub fn to_url(&self, base_url: &str) -> Result<Url, FetchError> {
        Url::parse_with_params(base_url, self.params())
            .map_err(|e| FetchError::InvalidUrl(format!("{base_url}: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(offset: usize, limit: usize) -> PageQuery {
        PageQuery::new(
            "closed_date",
            "2023-10-21".parse().unwrap(),
            PageWindow { offset, limit },
        )
    }

    #[test]
    fn test_where_clause_covers_whole_day() {
        assert_eq!(
            query(0, 10).where_clause(),
            "closed_date between '2023-10-21T00:00:00.000' and '2023-10-21T23:59:59.999'"
        );
    }

    #[test]
    fn test_url_carries_limit_and_offset() {
        let url = query(7077, 100)
            .to_url("https://data.cityofnewyork.us/resource/erm2-nwe9.json")
            .unwrap();

        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        assert_eq!(url.path(), "/resource/erm2-nwe9.json");
        assert!(pairs.contains(&("$limit".into(), "100".into())));
        assert!(pairs.contains(&("$offset".into(), "7077".into())));
        assert!(pairs.iter().any(|(k, v)| k == "$where" && v.starts_with("closed_date between")));
    }

    #[test]
    fn test_invalid_base_url() {
        let err = query(0, 1).to_url("not a url").unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl(_)));
    }
}
