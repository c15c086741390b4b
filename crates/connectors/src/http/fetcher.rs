use crate::{
    error::FetchError,
    http::{DEFAULT_DATE_FIELD, STRIPPED_FIELD, query::PageQuery},
    source::PageSource,
};
use async_trait::async_trait;
use model::{
    core::run_date::RunDate,
    records::{
        page::{Page, PageWindow},
        record::Record,
    },
};
use reqwest::{Client, StatusCode};
use tokio::sync::OnceCell;
use tracing::{debug, info};

/// Reads one window of records from a Socrata-style JSON endpoint.
pub struct PageFetcher {
    base_url: String,
    date_field: String,
    strip_fields: Vec<String>,
    /// Connection pool, built on first request and reused afterwards.
    client: OnceCell<Client>,
}

impl PageFetcher {
    pub fn new(base_url: impl Into<String>) -> Self {
        PageFetcher {
            base_url: base_url.into(),
            date_field: DEFAULT_DATE_FIELD.to_string(),
            strip_fields: vec![STRIPPED_FIELD.to_string()],
            client: OnceCell::new(),
        }
    }

    pub fn with_date_field(mut self, date_field: impl Into<String>) -> Self {
        self.date_field = date_field.into();
        self
    }

    pub fn with_strip_fields(mut self, fields: Vec<String>) -> Self {
        self.strip_fields = fields;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn query(&self, run_date: RunDate, window: PageWindow) -> PageQuery {
        PageQuery::new(&self.date_field, run_date, window)
    }

    async fn client(&self) -> Result<&Client, FetchError> {
        self.client
            .get_or_try_init(|| async {
                debug!("Initializing HTTP client for {}", self.base_url);
                Client::builder().build().map_err(FetchError::Transport)
            })
            .await
    }
}

#[async_trait]
impl PageSource for PageFetcher {
    async fn fetch_page(&self, run_date: RunDate, window: PageWindow) -> Result<Page, FetchError> {
        let start = std::time::Instant::now();
        let url = self.query(run_date, window).to_url(&self.base_url)?;
        let client = self.client().await?;

        debug!(%url, "Requesting page");
        let resp = client.get(url.clone()).send().await?;

        let status = resp.status();
        if status != StatusCode::OK {
            return Err(FetchError::RemoteQuery {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = resp.bytes().await?;
        let records = decode_records(&body, &self.strip_fields)?;

        let took_ms = start.elapsed().as_millis();
        info!(
            run_date = %run_date,
            offset = window.offset,
            rows = records.len(),
            took_ms,
            "Fetched page."
        );

        Ok(Page {
            window,
            records,
            took_ms,
        })
    }
}

/// Parses a JSON array of flat objects and drops `strip_fields` from each.
pub fn decode_records(body: &[u8], strip_fields: &[String]) -> Result<Vec<Record>, FetchError> {
    let objects: Vec<serde_json::Map<String, serde_json::Value>> = serde_json::from_slice(body)?;

    Ok(objects
        .into_iter()
        .map(|object| {
            let mut record = Record::from_json_object(object);
            for field in strip_fields {
                record.remove(field);
            }
            record
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Router,
        extract::{Query, State},
        http::StatusCode as AxumStatus,
        response::{IntoResponse, Response},
        routing::get,
    };
    use serde_json::json;
    use std::{
        collections::HashMap,
        sync::{
            Arc,
            atomic::{AtomicUsize, Ordering},
        },
    };

    #[derive(Clone)]
    struct Api {
        status: AxumStatus,
        body: String,
        hits: Arc<AtomicUsize>,
        last_query: Arc<std::sync::Mutex<HashMap<String, String>>>,
    }

    async fn resource(State(api): State<Api>, Query(q): Query<HashMap<String, String>>) -> Response {
        api.hits.fetch_add(1, Ordering::SeqCst);
        *api.last_query.lock().unwrap() = q;
        (api.status, api.body.clone()).into_response()
    }

    async fn serve(status: AxumStatus, body: &str) -> (String, Api) {
        let api = Api {
            status,
            body: body.to_string(),
            hits: Arc::new(AtomicUsize::new(0)),
            last_query: Arc::new(std::sync::Mutex::new(HashMap::new())),
        };
        let app = Router::new()
            .route("/resource/erm2-nwe9.json", get(resource))
            .with_state(api.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{addr}/resource/erm2-nwe9.json"), api)
    }

    fn run_date() -> RunDate {
        "2023-10-21".parse().unwrap()
    }

    #[tokio::test]
    async fn test_fetch_strips_location() {
        let body = json!([
            {"unique_key": "1", "location": {"latitude": "40.1"}, "agency": "NYPD"},
            {"unique_key": "2", "agency": "DOT"}
        ])
        .to_string();
        let (url, api) = serve(AxumStatus::OK, &body).await;

        let fetcher = PageFetcher::new(url);
        let page = fetcher
            .fetch_page(run_date(), PageWindow { offset: 4, limit: 2 })
            .await
            .unwrap();

        assert_eq!(page.len(), 2);
        assert_eq!(page.offset(), 4);
        assert!(page.records.iter().all(|r| r.get("location").is_none()));
        assert_eq!(page.header(), vec!["unique_key", "agency"]);

        let q = api.last_query.lock().unwrap().clone();
        assert_eq!(q.get("$limit").map(String::as_str), Some("2"));
        assert_eq!(q.get("$offset").map(String::as_str), Some("4"));
        assert_eq!(
            q.get("$where").map(String::as_str),
            Some("closed_date between '2023-10-21T00:00:00.000' and '2023-10-21T23:59:59.999'")
        );
    }

    #[tokio::test]
    async fn test_empty_array_is_empty_page() {
        let (url, _) = serve(AxumStatus::OK, "[]").await;
        let page = PageFetcher::new(url)
            .fetch_page(run_date(), PageWindow::first(10))
            .await
            .unwrap();
        assert!(page.is_empty());
    }

    #[tokio::test]
    async fn test_non_200_is_remote_query_error() {
        let (url, _) = serve(AxumStatus::SERVICE_UNAVAILABLE, "busy").await;
        let err = PageFetcher::new(url)
            .fetch_page(run_date(), PageWindow::first(10))
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(503));
    }

    #[tokio::test]
    async fn test_malformed_body_is_decode_error() {
        let (url, _) = serve(AxumStatus::OK, "{not json").await;
        let err = PageFetcher::new(url)
            .fetch_page(run_date(), PageWindow::first(10))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        // Bind then drop to get a port nothing listens on.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = PageFetcher::new(format!("http://{addr}/resource.json"))
            .fetch_page(run_date(), PageWindow::first(10))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Transport(_)));
    }

    #[tokio::test]
    async fn test_client_is_reused() {
        let (url, api) = serve(AxumStatus::OK, "[]").await;
        let fetcher = PageFetcher::new(url);

        let first = fetcher.client().await.unwrap() as *const Client;
        fetcher.fetch_page(run_date(), PageWindow::first(1)).await.unwrap();
        fetcher.fetch_page(run_date(), PageWindow::first(1)).await.unwrap();
        let second = fetcher.client().await.unwrap() as *const Client;

        assert_eq!(first, second);
        assert_eq!(api.hits.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_decode_rejects_non_objects() {
        let err = decode_records(b"[1, 2]", &[]).unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }

    #[test]
    fn test_decode_keeps_order() {
        let body = br#"[{"z": "1", "location": null, "a": 2}]"#;
        let records = decode_records(body, &["location".to_string()]).unwrap();
        let keys: Vec<_> = records[0].keys().collect();
        assert_eq!(keys, vec!["z", "a"]);
    }
}
