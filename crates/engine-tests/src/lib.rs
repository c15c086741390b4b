//! End-to-end runs against a local stand-in for the 311 resource endpoint
//! and an in-memory object store.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::Value;
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};


const RESOURCE_PATH: &str = "/resource/erm2-nwe9.json";

/// Serves `rows` sliced by the `$offset` and `$limit` query parameters and
/// records every query it receives.
#[derive(Clone)]
pub struct StubApi {
    rows: Arc<Vec<Value>>,
    fail_at: Option<(usize, u16)>,
    requests: Arc<Mutex<Vec<HashMap<String, String>>>>,
}

impl StubApi {
    pub fn new(rows: Vec<Value>) -> Self {
        StubApi {
            rows: Arc::new(rows),
            fail_at: None,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Answers `status` instead of rows when asked for `offset`.
    pub fn failing_at(mut self, offset: usize, status: u16) -> Self {
        self.fail_at = Some((offset, status));
        self
    }

    pub fn requests(&self) -> Vec<HashMap<String, String>> {
        self.requests.lock().expect("requests lock").clone()
    }

    pub fn offsets(&self) -> Vec<String> {
        self.requests()
            .iter()
            .map(|q| q.get("$offset").cloned().unwrap_or_default())
            .collect()
    }

    /// Binds an ephemeral port and returns the resource URL.
    pub async fn serve(&self) -> String {
        let app = Router::new()
            .route(RESOURCE_PATH, get(resource))
            .with_state(self.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind stub api");
        let addr = listener.local_addr().expect("stub api address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve stub api");
        });

        format!("http://{addr}{RESOURCE_PATH}")
    }
}

async fn resource(
    State(api): State<StubApi>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    api.requests
        .lock()
        .expect("requests lock")
        .push(params.clone());

    let offset = param(&params, "$offset").unwrap_or(0);
    let limit = param(&params, "$limit").unwrap_or(1000);

    if let Some((at, status)) = api.fail_at {
        if at == offset {
            let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            return (status, "upstream failure").into_response();
        }
    }

    let page: Vec<Value> = api.rows.iter().skip(offset).take(limit).cloned().collect();
    Json(page).into_response()
}

fn param(params: &HashMap<String, String>, name: &str) -> Option<usize> {
    params.get(name).and_then(|v| v.parse().ok())
}

/// A service request shaped like the live feed, nested `location` included.
pub fn service_request(unique_key: u32, closed_date: &str) -> Value {
    serde_json::json!({
        "unique_key": unique_key.to_string(),
        "closed_date": closed_date,
        "agency": "NYPD",
        "complaint_type": "Noise - Residential",
        "location": {
            "latitude": "40.7128",
            "longitude": "-74.0060",
        },
    })
}
