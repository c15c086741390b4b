use crate::error::CliError;
use engine_config::settings::{LoaderConfig, run::RunSettings};
use engine_core::coordinator::RunCoordinator;
use serde::{Deserialize, Serialize};
use tracing::info;

pub const SUCCESS_MESSAGE: &str = "Finished with success.";

/// Trigger payload. Unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct InvocationEvent {
    #[serde(default)]
    pub run_date: Option<String>,
}

/// Result handed back to the trigger. `body` is itself a JSON document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationResult {
    pub status_code: u16,
    pub body: String,
}

impl InvocationResult {
    pub fn success() -> Result<Self, CliError> {
        Ok(InvocationResult {
            status_code: 200,
            body: serde_json::to_string(SUCCESS_MESSAGE)?,
        })
    }
}

/// Parses inline JSON, `@path` to a JSON file, or `null` / blank as an
/// empty event.
pub fn parse_event(raw: &str) -> Result<InvocationEvent, CliError> {
    let raw = raw.trim();
    let text = match raw.strip_prefix('@') {
        Some(path) => std::fs::read_to_string(path)?,
        None => raw.to_string(),
    };

    if text.trim().is_empty() {
        return Ok(InvocationEvent::default());
    }

    let event: Option<InvocationEvent> = serde_json::from_str(&text)
        .map_err(|e| CliError::InvalidEvent(e.to_string()))?;
    Ok(event.unwrap_or_default())
}

/// Runs one extraction for the event. Errors are returned unchanged; there
/// is no mapping to an error status.
pub async fn handle(
    event: InvocationEvent,
    config: &LoaderConfig,
) -> Result<InvocationResult, CliError> {
    let settings = RunSettings::resolve_now(event.run_date.as_deref(), config.batch_size)?;
    let mut run = RunCoordinator::from_config(config, settings);
    let report = run.execute().await?;

    info!(
        run_date = %report.run_date,
        pages = report.pages_written,
        "Invocation finished."
    );
    InvocationResult::success()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, http::StatusCode, routing::get};
    use connectors::object_store::StorageBackend;
    use engine_core::error::RunError;
    use std::io::Write;

    async fn serve(status: StatusCode, body: &'static str) -> String {
        let app = Router::new().route("/r.json", get(move || async move { (status, body) }));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/r.json")
    }

    fn config(base_url: String) -> LoaderConfig {
        let mut config = LoaderConfig::default();
        config.source.base_url = base_url;
        config.storage.backend = StorageBackend::Memory;
        config.batch_size = 5;
        config
    }

    #[test]
    fn test_parse_event_variants() {
        assert_eq!(parse_event("").unwrap(), InvocationEvent::default());
        assert_eq!(parse_event("null").unwrap(), InvocationEvent::default());
        assert_eq!(parse_event("{}").unwrap(), InvocationEvent::default());

        let event = parse_event(r#"{"run_date": "2023-10-21", "source": "scheduler"}"#).unwrap();
        assert_eq!(event.run_date.as_deref(), Some("2023-10-21"));

        assert!(matches!(parse_event("[1"), Err(CliError::InvalidEvent(_))));
    }

    #[test]
    fn test_parse_event_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"run_date": "2023-01-05"}}"#).unwrap();

        let event = parse_event(&format!("@{}", file.path().display())).unwrap();
        assert_eq!(event.run_date.as_deref(), Some("2023-01-05"));
    }

    #[test]
    fn test_success_shape() {
        let result = InvocationResult::success().unwrap();
        assert_eq!(result.body, r#""Finished with success.""#);

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"statusCode": 200, "body": "\"Finished with success.\""})
        );

        let body: String = serde_json::from_str(&result.body).unwrap();
        assert_eq!(body, SUCCESS_MESSAGE);
    }

    #[tokio::test]
    async fn test_handle_empty_day() {
        let url = serve(StatusCode::OK, "[]").await;
        let event = InvocationEvent {
            run_date: Some("2023-10-21".into()),
        };

        let result = handle(event, &config(url)).await.unwrap();
        assert_eq!(result, InvocationResult::success().unwrap());
    }

    #[tokio::test]
    async fn test_handle_propagates_remote_error() {
        let url = serve(StatusCode::INTERNAL_SERVER_ERROR, "boom").await;

        let err = handle(InvocationEvent::default(), &config(url))
            .await
            .unwrap_err();
        assert!(matches!(err, CliError::Run(RunError::Fetch(_))));
    }

    #[tokio::test]
    async fn test_handle_rejects_bad_run_date() {
        let err = handle(
            InvocationEvent {
                run_date: Some("21-10-2023".into()),
            },
            &LoaderConfig::default(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }
}
