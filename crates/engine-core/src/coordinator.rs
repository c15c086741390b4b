use crate::{error::RunError, key::StorageKey, report::RunReport, state::RunState};
use connectors::{
    csv::encoder::encode_page, error::EncodeError, object_store::ObjectSink, source::PageSource,
};
use engine_config::settings::{LoaderConfig, run::RunSettings};
use model::records::page::PageWindow;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Drives one run: fetch a window, stop on an empty page, otherwise encode
/// it, write it under its key and move to the next window.
///
/// Strictly sequential; nothing is retried and the first error ends the run.
pub struct RunCoordinator {
    settings: RunSettings,
    bucket: String,
    prefix: String,
    source: Arc<dyn PageSource>,
    sink: Arc<dyn ObjectSink>,
    state: RunState,
}

impl RunCoordinator {
    pub fn new(
        settings: RunSettings,
        bucket: impl Into<String>,
        prefix: impl Into<String>,
        source: Arc<dyn PageSource>,
        sink: Arc<dyn ObjectSink>,
    ) -> Self {
        RunCoordinator {
            settings,
            bucket: bucket.into(),
            prefix: prefix.into(),
            source,
            sink,
            state: RunState::Start,
        }
    }

    /// Wires the HTTP fetcher and the configured object sink.
    pub fn from_config(config: &LoaderConfig, settings: RunSettings) -> Self {
        Self::new(
            settings,
            config.storage.bucket.clone(),
            config.storage.prefix.clone(),
            Arc::new(config.source.fetcher()),
            Arc::new(config.storage.sink()),
        )
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn settings(&self) -> &RunSettings {
        &self.settings
    }

    pub fn key_for(&self, offset: usize) -> StorageKey {
        StorageKey::new(&self.prefix, self.settings.run_date, offset)
    }

    pub async fn execute(&mut self) -> Result<RunReport, RunError> {
        if self.state != RunState::Start {
            return Err(RunError::AlreadyExecuted(self.state.to_string()));
        }

        let start = std::time::Instant::now();
        let mut report = RunReport::new(self.settings.run_date, self.settings.batch_size);

        info!(
            run_date = %self.settings.run_date,
            batch_size = self.settings.batch_size,
            bucket = %self.bucket,
            "Starting run."
        );

        let result = self.run_pages(&mut report).await;
        report.took_ms = start.elapsed().as_millis();

        match result {
            Ok(()) => {
                self.transition(RunState::Done);
                report.state = self.state;
                info!(
                    run_date = %report.run_date,
                    pages = report.pages_written,
                    records = report.records_written,
                    bytes = report.bytes_written,
                    took_ms = report.took_ms,
                    "Run finished."
                );
                Ok(report)
            }
            Err(err) => {
                self.transition(RunState::Failed);
                error!(
                    run_date = %report.run_date,
                    pages = report.pages_written,
                    "Run failed: {err}"
                );
                Err(err)
            }
        }
    }

    async fn run_pages(&mut self, report: &mut RunReport) -> Result<(), RunError> {
        let run_date = self.settings.run_date;
        let mut window = PageWindow::first(self.settings.batch_size);

        loop {
            self.transition(RunState::Fetching);
            let page = self.source.fetch_page(run_date, window).await?;
            report.fetch_calls += 1;

            if page.is_empty() {
                info!(offset = window.offset, "Empty page. No more records to fetch.");
                return Ok(());
            }

            if page.len() > window.limit {
                return Err(RunError::OversizedPage {
                    offset: window.offset,
                    rows: page.len(),
                    limit: window.limit,
                });
            }

            self.transition(RunState::Encoding);
            let artifact = encode_page(&page)?.ok_or(EncodeError::EmptyPage)?;

            self.transition(RunState::Writing);
            let key = self.key_for(window.offset);
            let bytes = artifact.len();
            self.sink
                .put_object(&self.bucket, key.as_str(), artifact.bytes)
                .await?;

            info!(
                offset = window.offset,
                rows = page.len(),
                key = %key,
                bytes,
                "Wrote page."
            );

            report.pages_written += 1;
            report.records_written += page.len();
            report.bytes_written += bytes;
            report.drifted_records += artifact.drifted;
            report.keys.push(key);

            window = window.next();
        }
    }

    fn transition(&mut self, next: RunState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal transition {} -> {}",
            self.state,
            next
        );
        debug!(from = %self.state, to = %next, "Run state change.");
        self.state = next;
    }
}
