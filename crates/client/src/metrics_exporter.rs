//! Prometheus text export for one CLI run.
//!
//! Installs a global Prometheus recorder (no HTTP listener) and writes the
//! rendered exposition to a file when the run ends, in the layout the
//! node_exporter textfile collector reads.

use std::path::{Path, PathBuf};

use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle, PrometheusRecorder};
use tracing::info;

use crate::metrics::METRIC_REQUEST_DURATION;

/// Batch duration histogram, recorded by the engine.
const METRIC_BATCH_DURATION: &str = "roster_batch_duration_seconds";

const REQUEST_BUCKETS: &[f64] = &[
    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0,
];

const BATCH_BUCKETS: &[f64] = &[0.1, 0.5, 1.0, 5.0, 15.0, 30.0, 60.0, 300.0, 900.0];

/// Global recorder whose contents are flushed to `path` on demand.
pub struct MetricsExporter {
    handle: PrometheusHandle,
    path: PathBuf,
}

impl MetricsExporter {
    /// Install the Prometheus recorder as the global metrics recorder.
    ///
    /// # Errors
    /// Fails if another recorder is already installed.
    pub fn install(path: impl Into<PathBuf>) -> Result<Self, MetricsExporterError> {
        let recorder = build_recorder()?;
        let handle = recorder.handle();
        metrics::set_global_recorder(recorder)
            .map_err(|_| MetricsExporterError::RecorderAlreadyInstalled)?;

        let path = path.into();
        info!(path = %path.display(), "Prometheus metrics recorder installed");
        Ok(Self { handle, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn render(&self) -> String {
        self.handle.render()
    }

    /// Write the current exposition, replacing the file atomically.
    pub fn flush(&self) -> Result<(), MetricsExporterError> {
        write_exposition(&self.path, &self.render())
    }
}

fn build_recorder() -> Result<PrometheusRecorder, MetricsExporterError> {
    Ok(PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full(METRIC_REQUEST_DURATION.to_string()),
            REQUEST_BUCKETS,
        )?
        .set_buckets_for_metric(
            Matcher::Full(METRIC_BATCH_DURATION.to_string()),
            BATCH_BUCKETS,
        )?
        .build_recorder())
}

fn write_exposition(path: &Path, body: &str) -> Result<(), MetricsExporterError> {
    let tmp = path.with_extension("prom.tmp");
    std::fs::write(&tmp, body)
        .and_then(|()| std::fs::rename(&tmp, path))
        .map_err(|source| MetricsExporterError::Write {
            path: path.to_path_buf(),
            source,
        })
}

/// Errors that can occur when installing or flushing the exporter.
#[derive(Debug, thiserror::Error)]
pub enum MetricsExporterError {
    #[error("A metrics recorder is already installed")]
    RecorderAlreadyInstalled,

    #[error("Failed to build Prometheus recorder: {0}")]
    BuildError(String),

    #[error("Failed to write metrics to {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<metrics_exporter_prometheus::BuildError> for MetricsExporterError {
    fn from(err: metrics_exporter_prometheus::BuildError) -> Self {
        MetricsExporterError::BuildError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recorder_renders_request_histogram_with_buckets() {
        let recorder = build_recorder().unwrap();
        let handle = recorder.handle();
        metrics::with_local_recorder(&recorder, || {
            metrics::histogram!(METRIC_REQUEST_DURATION, "endpoint" => "/users").record(0.2);
            metrics::counter!("roster_batch_items_total", "action" => "suspend").increment(2);
        });

        let body = handle.render();
        assert!(body.contains("roster_api_request_duration_seconds_bucket"));
        assert!(body.contains("le=\"0.25\""));
        assert!(body.contains("roster_batch_items_total{action=\"suspend\"} 2"));
    }

    #[test]
    fn test_write_exposition_replaces_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roster.prom");
        std::fs::write(&path, "stale").unwrap();

        write_exposition(&path, "roster_batch_runs_total 1\n").unwrap();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "roster_batch_runs_total 1\n"
        );
        assert!(!path.with_extension("prom.tmp").exists());
    }

    #[test]
    fn test_write_into_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("roster.prom");
        assert!(matches!(
            write_exposition(&path, ""),
            Err(MetricsExporterError::Write { .. })
        ));
    }
}
