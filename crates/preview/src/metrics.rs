//! Metrics observer for the processor.
//!
//! The recorder is injected per processor with
//! [`FileProcessor::with_metrics`](crate::FileProcessor::with_metrics); there
//! is no process-wide recorder.
use std::time::Duration;

use crate::error::CleanupError;
use crate::types::FileProcessResult;

pub trait ProcessMetrics: Send + Sync {
    fn record_process(&self, latency: Duration, result: &FileProcessResult);
    fn record_cleanup(&self, latency: Duration, result: Result<(), CleanupError>);
}
