//! JSON batch processing behind the `filelens` binary.
//!
//! A batch is a JSON array of [`FileDescriptor`]s. Every descriptor is
//! processed, the results are written as a JSON array, and then every result
//! is handed back to cleanup so the batch leaves no live object URLs behind.

use std::io::{Read, Write};

use thiserror::Error;
use tracing::warn;

use crate::{FileDescriptor, PreviewRuntime};

/// Errors that abort a batch before all results are written
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("failed to parse descriptor array: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("failed to write results: {0}")]
    Write(#[source] serde_json::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Summary of a finished batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchReport {
    pub files: usize,
    pub cleanup_failures: usize,
    pub live_object_urls: usize,
}

/// Reads descriptors from `input`, writes results to `output`, then cleans up.
///
/// Cleanup failures are logged and counted; they do not fail the batch.
pub fn run_batch<R: Read, W: Write>(
    runtime: &PreviewRuntime,
    input: R,
    mut output: W,
) -> Result<BatchReport, BatchError> {
    let descriptors: Vec<FileDescriptor> =
        serde_json::from_reader(input).map_err(BatchError::Parse)?;

    let processor = runtime.processor();
    let results = processor.process_files(&descriptors);

    serde_json::to_writer_pretty(&mut output, &results).map_err(BatchError::Write)?;
    writeln!(output)?;
    output.flush()?;

    let mut cleanup_failures = 0;
    for result in results {
        if let Err(err) = processor.cleanup(result) {
            warn!(error = %err, "cleanup failed");
            cleanup_failures += 1;
        }
    }

    Ok(BatchReport {
        files: descriptors.len(),
        cleanup_failures,
        live_object_urls: runtime.live_object_urls(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PreviewConfig;

    #[test]
    fn rejects_non_array_input() {
        let runtime = PreviewRuntime::from_config(PreviewConfig::default()).unwrap();
        let mut output = Vec::new();
        let result = run_batch(&runtime, &br#"{"name": "a.txt"}"#[..], &mut output);
        assert!(matches!(result, Err(BatchError::Parse(_))));
        assert!(output.is_empty());
    }

    #[test]
    fn empty_batch_writes_empty_array() {
        let runtime = PreviewRuntime::from_config(PreviewConfig::default()).unwrap();
        let mut output = Vec::new();
        let report = run_batch(&runtime, &b"[]"[..], &mut output).unwrap();
        assert_eq!(report.files, 0);
        assert_eq!(String::from_utf8(output).unwrap().trim(), "[]");
    }
}
