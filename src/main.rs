//! `filelens [CONFIG.yaml]`
//!
//! Reads a JSON array of file descriptors from stdin, prints the processed
//! results as a JSON array on stdout, then releases every result. Logs go to
//! stderr.
use std::io;

use anyhow::Context;
use filelens::{FilelensConfig, LoggingYamlConfig, PreviewRuntime, run_batch};
use tracing::info;

fn init_tracing(logging: &LoggingYamlConfig) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(logging.level.as_str())
        .with_target(false)
        .with_writer(io::stderr);
    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> anyhow::Result<()> {
    let config = match std::env::args_os().nth(1) {
        Some(path) => FilelensConfig::from_file(&path)
            .with_context(|| format!("loading {}", path.to_string_lossy()))?,
        None => FilelensConfig::default(),
    };
    init_tracing(&config.logging);

    let runtime = PreviewRuntime::from_file_config(&config)?;
    let report = run_batch(&runtime, io::stdin().lock(), io::stdout().lock())
        .context("processing descriptor batch")?;

    info!(
        files = report.files,
        cleanup_failures = report.cleanup_failures,
        live_object_urls = report.live_object_urls,
        "batch complete"
    );
    Ok(())
}
