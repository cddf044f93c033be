//! Workspace umbrella crate for filelens.
//!
//! Re-exports the preview crate and adds the pieces a host process needs
//! around it: YAML configuration loading, JSON batch processing and a
//! [`PreviewRuntime`] that keeps a handle on the object-URL store so live
//! handles can be reported.

pub mod batch;
pub mod config;

pub use batch::{BatchError, BatchReport, run_batch};
pub use config::{ConfigLoadError, FilelensConfig, LoggingYamlConfig, PreviewYamlConfig};
pub use preview::{
    Blob, BlobStrategy, Category, CleanupError, Confidence, ConfigError, ContentStrategy,
    DataSourceResult, FileDescriptor, FileProcessResult, FileProcessor, HandleAllocator,
    HandleError, NoObjectUrls, ObjectUrl, ObjectUrlStore, PreviewCapability, PreviewConfig,
    PreviewMode, ProcessMetrics, Provenance, SourceContext, SourceError, SourceKind,
    SourceManager, SourceStrategy, StoredObject, TypeDefinition, TypeId, TypeInference,
    TypeRegistry, UrlStrategy, can_preview, file_extension, infer, preview_mode, url_extension,
};

use std::sync::Arc;

use tracing::debug;

/// A [`FileProcessor`] plus the concrete object-URL store behind it.
///
/// The processor only sees a `dyn HandleAllocator`; keeping the store here
/// lets the host resolve object URLs back to bytes and check for leaks.
#[derive(Debug)]
pub struct PreviewRuntime {
    processor: FileProcessor,
    object_urls: Option<Arc<ObjectUrlStore>>,
}

impl PreviewRuntime {
    /// Builds the runtime described by `config`.
    pub fn from_config(config: PreviewConfig) -> Result<Self, ConfigError> {
        let object_urls = config.object_url_store().map(Arc::new);
        let processor = FileProcessor::with_object_url_store(config, object_urls.clone())?;
        debug!(
            object_urls = object_urls.is_some(),
            strategies = ?processor.sources().strategy_names(),
            "preview runtime ready"
        );
        Ok(Self {
            processor,
            object_urls,
        })
    }

    /// Builds the runtime from a loaded YAML file.
    pub fn from_file_config(config: &FilelensConfig) -> Result<Self, ConfigLoadError> {
        Ok(Self::from_config(config.preview_config()?)?)
    }

    pub fn processor(&self) -> &FileProcessor {
        &self.processor
    }

    pub fn processor_mut(&mut self) -> &mut FileProcessor {
        &mut self.processor
    }

    /// The object-URL store, if the facility is enabled.
    pub fn object_urls(&self) -> Option<&ObjectUrlStore> {
        self.object_urls.as_deref()
    }

    /// Number of object URLs allocated and not yet released.
    pub fn live_object_urls(&self) -> usize {
        self.object_urls.as_ref().map_or(0, |store| store.live_count())
    }
}
