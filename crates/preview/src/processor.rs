//! Process orchestrator.
//!
//! [`FileProcessor`] is the context object callers construct once at start-up
//! and pass to every call site. It owns the type registry, the strategy chain
//! and the handle allocator, and combines inference with source resolution:
//!
//! ```text
//!                  ┌──────────── infer() ────────────┐
//! FileDescriptor ──┤                                 ├──► FileProcessResult
//!                  └── SourceManager::process_file() ┘      can_preview
//!                                                           preview_mode
//! ```
//!
//! Preview feasibility is a pure function of the inferred category and the
//! source's capability:
//!
//! | Capability | `can_preview` |
//! |------------|---------------|
//! | `none` | never |
//! | `basic` | Image only |
//! | `full` | Text, Code, Image, Video, Audio, Pdf, Archive |
use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn, Level};

use crate::config::{ConfigError, PreviewConfig};
use crate::error::CleanupError;
use crate::handle::{HandleAllocator, NoObjectUrls, ObjectUrlStore};
use crate::inference;
use crate::metrics::ProcessMetrics;
use crate::registry::TypeRegistry;
use crate::source::{SourceContext, SourceManager, SourceStrategy};
use crate::types::{
    effective_mime, Category, FileDescriptor, FileProcessResult, PreviewCapability, PreviewMode,
    TypeInference,
};

/// Whether a file of `category` can be previewed given `capability`.
pub fn can_preview(category: Category, capability: PreviewCapability) -> bool {
    match capability {
        PreviewCapability::None => false,
        PreviewCapability::Basic => category == Category::Image,
        PreviewCapability::Full => category.supports_full_preview(),
    }
}

/// Preview mode for `category`; `None` whenever the file cannot be previewed.
pub fn preview_mode(category: Category, can_preview: bool) -> PreviewMode {
    if !can_preview {
        return PreviewMode::None;
    }
    match category {
        Category::Text | Category::Video | Category::Audio | Category::Pdf => PreviewMode::Inline,
        Category::Image | Category::Archive => PreviewMode::Modal,
        Category::Code => PreviewMode::Inline,
        Category::Word | Category::Excel | Category::Other => PreviewMode::External,
    }
}

/// Default pipeline: registry + strategy chain + handle allocator.
///
/// ```rust
/// use preview::{FileDescriptor, FileProcessor, PreviewConfig, PreviewMode};
///
/// let processor = FileProcessor::new(PreviewConfig::default()).unwrap();
/// let result = processor.process_file(&FileDescriptor::named("notes.md").with_content("# Hello"));
/// assert!(result.can_preview);
/// assert_eq!(result.preview_mode, PreviewMode::Inline);
/// processor.cleanup(result).unwrap();
/// ```
pub struct FileProcessor {
    config: PreviewConfig,
    registry: TypeRegistry,
    sources: SourceManager,
    handles: Arc<dyn HandleAllocator>,
    metrics: Option<Arc<dyn ProcessMetrics>>,
}

impl FileProcessor {
    /// Builds a processor whose handle facility follows `config.object_urls`.
    pub fn new(config: PreviewConfig) -> Result<Self, ConfigError> {
        let store = config.object_url_store().map(Arc::new);
        Self::with_object_url_store(config, store)
    }

    /// Builds a processor backed by `store`, or by [`NoObjectUrls`] when
    /// `store` is `None`. Callers keep their own `Arc` to inspect the store.
    pub fn with_object_url_store(
        config: PreviewConfig,
        store: Option<Arc<ObjectUrlStore>>,
    ) -> Result<Self, ConfigError> {
        let handles: Arc<dyn HandleAllocator> = match store {
            Some(store) => store as Arc<dyn HandleAllocator>,
            None => Arc::new(NoObjectUrls),
        };
        Self::with_handles(config, handles)
    }

    /// Builds a processor around a caller-supplied handle allocator.
    pub fn with_handles(
        config: PreviewConfig,
        handles: Arc<dyn HandleAllocator>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let registry = TypeRegistry::new().with_extension_aliases(&config.extension_aliases);
        Ok(Self {
            config,
            registry,
            sources: SourceManager::new(),
            handles,
            metrics: None,
        })
    }

    pub fn with_metrics(mut self, metrics: Arc<dyn ProcessMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn config(&self) -> &PreviewConfig {
        &self.config
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    pub fn sources(&self) -> &SourceManager {
        &self.sources
    }

    pub fn handles(&self) -> &Arc<dyn HandleAllocator> {
        &self.handles
    }

    fn context(&self) -> SourceContext<'_> {
        SourceContext::new(&self.registry, self.handles.as_ref(), &self.config)
    }

    /// Adds a strategy ahead of all others. Must happen before the processor
    /// is shared, which `&mut self` enforces.
    pub fn register_strategy(&mut self, strategy: impl SourceStrategy + 'static) {
        self.sources.register_strategy(Box::new(strategy));
    }

    pub fn infer(&self, descriptor: &FileDescriptor) -> TypeInference {
        inference::infer(descriptor, &self.registry)
    }

    /// Resolves type and preview resource for one descriptor.
    ///
    /// Never fails: unknown files degrade to `can_preview = false`. The caller
    /// owns the result and must hand it to [`cleanup`](Self::cleanup) once it
    /// is no longer displayed.
    pub fn process_file(&self, descriptor: &FileDescriptor) -> FileProcessResult {
        let start = Instant::now();
        let span = tracing::span!(
            Level::DEBUG,
            "preview.process_file",
            name = %descriptor.name
        );
        let _guard = span.enter();

        let type_inference = self.infer(descriptor);
        let data_source = self.sources.process_file(descriptor, &self.context());

        let category = type_inference.category();
        let can_preview = can_preview(category, data_source.preview_capability);
        let result = FileProcessResult {
            type_inference,
            data_source,
            can_preview,
            preview_mode: preview_mode(category, can_preview),
        };

        let latency = start.elapsed();
        info!(
            type_id = %result.type_inference.type_id(),
            provenance = result.type_inference.provenance().as_str(),
            source_kind = result.data_source.source_kind.as_str(),
            can_preview = result.can_preview,
            needs_cleanup = result.data_source.needs_cleanup,
            elapsed_micros = latency.as_micros() as u64,
            "process_success"
        );
        if let Some(metrics) = &self.metrics {
            metrics.record_process(latency, &result);
        }
        result
    }

    /// Processes each descriptor independently, in order.
    pub fn process_files(&self, descriptors: &[FileDescriptor]) -> Vec<FileProcessResult> {
        descriptors.iter().map(|d| self.process_file(d)).collect()
    }

    /// Releases whatever `result` allocated. Results without a handle are a
    /// no-op.
    pub fn cleanup(&self, result: FileProcessResult) -> Result<(), CleanupError> {
        let start = Instant::now();
        let outcome = self.sources.cleanup_result(result.data_source, &self.context());
        if let Err(err) = &outcome {
            warn!(error = %err, "cleanup_failure");
        }
        if let Some(metrics) = &self.metrics {
            metrics.record_cleanup(start.elapsed(), outcome.clone());
        }
        outcome
    }

    /// MIME type consistent with what `process_file` reports: the winning
    /// strategy's MIME, else the inferred type's canonical MIME.
    pub fn mime_type_of(&self, descriptor: &FileDescriptor) -> String {
        let source_mime = self.sources.resolve_mime(descriptor, &self.context());
        let type_id = self.infer(descriptor).type_id();
        effective_mime(source_mime.as_deref(), type_id).to_string()
    }

    fn category_of(&self, descriptor: &FileDescriptor) -> Category {
        self.infer(descriptor).category()
    }

    pub fn is_image(&self, descriptor: &FileDescriptor) -> bool {
        self.category_of(descriptor) == Category::Image
    }

    pub fn is_video(&self, descriptor: &FileDescriptor) -> bool {
        self.category_of(descriptor) == Category::Video
    }

    pub fn is_audio(&self, descriptor: &FileDescriptor) -> bool {
        self.category_of(descriptor) == Category::Audio
    }

    pub fn is_pdf(&self, descriptor: &FileDescriptor) -> bool {
        self.category_of(descriptor) == Category::Pdf
    }

    pub fn is_text(&self, descriptor: &FileDescriptor) -> bool {
        self.category_of(descriptor) == Category::Text
    }

    pub fn is_archive(&self, descriptor: &FileDescriptor) -> bool {
        self.category_of(descriptor) == Category::Archive
    }
}

impl std::fmt::Debug for FileProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileProcessor")
            .field("config", &self.config)
            .field("sources", &self.sources)
            .field("object_urls", &self.handles.is_available())
            .finish()
    }
}
