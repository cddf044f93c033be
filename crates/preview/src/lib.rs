//! File identification and preview-resource resolution.
//!
//! Callers hand us an opaque [`FileDescriptor`] (a name plus at most one of a
//! remote URL, inline text or a binary blob) and get back a
//! [`FileProcessResult`] answering three questions:
//!
//! - **What is it?** A [`TypeInference`] from a short evidence waterfall:
//!   explicit type, blob media type, filename extension, URL extension, then
//!   a plain-text fallback. Every answer carries its provenance and a
//!   confidence derived from it.
//! - **What can we show?** A [`DataSourceResult`] from the first
//!   [`SourceStrategy`] that claims the descriptor. Strategies are tried
//!   newest-registered first, then content, blob, url.
//! - **Who cleans up?** In-memory payloads are exposed through object URLs
//!   allocated from an injected [`HandleAllocator`]. A result with
//!   `needs_cleanup` owns exactly one handle, released by
//!   [`FileProcessor::cleanup`].
//!
//! Nothing here fails on unknown input. Unrecognised files degrade to
//! `plainText` with `can_preview = false`.
//!
//! ## Example
//!
//! ```
//! use preview::{FileDescriptor, FileProcessor, PreviewConfig, PreviewMode, Provenance};
//!
//! let processor = FileProcessor::new(PreviewConfig::default()).unwrap();
//!
//! let remote = FileDescriptor::named("photo.png").with_url("https://x/photo.png");
//! let result = processor.process_file(&remote);
//! assert_eq!(result.type_inference.provenance(), Provenance::Extension);
//! assert_eq!(result.preview_mode, PreviewMode::Modal);
//! assert!(!result.data_source.needs_cleanup);
//!
//! processor.cleanup(result).unwrap();
//! ```
mod config;
mod error;
mod extension;
mod handle;
mod inference;
mod metrics;
mod processor;
mod registry;
mod source;
mod types;

pub use crate::config::{ConfigError, PreviewConfig, DEFAULT_BLOB_ORIGIN};
pub use crate::error::{CleanupError, HandleError, SourceError};
pub use crate::extension::{file_extension, url_extension};
pub use crate::handle::{
    HandleAllocator, NoObjectUrls, ObjectUrl, ObjectUrlStore, StoredObject, OBJECT_URL_SCHEME,
};
pub use crate::inference::infer;
pub use crate::metrics::ProcessMetrics;
pub use crate::processor::{can_preview, preview_mode, FileProcessor};
pub use crate::registry::{builtin_definition, normalize_media_type, TypeDefinition, TypeRegistry};
pub use crate::source::{
    blob_category, BlobStrategy, ContentStrategy, SourceContext, SourceManager, SourceStrategy,
    UrlStrategy, CODE_MEDIA_TYPES,
};
pub use crate::types::{
    Blob, Category, Confidence, DataSourceResult, FileDescriptor, FileProcessResult,
    PreviewCapability, PreviewMode, Provenance, SourceKind, TypeId, TypeInference,
};
