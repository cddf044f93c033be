//! Source strategies and the manager that routes descriptors to them.
//!
//! A strategy recognises one originating representation of a file (inline
//! content, a blob, a remote URL) and turns it into a [`DataSourceResult`].
//! The [`SourceManager`] keeps strategies in priority order and hands each
//! descriptor to the first one that claims it:
//!
//! ```text
//! registered strategies (newest first)
//!        │
//!        ▼
//! ContentStrategy  ── non-empty content
//!        │
//!        ▼
//! BlobStrategy     ── blob present
//!        │
//!        ▼
//! UrlStrategy      ── non-empty url, no content/blob
//!        │
//!        ▼
//! DataSourceResult::unresolved()
//! ```
//!
//! Lower-priority fields of a descriptor are ignored once a strategy claims
//! it; results are never merged.
use tracing::{debug, warn};

use crate::config::PreviewConfig;
use crate::error::{CleanupError, HandleError, SourceError};
use crate::handle::{HandleAllocator, ObjectUrl};
use crate::registry::TypeRegistry;
use crate::types::{DataSourceResult, FileDescriptor};

mod blob;
mod content;
mod url;

pub use blob::{blob_category, BlobStrategy, CODE_MEDIA_TYPES};
pub use content::ContentStrategy;
pub use url::UrlStrategy;

/// Everything a strategy may consult while processing a descriptor.
#[derive(Clone, Copy)]
pub struct SourceContext<'a> {
    pub registry: &'a TypeRegistry,
    pub handles: &'a dyn HandleAllocator,
    pub config: &'a PreviewConfig,
}

impl<'a> SourceContext<'a> {
    pub fn new(
        registry: &'a TypeRegistry,
        handles: &'a dyn HandleAllocator,
        config: &'a PreviewConfig,
    ) -> Self {
        Self {
            registry,
            handles,
            config,
        }
    }

    /// Allocates an object URL, degrading to `None` when the facility is
    /// missing or refuses the allocation.
    pub fn allocate_object_url(
        &self,
        strategy: &str,
        bytes: bytes::Bytes,
        media_type: &str,
    ) -> Option<ObjectUrl> {
        match self.handles.allocate(bytes, media_type) {
            Ok(url) => Some(url),
            Err(HandleError::Unavailable) => {
                debug!(strategy, "object url facility unavailable; no preview url");
                None
            }
            Err(err) => {
                warn!(strategy, error = %err, "object url allocation failed; no preview url");
                None
            }
        }
    }
}

/// A pluggable rule for one originating representation of a file.
///
/// `can_handle` must be pure. `process` may allocate a handle and must only be
/// called after `can_handle` returned true; otherwise it returns
/// [`SourceError::InvalidState`].
pub trait SourceStrategy: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    fn can_handle(&self, descriptor: &FileDescriptor) -> bool;

    fn process(
        &self,
        descriptor: &FileDescriptor,
        ctx: &SourceContext<'_>,
    ) -> Result<DataSourceResult, SourceError>;

    /// MIME type `process` would report, computed without allocating.
    fn mime_type(&self, descriptor: &FileDescriptor, ctx: &SourceContext<'_>) -> Option<String>;
}

/// Ordered strategy chain with a registration hook and cleanup dispatch.
pub struct SourceManager {
    strategies: Vec<Box<dyn SourceStrategy>>,
}

impl SourceManager {
    /// Manager with the built-in chain: content, blob, url.
    pub fn new() -> Self {
        Self {
            strategies: vec![
                Box::new(ContentStrategy),
                Box::new(BlobStrategy),
                Box::new(UrlStrategy),
            ],
        }
    }

    /// Manager with no strategies; every descriptor resolves to the default.
    pub fn empty() -> Self {
        Self {
            strategies: Vec::new(),
        }
    }

    /// Inserts `strategy` ahead of every existing one.
    ///
    /// Takes `&mut self`: registration happens while setting up, before the
    /// manager is shared with concurrent callers.
    pub fn register_strategy(&mut self, strategy: Box<dyn SourceStrategy>) {
        debug!(strategy = strategy.name(), "registering source strategy");
        self.strategies.insert(0, strategy);
    }

    /// Strategy names in dispatch order.
    pub fn strategy_names(&self) -> Vec<&str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    fn select(&self, descriptor: &FileDescriptor) -> Option<&dyn SourceStrategy> {
        self.strategies
            .iter()
            .find(|s| s.can_handle(descriptor))
            .map(|s| &**s)
    }

    /// Resolves `descriptor` through the first strategy that claims it.
    ///
    /// # Panics
    ///
    /// Panics if the selected strategy reports [`SourceError::InvalidState`]
    /// after claiming the descriptor: the strategy contradicts its own
    /// `can_handle`, and a made-up result would corrupt preview decisions.
    pub fn process_file(
        &self,
        descriptor: &FileDescriptor,
        ctx: &SourceContext<'_>,
    ) -> DataSourceResult {
        let Some(strategy) = self.select(descriptor) else {
            debug!(name = %descriptor.name, "no source strategy matched");
            return DataSourceResult::unresolved();
        };
        debug!(strategy = strategy.name(), name = %descriptor.name, "source strategy selected");
        match strategy.process(descriptor, ctx) {
            Ok(result) => result,
            Err(err) => panic!("source dispatch defect: {err}"),
        }
    }

    /// MIME type the winning strategy would report, without allocating.
    pub fn resolve_mime(
        &self,
        descriptor: &FileDescriptor,
        ctx: &SourceContext<'_>,
    ) -> Option<String> {
        self.select(descriptor)
            .and_then(|strategy| strategy.mime_type(descriptor, ctx))
    }

    /// Releases the handle behind `result`, if it owns one.
    ///
    /// Results that need no cleanup, or whose preview URL is not an object
    /// URL, are a no-op and never touch the allocator.
    pub fn cleanup_result(
        &self,
        result: DataSourceResult,
        ctx: &SourceContext<'_>,
    ) -> Result<(), CleanupError> {
        if !result.needs_cleanup {
            return Ok(());
        }
        let Some(url) = result.preview_url.as_deref().and_then(ObjectUrl::parse) else {
            return Ok(());
        };

        match ctx.handles.release(&url) {
            Ok(()) => {
                debug!(url = %url, "object url released");
                Ok(())
            }
            Err(HandleError::NotFound(url)) if ctx.config.strict_cleanup => {
                Err(CleanupError::AlreadyReleased(url))
            }
            Err(HandleError::NotFound(url)) => {
                debug!(url = %url, "object url already released; ignoring");
                Ok(())
            }
            Err(err) => Err(CleanupError::Handle(err)),
        }
    }
}

impl Default for SourceManager {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SourceManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceManager")
            .field("strategies", &self.strategy_names())
            .finish()
    }
}
