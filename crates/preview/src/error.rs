//! Error types produced by the preview crate.
//!
//! Processing a descriptor never fails: unknown types fall back to plain text
//! and missing sources degrade to "cannot preview". Errors exist for the
//! three places where something is genuinely wrong:
//!
//! | Error | Raised by | Meaning |
//! |-------|-----------|---------|
//! | [`SourceError`] | a strategy's `process` | dispatch defect, never a data problem |
//! | [`HandleError`] | a [`HandleAllocator`](crate::HandleAllocator) | allocation or release failed |
//! | [`CleanupError`] | [`FileProcessor::cleanup`](crate::FileProcessor::cleanup) | a release could not be honoured |
use thiserror::Error;

/// Programmer error raised by a source strategy.
///
/// A strategy returns this when `process` is called on a descriptor its own
/// `can_handle` rejects. The source manager only calls `process` after a
/// positive `can_handle`, so seeing this error means the strategy is
/// inconsistent with itself; the manager panics instead of reporting a wrong
/// result.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SourceError {
    #[error("strategy `{strategy}` cannot process this descriptor: {reason}")]
    InvalidState {
        strategy: String,
        reason: String,
    },
}

impl SourceError {
    pub fn invalid_state(strategy: impl Into<String>, reason: impl Into<String>) -> Self {
        SourceError::InvalidState {
            strategy: strategy.into(),
            reason: reason.into(),
        }
    }
}

/// Failures of the object-URL facility.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum HandleError {
    /// The runtime has no object-URL facility. Strategies degrade to a result
    /// without a preview URL.
    #[error("object url facility is unavailable")]
    Unavailable,

    /// The store already holds its configured maximum of live handles.
    #[error("object url store is full ({limit} live handles)")]
    CapacityExceeded { limit: usize },

    /// The handle is not live: it was never issued or was already released.
    #[error("object url not found: {0}")]
    NotFound(String),

    /// The URL was not issued by this store.
    #[error("object url was not issued by this store: {0}")]
    Foreign(String),
}

/// Failures reported by cleanup.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CleanupError {
    /// The handle had already been released. Only reported when
    /// `strict_cleanup` is enabled.
    #[error("object url already released: {0}")]
    AlreadyReleased(String),

    #[error("object url release failed: {0}")]
    Handle(#[from] HandleError),
}
