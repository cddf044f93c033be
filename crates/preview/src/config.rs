//! Runtime configuration for the preview processor.
//!
//! [`PreviewConfig`] controls the object-URL facility, cleanup strictness and
//! registry extensions. It is cheap to clone and serializable, so it can be
//! embedded in larger configuration files.
//!
//! ```rust
//! use preview::PreviewConfig;
//!
//! let config = PreviewConfig::default();
//! config.validate().expect("defaults are valid");
//! assert!(config.object_urls);
//! assert!(config.strict_cleanup);
//! ```
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::handle::ObjectUrlStore;
use crate::registry::TypeRegistry;
use crate::types::TypeId;

/// Origin used in object URLs when none is configured.
pub const DEFAULT_BLOB_ORIGIN: &str = "filelens";

/// Runtime configuration for [`FileProcessor`](crate::FileProcessor).
///
/// # Serialization
///
/// ```json
/// {
///   "version": 1,
///   "object_urls": true,
///   "blob_origin": "filelens",
///   "strict_cleanup": true,
///   "max_inline_bytes": 1048576,
///   "max_object_urls": 512,
///   "extension_aliases": { "mdx": "markdown" }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    /// Version of the configuration schema.
    ///
    /// Default: `1`
    pub version: u32,

    /// Whether the runtime provides an object-URL facility.
    ///
    /// When `false`, content and blob results carry no preview URL and never
    /// need cleanup; their capability is unchanged.
    ///
    /// Default: `true`
    pub object_urls: bool,

    /// Origin segment of issued object URLs (`blob:<origin>/<uuid>`).
    ///
    /// Default: [`DEFAULT_BLOB_ORIGIN`]
    pub blob_origin: String,

    /// Report releasing an already released handle as
    /// [`CleanupError::AlreadyReleased`](crate::CleanupError::AlreadyReleased)
    /// instead of ignoring it.
    ///
    /// Default: `true`
    pub strict_cleanup: bool,

    /// Largest inline content, in bytes, copied into
    /// `DataSourceResult::inline_content`. Larger content is served through
    /// its object URL instead, and stays inline when no URL could be
    /// allocated.
    ///
    /// Default: `None` (unlimited)
    pub max_inline_bytes: Option<usize>,

    /// Maximum number of live object URLs. Allocations beyond it degrade the
    /// same way as a missing facility.
    ///
    /// Default: `None` (unlimited)
    pub max_object_urls: Option<usize>,

    /// Extra extensions mapped onto registered types, e.g. `mdx → markdown`.
    /// Aliases may not shadow a built-in extension.
    ///
    /// Default: empty
    pub extension_aliases: BTreeMap<String, TypeId>,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            version: 1,
            object_urls: true,
            blob_origin: DEFAULT_BLOB_ORIGIN.to_string(),
            strict_cleanup: true,
            max_inline_bytes: None,
            max_object_urls: None,
            extension_aliases: BTreeMap::new(),
        }
    }
}

/// Errors raised when validating a [`PreviewConfig`].
///
/// These are start-up problems; a processor is never built from an invalid
/// configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("config version must be >= 1")]
    InvalidVersion,

    #[error("blob_origin {0:?} must be non-empty and contain no whitespace")]
    InvalidBlobOrigin(String),

    #[error("max_object_urls must be >= 1 when set")]
    ZeroObjectUrlCapacity,

    #[error("extension alias {0:?} must be a bare extension without dots or whitespace")]
    InvalidAlias(String),

    #[error("extension alias {extension:?} shadows built-in type {existing}")]
    AliasShadowsBuiltin { extension: String, existing: TypeId },
}

impl PreviewConfig {
    /// Object-URL store described by this config, or `None` when the facility
    /// is disabled.
    pub fn object_url_store(&self) -> Option<ObjectUrlStore> {
        self.object_urls
            .then(|| ObjectUrlStore::with_capacity(self.blob_origin.clone(), self.max_object_urls))
    }

    /// Checks internal consistency. Call once at start-up.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version == 0 {
            return Err(ConfigError::InvalidVersion);
        }

        if self.blob_origin.is_empty() || self.blob_origin.chars().any(char::is_whitespace) {
            return Err(ConfigError::InvalidBlobOrigin(self.blob_origin.clone()));
        }

        if self.max_object_urls == Some(0) {
            return Err(ConfigError::ZeroObjectUrlCapacity);
        }

        let builtin = TypeRegistry::new();
        for extension in self.extension_aliases.keys() {
            let bare = extension.trim_start_matches('.');
            if bare.is_empty() || bare.contains('.') || bare.chars().any(char::is_whitespace) {
                return Err(ConfigError::InvalidAlias(extension.clone()));
            }
            if let Some(existing) = builtin.type_id_by_extension(bare) {
                return Err(ConfigError::AliasShadowsBuiltin {
                    extension: extension.clone(),
                    existing,
                });
            }
        }

        Ok(())
    }
}
