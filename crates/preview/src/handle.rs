//! Object-URL style resource handles.
//!
//! Content and blob strategies make in-memory bytes addressable by allocating
//! an object URL (`blob:<origin>/<uuid>`). The facility is a capability the
//! platform may or may not provide, so it sits behind [`HandleAllocator`] and
//! is injected into the processor:
//!
//! - [`ObjectUrlStore`]: in-memory store, one entry per live handle.
//! - [`NoObjectUrls`]: the facility is missing; every allocation reports
//!   [`HandleError::Unavailable`] and strategies degrade to no preview URL.
//!
//! ```rust
//! use preview::{HandleAllocator, ObjectUrlStore};
//!
//! let store = ObjectUrlStore::new("filelens");
//! let url = store.allocate("hello".into(), "text/plain").unwrap();
//! assert!(url.as_str().starts_with("blob:filelens/"));
//! assert_eq!(store.live_count(), 1);
//!
//! store.release(&url).unwrap();
//! assert_eq!(store.live_count(), 0);
//! ```
use std::collections::HashMap;
use std::fmt;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::HandleError;

/// Scheme prefix shared by every object URL.
pub const OBJECT_URL_SCHEME: &str = "blob:";

/// A revocable URL addressing bytes held by a [`HandleAllocator`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectUrl(String);

impl ObjectUrl {
    /// Wraps `url` if it carries the object-URL scheme.
    pub fn parse(url: &str) -> Option<Self> {
        url.starts_with(OBJECT_URL_SCHEME)
            .then(|| ObjectUrl(url.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ObjectUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Platform capability that turns in-memory bytes into a fetchable URL.
///
/// Implementations must hand out a distinct URL per allocation, so concurrent
/// calls for different descriptors never collide.
pub trait HandleAllocator: Send + Sync {
    /// Allocates a handle for `bytes`.
    fn allocate(&self, bytes: Bytes, media_type: &str) -> Result<ObjectUrl, HandleError>;

    /// Releases a handle. Releasing a handle that is not live reports
    /// [`HandleError::NotFound`].
    fn release(&self, url: &ObjectUrl) -> Result<(), HandleError>;

    /// Whether allocations can succeed at all.
    fn is_available(&self) -> bool {
        true
    }
}

/// Allocator for runtimes without an object-URL facility.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoObjectUrls;

impl HandleAllocator for NoObjectUrls {
    fn allocate(&self, _bytes: Bytes, _media_type: &str) -> Result<ObjectUrl, HandleError> {
        Err(HandleError::Unavailable)
    }

    fn release(&self, _url: &ObjectUrl) -> Result<(), HandleError> {
        Err(HandleError::Unavailable)
    }

    fn is_available(&self) -> bool {
        false
    }
}

/// Bytes addressed by a live object URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub media_type: String,
    pub bytes: Bytes,
}

/// In-memory object-URL store guarded by a `RwLock`.
#[derive(Debug)]
pub struct ObjectUrlStore {
    origin: String,
    capacity: Option<usize>,
    objects: RwLock<HashMap<Uuid, StoredObject>>,
}

impl ObjectUrlStore {
    /// Creates an unbounded store issuing `blob:<origin>/<uuid>` URLs.
    pub fn new(origin: impl Into<String>) -> Self {
        Self::with_capacity(origin, None)
    }

    /// Creates a store holding at most `capacity` live handles.
    pub fn with_capacity(origin: impl Into<String>, capacity: Option<usize>) -> Self {
        Self {
            origin: origin.into(),
            capacity,
            objects: RwLock::new(HashMap::new()),
        }
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Number of handles allocated and not yet released.
    pub fn live_count(&self) -> usize {
        self.read().len()
    }

    /// Returns the bytes behind a live handle.
    pub fn resolve(&self, url: &ObjectUrl) -> Result<StoredObject, HandleError> {
        let key = self.key_of(url)?;
        self.read()
            .get(&key)
            .cloned()
            .ok_or_else(|| HandleError::NotFound(url.to_string()))
    }

    fn key_of(&self, url: &ObjectUrl) -> Result<Uuid, HandleError> {
        let foreign = || HandleError::Foreign(url.to_string());
        let rest = url
            .as_str()
            .strip_prefix(OBJECT_URL_SCHEME)
            .ok_or_else(foreign)?;
        let (origin, id) = rest.rsplit_once('/').ok_or_else(foreign)?;
        if origin != self.origin {
            return Err(foreign());
        }
        Uuid::parse_str(id).map_err(|_| foreign())
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<Uuid, StoredObject>> {
        self.objects
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<Uuid, StoredObject>> {
        self.objects
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl HandleAllocator for ObjectUrlStore {
    fn allocate(&self, bytes: Bytes, media_type: &str) -> Result<ObjectUrl, HandleError> {
        let mut objects = self.write();
        if let Some(limit) = self.capacity {
            if objects.len() >= limit {
                return Err(HandleError::CapacityExceeded { limit });
            }
        }
        let id = Uuid::new_v4();
        objects.insert(
            id,
            StoredObject {
                media_type: media_type.to_string(),
                bytes,
            },
        );
        Ok(ObjectUrl(format!(
            "{OBJECT_URL_SCHEME}{}/{}",
            self.origin,
            id.hyphenated()
        )))
    }

    fn release(&self, url: &ObjectUrl) -> Result<(), HandleError> {
        let key = self.key_of(url)?;
        match self.write().remove(&key) {
            Some(_) => Ok(()),
            None => Err(HandleError::NotFound(url.to_string())),
        }
    }
}
