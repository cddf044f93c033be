//! Core data model for the preview crate.
//!
//! A [`FileDescriptor`] is the caller's description of one file. It is turned
//! into a [`FileProcessResult`] by [`FileProcessor::process_file`], which pairs
//! a [`TypeInference`] (what the file is) with a [`DataSourceResult`] (what can
//! be shown of it, and whether a handle was allocated for it).
//!
//! ```text
//! FileDescriptor
//! ├── name: String
//! ├── explicit_type: Option<String>
//! ├── url: Option<String>
//! ├── content: Option<String>
//! ├── blob: Option<Blob { media_type, bytes }>
//! └── attributes: Option<Value>
//!
//!         ↓ process_file()
//!
//! FileProcessResult
//! ├── type_inference: TypeInference { type_id, category, confidence, provenance }
//! ├── data_source: DataSourceResult { source_kind, preview_capability, preview_url, .. }
//! ├── can_preview: bool
//! └── preview_mode: PreviewMode
//! ```
//!
//! [`FileProcessor::process_file`]: crate::FileProcessor::process_file
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::registry;

/// Broad family a file type belongs to.
///
/// Categories drive both preview feasibility and the preview mode; the
/// finer-grained [`TypeId`] only matters for display and MIME resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Text,
    Code,
    Image,
    Video,
    Audio,
    Pdf,
    Word,
    Excel,
    Archive,
    Other,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Text => "text",
            Category::Code => "code",
            Category::Image => "image",
            Category::Video => "video",
            Category::Audio => "audio",
            Category::Pdf => "pdf",
            Category::Word => "word",
            Category::Excel => "excel",
            Category::Archive => "archive",
            Category::Other => "other",
        }
    }

    /// Categories that can be previewed once their bytes are resident.
    ///
    /// Archive is part of this set even though nothing renders archives; the
    /// preview mode for it is `modal`, which the UI turns into a listing.
    pub fn supports_full_preview(self) -> bool {
        matches!(
            self,
            Category::Text
                | Category::Code
                | Category::Image
                | Category::Video
                | Category::Audio
                | Category::Pdf
                | Category::Archive
        )
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier of a registered file type.
///
/// Every variant has exactly one [`TypeDefinition`](crate::TypeDefinition) in
/// the built-in registry table. Identifiers serialize in camelCase
/// (`plainText`, `javaScript`, ...), which is also the form accepted in
/// [`FileDescriptor::explicit_type`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TypeId {
    PlainText,
    Markdown,
    Csv,
    Json,
    JavaScript,
    TypeScript,
    Python,
    Rust,
    Html,
    Css,
    Xml,
    Yaml,
    Shell,
    Java,
    Go,
    C,
    Cpp,
    Sql,
    Image,
    Video,
    Audio,
    Pdf,
    Word,
    Excel,
    PowerPoint,
    Archive,
}

impl TypeId {
    /// All identifiers, in registry table order.
    pub const ALL: [TypeId; 26] = [
        TypeId::PlainText,
        TypeId::Markdown,
        TypeId::Csv,
        TypeId::Json,
        TypeId::JavaScript,
        TypeId::TypeScript,
        TypeId::Python,
        TypeId::Rust,
        TypeId::Html,
        TypeId::Css,
        TypeId::Xml,
        TypeId::Yaml,
        TypeId::Shell,
        TypeId::Java,
        TypeId::Go,
        TypeId::C,
        TypeId::Cpp,
        TypeId::Sql,
        TypeId::Image,
        TypeId::Video,
        TypeId::Audio,
        TypeId::Pdf,
        TypeId::Word,
        TypeId::Excel,
        TypeId::PowerPoint,
        TypeId::Archive,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TypeId::PlainText => "plainText",
            TypeId::Markdown => "markdown",
            TypeId::Csv => "csv",
            TypeId::Json => "json",
            TypeId::JavaScript => "javaScript",
            TypeId::TypeScript => "typeScript",
            TypeId::Python => "python",
            TypeId::Rust => "rust",
            TypeId::Html => "html",
            TypeId::Css => "css",
            TypeId::Xml => "xml",
            TypeId::Yaml => "yaml",
            TypeId::Shell => "shell",
            TypeId::Java => "java",
            TypeId::Go => "go",
            TypeId::C => "c",
            TypeId::Cpp => "cpp",
            TypeId::Sql => "sql",
            TypeId::Image => "image",
            TypeId::Video => "video",
            TypeId::Audio => "audio",
            TypeId::Pdf => "pdf",
            TypeId::Word => "word",
            TypeId::Excel => "excel",
            TypeId::PowerPoint => "powerPoint",
            TypeId::Archive => "archive",
        }
    }

    /// Parses an identifier case-insensitively (`"plainText"`, `"plaintext"`).
    pub fn from_name(name: &str) -> Option<TypeId> {
        let name = name.trim();
        TypeId::ALL
            .iter()
            .copied()
            .find(|id| id.as_str().eq_ignore_ascii_case(name))
    }

    /// Canonical MIME type of this identifier (first entry of its definition).
    pub fn canonical_mime(self) -> &'static str {
        registry::builtin_definition(self).canonical_mime()
    }
}

impl std::fmt::Display for TypeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How much a type inference can be trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

/// Evidence source that produced a type inference.
///
/// Variants are listed in waterfall order: the engine reports the earliest one
/// that had usable evidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Provenance {
    Explicit,
    MimeType,
    Extension,
    UrlExtension,
    Fallback,
}

impl Provenance {
    /// Confidence is a function of provenance and nothing else.
    pub fn confidence(self) -> Confidence {
        match self {
            Provenance::Explicit | Provenance::MimeType => Confidence::High,
            Provenance::Extension => Confidence::Medium,
            Provenance::UrlExtension | Provenance::Fallback => Confidence::Low,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Provenance::Explicit => "explicit",
            Provenance::MimeType => "mime-type",
            Provenance::Extension => "extension",
            Provenance::UrlExtension => "url-extension",
            Provenance::Fallback => "fallback",
        }
    }
}

/// Raw binary payload with its declared media type.
///
/// `bytes` is reference counted, so cloning a descriptor or handing the blob
/// to a handle allocator never copies the payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blob {
    /// Declared media type, e.g. `image/png` or `text/plain; charset=utf-8`.
    pub media_type: String,
    pub bytes: Bytes,
}

impl Blob {
    pub fn new(media_type: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            media_type: media_type.into(),
            bytes: bytes.into(),
        }
    }
}

/// Caller-supplied description of one file.
///
/// Any combination of `url`, `content` and `blob` may be present. Resolution
/// picks exactly one of them (content, then blob, then url) and ignores the
/// rest; nothing is merged.
///
/// ```rust
/// use preview::FileDescriptor;
///
/// let descriptor = FileDescriptor::named("notes.md").with_content("# Hello");
/// assert!(descriptor.has_content());
/// assert!(!descriptor.has_url());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileDescriptor {
    /// Display name; its extension is inference evidence.
    pub name: String,

    /// Caller-declared type identifier. Authoritative when it names a type the
    /// registry knows, ignored otherwise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explicit_type: Option<String>,

    /// Remote or already materialized resource locator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Inline textual payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blob: Option<Blob>,

    /// Free-form caller metadata. Built-in strategies never read it; custom
    /// strategies may use it to claim descriptors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<serde_json::Value>,
}

impl FileDescriptor {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_explicit_type(mut self, type_id: impl Into<String>) -> Self {
        self.explicit_type = Some(type_id.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_blob(mut self, media_type: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        self.blob = Some(Blob::new(media_type, bytes));
        self
    }

    pub fn with_attributes(mut self, attributes: serde_json::Value) -> Self {
        self.attributes = Some(attributes);
        self
    }

    /// True when `content` is present and non-empty.
    pub fn has_content(&self) -> bool {
        self.content.as_deref().is_some_and(|c| !c.is_empty())
    }

    pub fn has_blob(&self) -> bool {
        self.blob.is_some()
    }

    /// True when `url` is present and non-empty.
    pub fn has_url(&self) -> bool {
        self.url.as_deref().is_some_and(|u| !u.is_empty())
    }
}

/// Result of the type inference waterfall.
///
/// Fields are read-only: `category` follows from `type_id` and `confidence`
/// from `provenance`, so neither can be set on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TypeInference {
    type_id: TypeId,
    category: Category,
    confidence: Confidence,
    provenance: Provenance,
}

impl TypeInference {
    pub(crate) fn new(type_id: TypeId, category: Category, provenance: Provenance) -> Self {
        Self {
            type_id,
            category,
            confidence: provenance.confidence(),
            provenance,
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn confidence(&self) -> Confidence {
        self.confidence
    }

    pub fn provenance(&self) -> Provenance {
        self.provenance
    }
}

/// Originating representation a source result was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Url,
    Content,
    Blob,
}

impl SourceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SourceKind::Url => "url",
            SourceKind::Content => "content",
            SourceKind::Blob => "blob",
        }
    }
}

/// How much of a file can be shown without further work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreviewCapability {
    None,
    Basic,
    Full,
}

/// Where a previewable file should be displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreviewMode {
    Inline,
    Modal,
    External,
    None,
}

/// Normalized output of a source strategy.
///
/// `needs_cleanup` is true exactly when `preview_url` is an object URL
/// allocated for this result from in-memory content or a blob. A
/// `preview_url` that merely echoes the descriptor's remote URL is never
/// cleanable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataSourceResult {
    pub source_kind: SourceKind,
    pub preview_capability: PreviewCapability,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inline_content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    pub needs_cleanup: bool,
}

impl DataSourceResult {
    /// Result used when no strategy claims a descriptor.
    pub fn unresolved() -> Self {
        Self::new(SourceKind::Url, PreviewCapability::None)
    }

    pub fn new(source_kind: SourceKind, preview_capability: PreviewCapability) -> Self {
        Self {
            source_kind,
            preview_capability,
            preview_url: None,
            inline_content: None,
            mime_type: None,
            needs_cleanup: false,
        }
    }
}

/// What the processor hands back to the caller for one descriptor.
///
/// The caller owns the result and returns it to
/// [`FileProcessor::cleanup`](crate::FileProcessor::cleanup) once it is no
/// longer displayed. `cleanup` takes the result by value, so the same value
/// cannot be released twice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileProcessResult {
    pub type_inference: TypeInference,
    pub data_source: DataSourceResult,
    pub can_preview: bool,
    pub preview_mode: PreviewMode,
}

impl FileProcessResult {
    pub fn category(&self) -> Category {
        self.type_inference.category()
    }

    /// MIME type reported by the resolved source, or the canonical MIME of the
    /// inferred type when the source had none.
    pub fn mime_type(&self) -> &str {
        effective_mime(
            self.data_source.mime_type.as_deref(),
            self.type_inference.type_id(),
        )
    }
}

pub(crate) fn effective_mime(source_mime: Option<&str>, type_id: TypeId) -> &str {
    source_mime.unwrap_or_else(|| type_id.canonical_mime())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provenance_fixes_confidence() {
        assert_eq!(Provenance::Explicit.confidence(), Confidence::High);
        assert_eq!(Provenance::MimeType.confidence(), Confidence::High);
        assert_eq!(Provenance::Extension.confidence(), Confidence::Medium);
        assert_eq!(Provenance::UrlExtension.confidence(), Confidence::Low);
        assert_eq!(Provenance::Fallback.confidence(), Confidence::Low);
    }

    #[test]
    fn type_id_parses_case_insensitively() {
        assert_eq!(TypeId::from_name("plainText"), Some(TypeId::PlainText));
        assert_eq!(TypeId::from_name("PLAINTEXT"), Some(TypeId::PlainText));
        assert_eq!(TypeId::from_name(" image "), Some(TypeId::Image));
        assert_eq!(TypeId::from_name("hologram"), None);
    }

    #[test]
    fn serde_names_match_as_str() {
        for id in TypeId::ALL {
            let json = serde_json::to_string(&id).expect("serialize type id");
            assert_eq!(json, format!("\"{}\"", id.as_str()));
        }
        let json = serde_json::to_string(&Provenance::UrlExtension).expect("serialize");
        assert_eq!(json, "\"url-extension\"");
    }

    #[test]
    fn descriptor_deserializes_from_sparse_json() {
        let descriptor: FileDescriptor = serde_json::from_str(
            r#"{"name":"a.png","blob":{"media_type":"image/png","bytes":[137,80,78,71]}}"#,
        )
        .expect("deserialize descriptor");
        assert_eq!(descriptor.name, "a.png");
        assert!(descriptor.has_blob());
        assert!(!descriptor.has_content());
        let blob = descriptor.blob.expect("blob present");
        assert_eq!(blob.bytes.as_ref(), &[137, 80, 78, 71]);
    }

    #[test]
    fn empty_content_and_url_are_not_usable() {
        let descriptor = FileDescriptor::named("x").with_content("").with_url("");
        assert!(!descriptor.has_content());
        assert!(!descriptor.has_url());
    }
}
