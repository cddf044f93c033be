//! Static file-type registry.
//!
//! The registry maps every [`TypeId`] to a [`TypeDefinition`] and answers
//! reverse lookups by extension and by MIME type. It has no behaviour beyond
//! lookups; "not found" is `None`.
//!
//! ```rust
//! use preview::{Category, TypeId, TypeRegistry};
//!
//! let registry = TypeRegistry::new();
//! assert_eq!(registry.type_id_by_extension("PNG"), Some(TypeId::Image));
//! assert_eq!(registry.type_id_by_mime("text/markdown; charset=utf-8"), Some(TypeId::Markdown));
//! assert_eq!(registry.category_of(TypeId::Archive), Category::Archive);
//! ```
use std::collections::HashMap;

use crate::types::{Category, TypeId};

/// Registry entry for one file type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeDefinition {
    pub id: TypeId,
    pub category: Category,
    /// Lowercase extensions without the leading dot. Never empty.
    pub extensions: &'static [&'static str],
    /// MIME types, canonical first. Never empty.
    pub mime_types: &'static [&'static str],
    pub display_name: &'static str,
}

impl TypeDefinition {
    pub fn canonical_mime(&self) -> &'static str {
        self.mime_types
            .first()
            .copied()
            .unwrap_or("application/octet-stream")
    }
}

const fn def(
    id: TypeId,
    category: Category,
    extensions: &'static [&'static str],
    mime_types: &'static [&'static str],
    display_name: &'static str,
) -> TypeDefinition {
    TypeDefinition {
        id,
        category,
        extensions,
        mime_types,
        display_name,
    }
}

// Indexed by `TypeId as usize`; order must follow `TypeId::ALL`.
static BUILTIN_TYPES: [TypeDefinition; 26] = [
    def(TypeId::PlainText, Category::Text, &["txt", "text", "log"], &["text/plain"], "Plain Text"),
    def(
        TypeId::Markdown,
        Category::Text,
        &["md", "markdown", "mdown"],
        &["text/markdown", "text/x-markdown"],
        "Markdown",
    ),
    def(
        TypeId::Csv,
        Category::Text,
        &["csv", "tsv"],
        &["text/csv", "text/tab-separated-values"],
        "CSV",
    ),
    def(TypeId::Json, Category::Code, &["json", "jsonc"], &["application/json"], "JSON"),
    def(
        TypeId::JavaScript,
        Category::Code,
        &["js", "mjs", "cjs", "jsx"],
        &["text/javascript", "application/javascript"],
        "JavaScript",
    ),
    def(
        TypeId::TypeScript,
        Category::Code,
        &["ts", "tsx", "mts", "cts"],
        &["application/typescript", "text/typescript"],
        "TypeScript",
    ),
    def(
        TypeId::Python,
        Category::Code,
        &["py", "pyw"],
        &["text/x-python", "application/x-python-code"],
        "Python",
    ),
    def(TypeId::Rust, Category::Code, &["rs"], &["text/x-rust"], "Rust"),
    def(TypeId::Html, Category::Code, &["html", "htm"], &["text/html"], "HTML"),
    def(TypeId::Css, Category::Code, &["css", "scss", "less"], &["text/css"], "CSS"),
    def(TypeId::Xml, Category::Code, &["xml"], &["application/xml", "text/xml"], "XML"),
    def(
        TypeId::Yaml,
        Category::Code,
        &["yaml", "yml"],
        &["application/yaml", "application/x-yaml", "text/yaml"],
        "YAML",
    ),
    def(
        TypeId::Shell,
        Category::Code,
        &["sh", "bash", "zsh"],
        &["application/x-sh", "text/x-shellscript"],
        "Shell Script",
    ),
    def(
        TypeId::Java,
        Category::Code,
        &["java"],
        &["text/x-java-source", "text/x-java"],
        "Java",
    ),
    def(TypeId::Go, Category::Code, &["go"], &["text/x-go"], "Go"),
    def(TypeId::C, Category::Code, &["c", "h"], &["text/x-c", "text/x-csrc"], "C"),
    def(
        TypeId::Cpp,
        Category::Code,
        &["cpp", "cc", "cxx", "hpp", "hh"],
        &["text/x-c++src", "text/x-c++"],
        "C++",
    ),
    def(TypeId::Sql, Category::Code, &["sql"], &["application/sql", "text/x-sql"], "SQL"),
    def(
        TypeId::Image,
        Category::Image,
        &["png", "jpg", "jpeg", "gif", "webp", "bmp", "svg", "ico", "avif"],
        &[
            "image/png",
            "image/jpeg",
            "image/gif",
            "image/webp",
            "image/bmp",
            "image/svg+xml",
            "image/x-icon",
            "image/avif",
        ],
        "Image",
    ),
    def(
        TypeId::Video,
        Category::Video,
        &["mp4", "webm", "mov", "avi", "mkv", "ogv", "m4v"],
        &[
            "video/mp4",
            "video/webm",
            "video/quicktime",
            "video/x-msvideo",
            "video/x-matroska",
            "video/ogg",
        ],
        "Video",
    ),
    def(
        TypeId::Audio,
        Category::Audio,
        &["mp3", "wav", "ogg", "oga", "flac", "aac", "m4a", "opus"],
        &[
            "audio/mpeg",
            "audio/wav",
            "audio/x-wav",
            "audio/ogg",
            "audio/flac",
            "audio/aac",
            "audio/mp4",
            "audio/opus",
        ],
        "Audio",
    ),
    def(TypeId::Pdf, Category::Pdf, &["pdf"], &["application/pdf"], "PDF Document"),
    def(
        TypeId::Word,
        Category::Word,
        &["doc", "docx", "odt", "rtf"],
        &[
            "application/msword",
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
            "application/vnd.oasis.opendocument.text",
            "application/rtf",
        ],
        "Word Document",
    ),
    def(
        TypeId::Excel,
        Category::Excel,
        &["xls", "xlsx", "ods"],
        &[
            "application/vnd.ms-excel",
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            "application/vnd.oasis.opendocument.spreadsheet",
        ],
        "Spreadsheet",
    ),
    def(
        TypeId::PowerPoint,
        Category::Other,
        &["ppt", "pptx", "odp"],
        &[
            "application/vnd.ms-powerpoint",
            "application/vnd.openxmlformats-officedocument.presentationml.presentation",
            "application/vnd.oasis.opendocument.presentation",
        ],
        "Presentation",
    ),
    def(
        TypeId::Archive,
        Category::Archive,
        &["zip", "rar", "7z", "tar", "gz", "tgz", "bz2", "xz"],
        &[
            "application/zip",
            "application/x-rar-compressed",
            "application/x-7z-compressed",
            "application/x-tar",
            "application/gzip",
            "application/x-bzip2",
            "application/x-xz",
        ],
        "Archive",
    ),
];

/// Definition of a built-in type. Every `TypeId` has one.
pub fn builtin_definition(id: TypeId) -> &'static TypeDefinition {
    &BUILTIN_TYPES[id as usize]
}

/// Lowercases a media type and drops any parameters (`; charset=...`).
pub fn normalize_media_type(media_type: &str) -> String {
    media_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

fn normalize_extension(extension: &str) -> String {
    extension.trim().trim_start_matches('.').to_ascii_lowercase()
}

/// Read-only lookup structure over the built-in type table.
///
/// Built once at start-up and owned by the [`FileProcessor`](crate::FileProcessor).
/// Extension aliases (e.g. `mdx → markdown`) can be layered on top; they
/// never override a built-in extension.
#[derive(Debug, Clone)]
pub struct TypeRegistry {
    by_extension: HashMap<String, TypeId>,
    by_mime: HashMap<String, TypeId>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        let mut by_extension = HashMap::new();
        let mut by_mime = HashMap::new();
        for definition in &BUILTIN_TYPES {
            for ext in definition.extensions {
                by_extension.entry((*ext).to_string()).or_insert(definition.id);
            }
            for mime in definition.mime_types {
                by_mime.entry((*mime).to_string()).or_insert(definition.id);
            }
        }
        Self {
            by_extension,
            by_mime,
        }
    }

    /// Adds extension aliases. Aliases colliding with an existing extension
    /// are ignored; config validation rejects them before they get here.
    pub fn with_extension_aliases<'a, I>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = (&'a String, &'a TypeId)>,
    {
        for (extension, id) in aliases {
            self.by_extension
                .entry(normalize_extension(extension))
                .or_insert(*id);
        }
        self
    }

    pub fn definition_of(&self, id: TypeId) -> &'static TypeDefinition {
        builtin_definition(id)
    }

    pub fn definitions(&self) -> impl Iterator<Item = &'static TypeDefinition> {
        BUILTIN_TYPES.iter()
    }

    /// Looks up an extension, with or without the leading dot, in any case.
    pub fn type_id_by_extension(&self, extension: &str) -> Option<TypeId> {
        let extension = normalize_extension(extension);
        if extension.is_empty() {
            return None;
        }
        self.by_extension.get(&extension).copied()
    }

    /// Looks up a media type, ignoring case and parameters.
    pub fn type_id_by_mime(&self, media_type: &str) -> Option<TypeId> {
        self.by_mime.get(&normalize_media_type(media_type)).copied()
    }

    pub fn category_of(&self, id: TypeId) -> Category {
        builtin_definition(id).category
    }

    /// Resolves a caller-declared identifier such as `"plainText"`.
    pub fn parse_type_id(&self, name: &str) -> Option<TypeId> {
        TypeId::from_name(name)
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn table_order_matches_type_ids() {
        for (index, id) in TypeId::ALL.iter().enumerate() {
            assert_eq!(BUILTIN_TYPES[index].id, *id, "table slot {index}");
        }
    }

    #[test]
    fn definitions_are_non_empty_and_unambiguous() {
        let mut extensions = HashSet::new();
        let mut mimes = HashSet::new();
        for definition in &BUILTIN_TYPES {
            assert!(!definition.extensions.is_empty(), "{}", definition.id);
            assert!(!definition.mime_types.is_empty(), "{}", definition.id);
            for ext in definition.extensions {
                assert!(extensions.insert(*ext), "extension {ext} registered twice");
                assert_eq!(*ext, ext.to_ascii_lowercase());
            }
            for mime in definition.mime_types {
                assert!(mimes.insert(*mime), "mime {mime} registered twice");
            }
        }
    }

    #[test]
    fn extension_lookup_ignores_case_and_dot() {
        let registry = TypeRegistry::new();
        assert_eq!(registry.type_id_by_extension("md"), Some(TypeId::Markdown));
        assert_eq!(registry.type_id_by_extension(".MD"), Some(TypeId::Markdown));
        assert_eq!(registry.type_id_by_extension("bin"), None);
        assert_eq!(registry.type_id_by_extension(""), None);
        assert_eq!(registry.type_id_by_extension("."), None);
    }

    #[test]
    fn mime_lookup_strips_parameters() {
        let registry = TypeRegistry::new();
        assert_eq!(
            registry.type_id_by_mime("Text/Plain; charset=UTF-8"),
            Some(TypeId::PlainText)
        );
        assert_eq!(registry.type_id_by_mime("image/jpeg"), Some(TypeId::Image));
        assert_eq!(registry.type_id_by_mime("application/octet-stream"), None);
    }

    #[test]
    fn category_lookup_is_stable() {
        let registry = TypeRegistry::new();
        for id in TypeId::ALL {
            let first = registry.category_of(id);
            for _ in 0..3 {
                assert_eq!(registry.category_of(id), first);
            }
        }
    }

    #[test]
    fn aliases_extend_but_never_override() {
        let mut aliases = std::collections::BTreeMap::new();
        aliases.insert("mdx".to_string(), TypeId::Markdown);
        aliases.insert("png".to_string(), TypeId::PlainText);
        let registry = TypeRegistry::new().with_extension_aliases(&aliases);
        assert_eq!(registry.type_id_by_extension("mdx"), Some(TypeId::Markdown));
        assert_eq!(registry.type_id_by_extension("png"), Some(TypeId::Image));
    }

    #[test]
    fn canonical_mime_is_first_entry() {
        assert_eq!(TypeId::Image.canonical_mime(), "image/png");
        assert_eq!(TypeId::PlainText.canonical_mime(), "text/plain");
        assert_eq!(builtin_definition(TypeId::Word).display_name, "Word Document");
    }
}
