//! Type inference waterfall.
//!
//! Each step short-circuits on the first usable piece of evidence:
//!
//! | Step | Evidence | Confidence | Provenance |
//! |------|----------|------------|------------|
//! | 1 | `explicit_type` known to the registry | high | `explicit` |
//! | 2 | blob media type known to the registry | high | `mime-type` |
//! | 3 | extension of `name` | medium | `extension` |
//! | 4 | extension of `url` (query stripped) | low | `url-extension` |
//! | 5 | nothing matched: `plainText` | low | `fallback` |
//!
//! Inference runs independently of source resolution and the two may
//! disagree; type identity and preview feasibility are separate questions.
use tracing::trace;

use crate::extension::{file_extension, url_extension};
use crate::registry::TypeRegistry;
use crate::types::{FileDescriptor, Provenance, TypeId, TypeInference};

/// Infers the semantic type of `descriptor`. Never fails.
pub fn infer(descriptor: &FileDescriptor, registry: &TypeRegistry) -> TypeInference {
    let (type_id, provenance) = resolve(descriptor, registry);
    trace!(
        name = %descriptor.name,
        type_id = %type_id,
        provenance = provenance.as_str(),
        "type inferred"
    );
    TypeInference::new(type_id, registry.category_of(type_id), provenance)
}

fn resolve(descriptor: &FileDescriptor, registry: &TypeRegistry) -> (TypeId, Provenance) {
    if let Some(id) = descriptor
        .explicit_type
        .as_deref()
        .and_then(|name| registry.parse_type_id(name))
    {
        return (id, Provenance::Explicit);
    }

    if let Some(id) = descriptor
        .blob
        .as_ref()
        .and_then(|blob| registry.type_id_by_mime(&blob.media_type))
    {
        return (id, Provenance::MimeType);
    }

    if let Some(id) =
        file_extension(&descriptor.name).and_then(|ext| registry.type_id_by_extension(&ext))
    {
        return (id, Provenance::Extension);
    }

    if let Some(id) = descriptor
        .url
        .as_deref()
        .and_then(url_extension)
        .and_then(|ext| registry.type_id_by_extension(&ext))
    {
        return (id, Provenance::UrlExtension);
    }

    (TypeId::PlainText, Provenance::Fallback)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Category, Confidence};

    fn infer_default(descriptor: &FileDescriptor) -> TypeInference {
        infer(descriptor, &TypeRegistry::new())
    }

    #[test]
    fn explicit_type_beats_everything() {
        let descriptor = FileDescriptor::named("photo.png")
            .with_explicit_type("markdown")
            .with_blob("image/png", vec![1])
            .with_url("https://x/photo.png");
        let inference = infer_default(&descriptor);
        assert_eq!(inference.type_id(), TypeId::Markdown);
        assert_eq!(inference.provenance(), Provenance::Explicit);
        assert_eq!(inference.confidence(), Confidence::High);
    }

    #[test]
    fn unknown_explicit_type_falls_through() {
        let descriptor = FileDescriptor::named("photo.png").with_explicit_type("hologram");
        let inference = infer_default(&descriptor);
        assert_eq!(inference.type_id(), TypeId::Image);
        assert_eq!(inference.provenance(), Provenance::Extension);
    }

    #[test]
    fn blob_media_type_beats_name() {
        let descriptor = FileDescriptor::named("report.txt").with_blob("application/pdf", vec![1]);
        let inference = infer_default(&descriptor);
        assert_eq!(inference.type_id(), TypeId::Pdf);
        assert_eq!(inference.category(), Category::Pdf);
        assert_eq!(inference.provenance(), Provenance::MimeType);
        assert_eq!(inference.confidence(), Confidence::High);
    }

    #[test]
    fn unknown_media_type_falls_back_to_name() {
        let descriptor =
            FileDescriptor::named("clip.mp4").with_blob("application/octet-stream", vec![1]);
        let inference = infer_default(&descriptor);
        assert_eq!(inference.type_id(), TypeId::Video);
        assert_eq!(inference.provenance(), Provenance::Extension);
        assert_eq!(inference.confidence(), Confidence::Medium);
    }

    #[test]
    fn url_extension_is_low_confidence() {
        let descriptor = FileDescriptor::named("download").with_url("https://x/a.zip?sig=1");
        let inference = infer_default(&descriptor);
        assert_eq!(inference.type_id(), TypeId::Archive);
        assert_eq!(inference.provenance(), Provenance::UrlExtension);
        assert_eq!(inference.confidence(), Confidence::Low);
    }

    #[test]
    fn opaque_urls_never_supply_an_extension() {
        for url in ["data:text/plain,readme.md", "DATA:text/plain,readme.md"] {
            let inference = infer_default(&FileDescriptor::named("download").with_url(url));
            assert_eq!(inference.type_id(), TypeId::PlainText, "{url}");
            assert_eq!(inference.provenance(), Provenance::Fallback, "{url}");
        }
    }

    #[test]
    fn nothing_matches_falls_back_to_plain_text() {
        let inference = infer_default(&FileDescriptor::named("data.bin"));
        assert_eq!(inference.type_id(), TypeId::PlainText);
        assert_eq!(inference.category(), Category::Text);
        assert_eq!(inference.provenance(), Provenance::Fallback);
        assert_eq!(inference.confidence(), Confidence::Low);
    }

    #[test]
    fn aliases_participate_in_extension_step() {
        let mut aliases = std::collections::BTreeMap::new();
        aliases.insert("mdx".to_string(), TypeId::Markdown);
        let registry = TypeRegistry::new().with_extension_aliases(&aliases);
        let inference = infer(&FileDescriptor::named("page.mdx"), &registry);
        assert_eq!(inference.type_id(), TypeId::Markdown);
        assert_eq!(inference.provenance(), Provenance::Extension);
    }
}
