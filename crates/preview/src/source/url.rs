use super::{SourceContext, SourceStrategy};
use crate::error::SourceError;
use crate::extension::url_extension;
use crate::types::{Category, DataSourceResult, FileDescriptor, PreviewCapability, SourceKind};

/// Remote URL with no resident bytes. Nothing is fetched, so capability is at
/// most `basic`, and only for images.
#[derive(Debug, Clone, Copy, Default)]
pub struct UrlStrategy;

impl UrlStrategy {
    fn category(url: &str, ctx: &SourceContext<'_>) -> Option<Category> {
        url_extension(url)
            .and_then(|ext| ctx.registry.type_id_by_extension(&ext))
            .map(|id| ctx.registry.category_of(id))
    }
}

impl SourceStrategy for UrlStrategy {
    fn name(&self) -> &str {
        "url"
    }

    fn can_handle(&self, descriptor: &FileDescriptor) -> bool {
        descriptor.has_url() && !descriptor.has_content() && !descriptor.has_blob()
    }

    fn process(
        &self,
        descriptor: &FileDescriptor,
        ctx: &SourceContext<'_>,
    ) -> Result<DataSourceResult, SourceError> {
        if !self.can_handle(descriptor) {
            return Err(SourceError::invalid_state(
                self.name(),
                "descriptor has no url or carries resident content",
            ));
        }
        let url = descriptor.url.as_deref().unwrap_or_default();

        let capability = match Self::category(url, ctx) {
            Some(Category::Image) => PreviewCapability::Basic,
            _ => PreviewCapability::None,
        };

        let mut result = DataSourceResult::new(SourceKind::Url, capability);
        result.preview_url = Some(url.to_string());
        result.mime_type = self.mime_type(descriptor, ctx);
        Ok(result)
    }

    fn mime_type(&self, descriptor: &FileDescriptor, ctx: &SourceContext<'_>) -> Option<String> {
        let ext = url_extension(descriptor.url.as_deref()?)?;
        ctx.registry
            .type_id_by_extension(&ext)
            .map(|id| id.canonical_mime().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PreviewConfig;
    use crate::handle::ObjectUrlStore;
    use crate::registry::TypeRegistry;

    fn run(url: &str) -> DataSourceResult {
        let registry = TypeRegistry::new();
        let store = ObjectUrlStore::new("test");
        let config = PreviewConfig::default();
        let ctx = SourceContext::new(&registry, &store, &config);
        let result = UrlStrategy
            .process(&FileDescriptor::named("remote").with_url(url), &ctx)
            .expect("url strategy");
        assert_eq!(store.live_count(), 0, "url strategy never allocates");
        result
    }

    #[test]
    fn images_get_basic_capability() {
        let result = run("https://x/photo.PNG?w=200");
        assert_eq!(result.source_kind, SourceKind::Url);
        assert_eq!(result.preview_capability, PreviewCapability::Basic);
        assert_eq!(result.preview_url.as_deref(), Some("https://x/photo.PNG?w=200"));
        assert_eq!(result.mime_type.as_deref(), Some("image/png"));
        assert!(!result.needs_cleanup);
    }

    #[test]
    fn everything_else_gets_none() {
        for url in [
            "https://x/a.zip",
            "https://x/doc.pdf",
            "https://x/notes.md",
            "https://x/redirect?id=42",
        ] {
            let result = run(url);
            assert_eq!(result.preview_capability, PreviewCapability::None, "{url}");
            assert_eq!(result.preview_url.as_deref(), Some(url));
        }
    }

    #[test]
    fn unknown_extension_has_no_mime() {
        assert!(run("https://x/data.bin").mime_type.is_none());
    }

    #[test]
    fn declines_descriptors_with_resident_bytes() {
        let with_content = FileDescriptor::named("a")
            .with_url("https://x/a.png")
            .with_content("x");
        let with_blob = FileDescriptor::named("a")
            .with_url("https://x/a.png")
            .with_blob("image/png", vec![1]);
        assert!(!UrlStrategy.can_handle(&with_content));
        assert!(!UrlStrategy.can_handle(&with_blob));
        assert!(!UrlStrategy.can_handle(&FileDescriptor::named("a").with_url("")));
    }
}
