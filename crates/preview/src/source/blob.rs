use super::{SourceContext, SourceStrategy};
use crate::error::SourceError;
use crate::registry::normalize_media_type;
use crate::types::{Category, DataSourceResult, FileDescriptor, PreviewCapability, SourceKind};

/// Media types treated as source code. Checked before the generic `text/*`
/// prefix, since many of them are `text/*` too.
pub const CODE_MEDIA_TYPES: &[&str] = &[
    "application/json",
    "application/javascript",
    "text/javascript",
    "application/typescript",
    "text/typescript",
    "text/x-python",
    "text/x-rust",
    "text/html",
    "text/css",
    "application/xml",
    "text/xml",
    "application/yaml",
    "application/x-yaml",
    "text/yaml",
    "application/x-sh",
    "text/x-shellscript",
    "text/x-java-source",
    "text/x-go",
    "text/x-c",
    "text/x-c++src",
    "application/sql",
];

/// Category of a blob from its declared media type alone.
///
/// Precedence: code allow-list, `image/*`, `video/*`, `text/*`, else Other.
pub fn blob_category(media_type: &str) -> Category {
    let media_type = normalize_media_type(media_type);
    if CODE_MEDIA_TYPES.contains(&media_type.as_str()) {
        Category::Code
    } else if media_type.starts_with("image/") {
        Category::Image
    } else if media_type.starts_with("video/") {
        Category::Video
    } else if media_type.starts_with("text/") {
        Category::Text
    } else {
        Category::Other
    }
}

/// Raw binary payload with a declared media type.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlobStrategy;

impl SourceStrategy for BlobStrategy {
    fn name(&self) -> &str {
        "blob"
    }

    fn can_handle(&self, descriptor: &FileDescriptor) -> bool {
        descriptor.has_blob()
    }

    fn process(
        &self,
        descriptor: &FileDescriptor,
        ctx: &SourceContext<'_>,
    ) -> Result<DataSourceResult, SourceError> {
        let Some(blob) = descriptor.blob.as_ref() else {
            return Err(SourceError::invalid_state(self.name(), "descriptor has no blob"));
        };

        let capability = if blob_category(&blob.media_type).supports_full_preview() {
            PreviewCapability::Full
        } else {
            PreviewCapability::None
        };

        let mut result = DataSourceResult::new(SourceKind::Blob, capability);
        result.mime_type = Some(blob.media_type.clone());

        if let Some(url) =
            ctx.allocate_object_url(self.name(), blob.bytes.clone(), &blob.media_type)
        {
            result.preview_url = Some(url.into_string());
            result.needs_cleanup = true;
        }

        Ok(result)
    }

    fn mime_type(&self, descriptor: &FileDescriptor, _ctx: &SourceContext<'_>) -> Option<String> {
        descriptor.blob.as_ref().map(|blob| blob.media_type.clone())
    }
}
