use bytes::Bytes;

use super::{SourceContext, SourceStrategy};
use crate::error::SourceError;
use crate::types::{DataSourceResult, FileDescriptor, PreviewCapability, SourceKind};

const CONTENT_MIME: &str = "text/plain";

/// Inline textual content. Highest built-in priority: the caller already holds
/// the bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentStrategy;

impl SourceStrategy for ContentStrategy {
    fn name(&self) -> &str {
        "content"
    }

    fn can_handle(&self, descriptor: &FileDescriptor) -> bool {
        descriptor.has_content()
    }

    fn process(
        &self,
        descriptor: &FileDescriptor,
        ctx: &SourceContext<'_>,
    ) -> Result<DataSourceResult, SourceError> {
        let content = match descriptor.content.as_deref() {
            Some(content) if !content.is_empty() => content,
            _ => {
                return Err(SourceError::invalid_state(
                    self.name(),
                    "descriptor has no inline content",
                ))
            }
        };

        let mut result = DataSourceResult::new(SourceKind::Content, PreviewCapability::Full);
        result.mime_type = Some(CONTENT_MIME.to_string());

        if ctx.handles.is_available() {
            if let Some(url) = ctx.allocate_object_url(
                self.name(),
                Bytes::copy_from_slice(content.as_bytes()),
                CONTENT_MIME,
            ) {
                result.preview_url = Some(url.into_string());
                result.needs_cleanup = true;
            }
        }

        // Oversized content is only dropped when the object URL can serve it.
        let within_inline_limit = ctx
            .config
            .max_inline_bytes
            .is_none_or(|limit| content.len() <= limit);
        if within_inline_limit || result.preview_url.is_none() {
            result.inline_content = Some(content.to_string());
        }

        Ok(result)
    }

    fn mime_type(&self, _descriptor: &FileDescriptor, _ctx: &SourceContext<'_>) -> Option<String> {
        Some(CONTENT_MIME.to_string())
    }
}
