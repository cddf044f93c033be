//! Extension extraction from file names and URLs.

use url::{ParseError, Url};

const PATH_SEPARATORS: &[char] = &['/', '\\'];

/// Base that relative and protocol-relative locators are resolved against.
const RELATIVE_BASE: &str = "http://relative.invalid/";

/// Lowercased extension of the last path segment of `name`.
///
/// Dotfiles (`.gitignore`) and names ending in a dot have no extension.
pub fn file_extension(name: &str) -> Option<String> {
    let segment = name.rsplit(PATH_SEPARATORS).next().unwrap_or(name);
    let (stem, extension) = segment.rsplit_once('.')?;
    if stem.is_empty() || extension.is_empty() {
        return None;
    }
    Some(extension.to_ascii_lowercase())
}

/// Lowercased extension of a URL's last path segment, ignoring query string
/// and fragment.
///
/// Relative locators (`/files/a.png`, `//cdn/a.png`) are resolved against a
/// placeholder base. Opaque URLs (`data:`, `blob:`, `mailto:`) and URLs
/// without a path (`https://example.com`) have no extension.
pub fn url_extension(url: &str) -> Option<String> {
    let parsed = match Url::parse(url) {
        Ok(parsed) => parsed,
        Err(ParseError::RelativeUrlWithoutBase) => Url::parse(RELATIVE_BASE).ok()?.join(url).ok()?,
        Err(_) => return None,
    };
    if parsed.cannot_be_a_base() || matches!(parsed.scheme(), "data" | "blob") {
        return None;
    }
    let segment = parsed.path_segments()?.next_back()?;
    file_extension(segment)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_extensions() {
        let cases = [
            ("photo.PNG", Some("png")),
            ("archive.tar.gz", Some("gz")),
            ("dir/sub/notes.md", Some("md")),
            ("C:\\docs\\report.pdf", Some("pdf")),
            (".gitignore", None),
            ("Makefile", None),
            ("trailing.", None),
            ("", None),
        ];
        for (input, expected) in cases {
            assert_eq!(file_extension(input).as_deref(), expected, "input {input:?}");
        }
    }

    #[test]
    fn url_extensions() {
        let cases = [
            ("https://x/photo.png", Some("png")),
            ("https://x/photo.JPG?size=large#top", Some("jpg")),
            ("https://cdn.example.com/a/b/c.zip?token=a.b", Some("zip")),
            ("https://example.com", None),
            ("https://example.com/", None),
            ("https://example.com/download?file=a.png", None),
            ("/relative/path/file.mp4", Some("mp4")),
            ("data:image/png;base64,iVBORw0KGgo=", None),
            ("blob:filelens/0b6e1f4c", None),
            ("DATA:text/plain,readme.md", None),
            ("Data:text/plain,readme.md", None),
            ("BLOB:https://app.example/3f2a.png", None),
            ("HTTPS://X/Photo.PNG", Some("png")),
            ("//cdn.example.com/assets/app.js?v=3", Some("js")),
            ("relative.md", Some("md")),
            ("mailto:someone@example.com", None),
            ("", None),
        ];
        for (input, expected) in cases {
            assert_eq!(url_extension(input).as_deref(), expected, "input {input:?}");
        }
    }
}
