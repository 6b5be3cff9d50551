//! MIME types from file extensions, and the content class derived from them.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Extension to MIME type, for the formats a template tree usually holds.
const MIME_TABLE: &[(&str, &str)] = &[
    ("html", "text/html; charset=utf-8"),
    ("htm", "text/html; charset=utf-8"),
    ("xhtml", "application/xhtml+xml"),
    ("css", "text/css; charset=utf-8"),
    ("js", "text/javascript; charset=utf-8"),
    ("mjs", "text/javascript; charset=utf-8"),
    ("json", "application/json"),
    ("jsonld", "application/ld+json"),
    ("webmanifest", "application/manifest+json"),
    ("xml", "text/xml; charset=utf-8"),
    ("svg", "image/svg+xml"),
    ("rss", "application/rss+xml"),
    ("atom", "application/atom+xml"),
    ("txt", "text/plain; charset=utf-8"),
    ("md", "text/markdown; charset=utf-8"),
    ("csv", "text/csv; charset=utf-8"),
    ("ics", "text/calendar; charset=utf-8"),
    ("yaml", "application/yaml"),
    ("yml", "application/yaml"),
    ("toml", "application/toml"),
];

/// Looks up the MIME type for a file extension.
///
/// The leading dot is optional and case is ignored. Unknown extensions
/// return an empty string.
pub fn mime_for_extension(ext: &str) -> &'static str {
    let ext = ext.strip_prefix('.').unwrap_or(ext);
    MIME_TABLE
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(ext))
        .map(|(_, mime)| *mime)
        .unwrap_or("")
}

/// Looks up the MIME type for a path (or template name) by its extension.
pub fn mime_for_path(path: impl AsRef<Path>) -> &'static str {
    path.as_ref()
        .extension()
        .and_then(|ext| ext.to_str())
        .map(mime_for_extension)
        .unwrap_or("")
}

/// Which namespace a template belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentClass {
    /// `text/html` content, rendered with auto-escaping.
    Html,
    /// Everything else, rendered verbatim.
    Other,
}

impl ContentClass {
    /// `Html` for any MIME type starting with `text/html`.
    pub fn from_mime(mime: &str) -> Self {
        if mime.starts_with("text/html") {
            ContentClass::Html
        } else {
            ContentClass::Other
        }
    }

    /// Classifies a template name by its extension.
    pub fn for_name(name: &str) -> Self {
        Self::from_mime(mime_for_path(name))
    }
}

impl fmt::Display for ContentClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentClass::Html => f.write_str("HTML"),
            ContentClass::Other => f.write_str("non-HTML"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_lookup() {
        assert_eq!(mime_for_extension(".css"), "text/css; charset=utf-8");
        assert_eq!(mime_for_extension("JSON"), "application/json");
        assert_eq!(mime_for_extension(".unknown"), "");
        assert_eq!(mime_for_extension(""), "");
    }

    #[test]
    fn test_path_lookup() {
        assert_eq!(mime_for_path("subdir/button.html"), "text/html; charset=utf-8");
        assert_eq!(mime_for_path("icons/logo.svg"), "image/svg+xml");
        assert_eq!(mime_for_path("Makefile"), "");
    }

    #[test]
    fn test_content_class() {
        assert_eq!(ContentClass::for_name("index.html"), ContentClass::Html);
        assert_eq!(ContentClass::for_name("page.HTM"), ContentClass::Html);
        assert_eq!(ContentClass::for_name("button.css"), ContentClass::Other);
        assert_eq!(ContentClass::for_name("page.xhtml"), ContentClass::Other);
        assert_eq!(ContentClass::for_name("noext"), ContentClass::Other);
    }
}
