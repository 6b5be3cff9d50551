//! XML minification.
//!
//! Copies the event stream through `quick-xml`, dropping indentation: text
//! that is only whitespace and spans a line break. Every other text node is
//! written back unchanged, so mixed content (`<p>Hello <b>big</b> world</p>`,
//! SVG `<text>`, XHTML) keeps its spacing.

use quick_xml::events::Event;
use quick_xml::{Reader, Writer};

use crate::MinifyError;

/// Minifies an XML document.
pub fn minify(input: &[u8]) -> Result<Vec<u8>, MinifyError> {
    let source = std::str::from_utf8(input)?;
    let mut reader = Reader::from_str(source);

    let mut writer = Writer::new(Vec::with_capacity(input.len()));
    loop {
        match reader.read_event()? {
            Event::Eof => break,
            Event::Text(text) if is_indentation(&text) => {}
            event => writer
                .write_event(event)
                .map_err(quick_xml::Error::from)?,
        }
    }
    Ok(writer.into_inner())
}

fn is_indentation(text: &[u8]) -> bool {
    text.contains(&b'\n') && text.iter().all(u8::is_ascii_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minified(xml: &str) -> String {
        String::from_utf8(minify(xml.as_bytes()).unwrap()).unwrap()
    }

    #[test]
    fn test_minify_basic() {
        let xml = "<?xml version=\"1.0\"?>\n<root>\n  <item>Hello</item>\n</root>\n";
        assert_eq!(
            minified(xml),
            "<?xml version=\"1.0\"?><root><item>Hello</item></root>"
        );
    }

    #[test]
    fn test_keeps_template_text() {
        let xml = "<feed>\n  <title>{{ title }}</title>\n</feed>";
        assert_eq!(minified(xml), "<feed><title>{{ title }}</title></feed>");
    }

    #[test]
    fn test_mixed_content_keeps_spacing() {
        assert_eq!(
            minified("<p>Hello <b>big</b> world</p>"),
            "<p>Hello <b>big</b> world</p>"
        );
        assert_eq!(
            minified("<p><b>a</b> <i>b</i></p>"),
            "<p><b>a</b> <i>b</i></p>"
        );
    }

    #[test]
    fn test_svg_text_keeps_spacing() {
        let xml = "<svg>\n  <text>Total: <tspan>3</tspan> items</text>\n</svg>\n";
        assert_eq!(
            minified(xml),
            "<svg><text>Total: <tspan>3</tspan> items</text></svg>"
        );
    }

    #[test]
    fn test_svg_attributes_preserved() {
        let xml = "<svg xmlns=\"http://www.w3.org/2000/svg\">\n  <rect width=\"10\" height=\"10\"/>\n</svg>";
        assert_eq!(
            minified(xml),
            "<svg xmlns=\"http://www.w3.org/2000/svg\"><rect width=\"10\" height=\"10\"/></svg>"
        );
    }

    #[test]
    fn test_mismatched_end_tag() {
        assert!(matches!(
            minify(b"<a><b></a>"),
            Err(MinifyError::Xml(_))
        ));
    }
}
