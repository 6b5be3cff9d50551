//! HTML minification.
//!
//! Template delimiters (`{{ }}`, `{% %}`, `{# #}`) are left intact so the
//! minified source still compiles. Doctypes are written back as they were
//! found and inline `<style>` content is minified. Inline scripts are kept as
//! written.
//!
//! Attribute values holding a template tag always come out quoted. An
//! unquoted `class={{ cls }}` would let rendered data containing a space or
//! `=` start a new attribute, and HTML escaping does not touch either.

use minify_html::Cfg;

use crate::MinifyError;

/// Elements whose content is raw text, not markup.
const RAW_TEXT: [&[u8]; 2] = [b"script", b"style"];

/// Template tag openers and their closers.
const DELIMITERS: [(&[u8], &[u8]); 3] = [(b"{{", b"}}"), (b"{%", b"%}"), (b"{#", b"#}")];

fn config() -> Cfg {
    Cfg {
        keep_comments: false,
        minify_css: true,
        minify_js: false,
        preserve_brace_template_syntax: true,
        ..Cfg::new()
    }
}

/// Minifies an HTML document or fragment.
pub fn minify(input: &[u8]) -> Result<Vec<u8>, MinifyError> {
    let minified = minify_html::minify(input, &config());
    Ok(quote_template_attributes(&minified))
}

/// Re-quotes unquoted attribute values that contain a template tag.
fn quote_template_attributes(html: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(html.len() + 16);
    let mut pos = 0;
    while pos < html.len() {
        if let Some(end) = template_tag_end(html, pos) {
            out.extend_from_slice(&html[pos..end]);
            pos = end;
        } else if html[pos] == b'<' && html.get(pos + 1).is_some_and(u8::is_ascii_alphabetic) {
            let name = tag_name(html, pos + 1);
            pos = copy_start_tag(html, pos + 1 + name.len(), &mut out, pos);
            if RAW_TEXT.iter().any(|raw| name.eq_ignore_ascii_case(raw)) {
                let end = raw_text_end(html, pos, name);
                out.extend_from_slice(&html[pos..end]);
                pos = end;
            }
        } else {
            out.push(html[pos]);
            pos += 1;
        }
    }
    out
}

fn tag_name(html: &[u8], start: usize) -> &[u8] {
    let len = html[start..]
        .iter()
        .take_while(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b':'))
        .count();
    &html[start..start + len]
}

/// Copies a start tag from `tag_start` (its `<`) through its `>`, where
/// `attrs` is the first byte after the tag name. Returns the position after
/// the tag.
fn copy_start_tag(html: &[u8], attrs: usize, out: &mut Vec<u8>, tag_start: usize) -> usize {
    out.extend_from_slice(&html[tag_start..attrs]);
    let mut pos = attrs;
    while pos < html.len() {
        if let Some(end) = template_tag_end(html, pos) {
            out.extend_from_slice(&html[pos..end]);
            pos = end;
            continue;
        }
        let byte = html[pos];
        out.push(byte);
        pos += 1;
        match byte {
            b'>' => return pos,
            b'=' => pos = copy_attribute_value(html, pos, out),
            _ => {}
        }
    }
    pos
}

fn copy_attribute_value(html: &[u8], start: usize, out: &mut Vec<u8>) -> usize {
    if let Some(&quote) = html.get(start).filter(|b| matches!(b, b'"' | b'\'')) {
        let mut pos = start + 1;
        while pos < html.len() && html[pos] != quote {
            pos = template_tag_end(html, pos).unwrap_or(pos + 1);
        }
        let end = (pos + 1).min(html.len());
        out.extend_from_slice(&html[start..end]);
        return end;
    }

    let mut pos = start;
    let mut templated = false;
    while pos < html.len() && !html[pos].is_ascii_whitespace() && html[pos] != b'>' {
        match template_tag_end(html, pos) {
            Some(end) => {
                templated = true;
                pos = end;
            }
            None => pos += 1,
        }
    }

    let value = &html[start..pos];
    if templated {
        out.push(b'"');
        out.extend_from_slice(value);
        out.push(b'"');
    } else {
        out.extend_from_slice(value);
    }
    pos
}

/// Position of the `</name` that closes a raw text element, or the end.
fn raw_text_end(html: &[u8], start: usize, name: &[u8]) -> usize {
    let mut pos = start;
    while let Some(at) = find(&html[pos..], b"</") {
        let close = pos + at;
        let tag = close + 2;
        if html
            .get(tag..tag + name.len())
            .is_some_and(|candidate| candidate.eq_ignore_ascii_case(name))
        {
            return close;
        }
        pos = tag;
    }
    html.len()
}

/// End of the template tag opening at `pos`, if one opens there and closes.
fn template_tag_end(html: &[u8], pos: usize) -> Option<usize> {
    let rest = &html[pos..];
    DELIMITERS.iter().find_map(|(open, close)| {
        if !rest.starts_with(open) {
            return None;
        }
        find(&rest[open.len()..], close).map(|at| pos + open.len() + at + close.len())
    })
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|window| window == needle)
}
