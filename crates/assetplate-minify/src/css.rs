//! CSS minification on top of the `cssparser` tokenizer.
//!
//! The minifier works at the token level and never reorders anything:
//! `border: solid red 3px` stays `border:solid red 3px`. It
//!
//! - drops comments,
//! - removes whitespace next to `{`, `}`, `;`, `,` and `>`, after `(` and `:`,
//!   and before `)`,
//! - removes whitespace before `:` inside blocks (at the top level that space
//!   is a descendant combinator and is kept),
//! - drops the last `;` of a block.
//!
//! Unquoted `url()` values holding a template tag are copied through as
//! written.
//!
//! All other whitespace collapses to a single space.

use cssparser::{BasicParseErrorKind, ParseError, Parser, ParserInput, ToCss, Token};

use crate::MinifyError;

/// Tokens that make the input unusable.
#[derive(Debug)]
enum Rejected {
    BadUrl,
    BadString,
}

/// Minifies a stylesheet.
pub fn minify(input: &[u8]) -> Result<Vec<u8>, MinifyError> {
    let css = std::str::from_utf8(input)?;
    let mut parser_input = ParserInput::new(css);
    let mut parser = Parser::new(&mut parser_input);

    let mut out = Output::with_capacity(css.len());
    write_tokens(&mut parser, &mut out, 0).map_err(|err| MinifyError::Css {
        line: err.location.line + 1,
        column: err.location.column,
        message: format!("{:?}", err.kind),
    })?;
    Ok(out.finish().into_bytes())
}

fn write_tokens<'i>(
    parser: &mut Parser<'i, '_>,
    out: &mut Output,
    depth: usize,
) -> Result<(), ParseError<'i, Rejected>> {
    loop {
        let start = parser.position();
        let token = match parser.next_including_whitespace_and_comments() {
            Ok(token) => token.clone(),
            Err(err) if matches!(err.kind, BasicParseErrorKind::EndOfInput) => return Ok(()),
            Err(err) => return Err(err.into()),
        };

        match token {
            Token::WhiteSpace(_) | Token::Comment(_) => out.space(),
            Token::Semicolon => out.semicolon(),
            Token::BadUrl(_) => {
                // `url({{ image }})` is a bad URL to the tokenizer but fine once rendered.
                let raw = parser.slice_from(start);
                if !has_template_tag(raw) {
                    return Err(parser.new_custom_error(Rejected::BadUrl));
                }
                out.push(raw, depth);
            }
            Token::BadString(_) => return Err(parser.new_custom_error(Rejected::BadString)),
            Token::CurlyBracketBlock => {
                out.push("{", depth);
                parser.parse_nested_block(|nested| write_tokens(nested, out, depth + 1))?;
                out.push("}", depth);
            }
            Token::ParenthesisBlock => {
                out.push("(", depth);
                parser.parse_nested_block(|nested| write_tokens(nested, out, depth + 1))?;
                out.push(")", depth);
            }
            Token::SquareBracketBlock => {
                out.push("[", depth);
                parser.parse_nested_block(|nested| write_tokens(nested, out, depth + 1))?;
                out.push("]", depth);
            }
            Token::Function(_) => {
                out.push(&token.to_css_string(), depth);
                parser.parse_nested_block(|nested| write_tokens(nested, out, depth + 1))?;
                out.push(")", depth);
            }
            other => out.push(&other.to_css_string(), depth),
        }
    }
}

fn has_template_tag(css: &str) -> bool {
    css.contains("{{") || css.contains("{%")
}

struct Output {
    css: String,
    pending_space: bool,
    pending_semicolon: bool,
}

impl Output {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            css: String::with_capacity(capacity),
            pending_space: false,
            pending_semicolon: false,
        }
    }

    fn space(&mut self) {
        self.pending_space = true;
    }

    fn semicolon(&mut self) {
        self.pending_semicolon = true;
        self.pending_space = false;
    }

    fn push(&mut self, text: &str, depth: usize) {
        let Some(first) = text.chars().next() else {
            return;
        };

        if self.pending_semicolon {
            self.pending_semicolon = false;
            self.pending_space = false;
            if first != '}' {
                self.css.push(';');
            }
        }

        if self.pending_space {
            self.pending_space = false;
            if let Some(last) = self.css.chars().next_back() {
                if !is_tight(last, first, depth) {
                    self.css.push(' ');
                }
            }
        }

        self.css.push_str(text);
    }

    fn finish(mut self) -> String {
        if self.pending_semicolon {
            self.css.push(';');
        }
        self.css
    }
}

/// Whether whitespace between `last` and `next` can be removed.
fn is_tight(last: char, next: char, depth: usize) -> bool {
    const AROUND: &[char] = &['{', '}', ';', ',', '>'];
    AROUND.contains(&last)
        || AROUND.contains(&next)
        || last == '('
        || last == ':'
        || next == ')'
        || (next == ':' && depth > 0)
}
