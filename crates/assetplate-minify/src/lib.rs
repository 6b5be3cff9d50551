//! # assetplate-minify
//!
//! A minifier table keyed by MIME type.
//!
//! [`Minifier`] holds an ordered list of rules. Each rule pairs a
//! [`MimeMatcher`] with a transform function; the first rule whose matcher
//! accepts a MIME type is the one used for it. Types that no rule accepts
//! pass through untouched.
//!
//! ```rust
//! use assetplate_minify::Minifier;
//!
//! let minifier = Minifier::standard();
//!
//! let css = minifier
//!     .minify("text/css", b"button { border: solid red 3px; min-width: 10em; }")
//!     .unwrap();
//! assert_eq!(&*css, b"button{border:solid red 3px;min-width:10em}");
//!
//! // No rule for plain text: the input comes back borrowed.
//! let text = minifier.minify("text/plain", b"  spaced  ").unwrap();
//! assert_eq!(&*text, b"  spaced  ");
//! ```
//!
//! ## Standard rules
//!
//! | Order | Matcher | Transform |
//! |-------|---------|-----------|
//! | 1 | `text/html` | [`html::minify`] |
//! | 2 | `text/css` | [`css::minify`] |
//! | 3 | `(application\|text)/(x-)?(java\|ecma)script` | [`js::minify`] |
//! | 4 | `*/json`, `*+json` | [`json::minify`] |
//! | 5 | `*/xml`, `*+xml` | [`xml::minify`] |
//!
//! MIME parameters such as `; charset=utf-8` are ignored when matching.

pub mod css;
mod error;
pub mod html;
pub mod js;
pub mod json;
pub mod xml;

use std::borrow::Cow;
use std::fmt;

pub use error::MinifyError;

/// A transform from raw bytes to minified bytes.
pub type MinifyFn = fn(&[u8]) -> Result<Vec<u8>, MinifyError>;

/// Decides whether a rule applies to a MIME type.
#[derive(Clone, Copy)]
pub enum MimeMatcher {
    /// Matches one MIME type exactly (ASCII case-insensitive).
    Exact(&'static str),
    /// Matches every MIME type the predicate accepts.
    ///
    /// The predicate receives the lowercased essence (no parameters).
    Predicate(fn(&str) -> bool),
}

impl MimeMatcher {
    /// Tests a MIME essence against this matcher.
    pub fn matches(&self, essence: &str) -> bool {
        match self {
            MimeMatcher::Exact(expected) => expected.eq_ignore_ascii_case(essence),
            MimeMatcher::Predicate(accepts) => accepts(essence),
        }
    }
}

impl fmt::Debug for MimeMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MimeMatcher::Exact(mime) => f.debug_tuple("Exact").field(mime).finish(),
            MimeMatcher::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

/// One entry of the minifier table.
#[derive(Clone, Copy)]
pub struct Rule {
    matcher: MimeMatcher,
    transform: MinifyFn,
}

impl Rule {
    /// The matcher this rule was registered with.
    pub fn matcher(&self) -> MimeMatcher {
        self.matcher
    }

    /// Runs the rule's transform.
    pub fn apply(&self, input: &[u8]) -> Result<Vec<u8>, MinifyError> {
        (self.transform)(input)
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("matcher", &self.matcher)
            .finish_non_exhaustive()
    }
}

/// Ordered table of minification rules.
#[derive(Debug, Clone, Default)]
pub struct Minifier {
    rules: Vec<Rule>,
}

impl Minifier {
    /// Creates an empty table. Every MIME type passes through.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a table with the HTML, CSS, JS, JSON and XML rules registered.
    pub fn standard() -> Self {
        let mut minifier = Self::new();
        minifier
            .add(MimeMatcher::Exact("text/html"), html::minify)
            .add(MimeMatcher::Exact("text/css"), css::minify)
            .add(MimeMatcher::Predicate(is_javascript), js::minify)
            .add(MimeMatcher::Predicate(is_json), json::minify)
            .add(MimeMatcher::Predicate(is_xml), xml::minify);
        minifier
    }

    /// Appends a rule. Earlier rules take precedence.
    pub fn add(&mut self, matcher: MimeMatcher, transform: MinifyFn) -> &mut Self {
        self.rules.push(Rule { matcher, transform });
        self
    }

    /// Returns the first rule accepting `mime`, if any.
    pub fn rule_for(&self, mime: &str) -> Option<&Rule> {
        let essence = essence(mime);
        if essence.is_empty() {
            return None;
        }
        self.rules.iter().find(|rule| rule.matcher.matches(&essence))
    }

    /// Minifies `input` according to its MIME type.
    ///
    /// Returns the input borrowed when no rule matches.
    pub fn minify<'a>(&self, mime: &str, input: &'a [u8]) -> Result<Cow<'a, [u8]>, MinifyError> {
        match self.rule_for(mime) {
            Some(rule) => rule.apply(input).map(Cow::Owned),
            None => Ok(Cow::Borrowed(input)),
        }
    }

    /// Number of registered rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if no rules are registered.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Strips parameters and surrounding whitespace, and lowercases.
fn essence(mime: &str) -> String {
    mime.split(';').next().unwrap_or("").trim().to_ascii_lowercase()
}

/// `^(application|text)/(x-)?(java|ecma)script$`
pub fn is_javascript(essence: &str) -> bool {
    let Some(subtype) = essence
        .strip_prefix("application/")
        .or_else(|| essence.strip_prefix("text/"))
    else {
        return false;
    };
    let subtype = subtype.strip_prefix("x-").unwrap_or(subtype);
    matches!(subtype, "javascript" | "ecmascript")
}

/// Any type ending in `/json` or `+json`.
pub fn is_json(essence: &str) -> bool {
    essence.ends_with("/json") || essence.ends_with("+json")
}

/// Any type ending in `/xml` or `+xml`.
pub fn is_xml(essence: &str) -> bool {
    essence.ends_with("/xml") || essence.ends_with("+xml")
}
