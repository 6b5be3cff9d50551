//! Template engine adapter.
//!
//! A [`Namespace`] is one MiniJinja environment configured for a single
//! [`ContentClass`]. HTML namespaces escape every interpolated value; other
//! namespaces never escape. All templates of a namespace live in the same
//! environment, which is what lets `{% include %}`, `{% extends %}` and
//! `{% import %}` find their siblings by name.
//!
//! HTML escaping replaces `&`, `<`, `>`, `"`, `'` and `+` with character
//! references (`&amp;`, `&lt;`, `&gt;`, `&#34;`, `&#39;`, `&#43;`) and NUL with
//! U+FFFD. `/` is left alone, so `</script>` renders as `&lt;/script&gt;`.
//! Spaces and `=` are not escaped: interpolations inside attribute values rely
//! on the value being quoted, which the HTML minifier guarantees.

use std::fmt::Write as _;
use std::io;

use minijinja::{
    escape_formatter, AutoEscape, Environment, ErrorKind, Output, State, UndefinedBehavior, Value,
};
use serde::Serialize;

use crate::config::UndefinedMode;
use crate::error::Error;
use crate::mime::ContentClass;

/// Name under which the whole data value is reachable from templates.
pub const ROOT_KEY: &str = "this";

/// A compiled template collection for one content class.
#[derive(Debug, Clone)]
pub struct Namespace {
    class: ContentClass,
    env: Environment<'static>,
    len: usize,
}

impl Namespace {
    /// Creates an empty namespace.
    pub fn new(class: ContentClass, undefined: UndefinedMode) -> Self {
        let mut env = Environment::new();
        match class {
            ContentClass::Html => {
                env.set_auto_escape_callback(|_| AutoEscape::Html);
                env.set_formatter(html_formatter);
            }
            ContentClass::Other => env.set_auto_escape_callback(|_| AutoEscape::None),
        }
        env.set_undefined_behavior(match undefined {
            UndefinedMode::Strict => UndefinedBehavior::Strict,
            UndefinedMode::Lenient => UndefinedBehavior::Lenient,
        });
        Self { class, env, len: 0 }
    }

    pub fn class(&self) -> ContentClass {
        self.class
    }

    /// Compiles `source` under `name`, replacing any template of that name.
    pub fn add(&mut self, name: &str, source: String) -> Result<(), Error> {
        let replacing = self.contains(name);
        self.env
            .add_template_owned(name.to_string(), source)
            .map_err(|e| Error::TemplateSyntax {
                name: name.to_string(),
                message: e.to_string(),
            })?;
        if !replacing {
            self.len += 1;
        }
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.env.get_template(name).is_ok()
    }

    /// Number of templates compiled into this namespace.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Renders `name` with `context` as its root and writes the output.
    ///
    /// Nothing is written when rendering fails.
    pub fn render<W: io::Write>(&self, name: &str, context: &Value, mut writer: W) -> Result<(), Error> {
        let template = self.env.get_template(name).map_err(|e| match e.kind() {
            ErrorKind::TemplateNotFound => Error::TemplateNotFound {
                name: name.to_string(),
            },
            _ => Error::TemplateExecution {
                name: name.to_string(),
                source: e,
            },
        })?;

        let execution_error = |source| Error::TemplateExecution {
            name: name.to_string(),
            source,
        };
        let output = template.render(context).map_err(execution_error)?;
        writer.write_all(output.as_bytes()).map_err(|e| {
            execution_error(
                minijinja::Error::new(ErrorKind::WriteFailure, "failed to write template output")
                    .with_source(e),
            )
        })
    }
}

/// Formats interpolated values in HTML namespaces.
fn html_formatter(out: &mut Output<'_>, state: &State<'_, '_>, value: &Value) -> Result<(), minijinja::Error> {
    if !matches!(state.auto_escape(), AutoEscape::Html)
        || value.is_safe()
        || value.is_undefined()
        || value.is_none()
    {
        return escape_formatter(out, state, value);
    }

    let text = value.to_string();
    let mut written = 0;
    for (at, byte) in text.bytes().enumerate() {
        let replacement = match byte {
            b'&' => "&amp;",
            b'<' => "&lt;",
            b'>' => "&gt;",
            b'"' => "&#34;",
            b'\'' => "&#39;",
            b'+' => "&#43;",
            b'\0' => "\u{FFFD}",
            _ => continue,
        };
        out.write_str(&text[written..at])?;
        out.write_str(replacement)?;
        written = at + 1;
    }
    out.write_str(&text[written..])?;
    Ok(())
}

/// Turns caller data into a template context.
///
/// Maps become the root context and are also reachable as `this`; any other
/// value is only reachable as `this`. A map that already has a `this` key
/// keeps it.
pub fn root_context<S: Serialize + ?Sized>(data: &S) -> Result<Value, Error> {
    let root = match serde_json::to_value(data)? {
        serde_json::Value::Object(mut map) => {
            if !map.contains_key(ROOT_KEY) {
                let this = serde_json::Value::Object(map.clone());
                map.insert(ROOT_KEY.to_string(), this);
            }
            map
        }
        other => {
            let mut map = serde_json::Map::new();
            map.insert(ROOT_KEY.to_string(), other);
            map
        }
    };
    Ok(Value::from_serialize(&root))
}
