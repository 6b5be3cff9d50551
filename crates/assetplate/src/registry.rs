//! The compiled template store.
//!
//! A [`Registry`] owns at most one namespace per [`ContentClass`] plus the
//! class every loaded name was compiled into. Renderers never mutate a
//! registry that readers can see: they clone the published snapshot (or start
//! from an empty one), load into the copy, and publish the copy in one step.
//!
//! # Dispatch
//!
//! [`Registry::execute`] uses the class stored for the name at load time. A
//! name that was never loaded is classified by its extension only to decide
//! which error to report: [`Error::NamespaceEmpty`] when nothing of that class
//! was ever loaded, [`Error::TemplateNotFound`] otherwise.

use std::collections::BTreeMap;
use std::io;
use std::path::Path;

use serde::Serialize;

use crate::config::{CollisionPolicy, UndefinedMode};
use crate::engine::{root_context, Namespace};
use crate::error::Error;
use crate::mime::ContentClass;

/// Compiled templates split by content class.
#[derive(Debug, Clone)]
pub struct Registry {
    html: Option<Namespace>,
    other: Option<Namespace>,
    classes: BTreeMap<String, ContentClass>,
    undefined: UndefinedMode,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new(UndefinedMode::default())
    }
}

impl Registry {
    /// Creates a registry with no namespaces.
    pub fn new(undefined: UndefinedMode) -> Self {
        Self {
            html: None,
            other: None,
            classes: BTreeMap::new(),
            undefined,
        }
    }

    /// Compiles one template into the namespace for `class`.
    ///
    /// The namespace is created by its first template. `path` is only used
    /// for collision reporting.
    pub(crate) fn insert(
        &mut self,
        name: &str,
        class: ContentClass,
        source: String,
        path: &Path,
        policy: CollisionPolicy,
    ) -> Result<(), Error> {
        if let Some(previous) = self.classes.get(name) {
            match policy {
                CollisionPolicy::Overwrite => {}
                CollisionPolicy::Warn => tracing::warn!(
                    template = name,
                    path = %path.display(),
                    previous = %previous,
                    "template name already loaded, replacing it"
                ),
                CollisionPolicy::Error => {
                    return Err(Error::NameCollision {
                        name: name.to_string(),
                        path: path.to_path_buf(),
                    })
                }
            }
        }

        let undefined = self.undefined;
        let slot = match class {
            ContentClass::Html => &mut self.html,
            ContentClass::Other => &mut self.other,
        };
        match slot {
            Some(namespace) => namespace.add(name, source)?,
            None => {
                let mut namespace = Namespace::new(class, undefined);
                namespace.add(name, source)?;
                *slot = Some(namespace);
            }
        }
        self.classes.insert(name.to_string(), class);
        Ok(())
    }

    /// Renders `name` with `data` into `writer`.
    ///
    /// HTML templates escape every interpolated value. The output is written
    /// only once the template rendered completely.
    pub fn execute<W, S>(&self, writer: W, name: &str, data: &S) -> Result<(), Error>
    where
        W: io::Write,
        S: Serialize + ?Sized,
    {
        let class = self
            .classes
            .get(name)
            .copied()
            .unwrap_or_else(|| ContentClass::for_name(name));
        let namespace = self
            .namespace(class)
            .ok_or(Error::NamespaceEmpty { class })?;
        let context = root_context(data)?;
        namespace.render(name, &context, writer)
    }

    /// Renders `name` into a string.
    pub fn render<S: Serialize + ?Sized>(&self, name: &str, data: &S) -> Result<String, Error> {
        let mut out = Vec::new();
        self.execute(&mut out, name, data)?;
        Ok(String::from_utf8_lossy(&out).into_owned())
    }

    /// The namespace for a class, if any template of that class was loaded.
    pub fn namespace(&self, class: ContentClass) -> Option<&Namespace> {
        match class {
            ContentClass::Html => self.html.as_ref(),
            ContentClass::Other => self.other.as_ref(),
        }
    }

    pub fn has_namespace(&self, class: ContentClass) -> bool {
        self.namespace(class).is_some()
    }

    /// The class a name was compiled into.
    pub fn class_of(&self, name: &str) -> Option<ContentClass> {
        self.classes.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    /// Loaded template names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.classes.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tracing_test::traced_test;

    fn insert(registry: &mut Registry, name: &str, source: &str, policy: CollisionPolicy) -> Result<(), Error> {
        registry.insert(
            name,
            ContentClass::for_name(name),
            source.to_string(),
            &PathBuf::from(name),
            policy,
        )
    }

    #[test]
    fn test_empty_registry_reports_namespace_empty() {
        let registry = Registry::default();
        let err = registry.render("index.html", &()).unwrap_err();
        assert!(matches!(
            err,
            Error::NamespaceEmpty {
                class: ContentClass::Html
            }
        ));
        let err = registry.render("button.css", &()).unwrap_err();
        assert!(matches!(
            err,
            Error::NamespaceEmpty {
                class: ContentClass::Other
            }
        ));
    }

    #[test]
    fn test_missing_name_in_populated_namespace() {
        let mut registry = Registry::default();
        insert(&mut registry, "a.html", "a", CollisionPolicy::Warn).unwrap();
        assert!(matches!(
            registry.render("b.html", &()),
            Err(Error::TemplateNotFound { .. })
        ));
        // Only the HTML namespace exists.
        assert!(matches!(
            registry.render("b.css", &()),
            Err(Error::NamespaceEmpty { .. })
        ));
    }

    #[test]
    fn test_stored_class_drives_dispatch() {
        let mut registry = Registry::default();
        registry
            .insert(
                "widget",
                ContentClass::Html,
                "{{ this }}".into(),
                Path::new("widget"),
                CollisionPolicy::Warn,
            )
            .unwrap();

        assert_eq!(registry.class_of("widget"), Some(ContentClass::Html));
        assert_eq!(registry.render("widget", "<i>").unwrap(), "&lt;i&gt;");
    }

    #[test]
    fn test_names_sorted() {
        let mut registry = Registry::default();
        insert(&mut registry, "z.txt", "z", CollisionPolicy::Warn).unwrap();
        insert(&mut registry, "a.html", "a", CollisionPolicy::Warn).unwrap();
        let names: Vec<_> = registry.names().collect();
        assert_eq!(names, vec!["a.html", "z.txt"]);
        assert_eq!(registry.len(), 2);
        assert!(registry.has_namespace(ContentClass::Html));
        assert!(registry.has_namespace(ContentClass::Other));
    }

    #[test]
    fn test_collision_overwrite_last_wins() {
        let mut registry = Registry::default();
        insert(&mut registry, "a.txt", "first", CollisionPolicy::Overwrite).unwrap();
        insert(&mut registry, "a.txt", "second", CollisionPolicy::Overwrite).unwrap();
        assert_eq!(registry.render("a.txt", &()).unwrap(), "second");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    #[traced_test]
    fn test_collision_warn_logs() {
        let mut registry = Registry::default();
        insert(&mut registry, "a.txt", "first", CollisionPolicy::Warn).unwrap();
        insert(&mut registry, "a.txt", "second", CollisionPolicy::Warn).unwrap();
        assert_eq!(registry.render("a.txt", &()).unwrap(), "second");
        assert!(logs_contain("template name already loaded"));
    }

    #[test]
    fn test_collision_error_keeps_first() {
        let mut registry = Registry::default();
        insert(&mut registry, "a.txt", "first", CollisionPolicy::Error).unwrap();
        let err = insert(&mut registry, "a.txt", "second", CollisionPolicy::Error).unwrap_err();
        assert!(matches!(err, Error::NameCollision { .. }));
        assert_eq!(registry.render("a.txt", &()).unwrap(), "first");
    }

    #[test]
    fn test_failed_compile_is_not_recorded() {
        let mut registry = Registry::default();
        let err = insert(&mut registry, "bad.txt", "{% if %}", CollisionPolicy::Warn).unwrap_err();
        assert!(matches!(err, Error::TemplateSyntax { .. }));
        assert!(!registry.contains("bad.txt"));
        assert!(!registry.has_namespace(ContentClass::Other));
    }

    #[test]
    fn test_execution_error_writes_nothing() {
        let mut registry = Registry::default();
        insert(&mut registry, "p.txt", "before {{ missing.field }}", CollisionPolicy::Warn).unwrap();
        let mut out = Vec::new();
        let err = registry.execute(&mut out, "p.txt", &()).unwrap_err();
        assert!(matches!(err, Error::TemplateExecution { .. }));
        assert!(out.is_empty());
    }
}
