//! Named template sets loaded from glob patterns.
//!
//! Each set owns its own registry, built from an ordered list of globs
//! relative to a shared base directory. Sets are independent: loading or
//! reloading one never touches another, and a failed reload leaves the set
//! exactly as it was.
//!
//! ```rust,no_run
//! use assetplate::TemplateSets;
//!
//! let sets = TemplateSets::new("site");
//! sets.load("pages", &["pages/*.html", "partials/**/*.html"])?;
//! sets.load("feeds", &["feeds/*.xml"])?;
//!
//! let home = sets.render("pages", "pages/home.html", &serde_json::json!({"title": "Home"}))?;
//! # Ok::<(), assetplate::Error>(())
//! ```

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use arc_swap::ArcSwap;
use serde::Serialize;

use crate::config::RendererConfig;
use crate::error::Error;
use crate::loader::Loader;
use crate::registry::Registry;

/// One named group of templates.
#[derive(Debug, Clone)]
pub struct TemplateSet {
    name: String,
    globs: Vec<String>,
    registry: Registry,
}

impl TemplateSet {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The patterns this set was loaded from, in order.
    pub fn globs(&self) -> &[String] {
        &self.globs
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}

/// A collection of independently reloadable template sets.
#[derive(Debug)]
pub struct TemplateSets {
    base: PathBuf,
    config: RendererConfig,
    loader: Loader,
    writer: Mutex<()>,
    sets: ArcSwap<HashMap<String, Arc<TemplateSet>>>,
}

impl TemplateSets {
    /// Creates an empty collection resolving globs under `base`.
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self::build(base.into(), RendererConfig::default())
    }

    /// Like [`new`](Self::new), with a validated configuration.
    pub fn with_config(base: impl Into<PathBuf>, config: RendererConfig) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self::build(base.into(), config))
    }

    fn build(base: PathBuf, config: RendererConfig) -> Self {
        Self {
            base,
            loader: Loader::new(&config),
            writer: Mutex::new(()),
            sets: ArcSwap::from_pointee(HashMap::new()),
            config,
        }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Builds set `name` from `globs`, replacing any set of that name.
    ///
    /// Returns the number of files loaded. On error the previous set of that
    /// name, if any, is kept.
    pub fn load<S: AsRef<str>>(&self, name: &str, globs: &[S]) -> Result<usize, Error> {
        let globs: Vec<String> = globs.iter().map(|g| g.as_ref().to_string()).collect();
        let _writer = self.lock_writer();
        self.rebuild(name, globs)
    }

    /// Rebuilds set `name` from the globs it was loaded with.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownSet`] if no set of that name was loaded. Any load
    /// error leaves the set as it was.
    pub fn reload(&self, name: &str) -> Result<usize, Error> {
        let _writer = self.lock_writer();
        let globs = self
            .sets
            .load()
            .get(name)
            .map(|set| set.globs.clone())
            .ok_or_else(|| Error::UnknownSet(name.to_string()))?;

        let count = self.rebuild(name, globs)?;
        tracing::info!(set = name, files = count, "reloaded template set");
        Ok(count)
    }

    /// Renders `template` from set `name` into `writer`.
    ///
    /// With live reload enabled the set is reloaded first.
    pub fn execute<W, S>(&self, name: &str, writer: W, template: &str, data: &S) -> Result<(), Error>
    where
        W: io::Write,
        S: Serialize + ?Sized,
    {
        if self.config.live_reload {
            tracing::warn!(set = name, template, "live reload enabled, reloading before render");
            self.reload(name)?;
        }
        let set = self.get(name).ok_or_else(|| Error::UnknownSet(name.to_string()))?;
        set.registry.execute(writer, template, data)
    }

    /// Renders `template` from set `name` into a string.
    pub fn render<S: Serialize + ?Sized>(&self, name: &str, template: &str, data: &S) -> Result<String, Error> {
        let mut out = Vec::new();
        self.execute(name, &mut out, template, data)?;
        Ok(String::from_utf8_lossy(&out).into_owned())
    }

    /// Loaded set names, sorted.
    pub fn set_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.sets.load().keys().cloned().collect();
        names.sort();
        names
    }

    /// The currently published set `name`.
    pub fn get(&self, name: &str) -> Option<Arc<TemplateSet>> {
        self.sets.load().get(name).cloned()
    }

    /// Caller must hold the writer lock.
    fn rebuild(&self, name: &str, globs: Vec<String>) -> Result<usize, Error> {
        let mut registry = Registry::new(self.config.undefined);
        let count = self.loader.load_globs(&mut registry, &self.base, &globs)?;

        let set = Arc::new(TemplateSet {
            name: name.to_string(),
            globs,
            registry,
        });
        let mut sets = HashMap::clone(&self.sets.load_full());
        sets.insert(name.to_string(), set);
        tracing::debug!(set = name, files = count, "publishing template set");
        self.sets.store(Arc::new(sets));
        Ok(count)
    }

    fn lock_writer(&self) -> MutexGuard<'_, ()> {
        self.writer.lock().unwrap_or_else(|e| e.into_inner())
    }
}
