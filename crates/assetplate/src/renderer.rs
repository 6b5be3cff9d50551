//! The flat renderer: one registry fed by any number of directory roots.
//!
//! ```rust,no_run
//! use assetplate::Renderer;
//!
//! let renderer = Renderer::new();
//! renderer.load("templates")?;
//!
//! let page = renderer.render("index.html", "Hello world")?;
//! let style = renderer.render("button.css", &())?;
//! # Ok::<(), assetplate::Error>(())
//! ```
//!
//! # Concurrency
//!
//! Every method takes `&self`. Executes read a snapshot of the registry
//! without locking and never observe a half-built registry: `load` and
//! `reload` build a replacement off to the side and publish it in one step,
//! and only when the whole build succeeded. Writers are serialized among
//! themselves.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use arc_swap::ArcSwap;
use serde::Serialize;

use crate::config::RendererConfig;
use crate::error::Error;
use crate::loader::Loader;
use crate::registry::Registry;

/// Renders templates loaded from directory trees.
#[derive(Debug)]
pub struct Renderer {
    config: RendererConfig,
    loader: Loader,
    /// Roots in the order they were first loaded. Also the writer lock.
    roots: Mutex<Vec<PathBuf>>,
    registry: ArcSwap<Registry>,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer {
    /// Creates an empty renderer with the default configuration.
    pub fn new() -> Self {
        Self::build(RendererConfig::default())
    }

    /// Creates an empty renderer.
    ///
    /// # Errors
    ///
    /// [`Error::Config`] if the configuration does not pass
    /// [`RendererConfig::validate`].
    pub fn with_config(config: RendererConfig) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: RendererConfig) -> Self {
        Self {
            loader: Loader::new(&config),
            registry: ArcSwap::from_pointee(Registry::new(config.undefined)),
            roots: Mutex::new(Vec::new()),
            config,
        }
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Loads every file under `root` on top of what is already loaded.
    ///
    /// Returns the number of files loaded from this root. On error nothing is
    /// published, but a root that exists stays recorded so a later
    /// [`reload`](Self::reload) retries it.
    pub fn load(&self, root: impl AsRef<Path>) -> Result<usize, Error> {
        let root = root.as_ref();
        if !root.exists() {
            return Err(Error::NotFound {
                path: root.to_path_buf(),
            });
        }

        let mut roots = self.lock_roots();
        roots.push(root.to_path_buf());

        let mut next = Registry::clone(&self.registry.load_full());
        let count = self.loader.load_tree(&mut next, root)?;
        tracing::debug!(root = %root.display(), files = count, "loaded template root");
        self.publish(next);
        Ok(count)
    }

    /// Rebuilds the registry from every recorded root, in load order.
    ///
    /// The rebuilt registry replaces the live one only if every root loads;
    /// otherwise the error is returned and the previous templates keep
    /// serving. Returns the number of files loaded.
    pub fn reload(&self) -> Result<usize, Error> {
        let roots = self.lock_roots();

        let mut next = Registry::new(self.config.undefined);
        let mut count = 0;
        for root in roots.iter() {
            count += self.loader.load_tree(&mut next, root)?;
        }

        tracing::info!(roots = roots.len(), files = count, "reloaded templates");
        self.publish(next);
        Ok(count)
    }

    /// Renders `name` with `data` into `writer`.
    ///
    /// With live reload enabled this reloads every root first.
    pub fn execute<W, S>(&self, writer: W, name: &str, data: &S) -> Result<(), Error>
    where
        W: io::Write,
        S: Serialize + ?Sized,
    {
        if self.config.live_reload {
            tracing::warn!(template = name, "live reload enabled, reloading before render");
            self.reload()?;
        }
        self.registry.load().execute(writer, name, data)
    }

    /// Renders `name` with `data` into a string.
    pub fn render<S: Serialize + ?Sized>(&self, name: &str, data: &S) -> Result<String, Error> {
        let mut out = Vec::new();
        self.execute(&mut out, name, data)?;
        Ok(String::from_utf8_lossy(&out).into_owned())
    }

    /// Recorded roots in load order.
    pub fn roots(&self) -> Vec<PathBuf> {
        self.lock_roots().clone()
    }

    /// The currently published registry.
    pub fn snapshot(&self) -> Arc<Registry> {
        self.registry.load_full()
    }

    fn publish(&self, registry: Registry) {
        tracing::debug!(templates = registry.len(), "publishing registry");
        self.registry.store(Arc::new(registry));
    }

    fn lock_roots(&self) -> MutexGuard<'_, Vec<PathBuf>> {
        // The registry is only replaced after a complete build, so a panic
        // while holding the lock leaves nothing inconsistent behind.
        self.roots.lock().unwrap_or_else(|e| e.into_inner())
    }
}
