//! Source discovery and the per-file load pipeline.
//!
//! Files are discovered either by walking a directory ([`walk_tree`]) or by
//! matching glob patterns under a base directory ([`expand_globs`]). Each
//! discovered file is named by its path relative to the root, with `/` as the
//! separator on every platform:
//!
//! | Root | File | Template name |
//! |------|------|---------------|
//! | `templates` | `templates/index.html` | `index.html` |
//! | `templates` | `templates/subdir/button.html` | `subdir/button.html` |
//!
//! [`Loader`] then runs each file through read → classify → minify → compile.
//! The first failure aborts the whole load; later files are not visited.

use std::borrow::Cow;
use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};

use assetplate_minify::Minifier;
use globset::{GlobBuilder, GlobMatcher};
use walkdir::WalkDir;

use crate::config::{CollisionPolicy, RendererConfig};
use crate::error::Error;
use crate::mime::{mime_for_path, ContentClass};
use crate::registry::Registry;

/// A discovered template file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Template name: the path relative to its root, `/`-separated.
    pub name: String,
    /// Path on disk.
    pub path: PathBuf,
}

/// Recursively lists every non-directory entry under `root`, sorted by name.
///
/// # Errors
///
/// [`Error::NotFound`] if `root` does not exist, [`Error::FileRead`] if part
/// of the tree cannot be read.
pub fn walk_tree(root: impl AsRef<Path>) -> Result<Vec<SourceFile>, Error> {
    let root = root.as_ref();
    if !root.exists() {
        return Err(Error::NotFound {
            path: root.to_path_buf(),
        });
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|e| Error::FileRead {
            path: e.path().unwrap_or(root).to_path_buf(),
            source: io::Error::from(e),
        })?;
        if entry.file_type().is_dir() {
            continue;
        }
        files.push(SourceFile {
            name: template_name(root, entry.path()),
            path: entry.into_path(),
        });
    }
    Ok(files)
}

/// Lists the files under `base` matched by `globs`.
///
/// Patterns are relative to `base` and use `/` separators; `*` stays within
/// one path segment and `**` crosses segments. Each pattern is expanded in
/// the order given, files already matched by an earlier pattern are skipped,
/// and directories never match.
pub fn expand_globs<S: AsRef<str>>(base: impl AsRef<Path>, globs: &[S]) -> Result<Vec<SourceFile>, Error> {
    let matchers = globs
        .iter()
        .map(|pattern| compile_glob(pattern.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;

    let candidates = walk_tree(base)?;
    let mut seen = HashSet::new();
    let mut files = Vec::new();

    for (pattern, matcher) in globs.iter().zip(&matchers) {
        let before = files.len();
        for file in &candidates {
            if matcher.is_match(&file.name) && seen.insert(file.name.as_str()) {
                files.push(file.clone());
            }
        }
        if files.len() == before {
            tracing::debug!(pattern = pattern.as_ref(), "glob matched no new files");
        }
    }
    Ok(files)
}

fn compile_glob(pattern: &str) -> Result<GlobMatcher, Error> {
    GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .map(|glob| glob.compile_matcher())
        .map_err(|source| Error::InvalidGlob {
            pattern: pattern.to_string(),
            source,
        })
}

fn template_name(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    if relative.as_os_str().is_empty() {
        // The root itself is a file.
        return path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
    }
    relative
        .components()
        .map(|part| part.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Runs discovered files through the load pipeline into a [`Registry`].
#[derive(Debug, Clone)]
pub struct Loader {
    minifier: Option<Minifier>,
    on_collision: CollisionPolicy,
}

impl Loader {
    /// Creates a loader; minification uses [`Minifier::standard`] when enabled.
    pub fn new(config: &RendererConfig) -> Self {
        Self {
            minifier: config.minify.then(Minifier::standard),
            on_collision: config.on_collision,
        }
    }

    /// Replaces the minifier table. `None` disables minification.
    pub fn with_minifier(mut self, minifier: Option<Minifier>) -> Self {
        self.minifier = minifier;
        self
    }

    /// Walks `root` and loads every file found. Returns the file count.
    pub fn load_tree(&self, registry: &mut Registry, root: &Path) -> Result<usize, Error> {
        let files = walk_tree(root)?;
        self.load_files(registry, &files)
    }

    /// Loads the files under `base` matched by `globs`. Returns the file count.
    pub fn load_globs<S: AsRef<str>>(
        &self,
        registry: &mut Registry,
        base: &Path,
        globs: &[S],
    ) -> Result<usize, Error> {
        let files = expand_globs(base, globs)?;
        self.load_files(registry, &files)
    }

    /// Loads files in order, stopping at the first error.
    pub fn load_files(&self, registry: &mut Registry, files: &[SourceFile]) -> Result<usize, Error> {
        for file in files {
            self.load_file(registry, file)?;
        }
        Ok(files.len())
    }

    fn load_file(&self, registry: &mut Registry, file: &SourceFile) -> Result<(), Error> {
        let raw = std::fs::read(&file.path).map_err(|source| Error::FileRead {
            path: file.path.clone(),
            source,
        })?;

        let mime = mime_for_path(&file.path);
        let content = match &self.minifier {
            Some(minifier) => minifier
                .minify(mime, &raw)
                .map_err(|source| Error::Minify {
                    name: file.name.clone(),
                    source,
                })?,
            None => Cow::Borrowed(raw.as_slice()),
        };

        let source = String::from_utf8(content.into_owned()).map_err(|e| Error::FileRead {
            path: file.path.clone(),
            source: io::Error::new(io::ErrorKind::InvalidData, e),
        })?;

        let class = ContentClass::from_mime(mime);
        tracing::debug!(
            template = %file.name,
            %class,
            bytes = source.len(),
            "loading template"
        );
        registry.insert(&file.name, class, source, &file.path, self.on_collision)
    }
}
