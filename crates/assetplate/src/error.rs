//! Error types for loading and rendering.
//!
//! Every public operation returns [`Error`]. Load-time kinds (`NotFound`,
//! `FileRead`, `Minify`, `TemplateSyntax`, `InvalidGlob`, `NameCollision`)
//! abort the load in progress; render-time kinds (`NamespaceEmpty`,
//! `TemplateNotFound`, `TemplateExecution`, `InvalidData`) describe a single
//! failed render.

use std::path::PathBuf;

use assetplate_minify::MinifyError;
use thiserror::Error;

use crate::mime::ContentClass;

/// Error type for all renderer operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A source root or glob base does not exist.
    #[error("template directory does not exist: {}", path.display())]
    NotFound { path: PathBuf },

    /// A discovered file could not be read (or walked to).
    #[error("failed to read template {}: {source}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The minifier rejected a file's content.
    #[error("failed to minify template \"{name}\": {source}")]
    Minify {
        name: String,
        #[source]
        source: MinifyError,
    },

    /// A file could not be compiled.
    #[error("syntax error in template \"{name}\": {message}")]
    TemplateSyntax { name: String, message: String },

    /// A glob pattern could not be parsed.
    #[error("invalid glob pattern \"{pattern}\": {source}")]
    InvalidGlob {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    /// Two sources produced the same template name under `CollisionPolicy::Error`.
    #[error("template \"{name}\" is defined more than once (latest: {})", path.display())]
    NameCollision { name: String, path: PathBuf },

    /// No template of this content class was ever loaded.
    #[error("no {class} templates loaded")]
    NamespaceEmpty { class: ContentClass },

    /// The namespace exists but holds no template with this name.
    #[error("template not found: \"{name}\"")]
    TemplateNotFound { name: String },

    /// The engine failed while rendering. Nothing was written to the output.
    #[error("failed to render template \"{name}\": {source}")]
    TemplateExecution {
        name: String,
        #[source]
        source: minijinja::Error,
    },

    /// The caller's data could not be turned into a template context.
    #[error("template data could not be serialized: {0}")]
    InvalidData(#[from] serde_json::Error),

    /// A template set name that was never loaded.
    #[error("unknown template set \"{0}\"")]
    UnknownSet(String),

    /// Rejected configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl Error {
    /// True for errors raised while loading or reloading sources.
    pub fn is_load_error(&self) -> bool {
        matches!(
            self,
            Error::NotFound { .. }
                | Error::FileRead { .. }
                | Error::Minify { .. }
                | Error::TemplateSyntax { .. }
                | Error::InvalidGlob { .. }
                | Error::NameCollision { .. }
        )
    }
}
