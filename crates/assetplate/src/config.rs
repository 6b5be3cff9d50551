//! Renderer configuration.
//!
//! [`RendererConfig`] can be built in code with the chained setters, or read
//! from YAML:
//!
//! ```rust
//! use assetplate::{CollisionPolicy, Profile, RendererConfig};
//!
//! let config = RendererConfig::from_yaml(r#"
//! profile: development
//! live_reload: true
//! on_collision: error
//! "#).unwrap();
//!
//! assert!(config.minify);
//! assert_eq!(config.profile, Profile::Development);
//! assert_eq!(config.on_collision, CollisionPolicy::Error);
//! ```
//!
//! # Live reload
//!
//! With `live_reload` on, every execute first reloads the sources it renders
//! from. This re-reads and recompiles files on each request and is meant for
//! editing templates locally. It is refused under [`Profile::Production`],
//! which is the default profile.

use serde::Deserialize;

use crate::error::Error;

/// Deployment profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    Development,
    #[default]
    Production,
}

/// What to do when two source files produce the same template name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
    /// Later file replaces the earlier one silently.
    Overwrite,
    /// Later file replaces the earlier one and a warning is logged.
    #[default]
    Warn,
    /// The load fails with [`Error::NameCollision`].
    Error,
}

/// How templates treat variables that are not in the context.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UndefinedMode {
    /// Using an undefined value is a render error.
    #[default]
    Strict,
    /// Undefined values render as empty and are falsy.
    Lenient,
}

/// Options shared by [`Renderer`](crate::Renderer) and
/// [`TemplateSets`](crate::TemplateSets).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RendererConfig {
    /// Minify sources by MIME type before compiling them.
    pub minify: bool,
    /// Reload before every execute. Development only.
    pub live_reload: bool,
    pub profile: Profile,
    pub on_collision: CollisionPolicy,
    pub undefined: UndefinedMode,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            minify: true,
            live_reload: false,
            profile: Profile::default(),
            on_collision: CollisionPolicy::default(),
            undefined: UndefinedMode::default(),
        }
    }
}

impl RendererConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a configuration from YAML. Missing keys take their defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self, Error> {
        serde_yaml::from_str(yaml).map_err(|e| Error::Config(e.to_string()))
    }

    pub fn minify(mut self, enabled: bool) -> Self {
        self.minify = enabled;
        self
    }

    pub fn live_reload(mut self, enabled: bool) -> Self {
        self.live_reload = enabled;
        self
    }

    pub fn profile(mut self, profile: Profile) -> Self {
        self.profile = profile;
        self
    }

    pub fn on_collision(mut self, policy: CollisionPolicy) -> Self {
        self.on_collision = policy;
        self
    }

    pub fn undefined(mut self, mode: UndefinedMode) -> Self {
        self.undefined = mode;
        self
    }

    /// Shorthand for a development profile with live reload on.
    pub fn development() -> Self {
        Self::default()
            .profile(Profile::Development)
            .live_reload(true)
    }

    /// Rejects combinations that must not reach a running renderer.
    pub fn validate(&self) -> Result<(), Error> {
        if self.live_reload && self.profile == Profile::Production {
            return Err(Error::Config(
                "live_reload reloads templates on every render and cannot be \
                 enabled with the production profile"
                    .to_string(),
            ));
        }
        Ok(())
    }
}
