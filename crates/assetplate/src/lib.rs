//! # assetplate - Template Asset Pipeline
//!
//! `assetplate` loads a tree of mixed-format templates (HTML, CSS, JavaScript,
//! JSON, XML, plain text), minifies each file according to its MIME type,
//! compiles it under its path relative to the tree root, and renders templates
//! by name against caller data.
//!
//! ## Core Concepts
//!
//! - [`Renderer`]: one registry fed by any number of directory roots
//! - [`TemplateSets`]: independently reloadable named sets built from globs
//! - [`Registry`]: an immutable snapshot of compiled templates
//! - [`ContentClass`]: HTML templates auto-escape interpolated values, every
//!   other class renders verbatim
//! - [`RendererConfig`]: minification, live reload, collision and undefined
//!   variable handling
//!
//! ## Quick Start
//!
//! ```rust
//! use assetplate::Renderer;
//!
//! let dir = tempfile::tempdir().unwrap();
//! std::fs::write(
//!     dir.path().join("greeting.html"),
//!     "<p>Hello, {{ this }}!</p>",
//! ).unwrap();
//! std::fs::write(
//!     dir.path().join("button.css"),
//!     "button { border: solid red 3px; }",
//! ).unwrap();
//!
//! let renderer = Renderer::new();
//! renderer.load(dir.path()).unwrap();
//!
//! let greeting = renderer.render("greeting.html", "<world>").unwrap();
//! assert!(greeting.contains("Hello, &lt;world&gt;!"));
//! assert_eq!(
//!     renderer.render("button.css", &()).unwrap(),
//!     "button{border:solid red 3px}",
//! );
//! ```
//!
//! ## Template Data
//!
//! Data is anything that implements `Serialize`. Maps and structs become the
//! root context, so their fields are used directly (`{{ title }}`). The whole
//! value is also available as `{{ this }}`, which is the only way to reach
//! data that is not a map, such as a plain string.
//!
//! ## Reloading
//!
//! [`Renderer::reload`] and [`TemplateSets::reload`] rebuild from the recorded
//! sources and swap the result in only when the rebuild succeeds. Renders
//! running concurrently keep the snapshot they started with.

pub mod config;
pub mod engine;
pub mod error;
pub mod loader;
pub mod mime;
pub mod registry;
pub mod renderer;
pub mod sets;

pub use config::{CollisionPolicy, Profile, RendererConfig, UndefinedMode};
pub use engine::{root_context, Namespace, ROOT_KEY};
pub use error::Error;
pub use loader::{expand_globs, walk_tree, Loader, SourceFile};
pub use mime::{mime_for_extension, mime_for_path, ContentClass};
pub use registry::Registry;
pub use renderer::Renderer;
pub use sets::{TemplateSet, TemplateSets};

pub use assetplate_minify::{MimeMatcher, Minifier, MinifyError};
