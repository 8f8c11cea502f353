//! # Generator Module
//!
//! Turns named route trees into Hertz router source and merges that source
//! into a project that may already hold generated and hand-edited files.
//!
//! ## Overview
//!
//! For every service the generator produces or updates three files:
//!
//! - **`<router_dir>/<service>.go`** - the router itself, regenerated from the tree
//! - **`<router_dir>/middleware.go`** - one stub per middleware hook; existing
//!   stubs are kept, missing ones are appended
//! - **`<router_root>/register.go`** - the central registration file; the
//!   router package is added to its imports and a `Register(r)` call is
//!   spliced after the insert-point marker
//!
//! ## Architecture
//!
//! ```text
//! ServiceDefinition → RouteTree → ScopeNamer → TemplateSet → IncrementalMerger → GenerationOutput
//! ```
//!
//! Generation never writes to disk. It reads the project through a
//! [`FileSystem`] and returns a [`GenerationOutput`]; [`persist`] writes it
//! afterwards. A fatal error therefore leaves the target directory untouched.
//!
//! ## Usage
//!
//! ```rust
//! use routegen::api::{Method, ServiceDefinition};
//! use routegen::config::GeneratorConfig;
//! use routegen::generator::{Generator, MemoryFileSystem, TemplateSet};
//!
//! # fn main() -> routegen::Result<()> {
//! let config = GeneratorConfig { module: "demo".into(), ..Default::default() };
//! let templates = TemplateSet::builtin()?;
//! let fs = MemoryFileSystem::new();
//! let service = ServiceDefinition::new("user", "user", vec![Method::new("GetUser", "/user/:id", "GET")]);
//!
//! let output = Generator::new(&config, &templates, &fs).generate(&[service])?;
//! assert_eq!(output.files.len(), 3);
//! # Ok(())
//! # }
//! ```
//!
//! ## Template Customization
//!
//! Built-in templates live in `templates/` and are compiled in. Set
//! `template_dir` in `routegen.toml` to a directory holding `router.go`,
//! `register.go`, `middleware.go` or `middleware_single.go` to replace them.

mod fs;
mod merge;
mod project;
mod templates;

pub use fs::{FileSystem, MemoryFileSystem, OsFileSystem};
pub use merge::{
    collect_hooks, merge_import, merge_middleware_stubs, merge_registration, registration_line, MergeOutcome,
    IMPORT_ANCHOR, INSERT_POINT_MARKER,
};
pub use project::{build_service_tree, persist, GeneratedFile, GenerationOutput, Generator};
pub use templates::*;
