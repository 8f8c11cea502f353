//! # routegen
//!
//! **routegen** builds routing and handler-registration code for
//! [Hertz](https://github.com/cloudwego/hertz) HTTP services from a flat list
//! of API methods, and merges it into a project directory that may already
//! contain previously generated and hand-edited files.
//!
//! ## Architecture
//!
//! - **[`api`]** - Methods, services and manifest loading
//! - **[`router`]** - Path tokenizer, arena route tree and scope namer
//! - **[`naming`]** - Identifier normalization, unique name allocation and
//!   handler package aliases
//! - **[`generator`]** - Templates, anchor-based file merging and the
//!   generation pipeline
//! - **[`config`]** - `routegen.toml` and environment overrides
//! - **[`logging`]** - tracing subscriber setup
//! - **[`cli`]** - the `routegen` command line
//!
//! ### Generation Flow
//!
//! ```text
//! methods ─▶ RouteTree::insert ─▶ ScopeNamer ─▶ alias binder ─▶ router template
//!                                     │               │
//!                                     └ name allocator┘
//!                                             │
//!                register.go / middleware.go ◀─ IncrementalMerger
//! ```
//!
//! One [`naming::RunContext`] spans a whole invocation, so names and
//! aliases are unique across every service generated together. Nothing is
//! written until generation has succeeded for all services.
//!
//! ## Quick Start
//!
//! ```rust
//! use routegen::api::{Method, ServiceDefinition};
//! use routegen::config::GeneratorConfig;
//! use routegen::generator::{Generator, MemoryFileSystem, TemplateSet};
//!
//! # fn main() -> routegen::Result<()> {
//! let config = GeneratorConfig::default();
//! let templates = TemplateSet::builtin()?;
//! let project = MemoryFileSystem::new();
//! let services = vec![ServiceDefinition::new(
//!     "user",
//!     "user",
//!     vec![
//!         Method::new("GetUser", "/api/user/:id", "GET"),
//!         Method::new("CreateUser", "/api/user", "POST"),
//!     ],
//! )];
//!
//! let output = Generator::new(&config, &templates, &project).generate(&services)?;
//! let router = output.file("biz/router/user/user.go".as_ref()).unwrap();
//! assert!(router.content.contains(r#"_api.POST("/user""#));
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod generator;
pub mod logging;
pub mod naming;
pub mod router;

pub use api::{load_manifest, HttpVerb, Method, ServiceDefinition};
pub use error::{GenError, Result};
pub use generator::{persist, GeneratedFile, GenerationOutput, Generator};
pub use router::{RouteTree, ScopeNamer};
