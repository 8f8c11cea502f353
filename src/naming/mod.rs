//! # Naming Module
//!
//! Identifier normalization and run-scoped uniqueness for everything the
//! generator emits: group scope variables, middleware hooks and handler
//! package import aliases.
//!
//! All state lives in a [`RunContext`] that is created once per generation
//! invocation and threaded through every tree build. Two independent runs
//! never share names.

mod alias;
mod allocator;
mod ident;

pub use alias::HandlerAliasBinder;
pub use allocator::{NameRegistry, NameScope, UniqueNameAllocator};
pub use ident::{base_name, file_stem, to_identifier, to_middleware_name, to_var_name};

use crate::error::Result;

/// Scope name of the router root group, reserved before any tree is named.
pub const ROOT_SCOPE: &str = "root";

/// Packages the built-in templates import under their own names
/// (`.../pkg/app` and `.../pkg/app/server`).
pub const FIXED_IMPORTS: &[&str] = &["app", "server"];

/// Per-invocation naming state shared by every service in the run.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub names: UniqueNameAllocator,
    pub aliases: HandlerAliasBinder,
}

impl Default for RunContext {
    fn default() -> Self {
        Self::new()
    }
}

impl RunContext {
    pub fn new() -> Self {
        let mut names = UniqueNameAllocator::new();
        names.reserve(NameScope::Group, ROOT_SCOPE);
        for fixed in FIXED_IMPORTS {
            names.reserve(NameScope::Alias, fixed);
            names.reserve(NameScope::Router, fixed);
        }
        Self {
            names,
            aliases: HandlerAliasBinder::new(),
        }
    }

    /// Resolve (or reuse) the import alias of a handler package.
    pub fn resolve_alias(&mut self, package: &str) -> Result<String> {
        self.aliases.resolve(&mut self.names, package)
    }

    /// Alias of a router package in the central register file.
    ///
    /// `imported` lists the `(alias, package)` pairs the file already
    /// imports. A package imported there keeps its alias; otherwise a fresh
    /// alias is allocated that none of those imports use.
    pub fn resolve_router_alias(&mut self, package: &str, candidate: &str, imported: &[(String, String)]) -> Result<String> {
        if let Some((alias, _)) = imported.iter().find(|(_, path)| path == package) {
            return Ok(alias.clone());
        }
        for (alias, _) in imported {
            self.names.reserve(NameScope::Router, alias);
        }
        self.names.allocate(NameScope::Router, candidate)
    }
}
