//! # Router Module
//!
//! Builds the hierarchical route tree a generated router file is rendered
//! from.
//!
//! ## Overview
//!
//! - [`path`] tokenizes route paths into segments
//! - [`RouteTree`] deduplicates a flat method list into a trie of segments,
//!   reusing shared prefixes and keeping siblings in a deterministic order
//! - [`ScopeNamer`] walks the finished tree once and assigns every node a
//!   unique group scope and middleware hook name
//! - [`RouteTree::bind_handler_aliases`] then settles handler packages and
//!   their import aliases
//!
//! ## Example
//!
//! ```rust
//! use routegen::api::Method;
//! use routegen::naming::RunContext;
//! use routegen::router::{RouteTree, ScopeNamer};
//!
//! # fn main() -> routegen::Result<()> {
//! let mut run = RunContext::new();
//! let mut tree = RouteTree::new(true);
//! tree.insert(&Method::new("GetUser", "/api/user/:id", "GET"), "demo/biz/handler/user")?;
//! tree.insert(&Method::new("CreateUser", "/api/user", "POST"), "demo/biz/handler/user")?;
//! ScopeNamer::new(false).name_tree(&mut tree, &mut run)?;
//! tree.bind_handler_aliases(&mut run)?;
//!
//! let routes = tree.routes();
//! assert_eq!(routes.len(), 2);
//! assert_eq!(routes[0].path, "/api/user/:id");
//! assert_eq!(routes[0].handler, "user.GetUser");
//! # Ok(())
//! # }
//! ```
//!
//! ## Ordering
//!
//! In sort mode, intermediate segments only descend into group nodes and
//! siblings are re-sorted after every insertion, so any insertion order of
//! the same methods yields the same tree. Aliases are bound afterwards in
//! tree order, so they are order independent as well.

mod namer;
pub mod path;
mod tree;

pub use namer::{HookStyle, NodeNames, NodeRole, ScopeNamer};
pub use path::{normalize_path, split_segments};
pub use tree::{HandlerRef, NodeId, RouteEntry, RouteNode, RouteTree};
