use std::collections::HashSet;
use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::error::{GenError, Result};

/// One of the independent namespaces identifiers are drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NameScope {
    /// Group scope variables and group middleware hooks.
    Group,
    /// Per-handler middleware hooks.
    Handler,
    /// Handler package import aliases.
    Alias,
    /// Router package import aliases in the central register file.
    Router,
}

impl fmt::Display for NameScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NameScope::Group => "group",
            NameScope::Handler => "handler",
            NameScope::Alias => "alias",
            NameScope::Router => "router",
        })
    }
}

/// The three name sets used within one generation run.
#[derive(Debug, Default, Clone)]
pub struct NameRegistry {
    group: HashSet<String>,
    handler: HashSet<String>,
    alias: HashSet<String>,
    router: HashSet<String>,
}

impl NameRegistry {
    pub fn contains(&self, scope: NameScope, name: &str) -> bool {
        self.set(scope).contains(name)
    }

    pub fn len(&self, scope: NameScope) -> usize {
        self.set(scope).len()
    }

    pub fn is_empty(&self, scope: NameScope) -> bool {
        self.set(scope).is_empty()
    }

    fn set(&self, scope: NameScope) -> &HashSet<String> {
        match scope {
            NameScope::Group => &self.group,
            NameScope::Handler => &self.handler,
            NameScope::Alias => &self.alias,
            NameScope::Router => &self.router,
        }
    }

    fn set_mut(&mut self, scope: NameScope) -> &mut HashSet<String> {
        match scope {
            NameScope::Group => &mut self.group,
            NameScope::Handler => &mut self.handler,
            NameScope::Alias => &mut self.alias,
            NameScope::Router => &mut self.router,
        }
    }
}

/// Hands out identifiers that are unique within a registry.
///
/// A free candidate is returned unchanged. A taken (or empty) candidate gets
/// the first free integer suffix, counting from `0`: `user` → `user0` →
/// `user1`. Suffixes are never stacked (`user00` is never produced).
///
/// Allocations are permanent for the lifetime of the allocator, which is one
/// generation run.
///
/// ```rust
/// use routegen::naming::{NameScope, UniqueNameAllocator};
///
/// let mut names = UniqueNameAllocator::new();
/// assert_eq!(names.allocate(NameScope::Group, "user").unwrap(), "user");
/// assert_eq!(names.allocate(NameScope::Group, "user").unwrap(), "user0");
/// // Registries are independent.
/// assert_eq!(names.allocate(NameScope::Alias, "user").unwrap(), "user");
/// ```
#[derive(Debug, Default, Clone)]
pub struct UniqueNameAllocator {
    registry: NameRegistry,
}

impl UniqueNameAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a unique name for `candidate` in `scope`.
    pub fn allocate(&mut self, scope: NameScope, candidate: &str) -> Result<String> {
        self.allocate_avoiding(scope, candidate, &[])
    }

    /// Allocate in `scope`, also treating names taken in `avoid` as taken.
    ///
    /// The result is recorded in `scope` only. Callers that emit one
    /// identifier into two namespaces pair this with [`Self::reserve`].
    pub fn allocate_avoiding(
        &mut self,
        scope: NameScope,
        candidate: &str,
        avoid: &[NameScope],
    ) -> Result<String> {
        let name = if !candidate.is_empty() && self.is_free(scope, candidate, avoid) {
            candidate.to_string()
        } else {
            self.first_free_suffix(scope, candidate, avoid)?
        };
        if name != candidate {
            debug!(%scope, candidate, allocated = %name, "Name collision resolved with suffix");
        }
        self.registry.set_mut(scope).insert(name.clone());
        Ok(name)
    }

    /// Record `name` as taken without checking for collisions.
    pub fn reserve(&mut self, scope: NameScope, name: &str) {
        self.registry.set_mut(scope).insert(name.to_string());
    }

    pub fn is_taken(&self, scope: NameScope, name: &str) -> bool {
        self.registry.contains(scope, name)
    }

    pub fn registry(&self) -> &NameRegistry {
        &self.registry
    }

    fn is_free(&self, scope: NameScope, name: &str, avoid: &[NameScope]) -> bool {
        !self.registry.contains(scope, name) && avoid.iter().all(|s| !self.registry.contains(*s, name))
    }

    fn first_free_suffix(&self, scope: NameScope, candidate: &str, avoid: &[NameScope]) -> Result<String> {
        (0..=u64::MAX)
            .map(|i| format!("{candidate}{i}"))
            .find(|name| self.is_free(scope, name, avoid))
            .ok_or_else(|| GenError::RegistryExhaustion {
                scope,
                candidate: candidate.to_string(),
            })
    }
}
