use std::collections::HashMap;

use tracing::debug;

use super::allocator::{NameScope, UniqueNameAllocator};
use super::ident::{base_name, to_identifier};
use crate::error::Result;

/// Maps handler package import paths to stable, unique import aliases.
///
/// The first resolution of a package allocates an alias from the package's
/// last path component. Later resolutions of the same package string return
/// the cached alias; any other package whose basename collides gets a
/// suffixed alias.
#[derive(Debug, Default, Clone)]
pub struct HandlerAliasBinder {
    table: HashMap<String, String>,
}

impl HandlerAliasBinder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolve(&mut self, names: &mut UniqueNameAllocator, package: &str) -> Result<String> {
        if let Some(alias) = self.table.get(package) {
            return Ok(alias.clone());
        }
        let candidate = to_identifier(base_name(package));
        let alias = names.allocate(NameScope::Alias, &candidate)?;
        debug!(package, alias = %alias, "Bound handler package alias");
        self.table.insert(package.to_string(), alias.clone());
        Ok(alias)
    }

    pub fn get(&self, package: &str) -> Option<&str> {
        self.table.get(package).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}
