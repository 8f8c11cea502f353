//! Scope and middleware hook naming for a completed route tree.

use std::fmt;

use serde::Serialize;
use tracing::debug;

use super::path::segment_label;
use super::tree::{NodeId, RouteTree};
use crate::error::Result;
use crate::naming::{to_middleware_name, to_var_name, NameScope, RunContext, UniqueNameAllocator, ROOT_SCOPE};

/// Naming style of middleware hook functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum HookStyle {
    /// `_apiMw`, candidates from the short segment label.
    #[default]
    Camel,
    /// `_api_user_mw`, candidates from the accumulated prefix label.
    /// Handler hooks keep the handler name as written (`_GetUser_mw`).
    Snake,
}

impl HookStyle {
    pub fn from_snake_flag(snake: bool) -> Self {
        if snake {
            HookStyle::Snake
        } else {
            HookStyle::Camel
        }
    }

    /// Hook function name for an emitted identifier.
    pub fn hook_fn(self, ident: &str) -> String {
        match self {
            HookStyle::Camel => format!("{ident}Mw"),
            HookStyle::Snake => format!("{ident}_mw"),
        }
    }
}

/// What a named node declares in the generated router.
///
/// All names are emitted identifiers (`root`, `_api`, `_getuser`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeRole {
    /// Shared path segment: declares a group scope with its own hook.
    Group { scope: String },
    /// Route that also has children: declares a group scope and a separate
    /// handler hook.
    Leaf { scope: String, handler_hook: String },
    /// Route without children: group and handler share one hook.
    UnifiedGroupLeaf { hook: String },
}

impl NodeRole {
    /// Group scope variable declared by this node, if any.
    pub fn scope(&self) -> Option<&str> {
        match self {
            NodeRole::Group { scope } | NodeRole::Leaf { scope, .. } => Some(scope.as_str()),
            NodeRole::UnifiedGroupLeaf { .. } => None,
        }
    }

    pub fn group_hook(&self) -> &str {
        match self {
            NodeRole::Group { scope } | NodeRole::Leaf { scope, .. } => scope.as_str(),
            NodeRole::UnifiedGroupLeaf { hook } => hook.as_str(),
        }
    }

    pub fn handler_hook(&self) -> Option<&str> {
        match self {
            NodeRole::Leaf { handler_hook, .. } => Some(handler_hook.as_str()),
            NodeRole::UnifiedGroupLeaf { hook } => Some(hook.as_str()),
            NodeRole::Group { .. } => None,
        }
    }
}

impl fmt::Display for NodeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeRole::Group { scope } => write!(f, "group {scope}"),
            NodeRole::Leaf { scope, handler_hook } => write!(f, "group {scope}, handler {handler_hook}"),
            NodeRole::UnifiedGroupLeaf { hook } => write!(f, "unified {hook}"),
        }
    }
}

/// Names attached to a node by [`ScopeNamer`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeNames {
    /// Scope variable of the enclosing group.
    pub parent_scope: String,
    /// Normalized labels of the ancestor chain joined with `_`.
    pub prefix_label: String,
    pub role: NodeRole,
    pub style: HookStyle,
}

impl NodeNames {
    pub fn group_hook_fn(&self) -> String {
        self.style.hook_fn(self.role.group_hook())
    }

    pub fn handler_hook_fn(&self) -> Option<String> {
        self.role.handler_hook().map(|h| self.style.hook_fn(h))
    }

    /// Every hook function this node needs a middleware stub for.
    pub fn hook_fns(&self) -> Vec<String> {
        match &self.role {
            NodeRole::Group { scope } => vec![self.style.hook_fn(scope)],
            NodeRole::Leaf { scope, handler_hook } => {
                vec![self.style.hook_fn(scope), self.style.hook_fn(handler_hook)]
            }
            NodeRole::UnifiedGroupLeaf { hook } => vec![self.style.hook_fn(hook)],
        }
    }
}

/// Assigns group scopes and middleware hooks in one pre-order pass.
///
/// The root is seeded as the `root` group. Every other node gets its names
/// from the run's [`UniqueNameAllocator`], so identifiers never repeat
/// within one generation run, across all services.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScopeNamer {
    style: HookStyle,
}

impl ScopeNamer {
    pub fn new(snake_style: bool) -> Self {
        Self {
            style: HookStyle::from_snake_flag(snake_style),
        }
    }

    pub fn style(&self) -> HookStyle {
        self.style
    }

    /// Name every node that has no names yet.
    pub fn name_tree(&self, tree: &mut RouteTree, run: &mut RunContext) -> Result<()> {
        for (_, id) in tree.walk() {
            if tree.node(id).names().is_some() {
                continue;
            }
            let names = if id == tree.root() {
                NodeNames {
                    parent_scope: ROOT_SCOPE.to_string(),
                    prefix_label: String::new(),
                    role: NodeRole::Group {
                        scope: ROOT_SCOPE.to_string(),
                    },
                    style: self.style,
                }
            } else {
                self.name_node(tree, id, &mut run.names)?
            };
            tree.set_names(id, names);
        }
        Ok(())
    }

    fn name_node(&self, tree: &RouteTree, id: NodeId, names: &mut UniqueNameAllocator) -> Result<NodeNames> {
        let node = tree.node(id);
        let parent_names = node.parent().and_then(|p| tree.node(p).names());
        let parent_scope = parent_names
            .and_then(|n| n.role.scope())
            .unwrap_or(ROOT_SCOPE)
            .to_string();
        let parent_prefix = parent_names.map(|n| n.prefix_label.as_str()).unwrap_or("");

        let label = to_middleware_name(segment_label(node.segment()));
        let prefix_label = if parent_prefix.is_empty() {
            label.clone()
        } else {
            format!("{parent_prefix}_{label}")
        };
        let group_candidate = match self.style {
            HookStyle::Camel => label,
            HookStyle::Snake => prefix_label.clone(),
        };
        let handler_candidate = node.handler().map(|h| match self.style {
            HookStyle::Camel => to_middleware_name(&h.name),
            HookStyle::Snake => to_var_name(&h.name),
        });

        let role = match handler_candidate {
            Some(candidate) if node.children().is_empty() => NodeRole::UnifiedGroupLeaf {
                hook: emitted(&self.allocate_unified(names, &candidate)?),
            },
            Some(candidate) => NodeRole::Leaf {
                scope: emitted(&names.allocate_avoiding(NameScope::Group, &group_candidate, &[NameScope::Handler])?),
                handler_hook: emitted(&names.allocate_avoiding(NameScope::Handler, &candidate, &[NameScope::Group])?),
            },
            None => NodeRole::Group {
                scope: emitted(&names.allocate_avoiding(NameScope::Group, &group_candidate, &[NameScope::Handler])?),
            },
        };
        debug!(path = %tree.full_path(id), role = %role, "Named route node");

        Ok(NodeNames {
            parent_scope,
            prefix_label,
            role,
            style: self.style,
        })
    }

    /// One name shared by a group hook and a handler hook, taken in both
    /// registries.
    fn allocate_unified(&self, names: &mut UniqueNameAllocator, candidate: &str) -> Result<String> {
        let (primary, secondary) = match self.style {
            HookStyle::Camel => (NameScope::Group, NameScope::Handler),
            HookStyle::Snake => (NameScope::Handler, NameScope::Group),
        };
        let name = names.allocate_avoiding(primary, candidate, &[secondary])?;
        names.reserve(secondary, &name);
        Ok(name)
    }
}

fn emitted(name: &str) -> String {
    format!("_{name}")
}
