//! Arena-backed route tree.
//!
//! Nodes live in a single `Vec` and refer to each other by [`NodeId`]. The
//! parent link is a plain index used for prefix computation and full-path
//! reconstruction only; all mutation goes through [`RouteTree`] itself.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use super::namer::NodeNames;
use super::path::{join_segments, segment_text, sort_key, split_segments};
use crate::api::{HttpVerb, Method};
use crate::error::{GenError, Result};
use crate::naming::RunContext;

/// Index of a node inside its [`RouteTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);

    pub fn index(self) -> usize {
        self.0
    }
}

/// Handler of a leaf: `<alias>.<name>` imported from `package`.
///
/// `alias` stays `None` until [`RouteTree::bind_handler_aliases`] runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HandlerRef {
    pub package: String,
    pub alias: Option<String>,
    pub name: String,
    /// Whether the package came from the method itself rather than the
    /// service default. Explicit packages are inherited by same-named
    /// methods and by routes nested below.
    pub explicit: bool,
}

impl HandlerRef {
    pub fn qualified(&self) -> String {
        match &self.alias {
            Some(alias) => format!("{alias}.{}", self.name),
            None => self.name.clone(),
        }
    }
}

/// One path segment in the tree.
#[derive(Debug, Clone)]
pub struct RouteNode {
    segment: String,
    verb: Option<HttpVerb>,
    handler: Option<HandlerRef>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    names: Option<NodeNames>,
}

impl RouteNode {
    fn new(segment: String, parent: Option<NodeId>) -> Self {
        Self {
            segment,
            verb: None,
            handler: None,
            parent,
            children: Vec::new(),
            names: None,
        }
    }

    /// Segment text including its leading `/`.
    pub fn segment(&self) -> &str {
        &self.segment
    }

    pub fn verb(&self) -> Option<&HttpVerb> {
        self.verb.as_ref()
    }

    pub fn handler(&self) -> Option<&HandlerRef> {
        self.handler.as_ref()
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Names assigned by the scope namer, `None` until the tree is named.
    pub fn names(&self) -> Option<&NodeNames> {
        self.names.as_ref()
    }

    /// A pure group node carries no verb.
    pub fn is_group(&self) -> bool {
        self.verb.is_none()
    }
}

/// A registered route, as listed by [`RouteTree::routes`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteEntry {
    pub path: String,
    pub verb: HttpVerb,
    pub handler: String,
}

/// Trie of path segments built from a service's method list.
#[derive(Debug, Clone)]
pub struct RouteTree {
    nodes: Vec<RouteNode>,
    sort_children: bool,
}

impl RouteTree {
    /// Create an empty tree. With `sort_children` set, siblings are kept in
    /// the deterministic order after every insertion.
    pub fn new(sort_children: bool) -> Self {
        Self {
            nodes: vec![RouteNode::new("/".to_string(), None)],
            sort_children,
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    pub fn node(&self, id: NodeId) -> &RouteNode {
        &self.nodes[id.0]
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when nothing but the root exists.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    pub fn is_sorted(&self) -> bool {
        self.sort_children
    }

    /// Insert one method, reusing the longest existing prefix.
    ///
    /// Returns the id of the leaf carrying the method's verb and handler.
    /// Methods without an explicit handler package start out on
    /// `default_package`; inherited packages and import aliases are settled
    /// later by [`Self::bind_handler_aliases`].
    ///
    /// # Errors
    ///
    /// - [`GenError::EmptyPath`] when the method has no path
    /// - [`GenError::DuplicateRoute`] when `(path, verb)` is already present
    pub fn insert(&mut self, method: &Method, default_package: &str) -> Result<NodeId> {
        if method.path.is_empty() {
            return Err(GenError::EmptyPath {
                method: method.name.clone(),
            });
        }
        let segments = split_segments(&method.path);
        let (nearest, matched) = self.find_nearest(&segments, &method.verb);
        if matched == segments.len() {
            return Err(GenError::DuplicateRoute {
                path: method.path.clone(),
                verb: method.verb.to_string(),
            });
        }

        let handler = HandlerRef {
            package: method
                .handler_package
                .clone()
                .unwrap_or_else(|| default_package.to_string()),
            alias: None,
            name: method.name.clone(),
            explicit: method.handler_package.is_some(),
        };
        let mut cur = nearest;
        let last = segments.len() - 1;
        for (offset, segment) in segments[matched..].iter().enumerate() {
            let id = NodeId(self.nodes.len());
            let mut node = RouteNode::new(segment_text(segment), Some(cur));
            if matched + offset == last {
                node.verb = Some(method.verb.clone());
                node.handler = Some(handler.clone());
            }
            self.nodes.push(node);
            self.nodes[cur.0].children.push(id);
            if self.sort_children {
                self.sort_siblings(cur);
            }
            cur = id;
        }

        debug!(
            path = %method.path,
            verb = %method.verb,
            handler = %handler.name,
            reused = matched,
            "Inserted route"
        );
        Ok(cur)
    }

    /// Walk down from the root along `segments`.
    ///
    /// Intermediate segments match by exact text. In sort mode only group
    /// nodes are descended into, which makes the shape independent of the
    /// insertion order; otherwise a group is preferred and a leaf with the
    /// same text is accepted. The final segment must also match `verb`.
    ///
    /// Returns the deepest matched node and the number of matched segments;
    /// `matched == segments.len()` means the route already exists.
    pub fn find_nearest(&self, segments: &[&str], verb: &HttpVerb) -> (NodeId, usize) {
        let mut cur = NodeId::ROOT;
        let mut matched = 0;
        while matched < segments.len() {
            let text = segment_text(segments[matched]);
            let is_final = matched + 1 == segments.len();
            let next = if is_final {
                self.find_child(cur, |n| {
                    n.segment == text && n.verb.as_ref().is_some_and(|v| v.matches(verb.as_str()))
                })
            } else {
                self.find_child(cur, |n| n.segment == text && n.is_group()).or_else(|| {
                    if self.sort_children {
                        None
                    } else {
                        self.find_child(cur, |n| n.segment == text)
                    }
                })
            };
            match next {
                Some(id) => {
                    cur = id;
                    matched += 1;
                }
                None => break,
            }
        }
        (cur, matched)
    }

    /// Re-sort the children of every node.
    pub fn sort_all(&mut self) {
        for idx in 0..self.nodes.len() {
            self.sort_siblings(NodeId(idx));
        }
    }

    /// Reconstruct the full path of a node from its ancestor chain.
    pub fn full_path(&self, id: NodeId) -> String {
        let mut chain: Vec<&str> = self
            .ancestors(id)
            .filter(|n| *n != NodeId::ROOT)
            .map(|n| self.nodes[n.0].segment.as_str())
            .collect();
        chain.reverse();
        join_segments(chain)
    }

    /// `id` followed by its ancestors up to the root.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(Some(id), move |n| self.nodes[n.0].parent)
    }

    /// Pre-order depth-first listing of `(depth, node)`, root first.
    pub fn walk(&self) -> Vec<(usize, NodeId)> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![(0, NodeId::ROOT)];
        while let Some((depth, id)) = stack.pop() {
            order.push((depth, id));
            for child in self.nodes[id.0].children.iter().rev() {
                stack.push((depth + 1, *child));
            }
        }
        order
    }

    /// Every registered route in depth-first order.
    pub fn routes(&self) -> Vec<RouteEntry> {
        self.walk()
            .into_iter()
            .filter_map(|(_, id)| {
                let node = &self.nodes[id.0];
                let verb = node.verb.clone()?;
                Some(RouteEntry {
                    path: self.full_path(id),
                    verb,
                    handler: node.handler.as_ref().map(HandlerRef::qualified).unwrap_or_default(),
                })
            })
            .collect()
    }

    /// Indented dump of the tree, including assigned names when present.
    pub fn render_outline(&self) -> String {
        let mut out = String::new();
        for (depth, id) in self.walk() {
            let node = &self.nodes[id.0];
            out.push_str(&"  ".repeat(depth));
            out.push_str(&node.segment);
            if let (Some(verb), Some(handler)) = (&node.verb, &node.handler) {
                out.push_str(&format!(" [{verb}] -> {}", handler.qualified()));
            }
            if let Some(names) = &node.names {
                out.push_str(&format!("  ({})", names.role));
            }
            out.push('\n');
        }
        out
    }

    pub(crate) fn set_names(&mut self, id: NodeId, names: NodeNames) {
        self.nodes[id.0].names = Some(names);
    }

    fn find_child(&self, parent: NodeId, pred: impl Fn(&RouteNode) -> bool) -> Option<NodeId> {
        self.nodes[parent.0]
            .children
            .iter()
            .copied()
            .find(|c| pred(&self.nodes[c.0]))
    }

    /// Settle every leaf's handler package and bind its import alias.
    ///
    /// Runs once the tree is complete, walking it depth-first, so the
    /// result depends on the tree alone and not on the order methods were
    /// inserted in. A leaf without an explicit package takes the package of
    /// the first explicit leaf with the same method name, else that of its
    /// nearest explicit ancestor, else keeps the service default.
    ///
    /// # Errors
    ///
    /// [`GenError::RegistryExhaustion`] if no alias can be allocated.
    pub fn bind_handler_aliases(&mut self, run: &mut RunContext) -> Result<()> {
        let order = self.walk();

        let mut by_method: HashMap<String, String> = HashMap::new();
        for (_, id) in &order {
            if let Some(h) = self.nodes[id.0].handler.as_ref().filter(|h| h.explicit) {
                by_method.entry(h.name.clone()).or_insert_with(|| h.package.clone());
            }
        }

        for (_, id) in order {
            let Some(handler) = self.nodes[id.0].handler.as_ref() else {
                continue;
            };
            let package = if handler.explicit {
                handler.package.clone()
            } else {
                by_method
                    .get(&handler.name)
                    .cloned()
                    .or_else(|| self.explicit_ancestor_package(id))
                    .unwrap_or_else(|| handler.package.clone())
            };
            let alias = run.resolve_alias(&package)?;
            if let Some(handler) = self.nodes[id.0].handler.as_mut() {
                handler.package = package;
                handler.alias = Some(alias);
            }
        }
        Ok(())
    }

    fn explicit_ancestor_package(&self, id: NodeId) -> Option<String> {
        self.ancestors(id)
            .skip(1)
            .find_map(|a| self.nodes[a.0].handler.as_ref().filter(|h| h.explicit))
            .map(|h| h.package.clone())
    }

    fn sort_siblings(&mut self, parent: NodeId) {
        let mut children = std::mem::take(&mut self.nodes[parent.0].children);
        children.sort_by(|a, b| compare_siblings(&self.nodes[a.0], &self.nodes[b.0]));
        self.nodes[parent.0].children = children;
    }
}

/// Groups first, then stripped segment text, then verb, then raw text.
fn compare_siblings(a: &RouteNode, b: &RouteNode) -> Ordering {
    a.verb
        .is_some()
        .cmp(&b.verb.is_some())
        .then_with(|| sort_key(&a.segment).cmp(sort_key(&b.segment)))
        .then_with(|| a.verb.cmp(&b.verb))
        .then_with(|| a.segment.cmp(&b.segment))
}
