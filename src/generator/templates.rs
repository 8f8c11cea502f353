use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

use minijinja::Environment;
use serde::Serialize;
use tracing::info;

use crate::error::{GenError, Result};
use crate::router::{NodeId, RouteTree};

pub const ROUTER_TPL: &str = "router.go";
pub const REGISTER_TPL: &str = "register.go";
pub const MIDDLEWARE_TPL: &str = "middleware.go";
pub const MIDDLEWARE_SINGLE_TPL: &str = "middleware_single.go";

const BUILTIN_TEMPLATES: [(&str, &str); 4] = [
    (ROUTER_TPL, include_str!("../../templates/router.go.j2")),
    (REGISTER_TPL, include_str!("../../templates/register.go.j2")),
    (MIDDLEWARE_TPL, include_str!("../../templates/middleware.go.j2")),
    (MIDDLEWARE_SINGLE_TPL, include_str!("../../templates/middleware_single.go.j2")),
];

/// Named templates used to render generated files.
///
/// Built-in templates are compiled into the binary. A template directory may
/// override any of them with a file of the same name (`router.go`, ...).
#[derive(Debug)]
pub struct TemplateSet {
    env: Environment<'static>,
    disabled: HashSet<String>,
}

impl TemplateSet {
    pub fn builtin() -> Result<Self> {
        Self::with_overrides(None, &[])
    }

    /// Load the built-in templates, replacing those found in `dir`.
    pub fn with_overrides(dir: Option<&Path>, disabled: &[String]) -> Result<Self> {
        let mut env = Environment::new();
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.set_keep_trailing_newline(true);

        for (name, builtin) in BUILTIN_TEMPLATES {
            let override_path = dir.map(|d| d.join(name)).filter(|p| p.is_file());
            let source = match override_path {
                Some(path) => {
                    info!(template = name, path = %path.display(), "Using template override");
                    fs::read_to_string(&path).map_err(|e| GenError::io(&path, e))?
                }
                None => builtin.to_string(),
            };
            env.add_template_owned(name.to_string(), source)
                .map_err(|source| GenError::Template {
                    name: name.to_string(),
                    source,
                })?;
        }

        Ok(Self {
            env,
            disabled: disabled.iter().cloned().collect(),
        })
    }

    /// Templates listed as disabled are neither rendered nor merged.
    pub fn is_disabled(&self, name: &str) -> bool {
        self.disabled.contains(name)
    }

    pub fn render<S: Serialize>(&self, name: &str, ctx: S) -> Result<String> {
        let template = self
            .env
            .get_template(name)
            .map_err(|_| GenError::TemplateNotFound {
                name: name.to_string(),
            })?;
        template.render(ctx).map_err(|source| GenError::Template {
            name: name.to_string(),
            source,
        })
    }
}

/// Handler package imported by a router file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HandlerImport {
    pub alias: String,
    pub import_path: String,
}

/// One node of the router template's route tree.
#[derive(Debug, Clone, Serialize)]
pub struct RouteView {
    /// Segment text, e.g. `/api` or `/:id`.
    pub path: String,
    /// Tabs preceding this node's statements.
    pub indent: String,
    pub parent_scope: String,
    /// Group variable declared by this node, if it has children.
    pub scope: Option<String>,
    pub group_hook_fn: String,
    pub handler_hook_fn: Option<String>,
    /// `GET`, `POST`, ... or `Any`; `None` for pure groups.
    pub route_fn: Option<String>,
    /// Qualified handler, `alias.Name`.
    pub handler: Option<String>,
    pub children: Vec<RouteView>,
}

/// Data for [`ROUTER_TPL`].
#[derive(Debug, Clone, Serialize)]
pub struct RouterTemplateData {
    pub package_name: String,
    pub handler_packages: Vec<HandlerImport>,
    pub root: RouteView,
}

impl RouterTemplateData {
    /// Build the view of a named tree.
    pub fn from_tree(tree: &RouteTree, package_name: &str) -> Self {
        Self {
            package_name: package_name.to_string(),
            handler_packages: handler_imports(tree),
            root: route_view(tree, tree.root(), 0),
        }
    }
}

/// Data for [`REGISTER_TPL`].
#[derive(Debug, Clone, Serialize)]
pub struct RegisterTemplateData {
    pub package_name: String,
    pub dep_alias: String,
    pub dep_package: String,
    pub insert_point: String,
}

/// Data for [`MIDDLEWARE_TPL`].
#[derive(Debug, Clone, Serialize)]
pub struct MiddlewareTemplateData {
    pub package_name: String,
    pub middlewares: Vec<String>,
}

/// Data for [`MIDDLEWARE_SINGLE_TPL`].
#[derive(Debug, Clone, Serialize)]
pub struct MiddlewareStubData {
    pub middleware_name: String,
}

/// Distinct handler packages referenced by the tree's leaves, ordered by alias.
pub fn handler_imports(tree: &RouteTree) -> Vec<HandlerImport> {
    let by_alias: BTreeMap<&str, &str> = tree
        .walk()
        .into_iter()
        .filter_map(|(_, id)| tree.node(id).handler())
        .filter_map(|h| Some((h.alias.as_deref()?, h.package.as_str())))
        .collect();
    by_alias
        .into_iter()
        .map(|(alias, import_path)| HandlerImport {
            alias: alias.to_string(),
            import_path: import_path.to_string(),
        })
        .collect()
}

fn route_view(tree: &RouteTree, id: NodeId, depth: usize) -> RouteView {
    let node = tree.node(id);
    let names = node.names();
    RouteView {
        path: node.segment().to_string(),
        indent: "\t".repeat(depth + 1),
        parent_scope: names.map(|n| n.parent_scope.clone()).unwrap_or_default(),
        scope: names.and_then(|n| n.role.scope().map(str::to_string)),
        group_hook_fn: names.map(|n| n.group_hook_fn()).unwrap_or_default(),
        handler_hook_fn: names.and_then(|n| n.handler_hook_fn()),
        route_fn: node.verb().map(|v| v.route_fn().to_string()),
        handler: node.handler().map(|h| h.qualified()),
        children: node
            .children()
            .iter()
            .map(|c| route_view(tree, *c, depth + 1))
            .collect(),
    }
}
