use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::fs::FileSystem;
use super::merge::{
    collect_hooks, imported_packages, merge_import, merge_middleware_stubs, merge_registration, MergeOutcome,
    INSERT_POINT_MARKER,
};
use super::templates::{
    MiddlewareTemplateData, RegisterTemplateData, RouterTemplateData, TemplateSet, MIDDLEWARE_SINGLE_TPL,
    MIDDLEWARE_TPL, REGISTER_TPL, ROUTER_TPL,
};
use crate::api::ServiceDefinition;
use crate::config::{GeneratorConfig, TargetLayout};
use crate::error::{GenError, Result};
use crate::naming::{file_stem, to_identifier, RunContext};
use crate::router::{RouteTree, ScopeNamer};

/// A file the caller must write, relative to the project root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub path: PathBuf,
    pub content: String,
    /// `true` when the file did not exist before this run.
    pub is_new_file: bool,
    pub template_name: String,
}

/// Everything one generation run produced.
#[derive(Debug, Default)]
pub struct GenerationOutput {
    pub files: Vec<GeneratedFile>,
    /// Recoverable conditions, currently only [`GenError::AlreadyRegistered`].
    pub warnings: Vec<GenError>,
}

impl GenerationOutput {
    pub fn file(&self, path: &Path) -> Option<&GeneratedFile> {
        self.files.iter().find(|f| f.path == path)
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Files produced earlier in the run, layered over the filesystem so later
/// merges see them.
#[derive(Debug, Default)]
struct PendingFiles {
    files: Vec<GeneratedFile>,
    index: HashMap<PathBuf, usize>,
}

impl PendingFiles {
    fn current<F: FileSystem>(&self, fs: &F, path: &Path) -> Result<Option<String>> {
        if let Some(&i) = self.index.get(path) {
            return Ok(Some(self.files[i].content.clone()));
        }
        if fs.exists(path) {
            return fs.read_to_string(path).map(Some);
        }
        Ok(None)
    }

    /// Record `content` for `path` unless it is what the file already holds.
    fn put<F: FileSystem>(&mut self, fs: &F, path: PathBuf, content: String, template: &str) -> Result<()> {
        if self.current(fs, &path)?.as_deref() == Some(content.as_str()) {
            debug!(path = %path.display(), "File unchanged");
            return Ok(());
        }
        match self.index.get(&path) {
            Some(&i) => self.files[i].content = content,
            None => {
                self.index.insert(path.clone(), self.files.len());
                self.files.push(GeneratedFile {
                    is_new_file: !fs.exists(&path),
                    path,
                    content,
                    template_name: template.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Build and name the route tree of one service.
pub fn build_service_tree(config: &GeneratorConfig, service: &ServiceDefinition, run: &mut RunContext) -> Result<RouteTree> {
    let layout = config.layout_for(service);
    let mut tree = RouteTree::new(config.sort_router);
    for method in &service.methods {
        tree.insert(method, &layout.handler_package)?;
    }
    ScopeNamer::new(config.snake_style_middleware).name_tree(&mut tree, run)?;
    tree.bind_handler_aliases(run)?;
    Ok(tree)
}

/// Runs route-tree construction and file merging for a set of services.
///
/// Generation is pure: it reads the target project through a [`FileSystem`]
/// and returns the files to write. Use [`persist`] once it succeeded.
pub struct Generator<'a, F: FileSystem> {
    config: &'a GeneratorConfig,
    templates: &'a TemplateSet,
    fs: &'a F,
}

impl<'a, F: FileSystem> Generator<'a, F> {
    pub fn new(config: &'a GeneratorConfig, templates: &'a TemplateSet, fs: &'a F) -> Self {
        Self { config, templates, fs }
    }

    /// Generate all services in one run.
    ///
    /// Names and aliases are unique across every service of the run. Any
    /// fatal error aborts the run and no output is returned.
    pub fn generate(&self, services: &[ServiceDefinition]) -> Result<GenerationOutput> {
        let mut run = RunContext::new();
        let mut pending = PendingFiles::default();
        let mut warnings = Vec::new();

        for service in services {
            let layout = self.config.layout_for(service);
            let tree = build_service_tree(self.config, service, &mut run)?;
            info!(
                service = %service.name,
                package = %service.package,
                routes = service.methods.len(),
                "Built route tree"
            );

            self.render_router(service, &layout, &tree, &mut pending)?;
            self.merge_middleware(&layout, &tree, &mut pending)?;
            if let Err(err) = self.merge_register(service, &layout, &mut run, &mut pending) {
                if err.is_fatal() {
                    return Err(err);
                }
                warn!(service = %service.name, error = %err, "Skipping registration");
                warnings.push(err);
            }
        }

        Ok(GenerationOutput {
            files: pending.files,
            warnings,
        })
    }

    fn render_router(
        &self,
        service: &ServiceDefinition,
        layout: &TargetLayout,
        tree: &RouteTree,
        pending: &mut PendingFiles,
    ) -> Result<()> {
        if self.templates.is_disabled(ROUTER_TPL) {
            return Ok(());
        }
        let path = layout.router_dir.join(format!("{}.go", file_stem(&service.name)));
        let data = RouterTemplateData::from_tree(tree, &go_package_name(&layout.router_dir));
        let content = self.templates.render(ROUTER_TPL, &data)?;
        pending.put(self.fs, path, content, ROUTER_TPL)
    }

    fn merge_middleware(&self, layout: &TargetLayout, tree: &RouteTree, pending: &mut PendingFiles) -> Result<()> {
        if self.templates.is_disabled(MIDDLEWARE_TPL) {
            return Ok(());
        }
        let path = layout.router_dir.join(MIDDLEWARE_TPL);
        let hooks = collect_hooks(tree);
        match pending.current(self.fs, &path)? {
            None => {
                let data = MiddlewareTemplateData {
                    package_name: go_package_name(&layout.router_dir),
                    middlewares: hooks,
                };
                let content = self.templates.render(MIDDLEWARE_TPL, &data)?;
                pending.put(self.fs, path, content, MIDDLEWARE_TPL)
            }
            Some(_) if self.templates.is_disabled(MIDDLEWARE_SINGLE_TPL) => Ok(()),
            Some(existing) => match merge_middleware_stubs(&existing, &hooks, self.templates)? {
                MergeOutcome::Patched(content) => pending.put(self.fs, path, content, MIDDLEWARE_TPL),
                MergeOutcome::Unchanged => Ok(()),
            },
        }
    }

    fn merge_register(
        &self,
        service: &ServiceDefinition,
        layout: &TargetLayout,
        run: &mut RunContext,
        pending: &mut PendingFiles,
    ) -> Result<()> {
        if self.templates.is_disabled(REGISTER_TPL) {
            return Ok(());
        }
        let path = layout.router_root.join(REGISTER_TPL);
        let existing = pending.current(self.fs, &path)?;
        let imported = existing.as_deref().map(imported_packages).unwrap_or_default();
        let alias = run.resolve_router_alias(&layout.router_package, &to_identifier(&service.package), &imported)?;
        let Some(existing) = existing else {
            let data = RegisterTemplateData {
                package_name: go_package_name(&layout.router_root),
                dep_alias: alias,
                dep_package: layout.router_package.clone(),
                insert_point: INSERT_POINT_MARKER.to_string(),
            };
            let content = self.templates.render(REGISTER_TPL, &data)?;
            return pending.put(self.fs, path, content, REGISTER_TPL);
        };

        let with_import = merge_import(&path, &existing, &alias, &layout.router_package)?.into_content(&existing);
        match merge_registration(&path, &with_import, &alias) {
            Ok(merged) => pending.put(self.fs, path, merged, REGISTER_TPL),
            Err(err) => {
                if !err.is_fatal() && with_import != existing {
                    pending.put(self.fs, path, with_import, REGISTER_TPL)?;
                }
                Err(err)
            }
        }
    }
}

/// Write every generated file below `root`, creating directories as needed.
///
/// Call only after [`Generator::generate`] succeeded.
pub fn persist(output: &GenerationOutput, root: &Path) -> Result<()> {
    for file in &output.files {
        let target = root.join(&file.path);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| GenError::io(parent, e))?;
        }
        fs::write(&target, &file.content).map_err(|e| GenError::io(&target, e))?;
        info!(
            path = %target.display(),
            new = file.is_new_file,
            template = %file.template_name,
            "Wrote file"
        );
    }
    Ok(())
}

fn go_package_name(dir: &Path) -> String {
    let base = dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    to_identifier(&base)
}
