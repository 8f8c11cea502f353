//! # Generator Configuration
//!
//! Settings are read from a TOML file (conventionally `routegen.toml` at the
//! project root), then environment variables, then CLI flags, each layer
//! overriding the previous one.
//!
//! ```toml
//! module = "example.com/demo"
//! router_dir = "biz/router"
//! handler_dir = "biz/handler"
//! sort_router = true
//! snake_style_middleware = false
//! # template_dir = "tpl"
//! # disabled_templates = ["middleware.go"]
//! ```
//!
//! ## Environment Variables
//!
//! - `ROUTEGEN_SORT_ROUTER` - `true`/`false`
//! - `ROUTEGEN_SNAKE_MIDDLEWARE` - `true`/`false`

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::api::ServiceDefinition;
use crate::error::{GenError, Result};

/// Default configuration file name, looked up in the output directory.
pub const CONFIG_FILE_NAME: &str = "routegen.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Import path of the target Go module.
    pub module: String,
    /// Router root, relative to the project root.
    pub router_dir: PathBuf,
    /// Handler root, relative to the module.
    pub handler_dir: String,
    /// Keep siblings in deterministic order.
    pub sort_router: bool,
    /// Name middleware hooks `<prefix>_mw` instead of `<name>Mw`.
    pub snake_style_middleware: bool,
    /// Directory with template overrides.
    pub template_dir: Option<PathBuf>,
    /// Template names never emitted nor merged.
    pub disabled_templates: Vec<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            module: String::new(),
            router_dir: PathBuf::from("biz/router"),
            handler_dir: "biz/handler".to_string(),
            sort_router: true,
            snake_style_middleware: false,
            template_dir: None,
            disabled_templates: Vec::new(),
        }
    }
}

/// Where a service's generated files live and how they are imported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetLayout {
    /// Directory holding `register.go`.
    pub router_root: PathBuf,
    /// Directory holding the service's router and `middleware.go`.
    pub router_dir: PathBuf,
    /// Import path of the router package.
    pub router_package: String,
    /// Import path of the default handler package.
    pub handler_package: String,
}

impl GeneratorConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path).map_err(|e| GenError::io(path, e))?;
        let config = Self::from_toml_str(&data, path)?;
        debug!(path = %path.display(), ?config, "Loaded generator config");
        Ok(config)
    }

    pub fn from_toml_str(data: &str, path: &Path) -> Result<Self> {
        toml::from_str(data).map_err(|e| GenError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Load `routegen.toml` from `dir` if present, defaults otherwise.
    pub fn discover(dir: &Path) -> Result<Self> {
        let candidate = dir.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            Self::load(&candidate)
        } else {
            Ok(Self::default())
        }
    }

    /// Apply `ROUTEGEN_*` environment overrides.
    pub fn apply_env(self) -> Self {
        self.apply_env_with(|key| env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup.
    pub fn apply_env_with(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(v) = read_bool(&lookup, "ROUTEGEN_SORT_ROUTER") {
            self.sort_router = v;
        }
        if let Some(v) = read_bool(&lookup, "ROUTEGEN_SNAKE_MIDDLEWARE") {
            self.snake_style_middleware = v;
        }
        self
    }

    pub fn layout_for(&self, service: &ServiceDefinition) -> TargetLayout {
        let package = service.package.trim_matches('/');
        let router_root_import = slash_path(&self.router_dir);
        TargetLayout {
            router_root: self.router_dir.clone(),
            router_dir: self.router_dir.join(package),
            router_package: join_import(&[&self.module, &router_root_import, package]),
            handler_package: join_import(&[&self.module, &self.handler_dir, package]),
        }
    }
}

fn read_bool(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<bool> {
    let raw = lookup(key)?;
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => {
            warn!(key, value = %raw, "Ignoring invalid boolean");
            None
        }
    }
}

fn slash_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

fn join_import(parts: &[&str]) -> String {
    parts
        .iter()
        .map(|p| p.trim_matches('/'))
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = GeneratorConfig::default();
        assert_eq!(config.router_dir, PathBuf::from("biz/router"));
        assert!(config.sort_router);
        assert!(!config.snake_style_middleware);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = GeneratorConfig::from_toml_str(
            "module = \"example.com/demo\"\nsnake_style_middleware = true\n",
            Path::new("routegen.toml"),
        )
        .unwrap();
        assert_eq!(config.module, "example.com/demo");
        assert!(config.snake_style_middleware);
        assert_eq!(config.handler_dir, "biz/handler");
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = GeneratorConfig::from_toml_str("sort_router = \"maybe\"", Path::new("routegen.toml")).unwrap_err();
        assert!(matches!(err, GenError::Config { .. }));
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [("ROUTEGEN_SORT_ROUTER", "false"), ("ROUTEGEN_SNAKE_MIDDLEWARE", "bogus")]
            .into_iter()
            .collect();
        let config = GeneratorConfig::default().apply_env_with(|k| vars.get(k).map(|v| v.to_string()));
        assert!(!config.sort_router);
        assert!(!config.snake_style_middleware);
    }

    #[test]
    fn test_layout_for_nested_package() {
        let config = GeneratorConfig {
            module: "example.com/demo".to_string(),
            ..Default::default()
        };
        let service = ServiceDefinition::new("user", "api/user", Vec::new());
        let layout = config.layout_for(&service);
        assert_eq!(layout.router_root, PathBuf::from("biz/router"));
        assert_eq!(layout.router_dir, PathBuf::from("biz/router/api/user"));
        assert_eq!(layout.router_package, "example.com/demo/biz/router/api/user");
        assert_eq!(layout.handler_package, "example.com/demo/biz/handler/api/user");
    }

    #[test]
    fn test_layout_without_module() {
        let service = ServiceDefinition::new("ping", "ping", Vec::new());
        let layout = GeneratorConfig::default().layout_for(&service);
        assert_eq!(layout.router_package, "biz/router/ping");
    }

    #[test]
    fn test_discover_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(GeneratorConfig::discover(dir.path()).unwrap(), GeneratorConfig::default());
        fs::write(dir.path().join(CONFIG_FILE_NAME), "sort_router = false\n").unwrap();
        assert!(!GeneratorConfig::discover(dir.path()).unwrap().sort_router);
    }
}
