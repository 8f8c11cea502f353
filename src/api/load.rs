use std::fs;
use std::path::Path;

use tracing::{debug, info};

use super::types::Manifest;
use crate::error::{GenError, Result};

/// Load a service manifest from a YAML or JSON file.
///
/// The format is chosen by extension (`.json` is JSON, anything else YAML).
/// Method paths are normalized on load.
pub fn load_manifest(path: &Path) -> Result<Manifest> {
    let data = fs::read_to_string(path).map_err(|e| GenError::io(path, e))?;
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    debug!(path = %path.display(), json = is_json, "Loading manifest");
    let manifest = parse_manifest(&data, is_json).map_err(|message| GenError::Manifest {
        path: path.to_path_buf(),
        message,
    })?;
    info!(
        path = %path.display(),
        services = manifest.services.len(),
        "Loaded manifest"
    );
    Ok(manifest)
}

/// Parse manifest text, normalizing every method.
pub fn parse_manifest(data: &str, is_json: bool) -> std::result::Result<Manifest, String> {
    let mut manifest: Manifest = if is_json {
        serde_json::from_str(data).map_err(|e| e.to_string())?
    } else {
        serde_yaml::from_str(data).map_err(|e| e.to_string())?
    };
    for service in &mut manifest.services {
        for method in &mut service.methods {
            method.normalize();
        }
    }
    Ok(manifest)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use std::io::Write;

    const YAML: &str = r#"
services:
  - name: user
    package: user
    methods:
      - name: GetUser
        path: api/user/:id
        verb: get
      - name: CreateUser
        path: /api/user
        verb: POST
        handler_package: demo/biz/handler/admin
"#;

    #[test]
    fn test_parse_yaml_normalizes() {
        let manifest = parse_manifest(YAML, false).unwrap();
        let methods = &manifest.services[0].methods;
        assert_eq!(methods[0].path, "/api/user/:id");
        assert_eq!(methods[0].verb.as_str(), "GET");
        assert_eq!(methods[1].handler_package.as_deref(), Some("demo/biz/handler/admin"));
    }

    #[test]
    fn test_parse_json() {
        let json = r#"{"services":[{"name":"ping","package":"ping","methods":[{"name":"Ping","path":"/ping","verb":"any"}]}]}"#;
        let manifest = parse_manifest(json, true).unwrap();
        assert!(manifest.services[0].methods[0].verb.is_any());
    }

    #[test]
    fn test_load_manifest_reports_path_on_error() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "services: [not: valid: yaml").unwrap();
        let err = load_manifest(file.path()).unwrap_err();
        assert!(matches!(err, GenError::Manifest { .. }));
    }

    #[test]
    fn test_load_manifest_missing_file_is_io() {
        let err = load_manifest(Path::new("/nonexistent/routegen.yaml")).unwrap_err();
        assert!(matches!(err, GenError::Io { .. }));
    }
}
