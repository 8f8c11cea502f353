//! Anchor-based patching of previously generated files.
//!
//! Each merge computes the complete new content in memory. Nothing here
//! touches the filesystem, so a failed merge never leaves a half-written
//! file behind.

use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use super::templates::{MiddlewareStubData, TemplateSet, MIDDLEWARE_SINGLE_TPL};
use crate::error::{GenError, Result};
use crate::naming::base_name;
use crate::router::RouteTree;

/// Opening of the import block in a generated Go file.
pub const IMPORT_ANCHOR: &str = "import (\n";

/// Versioned marker registration lines are inserted after.
pub const INSERT_POINT_MARKER: &str = "//INSERT_POINT(routegen/v1): DO NOT DELETE THIS LINE!";

static INSERT_POINT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"//\s*INSERT_POINT\(routegen/v1\):\s*DO NOT DELETE THIS LINE!")
        .expect("insert-point regex should be valid")
});

static IMPORT_SPEC_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^\s*(?:([A-Za-z_][A-Za-z0-9_]*|\.)\s+)?"([^"]+)""#).expect("import spec regex should be valid")
});

/// Result of a merge step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The fragment was already present.
    Unchanged,
    /// The fragment was inserted; carries the full new content.
    Patched(String),
}

impl MergeOutcome {
    pub fn is_patched(&self) -> bool {
        matches!(self, MergeOutcome::Patched(_))
    }

    /// New content, or `original` when nothing changed.
    pub fn into_content(self, original: &str) -> String {
        match self {
            MergeOutcome::Patched(content) => content,
            MergeOutcome::Unchanged => original.to_string(),
        }
    }
}

/// Registration call emitted for a router package alias.
pub fn registration_line(alias: &str) -> String {
    format!("{alias}.Register(r)")
}

/// `(alias, package)` pairs of the file's `import (` block.
///
/// Unaliased imports are bound to the last component of their path.
pub fn imported_packages(content: &str) -> Vec<(String, String)> {
    let Some(start) = content.find(IMPORT_ANCHOR) else {
        return Vec::new();
    };
    content[start + IMPORT_ANCHOR.len()..]
        .lines()
        .take_while(|line| line.trim() != ")")
        .filter_map(|line| IMPORT_SPEC_REGEX.captures(line))
        .map(|caps| {
            let package = caps[2].to_string();
            let alias = caps
                .get(1)
                .map(|m| m.as_str().to_string())
                .unwrap_or_else(|| base_name(&package).to_string());
            (alias, package)
        })
        .collect()
}

/// Add `alias "package"` to the import block unless the package is imported.
///
/// # Errors
///
/// [`GenError::MalformedAnchor`] if the file has no `import (` block.
pub fn merge_import(path: &Path, content: &str, alias: &str, package: &str) -> Result<MergeOutcome> {
    if content.contains(&format!("\"{package}\"")) {
        debug!(path = %path.display(), package, "Import already present");
        return Ok(MergeOutcome::Unchanged);
    }
    let idx = content.find(IMPORT_ANCHOR).ok_or_else(|| GenError::MalformedAnchor {
        path: path.to_path_buf(),
        anchor: IMPORT_ANCHOR.trim_end().to_string(),
    })?;
    let at = idx + IMPORT_ANCHOR.len();
    let mut merged = String::with_capacity(content.len() + alias.len() + package.len() + 5);
    merged.push_str(&content[..at]);
    merged.push_str(&format!("\t{alias} \"{package}\"\n"));
    merged.push_str(&content[at..]);
    Ok(MergeOutcome::Patched(merged))
}

/// Splice `<alias>.Register(r)` after the insert-point marker.
///
/// # Errors
///
/// - [`GenError::AlreadyRegistered`] if the exact line is present
/// - [`GenError::MalformedAnchor`] if the marker is missing
pub fn merge_registration(path: &Path, content: &str, alias: &str) -> Result<String> {
    let line = registration_line(alias);
    if content.lines().any(|l| l.trim() == line) {
        return Err(GenError::AlreadyRegistered { line });
    }
    let anchor = INSERT_POINT_REGEX
        .find(content)
        .ok_or_else(|| GenError::MalformedAnchor {
            path: path.to_path_buf(),
            anchor: INSERT_POINT_MARKER.to_string(),
        })?;
    let at = anchor.end();
    let mut merged = String::with_capacity(content.len() + line.len() + 2);
    merged.push_str(&content[..at]);
    merged.push_str("\n\t");
    merged.push_str(&line);
    merged.push_str(&content[at..]);
    Ok(merged)
}

/// Append a stub for every hook the file does not define yet.
pub fn merge_middleware_stubs(content: &str, hooks: &[String], templates: &TemplateSet) -> Result<MergeOutcome> {
    let mut merged = content.to_string();
    let mut added = 0usize;
    for hook in hooks {
        if mentions_identifier(&merged, hook) {
            continue;
        }
        let stub = templates.render(
            MIDDLEWARE_SINGLE_TPL,
            MiddlewareStubData {
                middleware_name: hook.clone(),
            },
        )?;
        if !merged.is_empty() && !merged.ends_with('\n') {
            merged.push('\n');
        }
        merged.push_str(&stub);
        added += 1;
    }
    if added == 0 {
        return Ok(MergeOutcome::Unchanged);
    }
    debug!(added, "Appended middleware stubs");
    Ok(MergeOutcome::Patched(merged))
}

/// Every middleware hook function a named tree refers to, root first,
/// without duplicates.
pub fn collect_hooks(tree: &RouteTree) -> Vec<String> {
    let mut hooks: Vec<String> = Vec::new();
    for (_, id) in tree.walk() {
        let Some(names) = tree.node(id).names() else {
            continue;
        };
        for hook in names.hook_fns() {
            if !hooks.contains(&hook) {
                hooks.push(hook);
            }
        }
    }
    hooks
}

/// Whether `ident` occurs in `content` as a whole word.
fn mentions_identifier(content: &str, ident: &str) -> bool {
    Regex::new(&format!(r"\b{}\b", regex::escape(ident)))
        .map(|re| re.is_match(content))
        .unwrap_or_else(|_| content.contains(ident))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    const REGISTER: &str = "package router\n\nimport (\n\tuserapi \"demo/biz/router/userapi\"\n\t\"github.com/cloudwego/hertz/pkg/app/server\"\n)\n\nfunc GeneratedRegister(r *server.Hertz) {\n\t//INSERT_POINT(routegen/v1): DO NOT DELETE THIS LINE!\n\tuserapi.Register(r)\n}\n";

    #[test]
    fn test_import_already_present_is_unchanged() {
        let out = merge_import(Path::new("register.go"), REGISTER, "userapi", "demo/biz/router/userapi").unwrap();
        assert_eq!(out, MergeOutcome::Unchanged);
    }

    #[test]
    fn test_import_inserted_after_anchor() {
        let out = merge_import(Path::new("register.go"), REGISTER, "order", "demo/biz/router/order").unwrap();
        let content = out.into_content(REGISTER);
        assert!(content.contains("import (\n\torder \"demo/biz/router/order\"\n\tuserapi"));
    }

    #[test]
    fn test_import_package_prefix_is_not_a_match() {
        let out = merge_import(Path::new("register.go"), REGISTER, "user", "demo/biz/router/user").unwrap();
        assert!(out.is_patched());
    }

    #[test]
    fn test_imported_packages_lists_block_entries() {
        let imports = imported_packages(REGISTER);
        assert_eq!(
            imports,
            vec![
                ("userapi".to_string(), "demo/biz/router/userapi".to_string()),
                ("server".to_string(), "github.com/cloudwego/hertz/pkg/app/server".to_string()),
            ]
        );
        assert!(imported_packages("package router\n").is_empty());
    }

    #[test]
    fn test_import_without_block_is_malformed() {
        let err = merge_import(Path::new("register.go"), "package router\n", "a", "x/a").unwrap_err();
        assert!(matches!(err, GenError::MalformedAnchor { .. }));
    }

    #[test]
    fn test_registration_already_present() {
        let err = merge_registration(Path::new("register.go"), REGISTER, "userapi").unwrap_err();
        assert!(matches!(err, GenError::AlreadyRegistered { ref line } if line == "userapi.Register(r)"));
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_registration_spliced_after_marker() {
        let merged = merge_registration(Path::new("register.go"), REGISTER, "order").unwrap();
        assert!(merged.contains(
            "DO NOT DELETE THIS LINE!\n\torder.Register(r)\n\tuserapi.Register(r)\n}"
        ));
        assert!(merged.starts_with("package router\n"));
    }

    #[test]
    fn test_registration_is_idempotent() {
        let merged = merge_registration(Path::new("register.go"), REGISTER, "order").unwrap();
        let again = merge_registration(Path::new("register.go"), &merged, "order");
        assert!(matches!(again, Err(GenError::AlreadyRegistered { .. })));
    }

    #[test]
    fn test_registration_without_marker_is_malformed() {
        let edited = REGISTER.replace(INSERT_POINT_MARKER, "// removed");
        let err = merge_registration(Path::new("register.go"), &edited, "order").unwrap_err();
        assert!(matches!(err, GenError::MalformedAnchor { ref anchor, .. } if anchor == INSERT_POINT_MARKER));
    }

    #[test]
    fn test_middleware_stubs_skip_existing() {
        let templates = TemplateSet::builtin().unwrap();
        let content = "package user\n\nfunc rootMw() []app.HandlerFunc {\n\treturn nil\n}\n";
        let hooks = vec!["rootMw".to_string(), "_apiMw".to_string()];
        let out = merge_middleware_stubs(content, &hooks, &templates).unwrap();
        let merged = out.into_content(content);
        assert_eq!(merged.matches("func rootMw()").count(), 1);
        assert!(merged.ends_with("\nfunc _apiMw() []app.HandlerFunc {\n\t// your code...\n\treturn nil\n}\n"));

        let again = merge_middleware_stubs(&merged, &hooks, &templates).unwrap();
        assert_eq!(again, MergeOutcome::Unchanged);
    }

    #[test]
    fn test_mentions_identifier_uses_word_boundaries() {
        assert!(mentions_identifier("func _apiMw() {}", "_apiMw"));
        assert!(!mentions_identifier("func _apiMw0() {}", "_apiMw"));
        assert!(!mentions_identifier("func x_apiMw() {}", "_apiMw"));
    }
}
