//! Error taxonomy for route-tree construction and file merging.
//!
//! Every failure is returned to the immediate caller. Only
//! [`GenError::AlreadyRegistered`] is recoverable: it means a previous run
//! already patched the registration file, so the pipeline downgrades it to a
//! warning. All other variants abort the invocation before any file is
//! persisted.

use std::path::PathBuf;
use thiserror::Error;

use crate::naming::NameScope;

/// Convenience alias used throughout the library.
pub type Result<T, E = GenError> = std::result::Result<T, E>;

/// Errors produced while building, naming and merging generated routers.
#[derive(Error, Debug)]
pub enum GenError {
    // =========================================================================
    // Input errors
    // =========================================================================
    /// A method was declared without an HTTP path.
    #[error("empty path for method '{method}'")]
    EmptyPath { method: String },

    /// The same `(path, verb)` pair was inserted twice into one tree.
    #[error("path '{path}' has been registered for {verb}")]
    DuplicateRoute { path: String, verb: String },

    // =========================================================================
    // Merge errors
    // =========================================================================
    /// The registration line is already present in the central register file.
    #[error("the router ({line}) has been registered")]
    AlreadyRegistered { line: String },

    /// The insertion marker expected in an existing file is missing.
    #[error("wrong format {}: insert-point '{anchor}' not found", path.display())]
    MalformedAnchor { path: PathBuf, anchor: String },

    // =========================================================================
    // Naming errors
    // =========================================================================
    /// The integer suffix space for a candidate name ran out.
    #[error("get unique name for '{candidate}' in {scope} registry failed: suffix space exhausted")]
    RegistryExhaustion { scope: NameScope, candidate: String },

    // =========================================================================
    // Collaborator errors
    // =========================================================================
    #[error("failed to access '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("execute template \"{name}\" failed: {source}")]
    Template {
        name: String,
        #[source]
        source: minijinja::Error,
    },

    #[error("tpl {name} not found")]
    TemplateNotFound { name: String },

    #[error("invalid manifest '{}': {message}", path.display())]
    Manifest { path: PathBuf, message: String },

    #[error("invalid config '{}': {message}", path.display())]
    Config { path: PathBuf, message: String },
}

impl GenError {
    /// Whether the error must abort the whole generation invocation.
    ///
    /// `AlreadyRegistered` signals convergence of repeated generation rather
    /// than corruption, so callers may treat it as a warning.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, GenError::AlreadyRegistered { .. })
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GenError::Io {
            path: path.into(),
            source,
        }
    }
}
