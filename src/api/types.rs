use std::fmt;

use serde::{Deserialize, Serialize};

use crate::router::normalize_path;

/// HTTP verb of a route, stored canonically upper-cased.
///
/// `any` (in any case) is the wildcard sentinel `ANY`, emitted through the
/// framework's `Any` registration function.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct HttpVerb(String);

impl HttpVerb {
    pub const ANY: &'static str = "ANY";

    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.eq_ignore_ascii_case(Self::ANY) {
            HttpVerb(Self::ANY.to_string())
        } else {
            HttpVerb(trimmed.to_ascii_uppercase())
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_any(&self) -> bool {
        self.0 == Self::ANY
    }

    /// Name of the route registration function on a Hertz router group.
    pub fn route_fn(&self) -> &str {
        if self.is_any() {
            "Any"
        } else {
            &self.0
        }
    }

    pub fn matches(&self, other: &str) -> bool {
        self.0.eq_ignore_ascii_case(other.trim())
    }
}

impl From<String> for HttpVerb {
    fn from(raw: String) -> Self {
        HttpVerb::parse(&raw)
    }
}

impl From<&str> for HttpVerb {
    fn from(raw: &str) -> Self {
        HttpVerb::parse(raw)
    }
}

impl From<HttpVerb> for String {
    fn from(verb: HttpVerb) -> Self {
        verb.0
    }
}

impl fmt::Display for HttpVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One API method handed over by the IDL front end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Method {
    /// Bare handler function name, e.g. `GetUser`.
    pub name: String,
    #[serde(alias = "http_path")]
    pub path: String,
    #[serde(alias = "http_verb", alias = "method")]
    pub verb: HttpVerb,
    /// Explicit handler package import path; overrides the service default.
    #[serde(default, alias = "handler_pkg", skip_serializing_if = "Option::is_none")]
    pub handler_package: Option<String>,
}

impl Method {
    pub fn new(name: impl Into<String>, path: &str, verb: &str) -> Self {
        Self {
            name: name.into(),
            path: normalize_path(path),
            verb: HttpVerb::parse(verb),
            handler_package: None,
        }
    }

    pub fn with_handler_package(mut self, package: impl Into<String>) -> Self {
        self.handler_package = Some(package.into());
        self
    }

    pub(crate) fn normalize(&mut self) {
        self.path = normalize_path(&self.path);
        self.handler_package = self
            .handler_package
            .take()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty());
    }
}

/// A service: one generated router file and one registration line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceDefinition {
    /// IDL base name; the router file is written as `<name>.go`.
    pub name: String,
    /// Router sub-package path below the router root, e.g. `user` or `api/user`.
    pub package: String,
    #[serde(default)]
    pub methods: Vec<Method>,
}

impl ServiceDefinition {
    pub fn new(name: impl Into<String>, package: impl Into<String>, methods: Vec<Method>) -> Self {
        Self {
            name: name.into(),
            package: package.into(),
            methods,
        }
    }
}

/// Root document of a manifest file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub services: Vec<ServiceDefinition>,
}
