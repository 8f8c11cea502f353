//! Identifier normalization helpers shared by the namer and alias binder.

/// Convert free text (a path segment, a package basename) into an identifier body.
///
/// `:` and `*` (path parameter and wildcard markers) are dropped. Any other
/// character outside `[A-Za-z0-9_]` becomes `_`, and a run of such characters
/// collapses into a single `_`.
///
/// ```rust
/// use routegen::naming::to_var_name;
///
/// assert_eq!(to_var_name(":id"), "id");
/// assert_eq!(to_var_name("user-info.v2"), "user_info_v2");
/// ```
pub fn to_var_name(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut replaced = false;
    for c in s.chars() {
        if c == ':' || c == '*' {
            continue;
        }
        if c.is_ascii_alphanumeric() || c == '_' {
            out.push(c);
            replaced = false;
        } else if !replaced {
            out.push('_');
            replaced = true;
        }
    }
    out
}

/// Normalized, lower-cased label used for middleware hook candidates.
pub fn to_middleware_name(s: &str) -> String {
    to_var_name(s).to_lowercase()
}

/// Identifier that is safe to use as a Go import alias.
///
/// Same as [`to_var_name`] but never empty and never starting with a digit.
pub fn to_identifier(s: &str) -> String {
    let mut ident = to_var_name(s);
    if ident.is_empty() || ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    ident
}

/// Last `/`-separated component of a package path.
pub fn base_name(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    trimmed.rsplit('/').next().unwrap_or(trimmed)
}

/// [`base_name`] without its extension: `idl/user.thrift` gives `user`.
///
/// A leading dot is not an extension separator.
pub fn file_stem(path: &str) -> &str {
    let base = base_name(path);
    match base.rfind('.') {
        Some(dot) if dot > 0 => &base[..dot],
        _ => base,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_var_name_drops_param_markers() {
        assert_eq!(to_var_name(":id"), "id");
        assert_eq!(to_var_name("*filepath"), "filepath");
        assert_eq!(to_var_name("user_id"), "user_id");
    }

    #[test]
    fn test_to_var_name_collapses_runs() {
        assert_eq!(to_var_name("a--b"), "a_b");
        assert_eq!(to_var_name("v1.api-x"), "v1_api_x");
        assert_eq!(to_var_name("/"), "_");
        assert_eq!(to_var_name(""), "");
    }

    #[test]
    fn test_to_middleware_name_lowercases() {
        assert_eq!(to_middleware_name("GetUser"), "getuser");
        assert_eq!(to_middleware_name("Api-V2"), "api_v2");
    }

    #[test]
    fn test_to_identifier_guards_leading_digit() {
        assert_eq!(to_identifier("2fa"), "_2fa");
        assert_eq!(to_identifier(""), "_");
        assert_eq!(to_identifier("user-api"), "user_api");
    }

    #[test]
    fn test_base_name() {
        assert_eq!(base_name("example.com/demo/biz/handler/user"), "user");
        assert_eq!(base_name("user"), "user");
        assert_eq!(base_name("a/b/"), "b");
    }

    #[test]
    fn test_file_stem_trims_extension() {
        assert_eq!(file_stem("idl/user.thrift"), "user");
        assert_eq!(file_stem("api/v1.user.proto"), "v1.user");
        assert_eq!(file_stem("user"), "user");
        assert_eq!(file_stem("idl/.hidden"), ".hidden");
    }
}
