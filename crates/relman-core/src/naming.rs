//! Repository-name derivation for module identifiers.
//!
//! Modules map to GitHub repositories by convention:
//! `"<org-prefix>-" + kebab-case(identifier minus namespace prefix)`.
//! Modules whose repository predates the convention are listed in the
//! override table in [`NamingConfig`].

use crate::config::NamingConfig;

/// Convert an identifier to kebab case.
///
/// Handles CamelCase boundaries and treats `_`, `.` and spaces as
/// separators.
///
/// # Examples
///
/// ```
/// use relman_core::naming::kebab_case;
///
/// assert_eq!(kebab_case("BillingEngine"), "billing-engine");
/// assert_eq!(kebab_case("HTTPGateway"), "http-gateway");
/// assert_eq!(kebab_case("audit_log"), "audit-log");
/// ```
pub fn kebab_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + 4);
    let chars: Vec<char> = input.chars().collect();

    for (i, &c) in chars.iter().enumerate() {
        if c == '_' || c == ' ' || c == '.' || c == '-' {
            if !out.ends_with('-') && !out.is_empty() {
                out.push('-');
            }
            continue;
        }
        if c.is_uppercase() {
            let prev_lower = i > 0 && chars[i - 1].is_lowercase();
            let next_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            let prev_upper = i > 0 && chars[i - 1].is_uppercase();
            // Boundary before "Gateway" in "HTTPGateway", and before any
            // uppercase following a lowercase or digit.
            if !out.is_empty()
                && !out.ends_with('-')
                && (prev_lower || (prev_upper && next_lower) || (i > 0 && chars[i - 1].is_ascii_digit()))
            {
                out.push('-');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }

    out.trim_matches('-').to_string()
}

/// Repository name for a module identifier (without the owner part).
///
/// Checks the override table first, then falls back to the derivation
/// convention.
pub fn repo_name_for(identifier: &str) -> String {
    if let Some((_, name)) = NamingConfig::REPO_OVERRIDES
        .iter()
        .find(|(id, _)| *id == identifier)
    {
        return (*name).to_string();
    }

    let trimmed = identifier
        .strip_prefix(NamingConfig::NAMESPACE_PREFIX)
        .unwrap_or(identifier);
    format!("{}-{}", NamingConfig::ORG_PREFIX, kebab_case(trimmed))
}

/// Full `owner/name` repository path for a module identifier.
pub fn repo_path_for(identifier: &str) -> String {
    format!("{}/{}", NamingConfig::GITHUB_OWNER, repo_name_for(identifier))
}
