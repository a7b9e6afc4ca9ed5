//! Page placement rules: which paths a banner may render on.
//!
//! A placement is a list of tokens. `all` matches every page, `homepage`
//! matches only the root path, and any other token matches paths containing
//! `/<token>`.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;

pub const PLACEMENT_ALL: &str = "all";
pub const PLACEMENT_HOMEPAGE: &str = "homepage";

const MAX_PLACEMENT_TOKENS: usize = 50;
const MAX_TOKEN_LEN: usize = 100;

static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9][a-z0-9_\-/]*$").expect("token regex is valid"));

/// The placement used when none is selected.
pub fn default_placement() -> Vec<String> {
    vec![PLACEMENT_ALL.to_string()]
}

/// Trim tokens, drop blanks and duplicates, and fall back to `["all"]`.
pub fn normalize_placement(tokens: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tokens.len());
    for token in tokens {
        let token = token.trim().trim_matches('/').to_string();
        if !token.is_empty() && !out.contains(&token) {
            out.push(token);
        }
    }
    if out.is_empty() {
        return default_placement();
    }
    out
}

/// Validate placement tokens (lowercase slug segments, at most 50).
pub fn validate_placement(tokens: &[String]) -> Result<(), CoreError> {
    if tokens.len() > MAX_PLACEMENT_TOKENS {
        return Err(CoreError::Validation(format!(
            "A maximum of {MAX_PLACEMENT_TOKENS} placement tokens is allowed"
        )));
    }
    for token in tokens {
        let token = token.trim().trim_matches('/');
        if token.is_empty() {
            continue;
        }
        if token.len() > MAX_TOKEN_LEN || !TOKEN_RE.is_match(token) {
            return Err(CoreError::Validation(format!(
                "Invalid placement '{token}'. Use 'all', 'homepage', or a lowercase page segment"
            )));
        }
    }
    Ok(())
}

/// Whether a banner with `placement` may render on `current_path`.
///
/// Query strings and fragments are ignored. An empty placement behaves as
/// `["all"]`.
pub fn is_eligible(placement: &[String], current_path: &str) -> bool {
    if placement.is_empty() || placement.iter().any(|t| t == PLACEMENT_ALL) {
        return true;
    }
    let path = page_path(current_path);
    placement.iter().any(|token| {
        if token == PLACEMENT_HOMEPAGE {
            path == "/"
        } else {
            path.contains(&format!("/{token}"))
        }
    })
}

fn page_path(raw: &str) -> &str {
    let end = raw.find(['?', '#']).unwrap_or(raw.len());
    match &raw[..end] {
        "" => "/",
        path => path,
    }
}
