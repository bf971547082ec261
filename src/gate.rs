//! Access gate
//!
//! Decides whether a connection attempt may become a viewer. Tokens are
//! compared through SHA-256 digests so the comparison takes the same time
//! regardless of where the inputs differ or how long they are.

use axum::extract::Query;
use axum::http::Uri;
use sha2::{Digest, Sha256};

use crate::hub::HubConfig;

/// Primary query parameter carrying the credential
pub const TOKEN_PARAM: &str = "activityToken";

/// Alias consulted only when the primary parameter is absent
pub const TOKEN_PARAM_ALIAS: &str = "a2uiToken";

/// Extract the presented credential from a request URI
///
/// Returns the trimmed value of [`TOKEN_PARAM`], falling back to
/// [`TOKEN_PARAM_ALIAS`] when the former is missing. A repeated key yields
/// its first value. Blank values and undecodable queries yield `None`.
pub fn credential_from_uri(uri: &Uri) -> Option<String> {
    let Query(pairs) = Query::<Vec<(String, String)>>::try_from_uri(uri).ok()?;
    let raw =
        first_value(&pairs, TOKEN_PARAM).or_else(|| first_value(&pairs, TOKEN_PARAM_ALIAS))?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn first_value<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

/// Decide whether a connection attempt is authorized
pub fn is_allowed(config: &HubConfig, credential: Option<&str>) -> bool {
    if !config.enabled {
        return false;
    }

    let Some(token) = config.token() else {
        return true;
    };

    match credential.map(str::trim).filter(|c| !c.is_empty()) {
        Some(presented) => tokens_match(presented, token),
        None => false,
    }
}

fn tokens_match(presented: &str, expected: &str) -> bool {
    let a = Sha256::digest(presented.as_bytes());
    let b = Sha256::digest(expected.as_bytes());
    a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
