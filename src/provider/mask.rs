//! Masking of sensitive-looking environment variables
//!
//! Display policy for the provider layer: values whose key matches a fixed
//! keyword list by substring are replaced before records ever leave this
//! module. The list is a heuristic with known false positives/negatives on
//! unusual naming conventions; the caching core does not depend on it.

use std::collections::HashMap;

pub const MASKED_VALUE: &str = "***masked***";

const SENSITIVE_KEYWORDS: &[&str] = &[
    "PASSWORD",
    "PASSWD",
    "SECRET",
    "KEY",
    "TOKEN",
    "API_KEY",
    "AWS_SECRET_ACCESS_KEY",
    "DATABASE_PASSWORD",
    "DB_PASSWORD",
    "PRIVATE_KEY",
    "CERT",
    "CREDENTIAL",
];

/// Whether an environment variable name looks sensitive.
pub fn is_sensitive(name: &str) -> bool {
    let upper = name.to_ascii_uppercase();
    SENSITIVE_KEYWORDS.iter().any(|kw| upper.contains(kw))
}

/// Mask the values of sensitive-looking variables, leaving the rest as-is.
pub fn mask_environment(vars: HashMap<String, String>) -> HashMap<String, String> {
    vars.into_iter()
        .map(|(k, v)| {
            if is_sensitive(&k) {
                (k, MASKED_VALUE.to_string())
            } else {
                (k, v)
            }
        })
        .collect()
}
