use std::path::PathBuf;

use dirs_next::home_dir;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

pub mod keystore;

pub use keystore::{KeystoreError, SecretsBackend};

static REDACTION_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)(x-api-key: )([\w\-\.=:/+]+)",
        r"(?i)(authorization: )([\w\-\.=:/+]+)",
        r"(?i)([A-Z0-9_]*?(KEY|TOKEN|SECRET|PASSWORD))=([^\s]+)",
    ]
    .into_iter()
    .map(|pat| Regex::new(pat).expect("redaction pattern compiles"))
    .collect()
});

/// Redacts values that look like secrets in a string.
pub fn redact_sensitive(input: &str) -> String {
    let mut redacted = input.to_string();
    for re in REDACTION_PATTERNS.iter() {
        redacted = re
            .replace_all(&redacted, |caps: &regex::Captures| {
                let prefix = caps.get(1).map(|m| m.as_str()).unwrap_or("");
                format!("{}<redacted>", prefix)
            })
            .to_string();
    }
    redacted
}

/// Parse a response body as JSON, reporting whether parsing succeeded.
pub fn parse_response_json(text: &str) -> (Option<Value>, bool) {
    match serde_json::from_str::<Value>(text) {
        Ok(json) => (Some(json), true),
        Err(_) => (None, false),
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    let p = path.trim();
    if p == "~" {
        return home_dir().unwrap_or_else(|| PathBuf::from("~"));
    }
    if let Some(rest) = p.strip_prefix("~/") {
        return home_dir().unwrap_or_else(|| PathBuf::from("~")).join(rest);
    }
    if let Some(rest) = p.strip_prefix("~\\") {
        // Windows-style
        return home_dir().unwrap_or_else(|| PathBuf::from("~")).join(rest);
    }
    PathBuf::from(p)
}
