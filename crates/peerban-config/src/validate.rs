//! Validation helpers and parsing utilities for environment values.

use std::ops::RangeInclusive;

use url::Url;

use crate::error::{ConfigError, ConfigResult};

/// Parse the control API base URL and normalise it so relative endpoint paths
/// resolve beneath any reverse-proxy prefix.
///
/// # Errors
///
/// Returns an error when the URL is malformed, is not http(s), or cannot act
/// as a base for relative paths.
pub fn parse_base_url(field: &'static str, raw: &str) -> ConfigResult<Url> {
    let trimmed = raw.trim();
    let mut url = Url::parse(trimmed).map_err(|source| ConfigError::InvalidUrl {
        value: trimmed.to_string(),
        source,
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::invalid(field, "unsupported_scheme", trimmed));
    }
    if url.cannot_be_a_base() {
        return Err(ConfigError::invalid(field, "not_a_base", trimmed));
    }

    url.set_query(None);
    url.set_fragment(None);
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Parse an unsigned integer constrained to `range`.
///
/// # Errors
///
/// Returns an error when the value is not an unsigned integer or falls outside
/// the accepted range.
pub fn parse_bounded(
    field: &'static str,
    raw: &str,
    range: RangeInclusive<u64>,
) -> ConfigResult<u64> {
    let trimmed = raw.trim();
    let value = trimmed
        .parse::<u64>()
        .map_err(|_| ConfigError::invalid(field, "not_an_integer", trimmed))?;
    if !range.contains(&value) {
        return Err(ConfigError::invalid(field, "out_of_range", trimmed));
    }
    Ok(value)
}

/// Split a comma-separated prefix list, dropping blanks and repeats.
///
/// # Errors
///
/// Returns an error when no usable prefix remains.
pub fn parse_prefixes(field: &'static str, raw: &str) -> ConfigResult<Vec<String>> {
    let mut prefixes: Vec<String> = Vec::new();
    for prefix in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        if !prefixes.iter().any(|existing| existing == prefix) {
            prefixes.push(prefix.to_string());
        }
    }
    if prefixes.is_empty() {
        return Err(ConfigError::invalid(field, "empty", raw));
    }
    Ok(prefixes)
}

/// Map a level name onto a tracing directive, case-insensitively.
#[must_use]
pub fn normalize_log_level(raw: &str) -> Option<&'static str> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "trace" => Some("trace"),
        "debug" => Some("debug"),
        "info" => Some("info"),
        "warn" | "warning" => Some("warn"),
        "error" => Some("error"),
        _ => None,
    }
}

/// Accept the supported log format names.
#[must_use]
pub fn normalize_log_format(raw: &str) -> Option<&'static str> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "json" => Some("json"),
        "pretty" => Some("pretty"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gains_trailing_slash_and_keeps_prefix() -> ConfigResult<()> {
        let url = parse_base_url("url", "http://nas.local:8080/qbit?x=1")?;
        assert_eq!(url.as_str(), "http://nas.local:8080/qbit/");
        assert_eq!(
            url.join("api/v2/auth/login").map(String::from).ok(),
            Some("http://nas.local:8080/qbit/api/v2/auth/login".to_string())
        );
        Ok(())
    }

    #[test]
    fn base_url_rejects_other_schemes() {
        let err = parse_base_url("url", "ftp://host/").expect_err("ftp should be rejected");
        assert!(matches!(
            err,
            ConfigError::InvalidField {
                reason: "unsupported_scheme",
                ..
            }
        ));
        assert!(matches!(
            parse_base_url("url", "not a url"),
            Err(ConfigError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn bounded_values_respect_range() {
        assert_eq!(parse_bounded("f", " 30 ", 1..=60).ok(), Some(30));
        assert!(matches!(
            parse_bounded("f", "0", 1..=60),
            Err(ConfigError::InvalidField {
                reason: "out_of_range",
                ..
            })
        ));
        assert!(matches!(
            parse_bounded("f", "-3", 1..=60),
            Err(ConfigError::InvalidField {
                reason: "not_an_integer",
                ..
            })
        ));
    }

    #[test]
    fn prefixes_are_trimmed_and_deduplicated() -> ConfigResult<()> {
        let prefixes = parse_prefixes("f", " -WW00, ,-Lr,-WW00 ")?;
        assert_eq!(prefixes, vec!["-WW00".to_string(), "-Lr".to_string()]);
        assert!(parse_prefixes("f", " , ").is_err());
        Ok(())
    }

    #[test]
    fn log_level_and_format_names() {
        assert_eq!(normalize_log_level("DEBUG"), Some("debug"));
        assert_eq!(normalize_log_level("warning"), Some("warn"));
        assert_eq!(normalize_log_level("loud"), None);
        assert_eq!(normalize_log_format("Json"), Some("json"));
        assert_eq!(normalize_log_format("xml"), None);
    }
}
