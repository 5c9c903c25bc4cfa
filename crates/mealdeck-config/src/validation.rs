//! Validation utilities and regex patterns

use regex::Regex;
use std::sync::LazyLock;
use validator::ValidationError;

/// A bare level such as `info`
pub static LOG_LEVEL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(trace|debug|info|warn|error)$").expect("Invalid log level regex pattern")
});

/// A per-target directive such as `mealdeck_analytics=debug`
pub static LOG_DIRECTIVE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_:]*=(trace|debug|info|warn|error)$")
        .expect("Invalid log directive regex pattern")
});

/// Validate a log filter: one level, or a comma-separated mix of a level and
/// `target=level` directives
pub fn validate_log_level(level: &str) -> Result<(), ValidationError> {
    if level.trim().is_empty() {
        return Err(ValidationError::new("empty_log_level"));
    }

    let all_valid = level
        .split(',')
        .map(str::trim)
        .all(|part| LOG_LEVEL_REGEX.is_match(part) || LOG_DIRECTIVE_REGEX.is_match(part));

    if all_valid {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_log_level"))
    }
}

/// Validate the data store base URL: absolute http(s) with a host
pub fn validate_store_url(raw: &str) -> Result<(), ValidationError> {
    let parsed = url::Url::parse(raw).map_err(|_| ValidationError::new("invalid_store_url"))?;

    match parsed.scheme() {
        "http" | "https" if parsed.host_str().is_some() => Ok(()),
        "http" | "https" => Err(ValidationError::new("store_url_missing_host")),
        _ => Err(ValidationError::new("store_url_unsupported_scheme")),
    }
}

/// Validate file path (basic check for valid path characters)
pub fn validate_file_path(path: &str) -> Result<(), ValidationError> {
    if path.is_empty() {
        return Err(ValidationError::new("empty_file_path"));
    }

    // Colon stays legal for Windows drive letters
    let invalid_chars = ['<', '>', '"', '|', '?', '*'];
    if path.chars().any(|c| invalid_chars.contains(&c)) {
        return Err(ValidationError::new("invalid_file_path_characters"));
    }

    Ok(())
}
