use std::env;
use std::str::FromStr;

use super::types::{ConfigError, Environment};

// Vite dev servers; production deployments set BACKEND_CORS_ORIGINS or CLIENT_URL.
const DEV_CORS_ORIGINS: &[&str] = &["http://localhost:5173", "http://localhost:5174"];

pub(super) fn env_optional(key: &str) -> Option<String> {
    env::var(key).ok().map(|value| value.trim().to_string()).filter(|value| !value.is_empty())
}

pub(super) fn env_or_default(key: &str, default: &str) -> String {
    env_optional(key).unwrap_or_else(|| default.to_string())
}

pub(super) fn parse_number<T: FromStr>(
    field: &'static str,
    value: String,
) -> Result<T, ConfigError> {
    value.parse::<T>().map_err(|_| ConfigError::InvalidValue { field, value })
}

/// Accepts a JSON array or a comma-separated list. Empty input falls back to
/// the dev origins.
pub(super) fn parse_cors_origins(value: Option<String>) -> Result<Vec<String>, ConfigError> {
    let raw = match value {
        Some(raw) if !raw.trim().is_empty() => raw,
        _ => return Ok(dev_cors_origins()),
    };

    let origins: Vec<String> = if raw.trim_start().starts_with('[') {
        serde_json::from_str(&raw).map_err(|_| ConfigError::InvalidCors(raw.clone()))?
    } else {
        raw.split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect()
    };

    if origins.is_empty() {
        return Ok(dev_cors_origins());
    }

    Ok(origins)
}

pub(super) fn parse_bool(value: &str) -> bool {
    ["1", "true", "yes", "on"].iter().any(|truthy| value.eq_ignore_ascii_case(truthy))
}

pub(super) fn parse_environment(value: Option<String>) -> Environment {
    let Some(raw) = value else {
        return Environment::Development;
    };

    match raw.to_ascii_lowercase().as_str() {
        "production" | "prod" => Environment::Production,
        "staging" => Environment::Staging,
        "test" | "testing" => Environment::Test,
        _ => Environment::Development,
    }
}

fn dev_cors_origins() -> Vec<String> {
    DEV_CORS_ORIGINS.iter().map(|item| item.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cors_origins_accept_json_arrays() {
        let raw = "[\"http://a\",\"http://b\"]".to_string();
        let parsed = parse_cors_origins(Some(raw)).expect("cors json");
        assert_eq!(parsed, vec!["http://a".to_string(), "http://b".to_string()]);
    }

    #[test]
    fn cors_origins_accept_comma_lists() {
        let raw = "http://a, http://b,".to_string();
        let parsed = parse_cors_origins(Some(raw)).expect("cors csv");
        assert_eq!(parsed, vec!["http://a".to_string(), "http://b".to_string()]);
    }

    #[test]
    fn cors_origins_fall_back_when_blank() {
        let parsed = parse_cors_origins(Some(" ".to_string())).expect("cors empty");
        assert_eq!(parsed, dev_cors_origins());
        assert_eq!(parse_cors_origins(None).expect("cors none"), dev_cors_origins());
    }

    #[test]
    fn bools_are_case_insensitive() {
        for truthy in ["1", "true", "TRUE", "Yes", "on", "ON"] {
            assert!(parse_bool(truthy), "{truthy} should parse as true");
        }
        for falsy in ["0", "false", "off", "nope", ""] {
            assert!(!parse_bool(falsy), "{falsy} should parse as false");
        }
    }

    #[test]
    fn environments_recognize_aliases() {
        assert_eq!(parse_environment(Some("prod".to_string())), Environment::Production);
        assert_eq!(parse_environment(Some("PRODUCTION".to_string())), Environment::Production);
        assert_eq!(parse_environment(Some("staging".to_string())), Environment::Staging);
        assert_eq!(parse_environment(Some("testing".to_string())), Environment::Test);
        assert_eq!(parse_environment(None), Environment::Development);
    }

    #[test]
    fn numbers_report_the_offending_field() {
        let err = parse_number::<u16>("POSTGRES_PORT", "not-a-port".to_string()).unwrap_err();
        assert!(err.to_string().contains("POSTGRES_PORT"));
    }
}
