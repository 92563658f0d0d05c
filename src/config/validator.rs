//! Config validation: identifiers, defaults and category names.

use crate::config::CompilerConfig;
use crate::error::ConfigError;
use regex::Regex;
use std::sync::LazyLock;

const HTTP_METHODS: &[&str] = &["GET", "POST", "PUT", "DELETE", "PATCH", "HEAD", "OPTIONS"];

static IDENTIFIER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

fn check_identifier(field: &'static str, value: &str) -> Result<(), ConfigError> {
    if IDENTIFIER_RE.is_match(value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidIdentifier {
            field,
            value: value.to_string(),
        })
    }
}

pub fn validate(config: &CompilerConfig) -> Result<(), ConfigError> {
    check_identifier("fallback_schema", &config.fallback_schema)?;
    check_identifier("condition_columns.code", &config.condition_columns.code)?;
    check_identifier("condition_columns.name", &config.condition_columns.name)?;
    check_identifier("condition_columns.road", &config.condition_columns.road)?;

    if !HTTP_METHODS.contains(&config.default_http_method.as_str()) {
        return Err(ConfigError::Validation(format!(
            "default_http_method must be one of {:?}, got '{}'",
            HTTP_METHODS, config.default_http_method
        )));
    }
    if !config.default_route_path.starts_with('/') {
        return Err(ConfigError::Validation(format!(
            "default_route_path must start with '/': {}",
            config.default_route_path
        )));
    }
    if config.description_fallback_chars == 0 {
        return Err(ConfigError::Validation(
            "description_fallback_chars must be greater than zero".into(),
        ));
    }
    if config.default_param_type.trim().is_empty() {
        return Err(ConfigError::Validation("default_param_type is empty".into()));
    }
    for (declared, mapped) in &config.type_synonyms {
        if mapped.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "type synonym '{}' maps to an empty type",
                declared
            )));
        }
    }

    let c = &config.categories;
    for (kind, name) in [
        ("api", &c.api),
        ("parameters", &c.parameters),
        ("conditions", &c.conditions),
        ("columns", &c.columns),
        ("column_usage", &c.column_usage),
    ] {
        if name.trim().is_empty() {
            return Err(ConfigError::Validation(format!("category for {} is empty", kind)));
        }
    }

    Ok(())
}
