//! Description extraction: mines the structured API fields out of free-form requirement text.
//! Never fails; every field falls back to a configured default.

pub mod rules;
pub mod sample;
pub mod table;

pub use rules::{first_match, Rule};
pub use sample::{fenced_sql, resolve_sample_sql, SampleSource, SampleSql};
pub use table::{extract_columns, extract_parameters};

use crate::config::CompilerConfig;
use crate::model::{ApiColumn, ApiParameter, ApiTableUsage};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExtractedDescription {
    pub name: String,
    pub http_method: String,
    pub route_path: String,
    pub description: String,
    /// Parameters declared in the text's parameter table.
    pub parameters: Vec<ApiParameter>,
    pub columns: Vec<ApiColumn>,
    pub table_usages: Vec<ApiTableUsage>,
}

pub fn extract(text: &str, config: &CompilerConfig) -> ExtractedDescription {
    let or_default = |rules: &[Rule<String>], default: &str| {
        first_match(rules, text, config)
            .map(|(_, v)| v)
            .unwrap_or_else(|| default.to_string())
    };

    ExtractedDescription {
        name: or_default(rules::NAME_RULES, config.default_name.as_str()),
        http_method: or_default(rules::METHOD_RULES, config.default_http_method.as_str()),
        route_path: or_default(rules::ROUTE_RULES, config.default_route_path.as_str()),
        description: first_match(rules::DESCRIPTION_RULES, text, config)
            .map(|(_, v)| v)
            .unwrap_or_else(|| leading_chars(text, config.description_fallback_chars)),
        parameters: extract_parameters(text, config),
        columns: extract_columns(text, config),
        table_usages: first_match(rules::TABLE_USAGE_RULES, text, config)
            .map(|(_, v)| v)
            .unwrap_or_default(),
    }
}

/// First `n` characters with newlines flattened to spaces.
fn leading_chars(text: &str, n: usize) -> String {
    text.chars()
        .take(n)
        .map(|c| if c == '\n' { ' ' } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_takes_every_default() {
        let extracted = extract("", &CompilerConfig::default());
        assert_eq!(extracted.name, "Untitled API");
        assert_eq!(extracted.http_method, "GET");
        assert_eq!(extracted.route_path, "/api/unknown");
        assert_eq!(extracted.description, "");
        assert!(extracted.parameters.is_empty());
        assert!(extracted.columns.is_empty());
        assert!(extracted.table_usages.is_empty());
    }

    #[test]
    fn description_falls_back_to_leading_characters() {
        let text = format!("第一行\n第二行{}", "字".repeat(200));
        let extracted = extract(&text, &CompilerConfig::default());
        assert_eq!(extracted.description.chars().count(), 100);
        assert!(extracted.description.starts_with("第一行 第二行"));
    }
}
