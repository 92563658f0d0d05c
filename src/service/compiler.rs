//! Assembles the final API definition from extraction, sample SQL, parameterization and splitting.

use crate::config::CompilerConfig;
use crate::extract::{extract, resolve_sample_sql, ExtractedDescription, SampleSource, SampleSql};
use crate::model::ParsedApiConfig;
use crate::sql::{parameterize, split, ParameterizationResult, SplitResult};
use serde::Serialize;

/// Compiled record plus the intermediate SQL and advisory diagnostics.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Compilation {
    pub config: ParsedApiConfig,
    pub sample_sql: String,
    pub sample_source: SampleSource,
    pub parameterized_sql: String,
    pub warnings: Vec<String>,
    pub suggestions: Vec<String>,
}

#[derive(Clone, Debug, Default)]
pub struct ApiCompiler {
    config: CompilerConfig,
}

impl ApiCompiler {
    pub fn new(config: CompilerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    pub fn compile(&self, text: &str) -> ParsedApiConfig {
        self.compile_with_report(text).config
    }

    pub fn compile_with_report(&self, text: &str) -> Compilation {
        let extracted = extract(text, &self.config);
        let sample = resolve_sample_sql(
            text,
            &extracted.table_usages,
            &extracted.columns,
            &self.config,
        );
        let parameterized = parameterize(&sample.sql, &extracted.parameters);
        let parts = split(&parameterized.rewritten_sql);

        tracing::debug!(
            name = %extracted.name,
            source = ?sample.source,
            parameters = parameterized.parameters.len(),
            conditions = parts.conditions.len(),
            warnings = parameterized.warnings.len(),
            "compiled api definition"
        );

        let SampleSql { sql: sample_sql, source: sample_source } = sample;
        let parameterized_sql = parameterized.rewritten_sql.clone();
        let warnings = parameterized.warnings.clone();
        let suggestions = parameterized.suggestions.clone();
        Compilation {
            config: assemble(extracted, parameterized, parts, &self.config),
            sample_sql,
            sample_source,
            parameterized_sql,
            warnings,
            suggestions,
        }
    }
}

/// Parameters come from the parameterizer, never from the declared table directly;
/// a declared parameter with no matching literal is dropped.
pub fn assemble(
    extracted: ExtractedDescription,
    parameterized: ParameterizationResult,
    parts: SplitResult,
    config: &CompilerConfig,
) -> ParsedApiConfig {
    ParsedApiConfig {
        name: extracted.name,
        description: extracted.description,
        http_method: extracted.http_method,
        route_path: extracted.route_path,
        api_type: config.api_type.clone(),
        result_type: config.result_type.clone(),
        auth_type: config.auth_type.clone(),
        main_sql: parts.main_sql,
        order_by_clause: parts.order_by,
        count_sql: String::new(),
        api_response_wrapper: String::new(),
        parameters: parameterized.parameters,
        conditions: parts.conditions,
        columns: extracted.columns,
        table_usages: extracted.table_usages,
    }
}

/// Compiles with the default configuration.
pub fn compile(text: &str) -> ParsedApiConfig {
    ApiCompiler::default().compile(text)
}
