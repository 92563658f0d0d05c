//! Sample SQL resolution: a fenced ```sql block verbatim, otherwise a synthesized SELECT.

use crate::config::CompilerConfig;
use crate::model::{ApiColumn, ApiTableUsage};
use crate::sql::builder::sample_select;
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

static FENCED_SQL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)```sql\s+([\s\S]+?)\s*```").unwrap());

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleSource {
    /// Copied from a fenced sql block in the description.
    Fenced,
    /// Built from the extracted table, columns and prose conditions.
    Synthesized,
    /// No SQL block and no table to select from.
    Absent,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SampleSql {
    pub sql: String,
    pub source: SampleSource,
}

pub fn fenced_sql(text: &str) -> Option<String> {
    let sql = FENCED_SQL_RE.captures(text)?.get(1)?.as_str().trim();
    (!sql.is_empty()).then(|| sql.to_string())
}

pub fn resolve_sample_sql(
    text: &str,
    tables: &[ApiTableUsage],
    columns: &[ApiColumn],
    config: &CompilerConfig,
) -> SampleSql {
    if let Some(sql) = fenced_sql(text) {
        return SampleSql {
            sql,
            source: SampleSource::Fenced,
        };
    }
    match tables.first() {
        Some(table) => SampleSql {
            sql: sample_select(text, table, columns, config),
            source: SampleSource::Synthesized,
        },
        None => SampleSql {
            sql: String::new(),
            source: SampleSource::Absent,
        },
    }
}
