//! Replaces literal values in a sample SQL statement with `#{name}` placeholders and infers
//! a parameter definition for each. Complexity heuristics produce advisory warnings only.

use crate::case::{field_to_param_name, normalize_identifier};
use crate::model::{ApiParameter, ParamLocation};
use regex::Regex;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::sync::LazyLock;

const CONTEXT_CHARS: usize = 30;
const FIELD_LOOKBEHIND_CHARS: usize = 100;
const FUNCTION_LOOKBEHIND_CHARS: usize = 50;

static STRING_LITERAL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"'([^']*)'").unwrap());
static NUMBER_LITERAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?-u:\b)[0-9]+(?:\.[0-9]+)?(?-u:\b)").unwrap());
static FILTER_KEYWORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:WHERE|HAVING)\b").unwrap());
/// `<field> <op> ` immediately before a value.
static FIELD_BEFORE_VALUE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)([A-Za-z0-9_."]+)\s*(?:=|LIKE|IN|>|<|>=|<=|!=)\s*$"#).unwrap()
});
/// An identifier followed by an unclosed parenthesis: the value is a function argument.
static OPEN_CALL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z0-9_]+\s*\([^)]*$").unwrap());

static SUBQUERY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\(\s*SELECT").unwrap());
static JOIN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bJOIN\b").unwrap());
static CASE_WHEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bCASE\s+WHEN\b").unwrap());
static FUNCTION_STRING_ARG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[A-Za-z0-9_]+\([^)]*['"][^'"]+['"]"#).unwrap());
static IN_ANY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:IN|ANY)\s*\(").unwrap());

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueKind {
    String,
    Number,
}

impl ValueKind {
    fn param_type(&self) -> &'static str {
        match self {
            ValueKind::String => "string",
            ValueKind::Number => "int",
        }
    }
}

/// A literal found in the sample SQL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DetectedValue {
    /// Value without quotes, e.g. `STA001`.
    pub literal: String,
    /// Exact text replaced in the SQL, e.g. `'STA001'`.
    pub quoted: String,
    /// Byte offset of `quoted` in the SQL.
    pub offset: usize,
    pub kind: ValueKind,
    /// Up to 30 characters either side of the value.
    pub context: String,
    pub field_name: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ParameterizationResult {
    pub rewritten_sql: String,
    /// One definition per distinct placeholder name, in order of first appearance.
    pub parameters: Vec<ApiParameter>,
    /// Literal value -> placeholder name (first assignment).
    pub value_to_name: BTreeMap<String, String>,
    pub warnings: Vec<String>,
    pub suggestions: Vec<String>,
}

/// Byte offset `n` characters before `pos`, clamped to 0.
fn chars_before(s: &str, pos: usize, n: usize) -> usize {
    s[..pos].char_indices().rev().nth(n.saturating_sub(1)).map_or(0, |(i, _)| i)
}

/// Byte offset `n` characters after `pos`, clamped to the end.
fn chars_after(s: &str, pos: usize, n: usize) -> usize {
    s[pos..].char_indices().nth(n).map_or(s.len(), |(i, _)| pos + i)
}

fn context_window(sql: &str, offset: usize, len: usize) -> String {
    let start = chars_before(sql, offset, CONTEXT_CHARS);
    let end = chars_after(sql, offset + len, CONTEXT_CHARS);
    sql[start..end].to_string()
}

fn field_before(sql: &str, offset: usize) -> Option<String> {
    let before = &sql[chars_before(sql, offset, FIELD_LOOKBEHIND_CHARS)..offset];
    FIELD_BEFORE_VALUE_RE
        .captures(before)
        .map(|c| c[1].to_string())
}

fn in_function_call(sql: &str, offset: usize) -> bool {
    let before = &sql[chars_before(sql, offset, FUNCTION_LOOKBEHIND_CHARS)..offset];
    OPEN_CALL_RE.is_match(before)
}

/// Advisory checks for constructs the literal scanner handles poorly.
pub fn complexity_warnings(sql: &str) -> (Vec<String>, Vec<String>) {
    let mut warnings = Vec::new();
    let mut suggestions = Vec::new();

    if SUBQUERY_RE.is_match(sql) {
        warnings.push("subquery detected; parameter extraction may be incomplete".to_string());
        suggestions.push("confirm whether values inside the subquery should be parameterized".to_string());
    }
    let joins = JOIN_RE.find_iter(sql).count();
    if joins > 2 {
        warnings.push(format!("{} JOIN clauses detected; the query is complex", joins));
        suggestions.push("confirm that values in JOIN conditions were identified correctly".to_string());
    }
    if CASE_WHEN_RE.is_match(sql) {
        warnings.push("CASE WHEN expression detected".to_string());
        suggestions.push("confirm whether values in CASE WHEN branches should be parameterized".to_string());
    }
    if FUNCTION_STRING_ARG_RE.is_match(sql) {
        warnings.push("function call with a string argument detected".to_string());
        suggestions.push(
            "confirm whether function arguments such as date formats should be parameterized".to_string(),
        );
    }
    if IN_ANY_RE.is_match(sql) {
        warnings.push("IN or ANY clause detected".to_string());
        suggestions.push("confirm the array parameter format, e.g. #{paramName}::type[]".to_string());
    }

    (warnings, suggestions)
}

/// Quoted strings anywhere, plus standalone numbers from the first WHERE/HAVING onward that are
/// neither inside a string nor a function argument. Sorted by offset.
pub fn detect_values(sql: &str) -> Vec<DetectedValue> {
    let mut values = Vec::new();
    let mut string_spans = Vec::new();

    for caps in STRING_LITERAL_RE.captures_iter(sql) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        string_spans.push(whole.range());
        values.push(DetectedValue {
            literal: inner.as_str().to_string(),
            quoted: whole.as_str().to_string(),
            offset: whole.start(),
            kind: ValueKind::String,
            context: context_window(sql, whole.start(), whole.len()),
            field_name: field_before(sql, whole.start()),
        });
    }

    if let Some(filter) = FILTER_KEYWORD_RE.find(sql) {
        let filter_start = filter.start();
        for m in NUMBER_LITERAL_RE.find_iter(&sql[filter_start..]) {
            let offset = filter_start + m.start();
            if string_spans.iter().any(|span| span.contains(&offset)) || in_function_call(sql, offset) {
                continue;
            }
            values.push(DetectedValue {
                literal: m.as_str().to_string(),
                quoted: m.as_str().to_string(),
                offset,
                kind: ValueKind::Number,
                context: context_window(sql, offset, m.len()),
                field_name: field_before(sql, offset),
            });
        }
    }

    values.sort_by_key(|v| v.offset);
    values
}

fn declared_match<'a>(declared: &'a [ApiParameter], field: &str) -> Option<&'a ApiParameter> {
    let field_norm = normalize_identifier(field);
    declared.iter().find(|p| {
        let name_norm = normalize_identifier(&p.name);
        !name_norm.is_empty() && (name_norm == field_norm || field_norm.contains(&name_norm))
    })
}

fn unique_name(base: &str, used: &HashSet<String>) -> String {
    if !used.contains(base) {
        return base.to_string();
    }
    (1..)
        .map(|n| format!("{}{}", base, n))
        .find(|candidate| !used.contains(candidate))
        .unwrap_or_else(|| base.to_string())
}

/// Placeholder name per detected value, in the same order: a matching declared parameter,
/// else the camelCased field name, else `param`; inferred names get numeric suffixes until unique.
pub fn assign_names(values: &[DetectedValue], declared: &[ApiParameter]) -> Vec<String> {
    let mut used = HashSet::new();
    let mut names = Vec::with_capacity(values.len());

    for value in values {
        let declared_name = value
            .field_name
            .as_deref()
            .and_then(|field| declared_match(declared, field))
            .map(|p| p.name.clone());
        let name = match declared_name {
            Some(name) => name,
            None => {
                let base = value
                    .field_name
                    .as_deref()
                    .map(field_to_param_name)
                    .filter(|n| !n.is_empty())
                    .unwrap_or_else(|| "param".to_string());
                unique_name(&base, &used)
            }
        };
        used.insert(name.clone());
        names.push(name);
    }
    names
}

fn inferred_parameter(name: &str, value: &DetectedValue) -> ApiParameter {
    ApiParameter {
        name: name.to_string(),
        param_type: value.kind.param_type().to_string(),
        required: false,
        description: format!(
            "Inferred from SQL (field: {})",
            value.field_name.as_deref().unwrap_or("unknown")
        ),
        location: ParamLocation::Query,
        ..Default::default()
    }
}

/// Parameterize `sql`. `declared` only supplies naming hints and definitions; a declared
/// parameter that matches no literal does not appear in the result.
pub fn parameterize(sql: &str, declared: &[ApiParameter]) -> ParameterizationResult {
    let (warnings, suggestions) = complexity_warnings(sql);
    let values = detect_values(sql);
    let names = assign_names(&values, declared);

    // Definitions are emitted as the rewrite meets them, last literal first.
    let mut rewritten_sql = sql.to_string();
    let mut seen = HashSet::new();
    let mut parameters = Vec::new();
    for (value, name) in values.iter().zip(&names).rev() {
        let span = value.offset..value.offset + value.quoted.len();
        rewritten_sql.replace_range(span, &format!("#{{{}}}", name));
        if seen.insert(name.as_str()) {
            parameters.push(
                declared
                    .iter()
                    .find(|p| p.name == *name)
                    .cloned()
                    .unwrap_or_else(|| inferred_parameter(name, value)),
            );
        }
    }

    let mut value_to_name = BTreeMap::new();
    for (value, name) in values.iter().zip(&names) {
        value_to_name
            .entry(value.literal.clone())
            .or_insert_with(|| name.clone());
    }

    ParameterizationResult {
        rewritten_sql,
        parameters,
        value_to_name,
        warnings,
        suggestions,
    }
}
