//! Ordered extraction rules. Each table is evaluated top to bottom and the first rule
//! that yields a value wins; later rules are never merged with earlier ones.

use crate::config::CompilerConfig;
use crate::model::ApiTableUsage;
use regex::Regex;
use std::sync::LazyLock;

/// A named extractor. `apply` returns `None` when its pattern is absent from the text.
pub struct Rule<T> {
    pub name: &'static str,
    pub apply: fn(&str, &CompilerConfig) -> Option<T>,
}

/// Evaluate `rules` in order; return the first rule's name and value.
pub fn first_match<T>(
    rules: &[Rule<T>],
    text: &str,
    config: &CompilerConfig,
) -> Option<(&'static str, T)> {
    rules
        .iter()
        .find_map(|rule| (rule.apply)(text, config).map(|v| (rule.name, v)))
}

static NAME_LABEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\*\*)?(?:接口名称|API名称|名称)(?:\*\*)?[：:][ \t]*([^\n]+)").unwrap()
});
static NAME_LABEL_EN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:\*\*)?(?:API name|Interface name)(?:\*\*)?[：:][ \t]*([^\n]+)").unwrap()
});
static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^##?[ \t]+(.+?)[ \t]*$").unwrap());

static METHOD_LABEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:\*\*)?(?:请求方法|HTTP方法|HTTP method|方法)(?:\*\*)?[：:]\s*`?([A-Z]+)`?").unwrap()
});

static ROUTE_CODE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\*\*)?(?:接口路径|路径|URL|Path|Route)(?:\*\*)?[：:]\s*`([^`]+)`").unwrap()
});
static ROUTE_BARE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\*\*)?(?:接口路径|路径|URL|Path|Route)(?:\*\*)?[：:][ \t]*(/[^\s`]*)").unwrap()
});

static OVERVIEW_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)##\s*(?:概述|Overview)[ \t]*\r?\n\s*\n(.+?)(?:\n\s*\n|---|\z)").unwrap()
});

static TABLE_ANNOTATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\*\*表名\*\*[：:\s]+`([^`]+)`").unwrap());
static FROM_QUALIFIED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bFROM\s+([A-Za-z_][A-Za-z0-9_]*)\.([A-Za-z_][A-Za-z0-9_]*)").unwrap()
});
static TABLE_MENTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:表|\btable)[：:\s]+`?([A-Za-z0-9_]+)`?").unwrap());

/// First capture group, trimmed and with a surrounding code span removed; `None` if empty.
fn capture(re: &Regex, text: &str) -> Option<String> {
    let value = re.captures(text)?.get(1)?.as_str().trim();
    let value = value.trim_matches('`').trim();
    (!value.is_empty()).then(|| value.to_string())
}

pub static NAME_RULES: &[Rule<String>] = &[
    Rule {
        name: "label",
        apply: |text, _| capture(&NAME_LABEL_RE, text),
    },
    Rule {
        name: "label_en",
        apply: |text, _| capture(&NAME_LABEL_EN_RE, text),
    },
    Rule {
        name: "heading",
        apply: |text, _| capture(&HEADING_RE, text),
    },
];

pub static METHOD_RULES: &[Rule<String>] = &[Rule {
    name: "label",
    apply: |text, _| capture(&METHOD_LABEL_RE, text).map(|m| m.to_uppercase()),
}];

pub static ROUTE_RULES: &[Rule<String>] = &[
    Rule {
        name: "code_span",
        apply: |text, _| capture(&ROUTE_CODE_RE, text),
    },
    Rule {
        name: "bare_path",
        apply: |text, _| capture(&ROUTE_BARE_RE, text),
    },
];

pub static DESCRIPTION_RULES: &[Rule<String>] = &[Rule {
    name: "overview",
    apply: |text, _| capture(&OVERVIEW_RE, text),
}];

pub static TABLE_USAGE_RULES: &[Rule<Vec<ApiTableUsage>>] = &[
    Rule {
        name: "annotation",
        apply: table_from_annotation,
    },
    Rule {
        name: "from_clause",
        apply: table_from_sql,
    },
    Rule {
        name: "mention",
        apply: tables_from_mentions,
    },
];

/// `**表名**: `schema.table`` with exactly two dotted parts.
fn table_from_annotation(text: &str, _: &CompilerConfig) -> Option<Vec<ApiTableUsage>> {
    let full = capture(&TABLE_ANNOTATION_RE, text)?;
    let parts: Vec<&str> = full.split('.').map(str::trim).collect();
    match parts.as_slice() {
        [schema, table] if !schema.is_empty() && !table.is_empty() => {
            Some(vec![ApiTableUsage::new(*schema, *table)])
        }
        _ => None,
    }
}

/// `FROM schema.table` anywhere in the text, typically inside an embedded SQL sample.
fn table_from_sql(text: &str, _: &CompilerConfig) -> Option<Vec<ApiTableUsage>> {
    let caps = FROM_QUALIFIED_RE.captures(text)?;
    Some(vec![ApiTableUsage::new(&caps[1], &caps[2])])
}

/// Every `表: name` / `table: name` mention, under the configured fallback schema.
fn tables_from_mentions(text: &str, config: &CompilerConfig) -> Option<Vec<ApiTableUsage>> {
    let mut usages: Vec<ApiTableUsage> = Vec::new();
    for caps in TABLE_MENTION_RE.captures_iter(text) {
        let table = &caps[1];
        if !usages.iter().any(|u| u.table == table) {
            usages.push(ApiTableUsage::new(config.fallback_schema.as_str(), table));
        }
    }
    (!usages.is_empty()).then_some(usages)
}
