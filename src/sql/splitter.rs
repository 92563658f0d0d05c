//! Splits parameterized SQL into main projection, WHERE conditions and ORDER BY clause.
//!
//! Clause detection is a whole-string scan: the last `ORDER BY` and the first `WHERE` are taken
//! regardless of subqueries or string literals. Only the WHERE body tokenization is quote- and
//! parenthesis-aware.

use crate::model::{ApiCondition, Connector};
use crate::sql::tokenizer::{tokenize, Token};
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

static ORDER_BY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bORDER\s+BY\b").unwrap());
static WHERE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bWHERE\b").unwrap());
static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#\{([A-Za-z0-9_]+)\}").unwrap());

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SplitResult {
    pub main_sql: String,
    pub conditions: Vec<ApiCondition>,
    /// Includes the `ORDER BY` keywords; empty when absent.
    pub order_by: String,
    pub has_where: bool,
    pub has_order_by: bool,
}

pub fn split(sql: &str) -> SplitResult {
    let (body, order_by) = match ORDER_BY_RE.find_iter(sql).last() {
        Some(m) => (&sql[..m.start()], sql[m.start()..].trim()),
        None => (sql, ""),
    };

    let Some(where_kw) = WHERE_RE.find(body) else {
        return SplitResult {
            main_sql: body.trim().to_string(),
            conditions: Vec::new(),
            order_by: order_by.to_string(),
            has_where: false,
            has_order_by: !order_by.is_empty(),
        };
    };

    SplitResult {
        main_sql: body[..where_kw.start()].trim().to_string(),
        conditions: conditions_from(tokenize(body[where_kw.end()..].trim())),
        order_by: order_by.to_string(),
        has_where: true,
        has_order_by: !order_by.is_empty(),
    }
}

fn leading_run(s: &str, c: char) -> String {
    s.chars().take_while(|&ch| ch == c).collect()
}

fn trailing_run(s: &str, c: char) -> String {
    s.chars().rev().take_while(|&ch| ch == c).collect()
}

fn condition(fragment: &str, connector: Connector, order_no: u32) -> ApiCondition {
    let statement = fragment.trim();
    ApiCondition {
        statement: statement.to_string(),
        connector,
        open_parens: leading_run(statement, '('),
        close_parens: trailing_run(statement, ')'),
        param_name: PLACEHOLDER_RE
            .captures(statement)
            .map(|c| c[1].to_string()),
        order_no,
    }
}

/// Each fragment takes the connector seen before it; the first defaults to AND.
fn conditions_from(tokens: Vec<Token>) -> Vec<ApiCondition> {
    let mut conditions = Vec::new();
    let mut connector = Connector::And;
    let mut pending: Option<String> = None;
    let mut order_no = 0u32;

    for token in tokens {
        match token {
            Token::Connector(next) => {
                if let Some(fragment) = pending.take() {
                    conditions.push(condition(&fragment, connector, order_no));
                    order_no += 1;
                }
                connector = next;
            }
            Token::Fragment(text) => {
                pending = Some(match pending.take() {
                    Some(prev) => format!("{} {}", prev, text),
                    None => text,
                });
            }
        }
    }
    if let Some(fragment) = pending {
        conditions.push(condition(&fragment, connector, order_no));
    }
    conditions
}
