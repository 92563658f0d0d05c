//! API definition record types produced by the compiler.

use serde::{Deserialize, Serialize};

/// Where an API parameter is read from in the incoming request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamLocation {
    #[default]
    Query,
    Body,
    Path,
    Header,
}

impl ParamLocation {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParamLocation::Query => "query",
            ParamLocation::Body => "body",
            ParamLocation::Path => "path",
            ParamLocation::Header => "header",
        }
    }
}

/// Boolean connector joining a WHERE fragment to the one before it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Connector {
    #[default]
    And,
    Or,
}

impl Connector {
    pub fn as_str(&self) -> &'static str {
        match self {
            Connector::And => "AND",
            Connector::Or => "OR",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiParameter {
    pub name: String,
    /// Platform type name: string, int, bool, datetime, jsonarray, ...
    #[serde(rename = "type")]
    pub param_type: String,
    pub is_array: bool,
    pub required: bool,
    pub not_nullable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    pub location: ParamLocation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_rule: Option<String>,
    pub description: String,
}

/// One WHERE fragment. `statement` keeps the fragment text as written, parentheses included;
/// `open_parens`/`close_parens` record its leading and trailing parenthesis runs.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiCondition {
    pub statement: String,
    pub connector: Connector,
    pub open_parens: String,
    pub close_parens: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub param_name: Option<String>,
    pub order_no: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiColumn {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: String,
    pub is_array: bool,
    pub format: String,
    pub description: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiTableUsage {
    pub schema: String,
    pub table: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_id: Option<i64>,
}

impl ApiTableUsage {
    pub fn new(schema: impl Into<String>, table: impl Into<String>) -> Self {
        ApiTableUsage {
            schema: schema.into(),
            table: table.into(),
            resource_id: None,
            column_id: None,
        }
    }

    /// "schema.table"
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.schema, self.table)
    }
}

/// The API definition record handed to the metadata store.
/// `main_sql` never carries the WHERE or ORDER BY clauses; those live in `conditions` and `order_by_clause`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedApiConfig {
    pub name: String,
    pub description: String,
    pub http_method: String,
    pub route_path: String,
    pub api_type: String,
    pub result_type: String,
    pub auth_type: String,
    pub main_sql: String,
    pub order_by_clause: String,
    #[serde(default)]
    pub count_sql: String,
    #[serde(default)]
    pub api_response_wrapper: String,
    pub parameters: Vec<ApiParameter>,
    pub conditions: Vec<ApiCondition>,
    pub columns: Vec<ApiColumn>,
    pub table_usages: Vec<ApiTableUsage>,
}

impl ParsedApiConfig {
    /// Reassemble the parameterized query from its parts: main SQL, connector-joined conditions, ORDER BY.
    pub fn full_sql(&self) -> String {
        let mut sql = self.main_sql.clone();
        for (i, cond) in self.conditions.iter().enumerate() {
            if i == 0 {
                sql.push_str(" WHERE ");
            } else {
                sql.push(' ');
                sql.push_str(cond.connector.as_str());
                sql.push(' ');
            }
            sql.push_str(&cond.statement);
        }
        if !self.order_by_clause.is_empty() {
            sql.push(' ');
            sql.push_str(&self.order_by_clause);
        }
        sql
    }
}
