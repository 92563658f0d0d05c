//! Compiler configuration: every table-driven constant the extraction and synthesis rules consult.
//! Passed explicitly into each compilation; nothing here is process-wide state.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Column names used by the Chinese condition idioms when synthesizing a WHERE clause.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConditionColumns {
    /// Equality target for "编号为 X" / "code = X".
    pub code: String,
    /// LIKE target for "名称包含 X".
    pub name: String,
    /// Equality or LIKE target for "道路名称为 X".
    pub road: String,
}

impl Default for ConditionColumns {
    fn default() -> Self {
        ConditionColumns {
            code: "station_code".into(),
            name: "station_name".into(),
            road: "road_name".into(),
        }
    }
}

/// Store category (resource type name) per record kind.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreCategories {
    pub api: String,
    pub parameters: String,
    pub conditions: String,
    pub columns: String,
    pub column_usage: String,
}

impl Default for StoreCategories {
    fn default() -> Self {
        StoreCategories {
            api: "E9E0821DA2AF2F84-vbio".into(),
            parameters: "5FE8EE8DB6890877-vbio_parameters".into(),
            conditions: "612F85E52FEB1B64-vbio_conditions".into(),
            columns: "E25E49F06DA09BC7-vbio_columns".into(),
            column_usage: "9BE9D4B3321E3DEC-vbio_column_usage".into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    pub default_name: String,
    pub default_http_method: String,
    pub default_route_path: String,
    /// Characters of raw input used as the description when no overview section exists.
    pub description_fallback_chars: usize,
    pub api_type: String,
    pub result_type: String,
    pub auth_type: String,
    /// Schema assigned to tables found only by a bare `表:`/`table:` mention.
    pub fallback_schema: String,
    /// Lowercased declared type -> platform type.
    pub type_synonyms: BTreeMap<String, String>,
    /// Platform type for anything missing from `type_synonyms`.
    pub default_param_type: String,
    /// Business field name (as written in requirements) -> DB column.
    pub field_names: BTreeMap<String, String>,
    pub condition_columns: ConditionColumns,
    /// Predicate always appended to a synthesized WHERE clause.
    pub soft_delete_predicate: String,
    pub categories: StoreCategories,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        CompilerConfig {
            default_name: "Untitled API".into(),
            default_http_method: "GET".into(),
            default_route_path: "/api/unknown".into(),
            description_fallback_chars: 100,
            api_type: "query".into(),
            result_type: "json".into(),
            auth_type: "token".into(),
            fallback_schema: "vb_saas".into(),
            type_synonyms: pairs(&[
                ("string", "string"),
                ("number", "int"),
                ("integer", "int"),
                ("int", "int"),
                ("boolean", "bool"),
                ("bool", "bool"),
                ("array", "jsonarray"),
                ("object", "jsonobject"),
                ("date", "datetime"),
                ("datetime", "datetime"),
                ("timestamp", "timestamp"),
            ]),
            default_param_type: "string".into(),
            field_names: pairs(&[
                ("收费站编号", "station_code"),
                ("收费站名称", "station_name"),
                ("道路名称", "road_name"),
                ("编号", "code"),
                ("名称", "name"),
                ("创建时间", "created_at"),
                ("更新时间", "updated_at"),
            ]),
            condition_columns: ConditionColumns::default(),
            soft_delete_predicate: "deleted = false".into(),
            categories: StoreCategories::default(),
        }
    }
}

impl CompilerConfig {
    /// Map a declared type (e.g. "Integer", "boolean") to the platform type.
    pub fn map_type(&self, declared: &str) -> String {
        let key = declared.trim().to_lowercase();
        self.type_synonyms
            .get(&key)
            .cloned()
            .unwrap_or_else(|| self.default_param_type.clone())
    }

    /// Translate a business field name to its DB column, or return it unchanged.
    pub fn db_field_name<'a>(&'a self, field: &'a str) -> &'a str {
        self.field_names.get(field).map(String::as_str).unwrap_or(field)
    }
}

fn pairs(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
    entries
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}
