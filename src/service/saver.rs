//! Persists a compiled record into a resource store: one top-level row, then one row per
//! parameter, condition, column and table usage, each linked back with `VBIOMid`.

use crate::config::StoreCategories;
use crate::error::StoreError;
use crate::model::{ApiColumn, ApiCondition, ApiParameter, ApiTableUsage, ParsedApiConfig};
use crate::store::{Fields, ResourceStore};
use serde::Serialize;
use serde_json::{json, Value};

/// Parent link field on every child row.
pub const PARENT_ID_FIELD: &str = "VBIOMid";
pub const PARTITION_FIELD: &str = "_PartId";

/// Ids assigned by the store, in the order the rows were written.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedApiConfig {
    pub api_id: String,
    pub parameter_ids: Vec<String>,
    pub condition_ids: Vec<String>,
    pub column_ids: Vec<String>,
    pub table_usage_ids: Vec<String>,
}

pub struct ApiConfigSaver<'a, S: ResourceStore + ?Sized> {
    store: &'a S,
    categories: &'a StoreCategories,
    partition_id: String,
}

fn into_fields(value: Value) -> Fields {
    match value {
        Value::Object(map) => map,
        _ => Fields::new(),
    }
}

fn api_fields(config: &ParsedApiConfig) -> Value {
    json!({
        "Name": config.name,
        "Description": config.description,
        "ApiType": config.api_type,
        "HttpMethod": config.http_method,
        "RoutePath": config.route_path,
        "ResultType": config.result_type,
        "AuthType": config.auth_type,
        "ApiSql": config.main_sql,
        "ApiSqlOrderBy": config.order_by_clause,
        "CountSql": config.count_sql,
        "ApiResponseWrapper": config.api_response_wrapper,
    })
}

fn parameter_fields(p: &ApiParameter) -> Value {
    json!({
        "Name": p.name,
        "ParamName": p.name,
        "ParamType": p.param_type,
        "ArrayType": p.is_array,
        "Required": p.required,
        "NotNullable": p.not_nullable,
        "ParamDefault": p.default_value.as_deref().unwrap_or(""),
        "ParamIn": p.location.as_str(),
        "ValidationRule": p.validation_rule.as_deref().unwrap_or(""),
        "ParamDesc": p.description,
    })
}

/// Conditions are named `条件1`, `条件2`, ... by position.
fn condition_fields(c: &ApiCondition, position: usize) -> Value {
    json!({
        "Name": format!("条件{}", position + 1),
        "CondStatement": c.statement,
        "CondConnector": c.connector.as_str(),
        "OpenParenthesis": c.open_parens,
        "CloseParenthesis": c.close_parens,
        "ParamName": c.param_name.as_deref().unwrap_or(""),
        "OrderNo": c.order_no,
    })
}

fn column_fields(c: &ApiColumn) -> Value {
    json!({
        "Name": c.name,
        "ColumnName": c.name,
        "ColumnDesc": c.description,
        "ColumnType": c.column_type,
        "ArrayType": c.is_array,
        "ColumnFormat": c.format,
    })
}

fn table_usage_fields(t: &ApiTableUsage) -> Value {
    json!({
        "Name": t.table,
        "TableSchema": t.schema,
        "TableName": t.table,
        "ResourceId": t.resource_id.as_deref().unwrap_or(""),
        "ColumnId": t.column_id.unwrap_or(0),
    })
}

impl<'a, S: ResourceStore + ?Sized> ApiConfigSaver<'a, S> {
    pub fn new(store: &'a S, categories: &'a StoreCategories, partition_id: impl Into<String>) -> Self {
        Self {
            store,
            categories,
            partition_id: partition_id.into(),
        }
    }

    async fn put(&self, category: &str, value: Value, parent: Option<&str>) -> Result<String, StoreError> {
        let mut fields = into_fields(value);
        if let Some(parent) = parent {
            fields.insert(PARENT_ID_FIELD.to_string(), Value::String(parent.to_string()));
        }
        fields.insert(PARTITION_FIELD.to_string(), Value::String(self.partition_id.clone()));
        let id = self.store.store(category, fields).await?;
        if parent.is_some() {
            tracing::debug!(category = %category, id = %id, "stored child row");
        }
        Ok(id)
    }

    /// Writes the top-level record first; the first store failure aborts and is returned.
    /// Rows written before the failure are left in the store.
    pub async fn save(&self, config: &ParsedApiConfig) -> Result<SavedApiConfig, StoreError> {
        let cats = self.categories;
        let api_id = self.put(&cats.api, api_fields(config), None).await?;
        let parent = Some(api_id.as_str());

        let mut saved = SavedApiConfig {
            api_id: api_id.clone(),
            ..Default::default()
        };
        for p in &config.parameters {
            saved
                .parameter_ids
                .push(self.put(&cats.parameters, parameter_fields(p), parent).await?);
        }
        for (i, c) in config.conditions.iter().enumerate() {
            saved
                .condition_ids
                .push(self.put(&cats.conditions, condition_fields(c, i), parent).await?);
        }
        for c in &config.columns {
            saved
                .column_ids
                .push(self.put(&cats.columns, column_fields(c), parent).await?);
        }
        for t in &config.table_usages {
            saved
                .table_usage_ids
                .push(self.put(&cats.column_usage, table_usage_fields(t), parent).await?);
        }

        tracing::info!(
            api_id = %api_id,
            name = %config.name,
            parameters = saved.parameter_ids.len(),
            conditions = saved.condition_ids.len(),
            columns = saved.column_ids.len(),
            table_usages = saved.table_usage_ids.len(),
            "saved api definition"
        );
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Connector;

    #[test]
    fn condition_rows_are_numbered_from_one() {
        let c = ApiCondition {
            statement: "(a = #{a}".into(),
            connector: Connector::Or,
            open_parens: "(".into(),
            param_name: Some("a".into()),
            order_no: 2,
            ..Default::default()
        };
        let fields = condition_fields(&c, 2);
        assert_eq!(fields["Name"], "条件3");
        assert_eq!(fields["CondConnector"], "OR");
        assert_eq!(fields["OpenParenthesis"], "(");
        assert_eq!(fields["CloseParenthesis"], "");
        assert_eq!(fields["OrderNo"], 2);
    }

    #[test]
    fn missing_optional_parameter_fields_store_as_empty() {
        let p = ApiParameter {
            name: "age".into(),
            param_type: "int".into(),
            ..Default::default()
        };
        let fields = parameter_fields(&p);
        assert_eq!(fields["ParamName"], "age");
        assert_eq!(fields["ParamDefault"], "");
        assert_eq!(fields["ParamIn"], "query");
        assert_eq!(fields["Required"], false);
    }

    #[test]
    fn table_usage_row_is_named_after_the_table() {
        let fields = table_usage_fields(&ApiTableUsage::new("vb_saas", "road"));
        assert_eq!(fields["Name"], "road");
        assert_eq!(fields["TableSchema"], "vb_saas");
        assert_eq!(fields["ResourceId"], "");
        assert_eq!(fields["ColumnId"], 0);
    }

    #[test]
    fn resolved_table_usage_ids_are_kept() {
        let usage = ApiTableUsage {
            resource_id: Some("res-1".into()),
            column_id: Some(42),
            ..ApiTableUsage::new("vb_saas", "road")
        };
        let fields = table_usage_fields(&usage);
        assert_eq!(fields["ResourceId"], "res-1");
        assert_eq!(fields["ColumnId"], 42);
    }
}
