//! End-to-end behavior of the five compilation stages through the public API.

use apidef_compiler::{compile, extract, parameterize, split, ApiCompiler, CompilerConfig, Connector};
use rstest::rstest;

const ORDER_QUERY: &str = r#"## 订单查询

**请求方法**: `POST`
**接口路径**: `/api/orders`
"#;

#[test]
fn method_and_route_come_from_labels() {
    let extracted = extract(ORDER_QUERY, &CompilerConfig::default());
    assert_eq!(extracted.http_method, "POST");
    assert_eq!(extracted.route_path, "/api/orders");
    assert_eq!(extracted.name, "订单查询");
}

#[test]
fn method_and_route_default_when_absent() {
    let extracted = extract("查询所有订单", &CompilerConfig::default());
    assert_eq!(extracted.http_method, "GET");
    assert_eq!(extracted.route_path, "/api/unknown");
    assert_eq!(extracted.name, "Untitled API");
}

#[test]
fn table_annotation_wins() {
    let text = "**表名**: `vb_saas.toll_station`\n\n```sql\nSELECT * FROM other.t\n```";
    let extracted = extract(text, &CompilerConfig::default());
    assert_eq!(extracted.table_usages.len(), 1);
    assert_eq!(extracted.table_usages[0].schema, "vb_saas");
    assert_eq!(extracted.table_usages[0].table, "toll_station");
}

#[test]
fn literals_become_named_placeholders() {
    let result = parameterize(
        "SELECT id, name FROM t WHERE station_code = 'STA001' AND age > 10",
        &[],
    );
    assert_eq!(
        result.rewritten_sql,
        "SELECT id, name FROM t WHERE station_code = #{stationCode} AND age > #{age}"
    );
    let names: Vec<&str> = result.parameters.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["age", "stationCode"]);
}

#[test]
fn where_and_order_by_are_split_out() {
    let result = split("SELECT a FROM t WHERE x = #{x} AND y = #{y} ORDER BY a DESC");
    assert_eq!(result.main_sql, "SELECT a FROM t");
    assert_eq!(result.order_by, "ORDER BY a DESC");
    let conditions: Vec<(&str, Connector, Option<&str>, u32)> = result
        .conditions
        .iter()
        .map(|c| (c.statement.as_str(), c.connector, c.param_name.as_deref(), c.order_no))
        .collect();
    assert_eq!(
        conditions,
        [
            ("x = #{x}", Connector::And, Some("x"), 0),
            ("y = #{y}", Connector::And, Some("y"), 1),
        ]
    );
}

#[test]
fn missing_parameter_table_yields_no_parameters() {
    let extracted = extract(ORDER_QUERY, &CompilerConfig::default());
    assert!(extracted.parameters.is_empty());
    assert!(compile(ORDER_QUERY).parameters.is_empty());
}

#[test]
fn colliding_field_names_get_suffixes() {
    let result = parameterize("SELECT * FROM t WHERE code = 'A' OR code = 'B'", &[]);
    assert_eq!(result.rewritten_sql, "SELECT * FROM t WHERE code = #{code} OR code = #{code1}");
    let names: Vec<&str> = result.parameters.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["code1", "code"]);
}

const SYNTHESIZED: &str = r#"# 收费站列表

**表名**: `vb_saas.toll_station`

查询收费站编号为'STA001'的收费站，按收费站编号降序排列。

### 数据字段说明

| 字段 | 类型 | 说明 |
|------|------|------|
| stationCode | string | 收费站编号 |
| stationName | string | 收费站名称 |
"#;

#[test]
fn synthesized_sample_flows_through_every_stage() {
    let report = ApiCompiler::default().compile_with_report(SYNTHESIZED);
    assert_eq!(
        report.sample_sql,
        "SELECT station_code, station_name FROM vb_saas.toll_station WHERE station_code = 'STA001' AND deleted = false ORDER BY station_code DESC"
    );
    let record = report.config;
    assert_eq!(record.main_sql, "SELECT station_code, station_name FROM vb_saas.toll_station");
    assert_eq!(record.order_by_clause, "ORDER BY station_code DESC");
    assert_eq!(record.columns.len(), 2);
    assert_eq!(record.parameters[0].name, "stationCode");
    let statements: Vec<&str> = record.conditions.iter().map(|c| c.statement.as_str()).collect();
    assert_eq!(statements, ["station_code = #{stationCode}", "deleted = false"]);
}

#[rstest]
#[case(ORDER_QUERY)]
#[case(SYNTHESIZED)]
#[case("")]
#[case("```sql\nSELECT a FROM s.t WHERE a = 'x' AND (b = 1 OR c = 'y') ORDER BY a\n```")]
fn compilation_is_deterministic(#[case] text: &str) {
    let compiler = ApiCompiler::default();
    let first = compiler.compile_with_report(text);
    let second = compiler.compile_with_report(text);
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}
