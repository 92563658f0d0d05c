//! Builds a sample SELECT with literal values from the extracted table, columns and prose conditions.

use crate::case::to_snake_case;
use crate::config::CompilerConfig;
use crate::model::{ApiColumn, ApiTableUsage};
use regex::Regex;
use std::sync::LazyLock;

/// "收费站编号为STA001" / "code = STA001"
static CODE_IDIOM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(?:编号|code)(?:为|是|等于|=)\s*['"]?([A-Za-z0-9_]+)['"]?"#).unwrap()
});
/// "名称包含北京"
static NAME_IDIOM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(?:名称|name)(?:包含|含有|like)\s*['"]?([^'"，。\n]+)['"]?"#).unwrap()
});
/// "道路名称为京港澳高速" / "道路包含G4"
static ROAD_IDIOM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(?:道路|road)(?:名称|name)?(为|是|包含|=)\s*['"]?([^'"，。\n]+)['"]?"#).unwrap()
});
/// "按收费站编号升序排列" / "按照创建时间降序"
static ORDER_IDIOM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"按照?\s*([^\s，。]+?)\s*(?:升序|降序|排序|排列)").unwrap());

/// Projection: `*` when no columns were extracted, else each column name in snake_case.
pub fn select_list(columns: &[ApiColumn]) -> String {
    if columns.is_empty() {
        return "*".to_string();
    }
    columns
        .iter()
        .map(|c| to_snake_case(&c.name))
        .collect::<Vec<_>>()
        .join(", ")
}

/// WHERE predicates with sample values found in the prose, followed by the soft-delete predicate.
pub fn where_predicates(text: &str, config: &CompilerConfig) -> Vec<String> {
    let cols = &config.condition_columns;
    let mut parts = Vec::new();

    if let Some(caps) = CODE_IDIOM_RE.captures(text) {
        parts.push(format!("{} = '{}'", cols.code, &caps[1]));
    }
    // "道路名称包含.." belongs to the road idiom
    let station_name = NAME_IDIOM_RE.captures_iter(text).find(|caps| {
        let before = caps.get(0).map_or("", |m| &text[..m.start()]);
        !(before.ends_with("道路") || before.to_lowercase().ends_with("road"))
    });
    if let Some(caps) = station_name {
        parts.push(format!("{} LIKE '%{}%'", cols.name, caps[1].trim()));
    }
    if let Some(caps) = ROAD_IDIOM_RE.captures(text) {
        let value = caps[2].trim();
        if &caps[1] == "包含" || text.contains("模糊") {
            parts.push(format!("{} LIKE '%{}%'", cols.road, value));
        } else {
            parts.push(format!("{} = '{}'", cols.road, value));
        }
    }

    if !config.soft_delete_predicate.trim().is_empty() {
        parts.push(config.soft_delete_predicate.trim().to_string());
    }
    parts
}

/// ORDER BY body (without the keywords). The "按 <field> 升序/降序" idiom wins; otherwise the first
/// column named like a code or id, then the first column.
pub fn order_by(text: &str, columns: &[ApiColumn], config: &CompilerConfig) -> Option<String> {
    if let Some(caps) = ORDER_IDIOM_RE.captures(text) {
        let field = config.db_field_name(&caps[1]);
        return Some(if text.contains("降序") {
            format!("{} DESC", field)
        } else {
            field.to_string()
        });
    }
    columns
        .iter()
        .find(|c| {
            let lower = c.name.to_lowercase();
            lower.contains("code") || lower.contains("id")
        })
        .or_else(|| columns.first())
        .map(|c| to_snake_case(&c.name))
}

/// `SELECT <cols> FROM <schema.table> [WHERE ...] [ORDER BY ...]`
pub fn sample_select(
    text: &str,
    table: &ApiTableUsage,
    columns: &[ApiColumn],
    config: &CompilerConfig,
) -> String {
    let predicates = where_predicates(text, config);
    let where_clause = if predicates.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", predicates.join(" AND "))
    };
    let order_clause = order_by(text, columns, config)
        .map(|o| format!(" ORDER BY {}", o))
        .unwrap_or_default();
    format!(
        "SELECT {} FROM {}{}{}",
        select_list(columns),
        table.qualified_name(),
        where_clause,
        order_clause
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn column(name: &str) -> ApiColumn {
        ApiColumn {
            name: name.into(),
            column_type: "string".into(),
            ..Default::default()
        }
    }

    #[test]
    fn projection_is_star_or_snake_case() {
        assert_eq!(select_list(&[]), "*");
        assert_eq!(
            select_list(&[column("stationCode"), column("roadName")]),
            "station_code, road_name"
        );
    }

    #[test]
    fn idioms_become_predicates_before_soft_delete() {
        let text = "查询收费站编号为STA001的记录，名称包含北京，道路名称为京港澳高速。";
        assert_eq!(
            where_predicates(text, &CompilerConfig::default()),
            [
                "station_code = 'STA001'",
                "station_name LIKE '%北京%'",
                "road_name = '京港澳高速'",
                "deleted = false",
            ]
        );
    }

    #[test]
    fn road_containment_uses_like() {
        let text = "道路包含G4";
        assert_eq!(
            where_predicates(text, &CompilerConfig::default()),
            ["road_name LIKE '%G4%'", "deleted = false"]
        );
    }

    #[rstest]
    #[case("道路名称包含G4", &["road_name LIKE '%G4%'", "deleted = false"])]
    #[case("Roadname包含G4", &["road_name LIKE '%G4%'", "deleted = false"])]
    #[case(
        "道路名称包含G4，收费站名称包含北京",
        &["station_name LIKE '%北京%'", "road_name LIKE '%G4%'", "deleted = false"]
    )]
    fn road_name_is_not_a_station_name(#[case] text: &str, #[case] expected: &[&str]) {
        assert_eq!(where_predicates(text, &CompilerConfig::default()), expected);
    }

    #[test]
    fn order_idiom_accepts_an_zhao() {
        let config = CompilerConfig::default();
        assert_eq!(
            order_by("按照收费站编号升序", &[], &config).as_deref(),
            Some("station_code")
        );
        assert_eq!(
            order_by("请按照 创建时间 降序排列", &[], &config).as_deref(),
            Some("created_at DESC")
        );
    }

    #[test]
    fn order_idiom_translates_field_and_direction() {
        let config = CompilerConfig::default();
        assert_eq!(
            order_by("结果按收费站编号升序排列", &[], &config).as_deref(),
            Some("station_code")
        );
        assert_eq!(
            order_by("按创建时间降序", &[], &config).as_deref(),
            Some("created_at DESC")
        );
    }

    #[test]
    fn order_falls_back_to_code_or_id_column() {
        let config = CompilerConfig::default();
        let cols = [column("stationName"), column("stationCode")];
        assert_eq!(order_by("", &cols, &config).as_deref(), Some("station_code"));
        let cols = [column("name"), column("mileage")];
        assert_eq!(order_by("", &cols, &config).as_deref(), Some("name"));
        assert_eq!(order_by("", &[], &config), None);
    }

    #[test]
    fn sample_select_composes_all_clauses() {
        let sql = sample_select(
            "收费站编号为STA001",
            &ApiTableUsage::new("vb_saas", "toll_station"),
            &[column("stationCode")],
            &CompilerConfig::default(),
        );
        assert_eq!(
            sql,
            "SELECT station_code FROM vb_saas.toll_station WHERE station_code = 'STA001' AND deleted = false ORDER BY station_code"
        );
    }
}
