//! Markdown pipe-table sections: declared request parameters and returned columns.

use crate::config::CompilerConfig;
use crate::model::{ApiColumn, ApiParameter, ParamLocation};
use regex::Regex;
use std::sync::LazyLock;

/// Parameter table sections, tried in order.
static PARAMETER_SECTIONS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)#{2,4}[ \t]*Query Parameters[^\n]*\n([\s\S]*?)(?:\n##|\z)",
        r"(?i)#{2,4}[ \t]*请求参数[^\n]*\n([\s\S]*?)(?:\n##|\z)",
        r"(?i)#{2,4}[ \t]*Request Parameters[^\n]*\n([\s\S]*?)(?:\n##|\z)",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// Per-row business fields of a paged list response.
static LIST_ELEMENT_SECTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)#{3,4}[ \t]*list[ \t]*数组元素[^\n]*\n([\s\S]*?)(?:\n#|\z)").unwrap()
});
static FIELD_SECTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"#{2,3}[ \t]*(?:数据字段说明|响应字段|返回字段)[^\n]*\n([\s\S]*?)(?:\n#|\z)").unwrap()
});

/// A separator row such as `|------|:---:|`.
fn is_separator(line: &str) -> bool {
    line.contains("--") && line.chars().all(|c| matches!(c, '|' | '-' | ':' | ' ' | '\t'))
}

fn cells(line: &str) -> Vec<String> {
    line.split('|')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect()
}

/// Data rows of the first pipe table in `block`. Blank lines are skipped, exactly one header row is
/// dropped, rows are only collected after the separator, and the first non-table line after it ends the table.
pub(crate) fn parse_pipe_table(block: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut in_table = false;
    let mut header_seen = false;
    for line in block.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if !line.contains('|') {
            if in_table {
                break;
            }
            continue;
        }
        if is_separator(line) {
            in_table = true;
            continue;
        }
        if !header_seen {
            header_seen = true;
            continue;
        }
        if in_table {
            rows.push(cells(line));
        }
    }
    rows
}

fn section<'t>(re: &Regex, text: &'t str) -> Option<&'t str> {
    re.captures(text).and_then(|c| c.get(1)).map(|m| m.as_str())
}

/// Declared parameters: rows of `| name | type | required | description |`.
pub fn extract_parameters(text: &str, config: &CompilerConfig) -> Vec<ApiParameter> {
    let Some(block) = PARAMETER_SECTIONS.iter().find_map(|re| section(re, text)) else {
        return Vec::new();
    };
    parse_pipe_table(block)
        .into_iter()
        .filter(|row| row.len() >= 4)
        .map(|row| ApiParameter {
            name: row[0].clone(),
            param_type: config.map_type(&row[1]),
            required: row[2] == "是" || row[2].eq_ignore_ascii_case("true"),
            description: row[3].clone(),
            location: ParamLocation::Query,
            ..Default::default()
        })
        .collect()
}

fn columns_from(block: &str, config: &CompilerConfig) -> Vec<ApiColumn> {
    parse_pipe_table(block)
        .into_iter()
        .filter(|row| row.len() >= 3)
        .map(|row| ApiColumn {
            name: row[0].clone(),
            column_type: config.map_type(&row[1]),
            description: row[2].clone(),
            ..Default::default()
        })
        .collect()
}

/// Returned columns: the list-element section when it yields rows, else the generic field section.
pub fn extract_columns(text: &str, config: &CompilerConfig) -> Vec<ApiColumn> {
    if let Some(block) = section(&LIST_ELEMENT_SECTION, text) {
        let columns = columns_from(block, config);
        if !columns.is_empty() {
            return columns;
        }
    }
    section(&FIELD_SECTION, text)
        .map(|block| columns_from(block, config))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PARAMS: &str = "\
## 请求参数

以下为查询参数:

| 参数名 | 类型 | 必填 | 说明 |
|--------|------|------|------|
| stationCode | string | 是 | 收费站编号 |
| page | integer | false | 页码 |
| size | number | TRUE | 每页条数 |
| broken | string | 否 |

## 响应
";

    #[test]
    fn parameter_rows_need_four_cells() {
        let params = extract_parameters(PARAMS, &CompilerConfig::default());
        let names: Vec<&str> = params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["stationCode", "page", "size"]);
        assert!(params[0].required);
        assert!(!params[1].required);
        assert!(params[2].required);
        assert_eq!(params[1].param_type, "int");
        assert_eq!(params[0].description, "收费站编号");
        assert_eq!(params[0].location, ParamLocation::Query);
    }

    #[test]
    fn no_parameter_section_means_no_parameters() {
        assert!(extract_parameters("# API\n\n无参数", &CompilerConfig::default()).is_empty());
    }

    #[test]
    fn list_elements_win_over_field_section() {
        let text = "\
### 响应字段

| 字段 | 类型 | 说明 |
|---|---|---|
| code | number | 状态码 |
| data | object | 数据 |

#### list 数组元素

| 字段 | 类型 | 说明 |
|---|---|---|
| stationCode | string | 收费站编号 |
| roadName | string | 道路名称 |
";
        let columns = extract_columns(text, &CompilerConfig::default());
        let names: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["stationCode", "roadName"]);
    }

    #[test]
    fn field_section_is_the_fallback() {
        let text = "\
## 返回字段

| 字段 | 类型 | 说明 |
|---|---|---|
| id | integer | 主键 |
| createdAt | datetime | 创建时间 |
";
        let columns = extract_columns(text, &CompilerConfig::default());
        assert_eq!(columns.len(), 2);
        assert_eq!(columns[0].column_type, "int");
        assert_eq!(columns[1].column_type, "datetime");
        assert_eq!(columns[1].description, "创建时间");
    }

    #[test]
    fn separator_detection_ignores_dashes_in_cells() {
        assert!(is_separator("|---|:---:|---|"));
        assert!(!is_separator("| a--b | string | x |"));
    }
}
