//! Case conversion between SQL column names (snake_case) and API parameter names (camelCase).

/// Convert a snake_case identifier to camelCase.
/// Only an underscore followed by a lowercase ASCII letter is folded: "station_code" -> "stationCode",
/// while "level_2" keeps its underscore.
pub fn to_camel_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '_' {
            if let Some(next) = chars.peek().copied().filter(|n| n.is_ascii_lowercase()) {
                out.push(next.to_ascii_uppercase());
                chars.next();
                continue;
            }
        }
        out.push(c);
    }
    out
}

/// Convert a camelCase identifier to snake_case by inserting `_` before every uppercase letter.
/// e.g. "stationCode" -> "station_code", "createdAt" -> "created_at"
pub fn to_snake_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 4);
    for c in s.chars() {
        if c.is_uppercase() {
            out.push('_');
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Derive an API parameter name from a SQL field reference:
/// quotes are dropped, a leading `schema.`/`alias.` qualifier is stripped, then snake_case becomes camelCase.
pub fn field_to_param_name(field: &str) -> String {
    let unquoted: String = field.chars().filter(|c| !matches!(c, '\'' | '"' | '`')).collect();
    let bare = match unquoted.split_once('.') {
        Some((qualifier, rest))
            if !qualifier.is_empty() && qualifier.chars().all(|c| c.is_alphanumeric() || c == '_') =>
        {
            rest
        }
        _ => unquoted.as_str(),
    };
    to_camel_case(bare)
}

/// Lowercase and drop underscores, so "station_code" and "stationCode" compare equal.
pub fn normalize_identifier(s: &str) -> String {
    s.chars().filter(|c| *c != '_').flat_map(char::to_lowercase).collect()
}
