use crate::error::StoreError;

/// Get a required column value from a row, returning CorruptRow on failure.
pub fn get<T: rusqlite::types::FromSql>(
    row: &rusqlite::Row<'_>,
    idx: usize,
    table: &'static str,
    column: &'static str,
) -> Result<T, StoreError> {
    row.get(idx).map_err(|e| StoreError::CorruptRow {
        table,
        column,
        detail: e.to_string(),
    })
}

/// Get a nullable column value.
pub fn get_opt<T: rusqlite::types::FromSql>(
    row: &rusqlite::Row<'_>,
    idx: usize,
    table: &'static str,
    column: &'static str,
) -> Result<Option<T>, StoreError> {
    get(row, idx, table, column)
}

/// Parse a JSON text column.
pub fn parse_json(
    raw: &str,
    table: &'static str,
    column: &'static str,
) -> Result<serde_json::Value, StoreError> {
    serde_json::from_str(raw).map_err(|e| StoreError::CorruptRow {
        table,
        column,
        detail: format!("invalid JSON: {e}"),
    })
}

pub fn parse_enum<T: std::str::FromStr>(
    raw: &str,
    table: &'static str,
    column: &'static str,
) -> Result<T, StoreError> {
    raw.parse().map_err(|_| StoreError::CorruptRow {
        table,
        column,
        detail: format!("unknown variant: {raw}"),
    })
}

/// Escape LIKE wildcards; pair with `ESCAPE '\'` in the query.
pub fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// `%term%` with wildcards in `term` escaped.
pub fn contains_pattern(term: &str) -> String {
    format!("%{}%", escape_like(term))
}

#[cfg(test)]
mod tests {
    use super::*;
    use zonewise_core::turns::Role;

    #[test]
    fn escape_like_special_chars() {
        assert_eq!(escape_like("r-1"), "r-1");
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("RU_1"), "RU\\_1");
        assert_eq!(escape_like("back\\slash"), "back\\\\slash");
    }

    #[test]
    fn contains_pattern_wraps() {
        assert_eq!(contains_pattern("pud"), "%pud%");
        assert_eq!(contains_pattern("a_b"), "%a\\_b%");
    }

    #[test]
    fn parse_enum_roles() {
        let role: Role = parse_enum("assistant", "chat_messages", "role").unwrap();
        assert_eq!(role, Role::Assistant);
        let bad: Result<Role, _> = parse_enum("system", "chat_messages", "role");
        assert!(matches!(
            bad,
            Err(StoreError::CorruptRow { table: "chat_messages", column: "role", .. })
        ));
    }

    #[test]
    fn parse_json_failure() {
        assert_eq!(parse_json("[]", "chat_messages", "artifacts").unwrap(), serde_json::json!([]));
        assert!(matches!(
            parse_json("not json", "chat_messages", "artifacts"),
            Err(StoreError::CorruptRow { column: "artifacts", .. })
        ));
    }
}
