//! Debug logging of built statements.
//!
//! With the `tracing` feature enabled every successfully built [`Template`] is
//! emitted as a DEBUG event on target `sqlfold.sql`, and alias overwrites as
//! DEBUG events on target `sqlfold.alias`. Without the feature these functions
//! compile to nothing.

use crate::config::BuilderConfig;
use crate::qb::Template;

pub(crate) fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}

fn display_sql(sql: &str, max: Option<usize>) -> String {
    match max {
        Some(max) if sql.len() > max => format!("{}...", truncate_sql_bytes(sql, max)),
        _ => sql.to_string(),
    }
}

/// `p1:int, p2:text, ...`; values themselves are never logged.
fn param_kinds(template: &Template) -> String {
    template
        .params()
        .iter()
        .map(|(name, value)| format!("{name}:{}", value.kind()))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(feature = "tracing")]
pub(crate) fn built(template: &Template, config: &BuilderConfig) {
    if !tracing::enabled!(target: "sqlfold.sql", tracing::Level::DEBUG) {
        return;
    }
    let sql = display_sql(template.sql(), config.max_logged_sql);
    let params = display_sql(&param_kinds(template), config.max_logged_sql);
    tracing::debug!(
        target: "sqlfold.sql",
        kind = ?template.kind(),
        param_count = template.params().len(),
        params = %params,
        sql = %sql,
    );
}

#[cfg(not(feature = "tracing"))]
pub(crate) fn built(template: &Template, config: &BuilderConfig) {
    let _ = (template, config, display_sql, param_kinds);
}

#[cfg(feature = "tracing")]
pub(crate) fn alias_overwritten(entity: &str, previous: &str, alias: &str) {
    tracing::debug!(target: "sqlfold.alias", entity, previous, alias, "alias re-registered");
}

#[cfg(not(feature = "tracing"))]
pub(crate) fn alias_overwritten(entity: &str, previous: &str, alias: &str) {
    let _ = (entity, previous, alias);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qb::{ParamTable, StatementKind};

    #[test]
    fn test_truncate_respects_char_boundary() {
        assert_eq!(truncate_sql_bytes("SELECT 1", 100), "SELECT 1");
        assert_eq!(truncate_sql_bytes("héllo", 2), "h");
    }

    #[test]
    fn test_param_kinds_lists_names_and_types() {
        let mut params = ParamTable::new();
        params.bind(1);
        params.bind("secret");
        params.bind_named("offset", 0i64);
        let t = Template::new("SELECT 1".into(), params, StatementKind::Select);
        let kinds = param_kinds(&t);
        assert_eq!(kinds, "p1:int, p2:text, offset:bigint");
        assert!(!kinds.contains("secret"));
    }

    #[test]
    fn test_display_sql() {
        assert_eq!(display_sql("SELECT * FROM Users", Some(6)), "SELECT...");
        assert_eq!(display_sql("SELECT * FROM Users", None), "SELECT * FROM Users");
    }
}
