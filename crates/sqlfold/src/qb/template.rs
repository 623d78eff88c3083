//! Built statement artifact.

use std::fmt;

use serde::Serialize;

use crate::config::BuilderConfig;
use crate::error::{QbError, QbResult};
use crate::monitor;
use crate::qb::param::ParamTable;
use crate::value::Value;

/// Which builder call produced a [`Template`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementKind {
    Select,
    Count,
    Insert,
    InsertIfNotExists,
    Update,
}

/// Raw SQL text plus its named parameters.
///
/// Immutable once built. Parameter names are stored without the prefix that
/// appears in `sql` (`p1` in the table, `@p1` in the text).
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Template {
    sql: String,
    params: ParamTable,
    kind: StatementKind,
}

impl Template {
    pub(crate) fn new(sql: String, params: ParamTable, kind: StatementKind) -> Self {
        Self { sql, params, kind }
    }

    /// Enforce the parameter limit, log, and wrap up a built statement.
    pub(crate) fn finish(
        sql: String,
        params: ParamTable,
        kind: StatementKind,
        config: &BuilderConfig,
    ) -> QbResult<Self> {
        if let Some(limit) = config.max_params {
            if params.len() > limit {
                return Err(QbError::TooManyParameters {
                    count: params.len(),
                    limit,
                });
            }
        }
        let template = Self::new(sql, params, kind);
        monitor::built(&template, config);
        Ok(template)
    }

    /// The raw statement text.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Bound parameters in binding order.
    pub fn params(&self) -> &ParamTable {
        &self.params
    }

    /// Look up one parameter (name without prefix).
    pub fn param(&self, name: &str) -> Option<&Value> {
        self.params.get(name)
    }

    pub fn kind(&self) -> StatementKind {
        self.kind
    }

    /// Split into SQL text and parameter table.
    pub fn into_parts(self) -> (String, ParamTable) {
        (self.sql, self.params)
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}
