//! UPDATE assembler keyed on one column.

use std::fmt;
use std::marker::PhantomData;

use crate::config::BuilderConfig;
use crate::entity::Record;
use crate::error::{QbError, QbResult};
use crate::qb::param::ParamTable;
use crate::qb::template::{StatementKind, Template};
use crate::value::Value;

/// Default key column.
pub const DEFAULT_KEY: &str = "Id";

/// `UPDATE table SET col = @p1, ... WHERE key = @key` for one record.
pub struct UpdateBuilder<T: Record> {
    columns: Vec<(&'static str, Value)>,
    key: (&'static str, Value),
    config: BuilderConfig,
    _entity: PhantomData<fn() -> T>,
}

impl<T: Record> Clone for UpdateBuilder<T> {
    fn clone(&self) -> Self {
        Self {
            columns: self.columns.clone(),
            key: self.key.clone(),
            config: self.config.clone(),
            _entity: PhantomData,
        }
    }
}

impl<T: Record> fmt::Debug for UpdateBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpdateBuilder")
            .field("table", &T::TABLE)
            .field("columns", &self.columns)
            .field("key", &self.key)
            .finish()
    }
}

impl<T: Record> UpdateBuilder<T> {
    /// Update `record` by its `Id` column.
    pub fn new(record: &T) -> QbResult<Self> {
        Self::with_key(record, DEFAULT_KEY)
    }

    /// Update `record` by `key`.
    ///
    /// `key` must be one of the record's columns, and at least one other
    /// column must remain to be set.
    pub fn with_key(record: &T, key: &str) -> QbResult<Self> {
        let values = record.values();
        if values.len() != T::COLUMNS.len() {
            return Err(QbError::construction(format!(
                "{} produced {} values for {} columns",
                T::NAME,
                values.len(),
                T::COLUMNS.len()
            )));
        }

        let mut key_entry = None;
        let mut columns = Vec::with_capacity(values.len());
        for (col, value) in T::COLUMNS.iter().copied().zip(values) {
            if col == key {
                key_entry = Some((col, value));
            } else {
                columns.push((col, value));
            }
        }

        let key = key_entry.ok_or_else(|| {
            QbError::construction(format!("{} has no key column '{}'", T::NAME, key))
        })?;
        if columns.is_empty() {
            return Err(QbError::construction(format!(
                "{} has no columns to update besides '{}'",
                T::NAME,
                key.0
            )));
        }

        Ok(Self {
            columns,
            key,
            config: BuilderConfig::default(),
            _entity: PhantomData,
        })
    }

    pub fn with_config(mut self, config: BuilderConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build_update(&self) -> QbResult<Template> {
        let mut params = ParamTable::new();
        let set: Vec<String> = self
            .columns
            .iter()
            .map(|(col, v)| {
                let name = params.bind(v.clone());
                format!("{} = {}", col, self.config.placeholder(&name))
            })
            .collect();
        params.bind_named("key", self.key.1.clone());

        let sql = format!(
            "UPDATE {} SET {} WHERE {} = {}",
            T::TABLE,
            set.join(", "),
            self.key.0,
            self.config.placeholder("key")
        );
        Template::finish(sql, params, StatementKind::Update, &self.config)
    }
}
