//! INSERT assembler: single row, batch and insert-if-not-exists.

use std::fmt;
use std::marker::PhantomData;

use crate::config::BuilderConfig;
use crate::entity::Record;
use crate::error::{QbError, QbResult};
use crate::ident::param_name;
use crate::qb::param::ParamTable;
use crate::qb::template::{StatementKind, Template};
use crate::value::Value;

/// Builds INSERT statements for one or more records of the same type.
///
/// Columns come from [`Entity::COLUMNS`](crate::Entity::COLUMNS) in
/// declaration order; each row contributes one parenthesized tuple of
/// parameters in that order.
pub struct InsertBuilder<T: Record> {
    rows: Vec<Vec<Value>>,
    config: BuilderConfig,
    _entity: PhantomData<fn() -> T>,
}

impl<T: Record> Clone for InsertBuilder<T> {
    fn clone(&self) -> Self {
        Self {
            rows: self.rows.clone(),
            config: self.config.clone(),
            _entity: PhantomData,
        }
    }
}

impl<T: Record> fmt::Debug for InsertBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InsertBuilder")
            .field("table", &T::TABLE)
            .field("columns", &T::COLUMNS)
            .field("rows", &self.rows)
            .finish()
    }
}

impl<T: Record> InsertBuilder<T> {
    /// Insert a single record.
    pub fn new(record: &T) -> QbResult<Self> {
        Self::batch(std::iter::once(record))
    }

    /// Insert several records in one statement.
    ///
    /// Fails with a construction error when `records` is empty, when `T` has
    /// no readable columns, or when a record yields a value count that does
    /// not match its column list.
    pub fn batch<'r, I>(records: I) -> QbResult<Self>
    where
        I: IntoIterator<Item = &'r T>,
        T: 'r,
    {
        if T::COLUMNS.is_empty() {
            return Err(QbError::construction(format!(
                "{} has no readable fields",
                T::NAME
            )));
        }

        let rows = records
            .into_iter()
            .map(|record| {
                let values = record.values();
                if values.len() != T::COLUMNS.len() {
                    return Err(QbError::construction(format!(
                        "{} produced {} values for {} columns",
                        T::NAME,
                        values.len(),
                        T::COLUMNS.len()
                    )));
                }
                Ok(values)
            })
            .collect::<QbResult<Vec<_>>>()?;

        if rows.is_empty() {
            return Err(QbError::construction("entity batch cannot be empty"));
        }

        Ok(Self {
            rows,
            config: BuilderConfig::default(),
            _entity: PhantomData,
        })
    }

    pub fn with_config(mut self, config: BuilderConfig) -> Self {
        self.config = config;
        self
    }

    /// Number of rows this builder inserts.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn insert_sql(&self, params: &mut ParamTable) -> String {
        let tuples: Vec<String> = self
            .rows
            .iter()
            .map(|row| {
                let placeholders: Vec<String> = row
                    .iter()
                    .map(|v| self.config.placeholder(&params.bind(v.clone())))
                    .collect();
                format!("({})", placeholders.join(", "))
            })
            .collect();

        format!(
            "INSERT INTO {} ({}) VALUES {}",
            T::TABLE,
            T::COLUMNS.join(", "),
            tuples.join(", ")
        )
    }

    /// `INSERT INTO table (cols) VALUES (...), (...)`.
    pub fn build_insert(&self) -> QbResult<Template> {
        let mut params = ParamTable::new();
        let sql = self.insert_sql(&mut params);
        Template::finish(sql, params, StatementKind::Insert, &self.config)
    }

    /// Insert only when no row of the target table matches `where_sql`.
    ///
    /// `where_params` are bound first under their own names (a leading `@`
    /// is accepted), so `where_sql` can reference them; the row values get
    /// counter names that skip any name already taken.
    ///
    /// ```ignore
    /// let t = InsertBuilder::new(&user)?
    ///     .find_one_insert("Name = @name", [("name", "alice")])?;
    /// // IF NOT EXISTS (SELECT 1 FROM Users WHERE Name = @name) BEGIN INSERT INTO ... END
    /// ```
    pub fn find_one_insert<I, K, V>(&self, where_sql: &str, where_params: I) -> QbResult<Template>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        let where_sql = where_sql.trim();
        if where_sql.is_empty() {
            return Err(QbError::validation(
                "find_one_insert requires a non-empty WHERE condition",
            ));
        }

        let mut params = ParamTable::new();
        for (name, value) in where_params {
            let name = param_name(name.as_ref())?;
            params.bind_named(&name, value);
        }

        let insert = self.insert_sql(&mut params);
        let sql = format!(
            "IF NOT EXISTS (SELECT 1 FROM {} WHERE {}) BEGIN {} END",
            T::TABLE,
            where_sql,
            insert
        );
        Template::finish(sql, params, StatementKind::InsertIfNotExists, &self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::fixtures::{Marker, User};

    fn alice() -> User {
        User {
            id: 1,
            name: "alice".to_string(),
            role_id: 2,
        }
    }

    #[test]
    fn test_single_insert() {
        let t = InsertBuilder::new(&alice()).unwrap().build_insert().unwrap();
        assert_eq!(
            t.sql(),
            "INSERT INTO Users (Id, Name, RoleId) VALUES (@p1, @p2, @p3)"
        );
        assert_eq!(t.param("p2"), Some(&Value::Text("alice".into())));
        assert_eq!(t.kind(), StatementKind::Insert);
    }

    #[test]
    fn test_empty_batch_is_construction_error() {
        let none: Vec<User> = Vec::new();
        let err = InsertBuilder::batch(&none).unwrap_err();
        assert!(err.is_construction());
    }

    #[test]
    fn test_no_columns_is_construction_error() {
        let err = InsertBuilder::new(&Marker).unwrap_err();
        assert!(err.is_construction());
        assert!(err.to_string().contains("Marker"));
    }

    #[test]
    fn test_find_one_insert_binds_where_params_first() {
        let t = InsertBuilder::new(&alice())
            .unwrap()
            .find_one_insert("Name = @name", [("@name", "alice")])
            .unwrap();
        assert_eq!(
            t.sql(),
            "IF NOT EXISTS (SELECT 1 FROM Users WHERE Name = @name) BEGIN \
             INSERT INTO Users (Id, Name, RoleId) VALUES (@p1, @p2, @p3) END"
        );
        let names: Vec<_> = t.params().names().collect();
        assert_eq!(names, vec!["name", "p1", "p2", "p3"]);
    }

    #[test]
    fn test_find_one_insert_skips_caller_counter_names() {
        let t = InsertBuilder::new(&alice())
            .unwrap()
            .find_one_insert("Id = @p1", [("p1", 1)])
            .unwrap();
        let names: Vec<_> = t.params().names().collect();
        assert_eq!(names, vec!["p1", "p2", "p3", "p4"]);
        assert!(t.sql().ends_with("VALUES (@p2, @p3, @p4) END"));
    }

    #[test]
    fn test_find_one_insert_rejects_blank_condition() {
        let builder = InsertBuilder::new(&alice()).unwrap();
        let err = builder
            .find_one_insert("  ", Vec::<(&str, i32)>::new())
            .unwrap_err();
        assert!(matches!(err, QbError::Validation(_)));
    }

    #[test]
    fn test_find_one_insert_rejects_bad_param_name() {
        let builder = InsertBuilder::new(&alice()).unwrap();
        assert!(builder.find_one_insert("Id = 1", [("a b", 1)]).is_err());
    }

    #[test]
    fn test_builds_are_repeatable() {
        let builder = InsertBuilder::new(&alice()).unwrap();
        let a = builder.build_insert().unwrap();
        let b = builder.build_insert().unwrap();
        assert_eq!(a, b);
    }
}
