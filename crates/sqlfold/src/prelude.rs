//! Convenient imports for typical `sqlfold` usage.
//!
//! ```ignore
//! use sqlfold::prelude::*;
//! ```

pub use crate::{
    BuilderConfig, Entity, Expr, FieldRef, FullTextMode, InsertBuilder, JoinKind, ProjectionSpec,
    QbError, QbResult, QueryBuilder, Record, SortOrder, TableMap, Template, UpdateBuilder, Value,
    field,
};
