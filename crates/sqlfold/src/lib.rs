//! # sqlfold
//!
//! Typed assembly of parameterized T-SQL statements.
//!
//! ## Features
//!
//! - **No execution**: builders produce a [`Template`] (SQL text plus named
//!   parameters) and nothing else
//! - **Typed column references**: columns are referenced through their entity
//!   type and resolved to the alias registered for that type
//! - **Parameters only**: literals are always bound as `@p1`, `@p2`, ... and
//!   never spliced into SQL text
//! - **Derive support**: `#[derive(Entity)]` supplies table names, aliases and
//!   column lists
//! - **Logging**: built statements are emitted as `tracing` events (feature
//!   `tracing`, on by default)
//!
//! ## Query Builder
//!
//! ```ignore
//! use sqlfold::prelude::*;
//!
//! #[derive(Entity)]
//! #[orm(table = "Users")]
//! struct User {
//!     #[orm(column = "Id")]
//!     id: i32,
//!     #[orm(column = "Name")]
//!     name: String,
//! }
//!
//! let mut qb = QueryBuilder::new();
//! qb.from_as::<User>("u")?
//!     .project(&ProjectionSpec::new().map(field::<User>("Id"), "UserId"))?
//!     .where_expr(&field::<User>("Id").eq(10))?;
//!
//! let template = qb.build()?;
//! assert_eq!(template.sql(), "SELECT u.Id AS UserId FROM Users u WHERE u.Id = @p1");
//! ```

pub mod config;
pub mod entity;
pub mod error;
mod ident;
mod monitor;
pub mod prelude;
pub mod qb;
pub mod value;

pub use config::{BuilderConfig, DEFAULT_MAX_PARAMS};
pub use entity::{Entity, EntityType, Record, TableMap};
pub use error::{QbError, QbResult};
pub use value::Value;

pub use qb::{
    BinaryOp, Expr, FieldRef, FullTextMode, InsertBuilder, IntoExpr, JoinKind, ParamTable,
    ProjectionSpec, QueryBuilder, SortOrder, StatementKind, Template, UpdateBuilder, field,
};

#[cfg(feature = "derive")]
pub use sqlfold_derive::Entity;
