//! Statement assembly.
//!
//! Every builder owns one [`AliasRegistry`] and one [`ParamTable`], so
//! parameter names never collide within a statement and never leak between
//! statements.
//!
//! # Features
//!
//! - **Typed column references**: [`field::<T>("Col")`](field) resolves to
//!   `alias.Col` through the registry; referencing an unregistered table is an
//!   error naming the entity type
//! - **Counter-named parameters**: every literal becomes `@pN`, never inline text
//! - **T-SQL paging**: `OFFSET @offset ROWS FETCH NEXT @fetch ROWS ONLY`
//!
//! # Usage
//!
//! ```ignore
//! use sqlfold::prelude::*;
//!
//! let mut qb = QueryBuilder::new();
//! qb.from_as::<User>("u")?
//!     .inner_join::<Role>(&field::<Role>("Id").eq(field::<User>("RoleId")))?
//!     .where_expr(&field::<User>("Id").gt(10))?
//!     .like(&field::<User>("Name"), "ali*", true)?
//!     .order_by_desc(field::<User>("Id"))?
//!     .paginate(2, 20)?;
//!
//! let page = qb.build()?;
//! let total = qb.count()?;
//!
//! let insert = InsertBuilder::batch(&users)?.build_insert()?;
//! ```

mod alias;
mod compile;
mod expr;
mod insert;
mod param;
mod select;
mod template;
mod update;

pub use alias::{AliasRegistry, EntityBinding};
pub use compile::{Compiler, Fragment, SortOrder};
pub use expr::{BinaryOp, Expr, FieldRef, IntoExpr, Projection, ProjectionSpec, field};
pub use insert::InsertBuilder;
pub use param::ParamTable;
pub use select::{FullTextMode, JoinKind, QueryBuilder};
pub use template::{StatementKind, Template};
pub use update::{DEFAULT_KEY, UpdateBuilder};
