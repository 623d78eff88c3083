//! Predicate and projection AST.
//!
//! Predicates are plain data built with the helper API below; the
//! [`Compiler`](super::compile::Compiler) lowers them to SQL text.
//!
//! ```ignore
//! use sqlfold::qb::{field, Expr};
//!
//! let pred = field::<User>("Id")
//!     .eq(10)
//!     .and(field::<Role>("Id").eq(1).or(field::<Role>("Name").eq("a")));
//! ```

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use uuid::Uuid;

use crate::entity::{Entity, EntityType};
use crate::value::Value;

/// A column of a registered entity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldRef {
    pub entity: EntityType,
    pub field: String,
}

/// Reference column `name` of entity `T`.
pub fn field<T: Entity>(name: impl Into<String>) -> FieldRef {
    FieldRef::of::<T>(name)
}

impl FieldRef {
    pub fn of<T: Entity>(name: impl Into<String>) -> Self {
        Self {
            entity: EntityType::of::<T>(),
            field: name.into(),
        }
    }

    /// `self = rhs`
    pub fn eq(self, rhs: impl IntoExpr) -> Expr {
        Expr::from(self).eq(rhs)
    }

    /// `self <> rhs`
    pub fn ne(self, rhs: impl IntoExpr) -> Expr {
        Expr::from(self).ne(rhs)
    }

    /// `self > rhs`
    pub fn gt(self, rhs: impl IntoExpr) -> Expr {
        Expr::from(self).gt(rhs)
    }

    /// `self >= rhs`
    pub fn gte(self, rhs: impl IntoExpr) -> Expr {
        Expr::from(self).gte(rhs)
    }

    /// `self < rhs`
    pub fn lt(self, rhs: impl IntoExpr) -> Expr {
        Expr::from(self).lt(rhs)
    }

    /// `self <= rhs`
    pub fn lte(self, rhs: impl IntoExpr) -> Expr {
        Expr::from(self).lte(rhs)
    }
}

/// Binary operators the AST can represent.
///
/// Only the comparison and logical operators are lowered; the arithmetic
/// ones exist so callers can describe them and get a precise
/// [`UnsupportedOperator`](crate::QbError::UnsupportedOperator) error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    And,
    Or,
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
}

impl BinaryOp {
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOp::Eq
                | BinaryOp::Ne
                | BinaryOp::Gt
                | BinaryOp::Gte
                | BinaryOp::Lt
                | BinaryOp::Lte
        )
    }

    pub fn is_logical(self) -> bool {
        matches!(self, BinaryOp::And | BinaryOp::Or)
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BinaryOp::Eq => "Equal",
            BinaryOp::Ne => "NotEqual",
            BinaryOp::Gt => "GreaterThan",
            BinaryOp::Gte => "GreaterThanOrEqual",
            BinaryOp::Lt => "LessThan",
            BinaryOp::Lte => "LessThanOrEqual",
            BinaryOp::And => "AndAlso",
            BinaryOp::Or => "OrElse",
            BinaryOp::Add => "Add",
            BinaryOp::Subtract => "Subtract",
            BinaryOp::Multiply => "Multiply",
            BinaryOp::Divide => "Divide",
            BinaryOp::Modulo => "Modulo",
        };
        f.write_str(name)
    }
}

/// Predicate/projection expression node.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// Column reference: `alias.field`
    Field(FieldRef),
    /// Literal, always bound as a parameter
    Literal(Value),
    /// Comparison, logical or arithmetic operation
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// Negation. Not lowered by the compiler.
    Not(Box<Expr>),
    /// Function call. Not lowered by the compiler.
    Call { function: String, args: Vec<Expr> },
}

impl Expr {
    /// Column reference of entity `T`.
    pub fn field<T: Entity>(name: impl Into<String>) -> Self {
        Expr::Field(FieldRef::of::<T>(name))
    }

    /// Literal value.
    pub fn lit(value: impl Into<Value>) -> Self {
        Expr::Literal(value.into())
    }

    /// Generic binary node.
    pub fn binary(op: BinaryOp, left: impl IntoExpr, right: impl IntoExpr) -> Self {
        Expr::Binary {
            op,
            left: Box::new(left.into_expr()),
            right: Box::new(right.into_expr()),
        }
    }

    pub fn eq(self, rhs: impl IntoExpr) -> Self {
        Self::binary(BinaryOp::Eq, self, rhs)
    }

    pub fn ne(self, rhs: impl IntoExpr) -> Self {
        Self::binary(BinaryOp::Ne, self, rhs)
    }

    pub fn gt(self, rhs: impl IntoExpr) -> Self {
        Self::binary(BinaryOp::Gt, self, rhs)
    }

    pub fn gte(self, rhs: impl IntoExpr) -> Self {
        Self::binary(BinaryOp::Gte, self, rhs)
    }

    pub fn lt(self, rhs: impl IntoExpr) -> Self {
        Self::binary(BinaryOp::Lt, self, rhs)
    }

    pub fn lte(self, rhs: impl IntoExpr) -> Self {
        Self::binary(BinaryOp::Lte, self, rhs)
    }

    /// `self AND rhs`
    pub fn and(self, rhs: impl IntoExpr) -> Self {
        Self::binary(BinaryOp::And, self, rhs)
    }

    /// `self OR rhs`
    pub fn or(self, rhs: impl IntoExpr) -> Self {
        Self::binary(BinaryOp::Or, self, rhs)
    }

    /// Fold a list with AND. `None` for an empty list.
    pub fn all(exprs: impl IntoIterator<Item = Expr>) -> Option<Self> {
        exprs.into_iter().reduce(|acc, e| acc.and(e))
    }

    /// Fold a list with OR. `None` for an empty list.
    pub fn any(exprs: impl IntoIterator<Item = Expr>) -> Option<Self> {
        exprs.into_iter().reduce(|acc, e| acc.or(e))
    }

    /// Short description of the node shape, used in error messages.
    pub fn kind(&self) -> String {
        match self {
            Expr::Field(_) => "Field".to_string(),
            Expr::Literal(_) => "Literal".to_string(),
            Expr::Binary { op, .. } => format!("Binary({op})"),
            Expr::Not(_) => "Not".to_string(),
            Expr::Call { function, .. } => format!("Call({function})"),
        }
    }

    /// Root of a logical node, if this is one.
    pub fn logical_op(&self) -> Option<BinaryOp> {
        match self {
            Expr::Binary { op, .. } if op.is_logical() => Some(*op),
            _ => None,
        }
    }
}

impl From<FieldRef> for Expr {
    fn from(f: FieldRef) -> Self {
        Expr::Field(f)
    }
}

impl std::ops::Not for Expr {
    type Output = Expr;

    fn not(self) -> Expr {
        Expr::Not(Box::new(self))
    }
}

/// Conversion into an expression operand.
///
/// Implemented for expressions, field references, [`Value`] and the scalar
/// types `Value` converts from; scalars become [`Expr::Literal`].
pub trait IntoExpr {
    fn into_expr(self) -> Expr;
}

impl IntoExpr for Expr {
    fn into_expr(self) -> Expr {
        self
    }
}

impl IntoExpr for FieldRef {
    fn into_expr(self) -> Expr {
        Expr::Field(self)
    }
}

impl IntoExpr for Value {
    fn into_expr(self) -> Expr {
        Expr::Literal(self)
    }
}

macro_rules! impl_into_expr_literal {
    ($($ty:ty),* $(,)?) => {
        $(
            impl IntoExpr for $ty {
                fn into_expr(self) -> Expr {
                    Expr::Literal(Value::from(self))
                }
            }
        )*
    };
}

impl_into_expr_literal!(
    bool,
    i8,
    i16,
    i32,
    i64,
    u8,
    u16,
    u32,
    f32,
    f64,
    String,
    &str,
    &String,
    Vec<u8>,
    Uuid,
    NaiveDate,
    NaiveTime,
    NaiveDateTime,
    DateTime<Utc>,
    serde_json::Value,
);

#[cfg(feature = "rust_decimal")]
impl_into_expr_literal!(rust_decimal::Decimal);

impl<T: Into<Value>> IntoExpr for Option<T> {
    fn into_expr(self) -> Expr {
        Expr::Literal(Value::from(self))
    }
}

/// One output column: `source AS target`.
#[derive(Clone, Debug, PartialEq)]
pub struct Projection {
    pub source: FieldRef,
    pub target: String,
}

/// Ordered list of output columns. Order defines SELECT column order;
/// duplicates are kept. An empty spec means `*`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProjectionSpec {
    columns: Vec<Projection>,
}

impl ProjectionSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `source` to output column `target`.
    pub fn map(mut self, source: FieldRef, target: impl Into<String>) -> Self {
        self.columns.push(Projection {
            source,
            target: target.into(),
        });
        self
    }

    /// Project `source` under its own field name.
    pub fn column(self, source: FieldRef) -> Self {
        let target = source.field.clone();
        self.map(source, target)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Projection> {
        self.columns.iter()
    }
}

impl FromIterator<Projection> for ProjectionSpec {
    fn from_iter<I: IntoIterator<Item = Projection>>(iter: I) -> Self {
        Self {
            columns: iter.into_iter().collect(),
        }
    }
}
