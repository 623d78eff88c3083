//! Lowering of [`Expr`] trees and projections to SQL fragments.

use crate::config::BuilderConfig;
use crate::error::{QbError, QbResult};
use crate::ident::{check_alias, check_ident};
use crate::qb::alias::AliasRegistry;
use crate::qb::expr::{BinaryOp, Expr, FieldRef, ProjectionSpec};
use crate::qb::param::ParamTable;
use crate::value::Value;

/// Sort direction for ORDER BY.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// SQL text produced by one `compile` call, with the names of the
/// parameters it bound (in binding order).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Fragment {
    pub sql: String,
    pub params: Vec<String>,
}

/// Map a comparison operator to its SQL token.
fn comparison_sql(op: BinaryOp) -> Option<&'static str> {
    match op {
        BinaryOp::Eq => Some("="),
        BinaryOp::Ne => Some("<>"),
        BinaryOp::Gt => Some(">"),
        BinaryOp::Gte => Some(">="),
        BinaryOp::Lt => Some("<"),
        BinaryOp::Lte => Some("<="),
        _ => None,
    }
}

/// Expression compiler bound to one statement's alias map and parameter table.
///
/// Literals are always bound as parameters; they never appear in SQL text.
/// A logical child is parenthesized when its connective differs from its
/// parent's, so `a AND b AND c` stays flat while `a AND (b OR c)` keeps its
/// grouping.
pub struct Compiler<'a> {
    aliases: &'a AliasRegistry,
    params: &'a mut ParamTable,
    config: &'a BuilderConfig,
}

impl<'a> Compiler<'a> {
    pub fn new(
        aliases: &'a AliasRegistry,
        params: &'a mut ParamTable,
        config: &'a BuilderConfig,
    ) -> Self {
        Self {
            aliases,
            params,
            config,
        }
    }

    /// Compile a predicate.
    ///
    /// On error every parameter bound during this call is dropped again.
    pub fn compile(&mut self, expr: &Expr) -> QbResult<Fragment> {
        let mark = self.params.checkpoint();
        let mut emitted = Vec::new();
        match self.lower(expr, None, &mut emitted) {
            Ok(sql) => Ok(Fragment {
                sql,
                params: emitted,
            }),
            Err(e) => {
                self.params.rollback(mark);
                Err(e)
            }
        }
    }

    /// `alias.field` for a column reference.
    pub fn column(&self, field: &FieldRef) -> QbResult<String> {
        let alias = self.aliases.resolve(&field.entity)?;
        check_ident(&field.field, "column")?;
        Ok(format!("{}.{}", alias, field.field))
    }

    /// Bind one value and return its placeholder text.
    pub fn bind(&mut self, value: impl Into<Value>) -> String {
        let name = self.params.bind(value);
        self.config.placeholder(&name)
    }

    /// `alias.field AS target` for each projected column, in order.
    ///
    /// An empty spec yields an empty list; the caller renders that as `*`.
    pub fn projection(&self, spec: &ProjectionSpec) -> QbResult<Vec<String>> {
        spec.iter()
            .map(|p| {
                check_alias(&p.target, "projection target")?;
                Ok(format!("{} AS {}", self.column(&p.source)?, p.target))
            })
            .collect()
    }

    /// `alias.field ASC|DESC`.
    pub fn order(&self, expr: &Expr, dir: SortOrder) -> QbResult<String> {
        match expr {
            Expr::Field(f) => Ok(format!("{} {}", self.column(f)?, dir.as_sql())),
            Expr::Literal(_) => Err(QbError::UnsupportedOrderExpression(
                "Ordering by a constant value is not supported.".to_string(),
            )),
            other => Err(QbError::UnsupportedOrderExpression(other.kind())),
        }
    }

    fn lower(
        &mut self,
        expr: &Expr,
        parent: Option<BinaryOp>,
        emitted: &mut Vec<String>,
    ) -> QbResult<String> {
        match expr {
            Expr::Field(f) => self.column(f),
            Expr::Literal(v) => {
                let name = self.params.bind(v.clone());
                let sql = self.config.placeholder(&name);
                emitted.push(name);
                Ok(sql)
            }
            Expr::Binary { op, left, right } if op.is_logical() => {
                let l = self.lower(left, Some(*op), emitted)?;
                let r = self.lower(right, Some(*op), emitted)?;
                let connective = if *op == BinaryOp::And { "AND" } else { "OR" };
                let sql = format!("{l} {connective} {r}");
                match parent {
                    Some(p) if p != *op => Ok(format!("({sql})")),
                    _ => Ok(sql),
                }
            }
            Expr::Binary { op, left, right } => {
                let token = comparison_sql(*op)
                    .ok_or_else(|| QbError::UnsupportedOperator(op.to_string()))?;
                let l = self.operand(left, emitted)?;
                let r = self.operand(right, emitted)?;
                Ok(format!("{l} {token} {r}"))
            }
            Expr::Not(_) | Expr::Call { .. } => Err(QbError::UnsupportedExpression(expr.kind())),
        }
    }

    fn operand(&mut self, expr: &Expr, emitted: &mut Vec<String>) -> QbResult<String> {
        match expr {
            Expr::Field(_) | Expr::Literal(_) => self.lower(expr, None, emitted),
            Expr::Binary { op, .. } if !op.is_comparison() && !op.is_logical() => {
                Err(QbError::UnsupportedOperator(op.to_string()))
            }
            other => Err(QbError::UnsupportedExpression(other.kind())),
        }
    }
}
