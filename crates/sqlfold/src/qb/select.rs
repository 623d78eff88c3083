//! SELECT / COUNT assembler.

use crate::config::BuilderConfig;
use crate::entity::{Entity, EntityType, TableMap};
use crate::error::{QbError, QbResult};
use crate::ident::check_alias;
use crate::qb::alias::AliasRegistry;
use crate::qb::compile::{Compiler, SortOrder};
use crate::qb::expr::{BinaryOp, Expr, FieldRef, ProjectionSpec};
use crate::qb::param::ParamTable;
use crate::qb::template::{StatementKind, Template};
use crate::value::Value;

/// Join flavour. Joins are emitted grouped by kind, kinds in first-use order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
}

impl JoinKind {
    pub fn keyword(self) -> &'static str {
        match self {
            JoinKind::Inner => "INNER JOIN",
            JoinKind::Left => "LEFT JOIN",
            JoinKind::Right => "RIGHT JOIN",
        }
    }
}

/// Full-text predicate function.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FullTextMode {
    /// `CONTAINS(col, @p)`
    #[default]
    Contains,
    /// `FREETEXT(col, @p)`
    FreeText,
}

impl FullTextMode {
    pub fn function(self) -> &'static str {
        match self {
            FullTextMode::Contains => "CONTAINS",
            FullTextMode::FreeText => "FREETEXT",
        }
    }
}

/// Accumulates the clauses of one SELECT statement.
///
/// Every clause call compiles its input immediately, so lookup and operator
/// errors surface at the call that caused them. [`build`](Self::build) and
/// [`count`](Self::count) only read the accumulated state and may be called
/// any number of times.
///
/// ```ignore
/// let mut qb = QueryBuilder::new();
/// qb.from_as::<User>("u")?
///     .project(&ProjectionSpec::new().map(field::<User>("Id"), "UserId"))?
///     .where_expr(&field::<User>("Id").eq(10))?;
/// let page = qb.paginate(1, 20)?.build()?;
/// let total = qb.count()?;
/// ```
#[derive(Clone, Debug, Default)]
pub struct QueryBuilder {
    config: BuilderConfig,
    table_map: TableMap,
    aliases: AliasRegistry,
    params: ParamTable,
    /// TOP (n)
    top: Option<i64>,
    /// SELECT columns (empty means `*`)
    select_cols: Vec<String>,
    /// FROM entries, `table alias [WITH (NOLOCK)]`
    from_entries: Vec<String>,
    /// JOIN clauses grouped by kind
    join_groups: Vec<(JoinKind, Vec<String>)>,
    /// WHERE fragments joined with AND
    and_chain: Vec<String>,
    /// Fragments appended after the AND chain with OR
    or_chain: Vec<String>,
    /// ORDER BY items
    order_clauses: Vec<String>,
    /// (offset, fetch)
    window: Option<(i64, i64)>,
}

/// Explicit alias, then table-map alias; blanks fall through.
fn declared_alias<'a>(
    explicit: Option<&'a str>,
    table_map: &'a TableMap,
    entity: &EntityType,
) -> Option<&'a str> {
    explicit
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .or_else(|| table_map.declared_alias(entity))
}

impl QueryBuilder {
    /// Create a builder with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: BuilderConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Use `map` as the source of declared aliases.
    pub fn with_table_map(mut self, map: TableMap) -> Self {
        self.table_map = map;
        self
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    pub fn aliases(&self) -> &AliasRegistry {
        &self.aliases
    }

    /// Parameters bound so far.
    pub fn params(&self) -> &ParamTable {
        &self.params
    }

    fn compiler(&mut self) -> Compiler<'_> {
        Compiler::new(&self.aliases, &mut self.params, &self.config)
    }

    // ==================== FROM / JOIN ====================

    /// Add a FROM entry for `entity` and register its alias.
    pub fn register_from(
        &mut self,
        entity: EntityType,
        alias: Option<&str>,
        nolock: bool,
    ) -> QbResult<&mut Self> {
        let declared = declared_alias(alias, &self.table_map, &entity);
        let alias = self.aliases.register(entity, declared)?;
        self.from_entries
            .push(table_entry(entity.table(), &alias, nolock));
        Ok(self)
    }

    /// `FROM T` under its declared or default alias.
    pub fn from<T: Entity>(&mut self) -> QbResult<&mut Self> {
        let nolock = self.config.nolock;
        self.register_from(EntityType::of::<T>(), None, nolock)
    }

    /// `FROM T alias`.
    pub fn from_as<T: Entity>(&mut self, alias: &str) -> QbResult<&mut Self> {
        let nolock = self.config.nolock;
        self.register_from(EntityType::of::<T>(), Some(alias), nolock)
    }

    /// Register `entity` and add `<kind> JOIN table alias ON <on>`.
    ///
    /// The alias is registered before `on` is compiled so the condition can
    /// reference the joined table. If compiling fails the previous binding
    /// of `entity` is restored.
    pub fn register_join(
        &mut self,
        kind: JoinKind,
        entity: EntityType,
        alias: Option<&str>,
        on: &Expr,
        nolock: bool,
    ) -> QbResult<&mut Self> {
        let previous = self.aliases.binding(&entity).cloned();
        let declared = declared_alias(alias, &self.table_map, &entity);
        let alias = self.aliases.register(entity, declared)?;

        let compiled = self.compiler().compile(on);
        let condition = match compiled {
            Ok(frag) => frag.sql,
            Err(e) => {
                self.aliases.restore(&entity, previous);
                return Err(e);
            }
        };

        let clause = format!(
            "{} ON {}",
            table_entry(entity.table(), &alias, nolock),
            condition
        );
        match self.join_groups.iter_mut().find(|(k, _)| *k == kind) {
            Some((_, joins)) => joins.push(clause),
            None => self.join_groups.push((kind, vec![clause])),
        }
        Ok(self)
    }

    /// Join `T` with an explicit or declared alias.
    pub fn join_as<T: Entity>(
        &mut self,
        kind: JoinKind,
        alias: Option<&str>,
        on: &Expr,
    ) -> QbResult<&mut Self> {
        let nolock = self.config.nolock;
        self.register_join(kind, EntityType::of::<T>(), alias, on, nolock)
    }

    pub fn inner_join<T: Entity>(&mut self, on: &Expr) -> QbResult<&mut Self> {
        self.join_as::<T>(JoinKind::Inner, None, on)
    }

    pub fn left_join<T: Entity>(&mut self, on: &Expr) -> QbResult<&mut Self> {
        self.join_as::<T>(JoinKind::Left, None, on)
    }

    pub fn right_join<T: Entity>(&mut self, on: &Expr) -> QbResult<&mut Self> {
        self.join_as::<T>(JoinKind::Right, None, on)
    }

    // ==================== SELECT columns ====================

    /// Append projected columns. Without any projection the query selects `*`.
    pub fn project(&mut self, spec: &ProjectionSpec) -> QbResult<&mut Self> {
        let cols = self.compiler().projection(spec)?;
        self.select_cols.extend(cols);
        Ok(self)
    }

    /// `SELECT TOP (n)`.
    pub fn top(&mut self, n: i64) -> QbResult<&mut Self> {
        if n < 1 {
            return Err(QbError::range("top", n, "top must be >= 1"));
        }
        self.top = Some(n);
        Ok(self)
    }

    // ==================== WHERE ====================

    /// Add a predicate to the AND chain.
    ///
    /// A predicate whose root is OR is parenthesized so it stays one term of
    /// the chain.
    pub fn where_expr(&mut self, predicate: &Expr) -> QbResult<&mut Self> {
        let frag = self.compiler().compile(predicate)?;
        let sql = match predicate.logical_op() {
            Some(BinaryOp::Or) => format!("({})", frag.sql),
            _ => frag.sql,
        };
        self.and_chain.push(sql);
        Ok(self)
    }

    /// Same as [`where_expr`](Self::where_expr).
    pub fn and_expr(&mut self, predicate: &Expr) -> QbResult<&mut Self> {
        self.where_expr(predicate)
    }

    /// Add a predicate to the OR chain.
    ///
    /// The OR chain is appended after the AND chain as plain text:
    /// `WHERE a AND b OR c`, which SQL reads as `(a AND b) OR c`. Compound
    /// predicates are parenthesized.
    pub fn or_expr(&mut self, predicate: &Expr) -> QbResult<&mut Self> {
        let frag = self.compiler().compile(predicate)?;
        let sql = match predicate.logical_op() {
            Some(_) => format!("({})", frag.sql),
            None => frag.sql,
        };
        self.or_chain.push(sql);
        Ok(self)
    }

    /// Append caller-written SQL to the AND chain verbatim. Blank text is ignored.
    pub fn and_raw(&mut self, sql: &str) -> &mut Self {
        let sql = sql.trim();
        if !sql.is_empty() {
            self.and_chain.push(sql.to_string());
        }
        self
    }

    /// Append caller-written SQL to the OR chain verbatim. Blank text is ignored.
    pub fn or_raw(&mut self, sql: &str) -> &mut Self {
        let sql = sql.trim();
        if !sql.is_empty() {
            self.or_chain.push(sql.to_string());
        }
        self
    }

    /// `col IN (...)` or `col NOT IN (...)`, one parameter per value.
    ///
    /// An empty value list adds nothing.
    pub fn member_of<I, V>(
        &mut self,
        field: &FieldRef,
        values: I,
        negate: bool,
    ) -> QbResult<&mut Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            return Ok(self);
        }

        let mut compiler = self.compiler();
        let column = compiler.column(field)?;
        let placeholders: Vec<String> = values.into_iter().map(|v| compiler.bind(v)).collect();
        let op = if negate { "NOT IN" } else { "IN" };
        self.and_chain
            .push(format!("{} {} ({})", column, op, placeholders.join(", ")));
        Ok(self)
    }

    pub fn in_list<I, V>(&mut self, field: &FieldRef, values: I) -> QbResult<&mut Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.member_of(field, values, false)
    }

    pub fn not_in<I, V>(&mut self, field: &FieldRef, values: I) -> QbResult<&mut Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.member_of(field, values, true)
    }

    /// `col LIKE @p` (or `LOWER(col) LIKE LOWER(@p)`).
    ///
    /// The configured alternate wildcard is rewritten to `%`; a pattern with
    /// no `%` at all is wrapped as `%pattern%`. A blank pattern adds nothing.
    pub fn like(
        &mut self,
        field: &FieldRef,
        pattern: &str,
        case_insensitive: bool,
    ) -> QbResult<&mut Self> {
        if pattern.trim().is_empty() {
            return Ok(self);
        }

        let mut pattern = pattern.replace(self.config.like_wildcard, "%");
        if !pattern.contains('%') {
            pattern = format!("%{pattern}%");
        }

        let mut compiler = self.compiler();
        let column = compiler.column(field)?;
        let placeholder = compiler.bind(pattern);
        let sql = if case_insensitive {
            format!("LOWER({column}) LIKE LOWER({placeholder})")
        } else {
            format!("{column} LIKE {placeholder}")
        };
        self.and_chain.push(sql);
        Ok(self)
    }

    /// `CONTAINS(col, @p)` / `FREETEXT(col, @p)` over one or more columns.
    ///
    /// Several columns render as a column list: `CONTAINS((a.X, a.Y), @p1)`.
    /// A blank term or an empty column list adds nothing.
    pub fn full_text(
        &mut self,
        fields: &[FieldRef],
        term: &str,
        mode: FullTextMode,
    ) -> QbResult<&mut Self> {
        if term.trim().is_empty() || fields.is_empty() {
            return Ok(self);
        }

        let mut compiler = self.compiler();
        let columns = fields
            .iter()
            .map(|f| compiler.column(f))
            .collect::<QbResult<Vec<_>>>()?;
        let target = match columns.as_slice() {
            [single] => single.clone(),
            many => format!("({})", many.join(", ")),
        };
        let placeholder = compiler.bind(term);
        self.and_chain
            .push(format!("{}({}, {})", mode.function(), target, placeholder));
        Ok(self)
    }

    // ==================== ORDER BY ====================

    /// Append `col ASC|DESC`. Only column references can be ordered by.
    pub fn order_by(&mut self, expr: &Expr, dir: SortOrder) -> QbResult<&mut Self> {
        let clause = self.compiler().order(expr, dir)?;
        self.order_clauses.push(clause);
        Ok(self)
    }

    pub fn order_by_asc(&mut self, field: FieldRef) -> QbResult<&mut Self> {
        self.order_by(&Expr::Field(field), SortOrder::Asc)
    }

    pub fn order_by_desc(&mut self, field: FieldRef) -> QbResult<&mut Self> {
        self.order_by(&Expr::Field(field), SortOrder::Desc)
    }

    // ==================== Paging ====================

    /// Page `page` (1-based) of `page_size` rows.
    pub fn paginate(&mut self, page: i64, page_size: i64) -> QbResult<&mut Self> {
        if page < 1 {
            return Err(QbError::range("page", page, "page must be >= 1"));
        }
        if page_size < 1 {
            return Err(QbError::range("page_size", page_size, "page_size must be >= 1"));
        }
        let offset = (page - 1)
            .checked_mul(page_size)
            .ok_or_else(|| QbError::range("page", page, "offset overflows i64"))?;
        self.set_window(offset, page_size);
        Ok(self)
    }

    /// Skip `offset` rows and fetch `take`.
    pub fn skip_take(&mut self, offset: i64, take: i64) -> QbResult<&mut Self> {
        if offset < 0 {
            return Err(QbError::range("offset", offset, "offset must be >= 0"));
        }
        if take < 1 {
            return Err(QbError::range("take", take, "take must be >= 1"));
        }
        self.set_window(offset, take);
        Ok(self)
    }

    fn set_window(&mut self, offset: i64, fetch: i64) {
        self.params.bind_named("offset", offset);
        self.params.bind_named("fetch", fetch);
        self.window = Some((offset, fetch));
    }

    /// Current `(offset, fetch)` window, if paging was requested.
    pub fn window(&self) -> Option<(i64, i64)> {
        self.window
    }

    // ==================== Build ====================

    fn push_source(&self, sql: &mut String) -> QbResult<()> {
        if self.from_entries.is_empty() {
            return Err(QbError::validation(
                "no FROM table registered; call from() before building",
            ));
        }
        sql.push_str(" FROM ");
        sql.push_str(&self.from_entries.join(", "));
        for (kind, joins) in &self.join_groups {
            for join in joins {
                sql.push(' ');
                sql.push_str(kind.keyword());
                sql.push(' ');
                sql.push_str(join);
            }
        }
        Ok(())
    }

    fn push_where(&self, sql: &mut String, include_or: bool) {
        let mut clause = self.and_chain.join(" AND ");
        if include_or {
            for frag in &self.or_chain {
                if !clause.is_empty() {
                    clause.push_str(" OR ");
                }
                clause.push_str(frag);
            }
        }
        if !clause.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clause);
        }
    }

    /// Assemble the full SELECT.
    pub fn build(&self) -> QbResult<Template> {
        if self.top.is_some() && self.window.is_some() {
            return Err(QbError::validation(
                "TOP cannot be combined with OFFSET/FETCH paging",
            ));
        }

        let mut sql = String::from("SELECT ");
        if let Some(n) = self.top {
            sql.push_str(&format!("TOP ({n}) "));
        }
        if self.select_cols.is_empty() {
            sql.push('*');
        } else {
            sql.push_str(&self.select_cols.join(", "));
        }
        self.push_source(&mut sql)?;
        self.push_where(&mut sql, true);

        if !self.order_clauses.is_empty() {
            sql.push_str(" ORDER BY ");
            sql.push_str(&self.order_clauses.join(", "));
        } else if self.window.is_some() && self.config.paging_order_fallback {
            sql.push_str(" ORDER BY (SELECT NULL)");
        }

        if self.window.is_some() {
            sql.push_str(&format!(
                " OFFSET {} ROWS FETCH NEXT {} ROWS ONLY",
                self.config.placeholder("offset"),
                self.config.placeholder("fetch")
            ));
        }

        Template::finish(sql, self.params.clone(), StatementKind::Select, &self.config)
    }

    /// `SELECT COUNT(1) AS Total ...` over the same FROM/JOIN/AND chain.
    pub fn count(&self) -> QbResult<Template> {
        self.count_with("1", "Total")
    }

    /// Row count with a custom count expression and output alias.
    ///
    /// The OR chain, ORDER BY and paging window are left out; the parameter
    /// table is the same as for [`build`](Self::build).
    pub fn count_with(&self, count_expr: &str, alias: &str) -> QbResult<Template> {
        check_alias(alias, "count alias")?;
        let count_expr = match count_expr.trim() {
            "" => "1",
            e => e,
        };

        let mut sql = format!("SELECT COUNT({count_expr}) AS {alias}");
        self.push_source(&mut sql)?;
        self.push_where(&mut sql, false);

        Template::finish(sql, self.params.clone(), StatementKind::Count, &self.config)
    }
}

fn table_entry(table: &str, alias: &str, nolock: bool) -> String {
    if nolock {
        format!("{table} {alias} WITH (NOLOCK)")
    } else {
        format!("{table} {alias}")
    }
}
