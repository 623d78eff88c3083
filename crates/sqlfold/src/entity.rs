//! Entity metadata.
//!
//! Tables participate in a statement through the [`Entity`] trait, normally
//! implemented with `#[derive(Entity)]`:
//!
//! ```ignore
//! use sqlfold::Entity;
//!
//! #[derive(Entity)]
//! #[orm(table = "Users", alias = "u")]
//! struct User {
//!     #[orm(column = "Id")]
//!     id: i32,
//!     #[orm(column = "Name")]
//!     name: String,
//! }
//!
//! assert_eq!(User::TABLE, "Users");
//! assert_eq!(User::COLUMNS, &["Id", "Name"]);
//! ```

use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::value::Value;

/// Static metadata for a table-backed type.
pub trait Entity: 'static {
    /// Bare type name, used in error messages.
    const NAME: &'static str;
    /// Table name (defaults to the bare type name).
    const TABLE: &'static str;
    /// Alias used when no explicit or table-map alias is given
    /// (defaults to the bare type name).
    const ALIAS: &'static str;
    /// Readable columns in declaration order.
    const COLUMNS: &'static [&'static str];
}

/// An entity whose column values can be read for INSERT/UPDATE.
pub trait Record: Entity {
    /// Column values, in the same order as [`Entity::COLUMNS`].
    fn values(&self) -> Vec<Value>;
}

/// Runtime identity of an [`Entity`] type.
///
/// Equality and hashing use the `TypeId` only.
#[derive(Clone, Copy)]
pub struct EntityType {
    id: TypeId,
    name: &'static str,
    table: &'static str,
    default_alias: &'static str,
}

impl EntityType {
    /// Identity of `T`.
    pub fn of<T: Entity>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: T::NAME,
            table: T::TABLE,
            default_alias: T::ALIAS,
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn table(&self) -> &'static str {
        self.table
    }

    pub fn default_alias(&self) -> &'static str {
        self.default_alias
    }
}

impl PartialEq for EntityType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for EntityType {}

impl Hash for EntityType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityType")
            .field("name", &self.name)
            .field("table", &self.table)
            .finish()
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Declared aliases for the tables of one query shape.
///
/// A table map is the query-level alias source: registration uses an explicit
/// alias first, then the table map, then [`Entity::ALIAS`]. Blank aliases are
/// treated as absent.
///
/// ```ignore
/// let map = TableMap::new().alias::<User>("u").alias::<Role>("r");
/// let mut qb = QueryBuilder::new().with_table_map(map);
/// ```
#[derive(Clone, Debug, Default)]
pub struct TableMap {
    aliases: HashMap<TypeId, String>,
}

impl TableMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the alias for `T`.
    pub fn alias<T: Entity>(mut self, alias: impl Into<String>) -> Self {
        self.aliases.insert(TypeId::of::<T>(), alias.into());
        self
    }

    /// The declared alias for `entity`, if a non-blank one exists.
    pub fn declared_alias(&self, entity: &EntityType) -> Option<&str> {
        self.aliases
            .get(&entity.id())
            .map(|a| a.trim())
            .filter(|a| !a.is_empty())
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! Hand-written entities shared by the unit tests.

    use super::{Entity, Record};
    use crate::value::Value;

    pub struct User {
        pub id: i32,
        pub name: String,
        pub role_id: i32,
    }

    impl Entity for User {
        const NAME: &'static str = "User";
        const TABLE: &'static str = "Users";
        const ALIAS: &'static str = "User";
        const COLUMNS: &'static [&'static str] = &["Id", "Name", "RoleId"];
    }

    impl Record for User {
        fn values(&self) -> Vec<Value> {
            vec![
                Value::from(self.id),
                Value::from(self.name.clone()),
                Value::from(self.role_id),
            ]
        }
    }

    pub struct Role;

    impl Entity for Role {
        const NAME: &'static str = "Role";
        const TABLE: &'static str = "Roles";
        const ALIAS: &'static str = "Role";
        const COLUMNS: &'static [&'static str] = &["Id", "Name"];
    }

    pub struct Team;

    impl Entity for Team {
        const NAME: &'static str = "Team";
        const TABLE: &'static str = "Teams";
        const ALIAS: &'static str = "t";
        const COLUMNS: &'static [&'static str] = &["Id", "Name"];
    }

    /// No readable columns.
    pub struct Marker;

    impl Entity for Marker {
        const NAME: &'static str = "Marker";
        const TABLE: &'static str = "Markers";
        const ALIAS: &'static str = "Marker";
        const COLUMNS: &'static [&'static str] = &[];
    }

    impl Record for Marker {
        fn values(&self) -> Vec<Value> {
            Vec::new()
        }
    }
}
