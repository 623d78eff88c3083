//! Alias registry: entity type -> table binding for one statement.

use std::any::TypeId;
use std::collections::HashMap;

use crate::entity::EntityType;
use crate::error::{QbError, QbResult};
use crate::ident::check_alias;
use crate::monitor;

/// A registered table: entity identity, table name and the alias it is
/// referenced by.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntityBinding {
    pub entity: EntityType,
    pub table: &'static str,
    pub alias: String,
}

/// Maps each participating entity type to its table and alias.
///
/// Grows monotonically while a statement is assembled. Registering a type a
/// second time replaces its alias (last write wins). An alias belongs to one
/// type at a time; aliases compare case-insensitively.
#[derive(Clone, Debug, Default)]
pub struct AliasRegistry {
    bindings: HashMap<TypeId, EntityBinding>,
}

impl AliasRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `entity`, using `declared` when it is non-blank and the
    /// entity's default alias otherwise. Returns the alias in effect.
    ///
    /// Fails with a validation error when another entity type already holds
    /// the alias.
    pub fn register(&mut self, entity: EntityType, declared: Option<&str>) -> QbResult<String> {
        let alias = match declared.map(str::trim).filter(|a| !a.is_empty()) {
            Some(a) => {
                check_alias(a, "alias")?;
                a.to_string()
            }
            None => entity.default_alias().to_string(),
        };

        if let Some(holder) = self.holder_of(&alias)
            && holder.entity.id() != entity.id()
        {
            return Err(QbError::validation(format!(
                "alias '{}' is already used by {} ({}); cannot bind it to {}",
                alias,
                holder.entity.name(),
                holder.table,
                entity.name()
            )));
        }

        let binding = EntityBinding {
            entity,
            table: entity.table(),
            alias: alias.clone(),
        };
        if let Some(prev) = self.bindings.insert(entity.id(), binding) {
            if prev.alias != alias {
                monitor::alias_overwritten(entity.name(), &prev.alias, &alias);
            }
        }
        Ok(alias)
    }

    /// Alias of a registered entity.
    ///
    /// Fails with [`QbError::AliasNotFound`] naming the entity type when the
    /// type was never registered.
    pub fn resolve(&self, entity: &EntityType) -> QbResult<&str> {
        self.bindings
            .get(&entity.id())
            .map(|b| b.alias.as_str())
            .ok_or_else(|| QbError::alias_not_found(entity.name()))
    }

    /// Binding currently holding `alias`, if any.
    pub fn holder_of(&self, alias: &str) -> Option<&EntityBinding> {
        self.bindings
            .values()
            .find(|b| b.alias.eq_ignore_ascii_case(alias))
    }

    pub fn binding(&self, entity: &EntityType) -> Option<&EntityBinding> {
        self.bindings.get(&entity.id())
    }

    pub fn contains(&self, entity: &EntityType) -> bool {
        self.bindings.contains_key(&entity.id())
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Put back the binding that existed before a failed registration.
    pub(crate) fn restore(&mut self, entity: &EntityType, previous: Option<EntityBinding>) {
        match previous {
            Some(b) => {
                self.bindings.insert(entity.id(), b);
            }
            None => {
                self.bindings.remove(&entity.id());
            }
        }
    }
}
