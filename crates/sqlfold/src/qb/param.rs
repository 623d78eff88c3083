//! Named parameter storage.

use std::collections::HashMap;

use serde::ser::{Serialize, Serializer};

use crate::value::Value;

/// Ordered mapping from generated parameter name to bound value.
///
/// Generated names come from a counter scoped to one table (`p1`, `p2`, ...),
/// never from the value, so equal values in different positions get distinct
/// names. Names already present (e.g. caller-supplied `p1`) are skipped.
/// Stored names carry no prefix; the builder's [`BuilderConfig`] adds it in
/// SQL text.
///
/// [`BuilderConfig`]: crate::BuilderConfig
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParamTable {
    entries: Vec<(String, Value)>,
    /// name -> position in `entries`
    index: HashMap<String, usize>,
    counter: u64,
}

/// Restore point for [`ParamTable::rollback`].
#[derive(Clone, Copy, Debug)]
pub(crate) struct Checkpoint {
    len: usize,
    counter: u64,
}

impl ParamTable {
    /// Create a new empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a value under the next counter-derived name and return that name.
    pub fn bind(&mut self, value: impl Into<Value>) -> String {
        let name = loop {
            self.counter += 1;
            let candidate = format!("p{}", self.counter);
            if !self.contains(&candidate) {
                break candidate;
            }
        };
        self.push(name.clone(), value.into());
        name
    }

    /// Bind a value under a fixed name, replacing any earlier value of that name.
    ///
    /// The name keeps its original position when replaced.
    pub fn bind_named(&mut self, name: &str, value: impl Into<Value>) {
        let value = value.into();
        match self.index.get(name) {
            Some(&i) => self.entries[i].1 = value,
            None => self.push(name.to_string(), value),
        }
    }

    fn push(&mut self, name: String, value: Value) {
        self.index.insert(name.clone(), self.entries.len());
        self.entries.push((name, value));
    }

    /// Look up a bound value by name (without prefix).
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.index.get(name).map(|&i| &self.entries[i].1)
    }

    /// Check if a name is bound.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Get the current parameter count.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(name, value)` pairs in binding order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Names in binding order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    /// Consume the table into its entries.
    pub fn into_entries(self) -> Vec<(String, Value)> {
        self.entries
    }

    pub(crate) fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            len: self.entries.len(),
            counter: self.counter,
        }
    }

    /// Drop every binding made after `mark` and rewind the counter.
    ///
    /// Only valid when no `bind_named` replacement happened since `mark`.
    pub(crate) fn rollback(&mut self, mark: Checkpoint) {
        for (name, _) in self.entries.drain(mark.len..) {
            self.index.remove(&name);
        }
        self.counter = mark.counter;
    }
}

impl Serialize for ParamTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.entries.iter().map(|(n, v)| (n, v)))
    }
}
