//! One-Definition-Rule registry.
//!
//! Every named record seen during a run is registered with the file that
//! first defined it. When a later file defines a record with the same name,
//! its definition must match the first one field by field: same count, same
//! names, structurally equal types.

use std::fmt;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::equality::structurally_equal;
use crate::export_type::TypeId;
use crate::pool::TypePool;

/// First sighting of a named type.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct OdrEntry {
    pub name: String,
    pub ty: TypeId,
    /// Source file that first defined the type.
    pub origin: String,
}

/// How two same-named record definitions differ.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum OdrMismatch {
    FieldCount { first: usize, second: usize },
    FieldName { index: usize, first: String, second: String },
    FieldType { field: String },
    NotRecord,
}

impl fmt::Display for OdrMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OdrMismatch::FieldCount { first, second } => {
                write!(f, "field count differs ({first} vs {second})")
            }
            OdrMismatch::FieldName {
                index,
                first,
                second,
            } => write!(f, "field {index} is named '{first}' vs '{second}'"),
            OdrMismatch::FieldType { field } => write!(f, "field '{field}' has a different type"),
            OdrMismatch::NotRecord => f.write_str("kinds of type differ"),
        }
    }
}

/// Incompatible redefinition of a named type across files.
#[derive(Clone, Eq, PartialEq, Debug, thiserror::Error)]
#[error(
    "type '{name}' in different translation unit ({first_origin} v.s. {second_origin}) has incompatible type definition"
)]
pub struct OdrViolation {
    pub name: String,
    pub first_origin: String,
    pub second_origin: String,
    pub mismatch: OdrMismatch,
}

/// Name to first-definition registry, in registration order.
#[derive(Clone, Debug, Default)]
pub struct OdrRegistry {
    entries: Vec<OdrEntry>,
    by_name: FxHashMap<String, usize>,
    confirmed: FxHashSet<(String, String)>,
}

impl OdrRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the first definition of `name`. Returns false if the name was
    /// already registered.
    pub fn register(&mut self, name: &str, ty: TypeId, origin: &str) -> bool {
        if self.by_name.contains_key(name) {
            return false;
        }
        self.by_name.insert(name.to_string(), self.entries.len());
        self.entries.push(OdrEntry {
            name: name.to_string(),
            ty,
            origin: origin.to_string(),
        });
        true
    }

    /// Drop every registration whose type was created at or after arena
    /// index `start`, after the record being built there failed.
    pub(crate) fn forget_from(&mut self, start: usize) {
        let before = self.entries.len();
        self.entries.retain(|e| e.ty.index() < start);
        if self.entries.len() != before {
            self.by_name = self
                .entries
                .iter()
                .enumerate()
                .map(|(i, e)| (e.name.clone(), i))
                .collect();
        }
    }

    pub fn get(&self, name: &str) -> Option<&OdrEntry> {
        self.by_name.get(name).map(|&i| &self.entries[i])
    }

    /// All entries in registration order.
    pub fn entries(&self) -> &[OdrEntry] {
        &self.entries
    }

    /// Entries first defined by `origin`, in registration order.
    pub fn defined_in<'a>(&'a self, origin: &'a str) -> impl Iterator<Item = &'a OdrEntry> + 'a {
        self.entries.iter().filter(move |e| e.origin == origin)
    }

    /// True if `origin`'s definition of `name` was already checked.
    pub fn is_confirmed(&self, name: &str, origin: &str) -> bool {
        self.get(name).is_some_and(|e| e.origin == origin)
            || self
                .confirmed
                .contains(&(name.to_string(), origin.to_string()))
    }

    pub(crate) fn confirm(&mut self, name: &str, origin: &str) {
        self.confirmed
            .insert((name.to_string(), origin.to_string()));
    }

    /// Check `candidate`, defined by `origin`, against the registered
    /// definition of `name`.
    pub fn check(
        &self,
        pool: &TypePool,
        name: &str,
        candidate: TypeId,
        origin: &str,
    ) -> Result<(), OdrViolation> {
        let Some(entry) = self.get(name) else {
            return Ok(());
        };
        compare_records(pool, entry.ty, candidate).map_err(|mismatch| OdrViolation {
            name: name.to_string(),
            first_origin: entry.origin.clone(),
            second_origin: origin.to_string(),
            mismatch,
        })
    }
}

fn compare_records(pool: &TypePool, first: TypeId, second: TypeId) -> Result<(), OdrMismatch> {
    let (Some(a), Some(b)) = (pool.get(first).as_record(), pool.get(second).as_record()) else {
        return Err(OdrMismatch::NotRecord);
    };
    if a.fields.len() != b.fields.len() {
        return Err(OdrMismatch::FieldCount {
            first: a.fields.len(),
            second: b.fields.len(),
        });
    }
    for (index, (fa, fb)) in a.fields.iter().zip(&b.fields).enumerate() {
        if fa.name != fb.name {
            return Err(OdrMismatch::FieldName {
                index,
                first: fa.name.clone(),
                second: fb.name.clone(),
            });
        }
        if !structurally_equal(pool, fa.ty, fb.ty) {
            return Err(OdrMismatch::FieldType {
                field: fa.name.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
