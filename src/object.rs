//! Dynamic property store
//!
//! `ScriptObject` is the keyed container the evaluator sees as a scope or an
//! object value: named slots, each holding a value and a read-only bit. Host
//! code populates it directly or through the import pipeline and then hands
//! it to the engine.

use std::cell::RefCell;
use std::fmt;
use std::hash::BuildHasherDefault;

use indexmap::IndexMap;
use rustc_hash::FxHasher;

use crate::error::ScriptError;
use crate::value::{CheapClone, ScriptString, Value};

type SlotMap = IndexMap<ScriptString, Slot, BuildHasherDefault<FxHasher>>;

/// A (value, read-only flag) pair held under one key
#[derive(Debug, Clone, PartialEq)]
pub struct Slot {
    pub value: Value,
    pub read_only: bool,
}

impl Slot {
    pub fn new(value: Value, read_only: bool) -> Self {
        Self { value, read_only }
    }
}

/// A dynamic property store.
///
/// Iteration follows insertion order as a convenience; callers must not rely
/// on it for correctness. Interior mutability keeps every operation `&self`
/// so the store can be shared behind an `Rc`; it is not thread-safe.
#[derive(Default)]
pub struct ScriptObject {
    slots: RefCell<SlotMap>,
}

impl ScriptObject {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store with pre-allocated slot capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: RefCell::new(IndexMap::with_capacity_and_hasher(
                capacity,
                Default::default(),
            )),
        }
    }

    /// Check whether a member exists
    pub fn contains(&self, name: &str) -> Result<bool, ScriptError> {
        check_name(name)?;
        Ok(self.slots.borrow().contains_key(name))
    }

    /// Read a member; `None` if absent. Never fails, even on an empty name.
    pub fn try_get(&self, name: &str) -> Option<Value> {
        self.slots.borrow().get(name).map(|slot| slot.value.clone())
    }

    /// Read a member; an absent member yields `Value::Unit`
    pub fn get(&self, name: &str) -> Value {
        self.try_get(name).unwrap_or_default()
    }

    /// Write a member, respecting an existing read-only lock.
    ///
    /// Inserts a new slot, or overwrites value and flag of an existing
    /// writable one. Returns `Ok(false)` without modification if the
    /// existing slot is read-only. This is the write path used by imports
    /// and by script member assignment.
    pub fn soft_set(
        &self,
        name: &str,
        value: Value,
        read_only: bool,
    ) -> Result<bool, ScriptError> {
        check_name(name)?;
        let mut slots = self.slots.borrow_mut();
        if let Some(slot) = slots.get_mut(name) {
            if slot.read_only {
                return Ok(false);
            }
            slot.value = value;
            slot.read_only = read_only;
        } else {
            slots.insert(ScriptString::from(name), Slot::new(value, read_only));
        }
        Ok(true)
    }

    /// Write a member unconditionally, overriding any read-only lock.
    ///
    /// Used when the owner explicitly (re)defines a member, e.g. an
    /// indexer-style assignment from script code.
    pub fn hard_set(&self, name: &str, value: Value, read_only: bool) -> Result<(), ScriptError> {
        check_name(name)?;
        self.slots
            .borrow_mut()
            .insert(ScriptString::from(name), Slot::new(value, read_only));
        Ok(())
    }

    /// Check the read-only bit; false for an absent member
    pub fn is_read_only(&self, name: &str) -> Result<bool, ScriptError> {
        check_name(name)?;
        Ok(self
            .slots
            .borrow()
            .get(name)
            .map(|slot| slot.read_only)
            .unwrap_or(false))
    }

    /// Toggle the read-only bit without touching the value.
    ///
    /// A missing member is created with a `Unit` value so it can be locked
    /// ahead of definition.
    pub fn set_read_only(&self, name: &str, read_only: bool) -> Result<(), ScriptError> {
        check_name(name)?;
        let mut slots = self.slots.borrow_mut();
        if let Some(slot) = slots.get_mut(name) {
            slot.read_only = read_only;
        } else {
            slots.insert(
                ScriptString::from(name),
                Slot::new(Value::Unit, read_only),
            );
        }
        Ok(())
    }

    /// Remove a member; returns whether it existed
    pub fn remove(&self, name: &str) -> Result<bool, ScriptError> {
        check_name(name)?;
        Ok(self.slots.borrow_mut().shift_remove(name).is_some())
    }

    /// Remove all members
    pub fn clear(&self) {
        self.slots.borrow_mut().clear();
    }

    pub fn len(&self) -> usize {
        self.slots.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.borrow().is_empty()
    }

    /// Snapshot of the member names
    pub fn keys(&self) -> Vec<ScriptString> {
        self.slots
            .borrow()
            .keys()
            .map(CheapClone::cheap_clone)
            .collect()
    }

    /// Snapshot of the member values, without their read-only bits
    pub fn values(&self) -> Vec<Value> {
        self.slots
            .borrow()
            .values()
            .map(|slot| slot.value.clone())
            .collect()
    }

    /// Snapshot of the (name, slot) pairs
    pub fn entries(&self) -> Vec<(ScriptString, Slot)> {
        self.slots
            .borrow()
            .iter()
            .map(|(name, slot)| (name.cheap_clone(), slot.clone()))
            .collect()
    }
}

impl fmt::Debug for ScriptObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptObject")
            .field("len", &self.len())
            .finish()
    }
}

fn check_name(name: &str) -> Result<(), ScriptError> {
    if name.is_empty() {
        return Err(ScriptError::empty_name());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_then_get_round_trips() {
        let obj = ScriptObject::new();
        assert!(obj.soft_set("name", Value::from("weft"), false).unwrap());
        assert_eq!(obj.get("name"), Value::from("weft"));
        assert!(obj.contains("name").unwrap());
        assert_eq!(obj.len(), 1);
    }

    #[test]
    fn test_get_missing_member_is_unit() {
        let obj = ScriptObject::new();
        assert_eq!(obj.get("missing"), Value::Unit);
        assert!(obj.try_get("missing").is_none());
    }

    #[test]
    fn test_soft_set_respects_read_only() {
        let obj = ScriptObject::new();
        obj.soft_set("k", Value::from(1i64), false).unwrap();
        obj.set_read_only("k", true).unwrap();

        assert!(!obj.soft_set("k", Value::from(2i64), false).unwrap());
        assert_eq!(obj.get("k"), Value::from(1i64));
        assert!(obj.is_read_only("k").unwrap());
    }

    #[test]
    fn test_hard_set_overrides_read_only() {
        let obj = ScriptObject::new();
        obj.soft_set("k", Value::from(1i64), true).unwrap();

        obj.hard_set("k", Value::from(2i64), false).unwrap();
        assert_eq!(obj.get("k"), Value::from(2i64));
        assert!(!obj.is_read_only("k").unwrap());
        // writable again
        assert!(obj.soft_set("k", Value::from(3i64), false).unwrap());
    }

    #[test]
    fn test_set_read_only_creates_missing_member() {
        let obj = ScriptObject::new();
        obj.set_read_only("pending", true).unwrap();
        assert!(obj.is_read_only("pending").unwrap());
        assert_eq!(obj.get("pending"), Value::Unit);

        // existing value is preserved when only the bit changes
        obj.hard_set("pending", Value::from(9i64), true).unwrap();
        obj.set_read_only("pending", false).unwrap();
        assert_eq!(obj.get("pending"), Value::from(9i64));
    }

    #[test]
    fn test_is_read_only_false_for_missing() {
        let obj = ScriptObject::new();
        assert!(!obj.is_read_only("ghost").unwrap());
    }

    #[test]
    fn test_empty_name_is_rejected() {
        let obj = ScriptObject::new();
        assert!(matches!(
            obj.contains(""),
            Err(ScriptError::InvalidArgument { .. })
        ));
        assert!(matches!(
            obj.soft_set("", Value::Null, false),
            Err(ScriptError::InvalidArgument { .. })
        ));
        assert!(matches!(
            obj.remove(""),
            Err(ScriptError::InvalidArgument { .. })
        ));
        // the read contract never fails
        assert_eq!(obj.get(""), Value::Unit);
        assert!(obj.try_get("").is_none());
    }

    #[test]
    fn test_remove_and_clear() {
        let obj = ScriptObject::new();
        obj.soft_set("a", Value::from(1i64), false).unwrap();
        obj.soft_set("b", Value::from(2i64), true).unwrap();

        assert!(obj.remove("a").unwrap());
        assert!(!obj.remove("a").unwrap());
        assert_eq!(obj.len(), 1);

        obj.clear();
        assert!(obj.is_empty());
    }

    #[test]
    fn test_snapshots() {
        let obj = ScriptObject::new();
        obj.soft_set("a", Value::from(1i64), false).unwrap();
        obj.soft_set("b", Value::from(2i64), true).unwrap();

        let keys = obj.keys();
        assert_eq!(keys.len(), 2);
        assert!(keys.iter().any(|k| k == &"a"));

        // values carry no read-only bits
        let values = obj.values();
        assert!(values.contains(&Value::from(1i64)));
        assert!(values.contains(&Value::from(2i64)));

        let entries = obj.entries();
        let b = entries
            .iter()
            .find(|(name, _)| name == &"b")
            .map(|(_, slot)| slot.clone())
            .unwrap();
        assert!(b.read_only);
        assert_eq!(b.value, Value::from(2i64));
    }
}
