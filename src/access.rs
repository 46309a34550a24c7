//! Member-accessor abstraction
//!
//! The capability contract any member-bearing runtime value implements so
//! the evaluator can treat heterogeneous value kinds uniformly. The property
//! store implements it by routing to its own operations with soft-set
//! semantics; the evaluator reaches every member read and write through this
//! trait rather than through a concrete type.

use crate::error::ScriptError;
use crate::object::ScriptObject;
use crate::value::Value;

/// Uniform member access over a runtime value
pub trait MemberAccessor {
    /// Check whether the target exposes a member of this name
    fn has_member(&self, name: &str) -> bool;

    /// Read a member; an absent member yields `Value::Unit`
    fn get_value(&self, name: &str) -> Value;

    /// Write a member, respecting the target's own read-only policy.
    ///
    /// A locked member rejects the write with `Ok(false)` rather than
    /// failing: script code routinely probes writability before deciding
    /// how to proceed.
    fn try_set_value(
        &self,
        name: &str,
        value: Value,
        read_only: bool,
    ) -> Result<bool, ScriptError>;

    /// Toggle the read-only bit on a member
    fn set_read_only(&self, name: &str, read_only: bool) -> Result<(), ScriptError>;

    /// Whether locking members is meaningful for this value kind
    fn supports_read_only(&self) -> bool;
}

impl MemberAccessor for ScriptObject {
    fn has_member(&self, name: &str) -> bool {
        self.try_get(name).is_some()
    }

    fn get_value(&self, name: &str) -> Value {
        self.get(name)
    }

    fn try_set_value(
        &self,
        name: &str,
        value: Value,
        read_only: bool,
    ) -> Result<bool, ScriptError> {
        self.soft_set(name, value, read_only)
    }

    fn set_read_only(&self, name: &str, read_only: bool) -> Result<(), ScriptError> {
        ScriptObject::set_read_only(self, name, read_only)
    }

    fn supports_read_only(&self) -> bool {
        true
    }
}

impl Value {
    /// Surface the member-bearing capability of this value, if it has one.
    ///
    /// Today only object values bear members; the evaluator goes through
    /// this method so further member-bearing kinds only have to implement
    /// [`MemberAccessor`].
    pub fn as_accessor(&self) -> Option<&dyn MemberAccessor> {
        match self {
            Value::Object(obj) => Some(obj.as_ref()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_routes_through_soft_set() {
        let obj = ScriptObject::new();
        obj.soft_set("locked", Value::from(1i64), true).unwrap();

        let accessor: &dyn MemberAccessor = &obj;
        assert!(accessor.supports_read_only());
        assert!(accessor.has_member("locked"));
        assert_eq!(accessor.get_value("locked"), Value::from(1i64));

        // locked member rejects the write without failing
        assert!(!accessor
            .try_set_value("locked", Value::from(2i64), false)
            .unwrap());
        assert_eq!(accessor.get_value("locked"), Value::from(1i64));

        assert!(accessor
            .try_set_value("fresh", Value::from(3i64), false)
            .unwrap());
        assert_eq!(accessor.get_value("fresh"), Value::from(3i64));

        // locking through the contract behaves like locking on the store
        accessor.set_read_only("fresh", true).unwrap();
        assert!(!accessor
            .try_set_value("fresh", Value::from(4i64), false)
            .unwrap());
        assert_eq!(accessor.get_value("fresh"), Value::from(3i64));
    }

    #[test]
    fn test_value_capability_variant() {
        let obj = Value::Object(std::rc::Rc::new(ScriptObject::new()));
        assert!(obj.as_accessor().is_some());
        assert!(Value::from(1i64).as_accessor().is_none());
        assert!(Value::from("s").as_accessor().is_none());
        assert!(Value::Null.as_accessor().is_none());
    }
}
