//! Reflective import pipeline
//!
//! Projects a host type or instance into a property store under a
//! declarative policy: which member categories to take, a name filter, and
//! a renaming strategy. Fields and properties snapshot their current value;
//! methods become bound host functions. Every write goes through the store's
//! soft-set path, so a locked destination member is skipped, never
//! clobbered.

use std::rc::Rc;

use bitflags::bitflags;

use crate::error::{HostError, ScriptError};
use crate::function::{HostFunction, Signature};
use crate::object::ScriptObject;
use crate::reflect::{MemberDecl, MemberKind, Reflect};
use crate::value::Value;

bitflags! {
    /// Member categories an import selects
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ImportFlags: u8 {
        const FIELDS = 1;
        const PROPERTIES = 1 << 1;
        const METHODS = 1 << 2;
        /// Bind methods of a live instance; opt-in because the bound
        /// functions keep the instance alive
        const METHODS_INSTANCE = 1 << 3;
        /// Everything except instance-method binding
        const ALL = Self::FIELDS.bits() | Self::PROPERTIES.bits() | Self::METHODS.bits();
    }
}

/// Maps a host member name to its exported script name
pub trait MemberRenamer {
    /// An empty result falls back to the original member name
    fn rename(&self, member: &str) -> String;
}

impl<F> MemberRenamer for F
where
    F: Fn(&str) -> String,
{
    fn rename(&self, member: &str) -> String {
        self(member)
    }
}

/// The engine's surface convention: Pascal/camelCase host names become
/// snake_case script names. `XmlReader` → `xml_reader`, `maxValue` →
/// `max_value`, acronym runs keep one word (`HTTPServer` → `http_server`).
#[derive(Debug, Default, Clone, Copy)]
pub struct StandardRenamer;

impl MemberRenamer for StandardRenamer {
    fn rename(&self, member: &str) -> String {
        let mut out = String::with_capacity(member.len() + 4);
        let mut prev: Option<char> = None;
        let mut chars = member.chars().peekable();
        while let Some(c) = chars.next() {
            if c.is_uppercase() {
                let after_word = prev
                    .map(|p| p.is_lowercase() || p.is_ascii_digit())
                    .unwrap_or(false);
                let before_lower = chars.peek().map(|n| n.is_lowercase()).unwrap_or(false);
                if prev.is_some() && (after_word || before_lower) {
                    out.push('_');
                }
                for lower in c.to_lowercase() {
                    out.push(lower);
                }
            } else {
                out.push(c);
            }
            prev = Some(c);
        }
        out
    }
}

/// Renamer that exports every member under its original name
#[derive(Debug, Default, Clone, Copy)]
pub struct IdentityRenamer;

impl MemberRenamer for IdentityRenamer {
    fn rename(&self, member: &str) -> String {
        member.to_string()
    }
}

/// Configuration for one import: category flags, name filter, renamer
#[derive(Clone)]
pub struct ImportPolicy {
    flags: ImportFlags,
    filter: Option<Rc<dyn Fn(&str) -> bool>>,
    renamer: Rc<dyn MemberRenamer>,
}

impl Default for ImportPolicy {
    fn default() -> Self {
        Self {
            flags: ImportFlags::ALL,
            filter: None,
            renamer: Rc::new(StandardRenamer),
        }
    }
}

impl ImportPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn flags(mut self, flags: ImportFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Restrict the import to members whose *original* name is accepted
    pub fn filter(mut self, filter: impl Fn(&str) -> bool + 'static) -> Self {
        self.filter = Some(Rc::new(filter));
        self
    }

    pub fn renamer(mut self, renamer: impl MemberRenamer + 'static) -> Self {
        self.renamer = Rc::new(renamer);
        self
    }

    fn accepts(&self, original: &str) -> bool {
        self.filter.as_ref().map(|f| f(original)).unwrap_or(true)
    }

    fn export_name(&self, original: &str) -> String {
        let renamed = self.renamer.rename(original);
        if renamed.is_empty() {
            original.to_string()
        } else {
            renamed
        }
    }
}

impl Value {
    /// Whether this value can act as an import source.
    ///
    /// Strings, numbers and raw arrays have no named members to project;
    /// everything else (including null, which imports nothing) passes.
    pub fn is_importable(&self) -> bool {
        !matches!(
            self,
            Value::String(_) | Value::Int(_) | Value::Float(_) | Value::Array(_)
        )
    }
}

impl ScriptObject {
    /// Import the static members of a host type. No instance is bound to
    /// the resulting callables.
    pub fn import_type<T: Reflect>(&self, policy: &ImportPolicy) -> Result<(), ScriptError> {
        let info = T::type_info();
        tracing::debug!(type_name = info.type_name(), "importing type members");
        for member in info.members() {
            if !member.is_static() || !self.member_selected(member, policy) {
                continue;
            }
            let export = policy.export_name(member.name());
            match &member.kind {
                MemberKind::StaticField { get, constant } => {
                    if policy.flags.contains(ImportFlags::FIELDS) {
                        self.soft_set(&export, get(), *constant)?;
                    }
                }
                MemberKind::StaticProperty { get, writable } => {
                    if policy.flags.contains(ImportFlags::PROPERTIES) {
                        self.soft_set(&export, get(), !writable)?;
                    }
                }
                MemberKind::StaticMethod { signature, call } => {
                    if policy.flags.contains(ImportFlags::METHODS) {
                        let call = Rc::clone(call);
                        let func =
                            HostFunction::new(export.clone(), signature.clone(), move |args| {
                                call(args)
                            });
                        self.soft_set(&export, Value::Function(Rc::new(func)), true)?;
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Import the instance members of a live host object.
    ///
    /// Fields and properties snapshot their current value; methods are
    /// imported only under [`ImportFlags::METHODS_INSTANCE`] and bind the
    /// given `Rc`, keeping the instance alive for as long as the callable.
    pub fn import_instance<T: Reflect>(
        &self,
        instance: &Rc<T>,
        policy: &ImportPolicy,
    ) -> Result<(), ScriptError> {
        let info = T::type_info();
        tracing::debug!(type_name = info.type_name(), "importing instance members");
        for member in info.members() {
            if member.is_static() || !self.member_selected(member, policy) {
                continue;
            }
            let export = policy.export_name(member.name());
            match &member.kind {
                MemberKind::Field { get, constant } => {
                    if policy.flags.contains(ImportFlags::FIELDS) {
                        self.soft_set(&export, get(instance), *constant)?;
                    }
                }
                MemberKind::Property { get, writable } => {
                    if policy.flags.contains(ImportFlags::PROPERTIES) {
                        self.soft_set(&export, get(instance), !writable)?;
                    }
                }
                MemberKind::Method { signature, call } => {
                    if policy.flags.contains(ImportFlags::METHODS_INSTANCE) {
                        let call = Rc::clone(call);
                        let target = Rc::clone(instance);
                        let func =
                            HostFunction::new(export.clone(), signature.clone(), move |args| {
                                call(&target, args)
                            });
                        self.soft_set(&export, Value::Function(Rc::new(func)), true)?;
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn member_selected<T>(&self, member: &MemberDecl<T>, policy: &ImportPolicy) -> bool {
        !member.is_ignored() && policy.accepts(member.name())
    }

    /// Merge another value's members into this store.
    ///
    /// A store source has its entries copied verbatim (value and read-only
    /// flag), skipping names this store holds read-only; no filtering or
    /// renaming applies. Null imports nothing. Strings, numbers and raw
    /// arrays are not importable.
    pub fn import_value(&self, value: &Value) -> Result<(), ScriptError> {
        if !value.is_importable() {
            return Err(ScriptError::unsupported_type(value.kind()));
        }
        if let Value::Object(source) = value {
            for (name, slot) in source.entries() {
                // soft_set skips read-only destination slots
                self.soft_set(name.as_str(), slot.value, slot.read_only)?;
            }
        }
        Ok(())
    }

    /// Construct a fresh store by importing everything from `value`
    pub fn from_value(value: &Value) -> Result<Rc<ScriptObject>, ScriptError> {
        let store = Rc::new(ScriptObject::new());
        store.import_value(value)?;
        Ok(store)
    }

    /// Construct a fresh store by importing an instance under the default
    /// policy
    pub fn from_instance<T: Reflect>(instance: &Rc<T>) -> Result<Rc<ScriptObject>, ScriptError> {
        let store = Rc::new(ScriptObject::new());
        store.import_instance(instance, &ImportPolicy::default())?;
        Ok(store)
    }

    /// Import one named instance member, optionally under an explicit
    /// export name.
    ///
    /// The filter is pinned to exactly `member`; an explicit name forces
    /// the renamer to yield it. Instance methods are eligible.
    pub fn import_member<T: Reflect>(
        &self,
        instance: &Rc<T>,
        member: &str,
        export_as: Option<&str>,
    ) -> Result<(), ScriptError> {
        if member.is_empty() {
            return Err(ScriptError::empty_name());
        }
        let wanted = member.to_string();
        let mut policy = ImportPolicy::default()
            .flags(ImportFlags::ALL | ImportFlags::METHODS_INSTANCE)
            .filter(move |name: &str| name == wanted);
        if let Some(export) = export_as {
            let export = export.to_string();
            policy = policy.renamer(move |_: &str| export.clone());
        }
        self.import_instance(instance, &policy)
    }

    /// Import a host closure under the given name, wrapped exactly as a
    /// bound method would be, and stored read-only.
    ///
    /// Returns `Ok(false)` if an existing read-only member blocked the
    /// import.
    pub fn import_function(
        &self,
        name: &str,
        signature: Signature,
        func: impl Fn(&[Value]) -> Result<Value, HostError> + 'static,
    ) -> Result<bool, ScriptError> {
        let wrapped = HostFunction::new(name, signature, func);
        self.soft_set(name, Value::Function(Rc::new(wrapped)), true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_renamer() {
        let r = StandardRenamer;
        assert_eq!(r.rename("Name"), "name");
        assert_eq!(r.rename("MaxValue"), "max_value");
        assert_eq!(r.rename("maxValue"), "max_value");
        assert_eq!(r.rename("HTTPServer"), "http_server");
        assert_eq!(r.rename("already_snake"), "already_snake");
        assert_eq!(r.rename("Base64"), "base64");
    }

    #[test]
    fn test_closure_renamer_and_empty_fallback() {
        let policy = ImportPolicy::default().renamer(|name: &str| format!("ext_{name}"));
        assert_eq!(policy.export_name("Run"), "ext_Run");

        let blank = ImportPolicy::default().renamer(|_: &str| String::new());
        assert_eq!(blank.export_name("Run"), "Run");
    }

    #[test]
    fn test_importable_predicate() {
        assert!(Value::Null.is_importable());
        assert!(Value::Unit.is_importable());
        assert!(Value::from(true).is_importable());
        assert!(Value::Object(Rc::new(ScriptObject::new())).is_importable());
        assert!(!Value::from("text").is_importable());
        assert!(!Value::from(1i64).is_importable());
        assert!(!Value::from(1.5).is_importable());
        assert!(!Value::array(vec![]).is_importable());
    }
}
