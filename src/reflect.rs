//! Host type registration
//!
//! Rust has no runtime reflection, so importable members are declared
//! explicitly: a host type implements [`Reflect`] and returns a [`TypeInfo`]
//! registry built once, at registration time. The registry records each
//! member's name, category, host-level mutability, and a getter or call
//! closure; the import pipeline walks it under an import policy.
//!
//! Only publicly visible members can appear here by construction, and
//! constructors, operators and other specially-named members have no
//! registration surface at all.

use std::rc::Rc;

use crate::error::HostError;
use crate::function::Signature;
use crate::value::Value;

/// A host type that can be projected into a property store
pub trait Reflect: 'static {
    /// The member registry for this type
    fn type_info() -> TypeInfo<Self>
    where
        Self: Sized;
}

pub(crate) type InstanceGetter<T> = Box<dyn Fn(&T) -> Value>;
pub(crate) type StaticGetter = Box<dyn Fn() -> Value>;
pub(crate) type InstanceMethod<T> = Rc<dyn Fn(&T, &[Value]) -> Result<Value, HostError>>;
pub(crate) type StaticMethod = Rc<dyn Fn(&[Value]) -> Result<Value, HostError>>;

pub(crate) enum MemberKind<T> {
    /// Data field snapshot; `constant` marks host-level immutability
    Field {
        get: InstanceGetter<T>,
        constant: bool,
    },
    StaticField {
        get: StaticGetter,
        constant: bool,
    },
    /// Computed property; `writable` means it has a publicly accessible setter
    Property {
        get: InstanceGetter<T>,
        writable: bool,
    },
    StaticProperty {
        get: StaticGetter,
        writable: bool,
    },
    Method {
        signature: Signature,
        call: InstanceMethod<T>,
    },
    StaticMethod {
        signature: Signature,
        call: StaticMethod,
    },
}

/// One registered member of a host type
pub struct MemberDecl<T> {
    pub(crate) name: &'static str,
    pub(crate) ignored: bool,
    pub(crate) kind: MemberKind<T>,
}

impl<T> MemberDecl<T> {
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Whether this member carries the ignore tag
    pub fn is_ignored(&self) -> bool {
        self.ignored
    }

    pub(crate) fn is_static(&self) -> bool {
        matches!(
            self.kind,
            MemberKind::StaticField { .. }
                | MemberKind::StaticProperty { .. }
                | MemberKind::StaticMethod { .. }
        )
    }
}

/// Member registry for one host type, built by chaining registrations
pub struct TypeInfo<T> {
    type_name: &'static str,
    members: Vec<MemberDecl<T>>,
}

impl<T> TypeInfo<T> {
    pub fn new(type_name: &'static str) -> Self {
        Self {
            type_name,
            members: Vec::new(),
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub(crate) fn members(&self) -> &[MemberDecl<T>] {
        &self.members
    }

    fn push(mut self, name: &'static str, kind: MemberKind<T>) -> Self {
        self.members.push(MemberDecl {
            name,
            ignored: false,
            kind,
        });
        self
    }

    /// Register a mutable public field; its value imports read-write
    pub fn field(self, name: &'static str, get: impl Fn(&T) -> Value + 'static) -> Self {
        self.push(
            name,
            MemberKind::Field {
                get: Box::new(get),
                constant: false,
            },
        )
    }

    /// Register a host-immutable field; its value imports read-only
    pub fn const_field(self, name: &'static str, get: impl Fn(&T) -> Value + 'static) -> Self {
        self.push(
            name,
            MemberKind::Field {
                get: Box::new(get),
                constant: true,
            },
        )
    }

    /// Register a publicly readable property.
    ///
    /// `writable` states whether a publicly accessible setter exists; without
    /// one the member imports read-only.
    pub fn property(
        self,
        name: &'static str,
        writable: bool,
        get: impl Fn(&T) -> Value + 'static,
    ) -> Self {
        self.push(
            name,
            MemberKind::Property {
                get: Box::new(get),
                writable,
            },
        )
    }

    /// Register an instance method.
    ///
    /// The call closure receives arguments already converted per `signature`.
    pub fn method(
        self,
        name: &'static str,
        signature: Signature,
        call: impl Fn(&T, &[Value]) -> Result<Value, HostError> + 'static,
    ) -> Self {
        self.push(
            name,
            MemberKind::Method {
                signature,
                call: Rc::new(call),
            },
        )
    }

    /// Register a mutable static field
    pub fn static_field(self, name: &'static str, get: impl Fn() -> Value + 'static) -> Self {
        self.push(
            name,
            MemberKind::StaticField {
                get: Box::new(get),
                constant: false,
            },
        )
    }

    /// Register a constant static field; imports read-only
    pub fn static_const(self, name: &'static str, get: impl Fn() -> Value + 'static) -> Self {
        self.push(
            name,
            MemberKind::StaticField {
                get: Box::new(get),
                constant: true,
            },
        )
    }

    /// Register a static property
    pub fn static_property(
        self,
        name: &'static str,
        writable: bool,
        get: impl Fn() -> Value + 'static,
    ) -> Self {
        self.push(
            name,
            MemberKind::StaticProperty {
                get: Box::new(get),
                writable,
            },
        )
    }

    /// Register a static method
    pub fn static_method(
        self,
        name: &'static str,
        signature: Signature,
        call: impl Fn(&[Value]) -> Result<Value, HostError> + 'static,
    ) -> Self {
        self.push(
            name,
            MemberKind::StaticMethod {
                signature,
                call: Rc::new(call),
            },
        )
    }

    /// Tag every member registered under `name` as ignored.
    ///
    /// Ignored members are skipped by every import, regardless of filter and
    /// renamer settings.
    pub fn ignore(mut self, name: &'static str) -> Self {
        for member in &mut self.members {
            if member.name == name {
                member.ignored = true;
            }
        }
        self
    }
}
