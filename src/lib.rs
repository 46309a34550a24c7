//! Dynamic object runtime for a template scripting language
//!
//! This crate is the member-resolution layer of an embeddable template
//! scripting engine: a property store with per-member read-only locking
//! ([`ScriptObject`]), the accessor contract the evaluator reads and writes
//! members through ([`MemberAccessor`]), an import pipeline that projects
//! host types and instances into a store ([`Reflect`], [`ImportPolicy`]),
//! a host-function adapter ([`HostFunction`]), and the assignment
//! evaluation protocol ([`Expression`], [`EvalContext`]).
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use weft::{EvalContext, Expression, ScriptContext, ScriptObject, Value};
//!
//! let globals = Rc::new(ScriptObject::new());
//! globals.soft_set("greeting", Value::from("hello"), false).unwrap();
//!
//! let mut ctx = ScriptContext::with_globals(globals);
//! let assign = Expression::assign(
//!     Expression::variable("count"),
//!     Expression::literal(3i64),
//! );
//! assert_eq!(ctx.evaluate(&assign).unwrap(), Value::Unit);
//! assert_eq!(ctx.globals().get("count"), Value::from(3i64));
//! ```

pub mod access;
pub mod ast;
pub mod context;
pub mod convert;
pub mod error;
pub mod function;
pub mod import;
pub mod json;
pub mod object;
pub mod reflect;
pub mod value;

pub use access::MemberAccessor;
pub use ast::{AssignExpression, Expression};
pub use context::{EvalContext, ScriptContext};
pub use convert::{ConvertError, DefaultConverter, ValueConverter};
pub use error::{HostError, ScriptError, SourceSpan};
pub use function::{HostFunction, ParamType, Signature};
pub use import::{IdentityRenamer, ImportFlags, ImportPolicy, MemberRenamer, StandardRenamer};
pub use json::{value_from_json, value_to_json};
pub use object::{ScriptObject, Slot};
pub use reflect::{Reflect, TypeInfo};
pub use value::{CheapClone, ScriptString, Value, ValueKind};
