//! Evaluation context
//!
//! The assignment protocol and callable invocation need two operations from
//! the engine: evaluate an expression, and write a value into the location
//! an expression denotes. `EvalContext` is that seam. `ScriptContext` is the
//! minimal concrete context: one global store standing in for the engine's
//! scope stack, resolving member targets through the accessor abstraction.

use std::rc::Rc;

use crate::access::MemberAccessor;
use crate::ast::Expression;
use crate::convert::{DefaultConverter, ValueConverter};
use crate::error::{ScriptError, SourceSpan};
use crate::function::HostFunction;
use crate::object::ScriptObject;
use crate::value::Value;

/// The two context operations the assignment node relies on
pub trait EvalContext {
    fn evaluate(&mut self, expr: &Expression) -> Result<Value, ScriptError>;

    /// Write `value` into the location `target` denotes. Resolution of the
    /// target (variable, member, indexer) is the context's responsibility.
    fn set_value(&mut self, target: &Expression, value: Value) -> Result<(), ScriptError>;
}

/// Minimal evaluation context over a single global scope
pub struct ScriptContext {
    globals: Rc<ScriptObject>,
    converter: Box<dyn ValueConverter>,
}

impl ScriptContext {
    pub fn new() -> Self {
        Self::with_globals(Rc::new(ScriptObject::new()))
    }

    /// Use an existing store (e.g. one populated by import) as the scope
    pub fn with_globals(globals: Rc<ScriptObject>) -> Self {
        Self {
            globals,
            converter: Box::new(DefaultConverter),
        }
    }

    /// Replace the argument conversion service
    pub fn with_converter(mut self, converter: impl ValueConverter + 'static) -> Self {
        self.converter = Box::new(converter);
        self
    }

    pub fn globals(&self) -> &Rc<ScriptObject> {
        &self.globals
    }

    /// Invoke a host function with this context's converter
    pub fn call_function(
        &mut self,
        func: &HostFunction,
        call_site: SourceSpan,
        args: &[Value],
    ) -> Result<Value, ScriptError> {
        func.invoke(self.converter.as_ref(), call_site, args)
    }
}

impl Default for ScriptContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Object indexer keys: strings directly, integers by their decimal text
fn index_key(index: &Value) -> Option<String> {
    match index {
        Value::String(s) => Some(s.as_str().to_string()),
        Value::Int(n) => Some(n.to_string()),
        _ => None,
    }
}

impl EvalContext for ScriptContext {
    fn evaluate(&mut self, expr: &Expression) -> Result<Value, ScriptError> {
        match expr {
            Expression::Literal(e) => Ok(e.value.clone()),
            Expression::Variable(e) => Ok(self.globals.get(&e.name)),
            Expression::Member(e) => {
                let target = self.evaluate(&e.target)?;
                match target.as_accessor() {
                    Some(accessor) => Ok(accessor.get_value(&e.member)),
                    None => Err(ScriptError::invalid_member_access(
                        &e.member,
                        target.kind(),
                        e.span,
                    )),
                }
            }
            Expression::Index(e) => {
                let target = self.evaluate(&e.target)?;
                let index = self.evaluate(&e.index)?;
                match &target {
                    Value::Array(items) => {
                        let Value::Int(i) = index else {
                            return Err(ScriptError::InvalidTarget { span: e.span });
                        };
                        if i < 0 {
                            return Ok(Value::Unit);
                        }
                        Ok(items
                            .borrow()
                            .get(i as usize)
                            .cloned()
                            .unwrap_or_default())
                    }
                    Value::Object(obj) => match index_key(&index) {
                        Some(key) => Ok(obj.get(&key)),
                        None => Err(ScriptError::InvalidTarget { span: e.span }),
                    },
                    other => Err(ScriptError::invalid_member_access(
                        index_key(&index).unwrap_or_else(|| "[]".to_string()),
                        other.kind(),
                        e.span,
                    )),
                }
            }
            Expression::Call(e) => {
                let callee = self.evaluate(&e.callee)?;
                let mut args = Vec::with_capacity(e.arguments.len());
                for arg in &e.arguments {
                    args.push(self.evaluate(arg)?);
                }
                match &callee {
                    Value::Function(func) => {
                        func.invoke(self.converter.as_ref(), e.span, &args)
                    }
                    other => Err(ScriptError::not_callable(other.kind(), e.span)),
                }
            }
            Expression::Assign(e) => e.evaluate(self),
        }
    }

    fn set_value(&mut self, target: &Expression, value: Value) -> Result<(), ScriptError> {
        match target {
            Expression::Variable(e) => {
                if self.globals.soft_set(&e.name, value, false)? {
                    Ok(())
                } else {
                    Err(ScriptError::read_only_member(&e.name, e.span))
                }
            }
            Expression::Member(e) => {
                let receiver = self.evaluate(&e.target)?;
                let Some(accessor) = receiver.as_accessor() else {
                    return Err(ScriptError::invalid_member_access(
                        &e.member,
                        receiver.kind(),
                        e.span,
                    ));
                };
                if accessor.try_set_value(&e.member, value, false)? {
                    Ok(())
                } else {
                    Err(ScriptError::read_only_member(&e.member, e.span))
                }
            }
            Expression::Index(e) => {
                let receiver = self.evaluate(&e.target)?;
                let index = self.evaluate(&e.index)?;
                match &receiver {
                    Value::Array(items) => {
                        let Value::Int(i) = index else {
                            return Err(ScriptError::InvalidTarget { span: e.span });
                        };
                        if i < 0 {
                            return Err(ScriptError::InvalidTarget { span: e.span });
                        }
                        let i = i as usize;
                        let mut items = items.borrow_mut();
                        if i >= items.len() {
                            items.resize(i + 1, Value::Unit);
                        }
                        if let Some(slot) = items.get_mut(i) {
                            *slot = value;
                        }
                        Ok(())
                    }
                    Value::Object(obj) => {
                        let Some(key) = index_key(&index) else {
                            return Err(ScriptError::InvalidTarget { span: e.span });
                        };
                        // indexer-style assignment may redefine a member the
                        // import pipeline locked
                        obj.hard_set(&key, value, false)
                    }
                    _ => Err(ScriptError::InvalidTarget { span: e.span }),
                }
            }
            other => Err(ScriptError::InvalidTarget { span: other.span() }),
        }
    }
}
