//! Host function adapter
//!
//! Wraps a host callable as a script value. The signature is an explicit
//! descriptor built once at registration time: an ordered list of declared
//! parameter types, with the final formal optionally collecting a variadic
//! tail. Invocation checks arity, coerces every argument through the
//! conversion service, and dispatches to the host closure, wrapping any
//! host-side failure so it never escapes raw into script error handling.

use std::fmt;
use std::rc::Rc;

use crate::convert::ValueConverter;
use crate::error::{HostError, ScriptError, SourceSpan};
use crate::value::Value;

/// Declared type of a formal parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    /// Accepts any value unchanged
    Any,
    Bool,
    Int,
    Float,
    Str,
    Array,
    Object,
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParamType::Any => "any",
            ParamType::Bool => "bool",
            ParamType::Int => "int",
            ParamType::Float => "float",
            ParamType::Str => "string",
            ParamType::Array => "array",
            ParamType::Object => "object",
        };
        write!(f, "{}", name)
    }
}

/// Ordered formal-parameter description of a host callable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    params: Vec<ParamType>,
    variadic: bool,
}

impl Signature {
    /// A signature whose supplied argument count must match exactly
    pub fn fixed(params: &[ParamType]) -> Self {
        Self {
            params: params.to_vec(),
            variadic: false,
        }
    }

    /// A signature whose final formal collects a trailing run of arguments.
    ///
    /// An empty slice declares a single all-collecting tail.
    pub fn variadic(params: &[ParamType]) -> Self {
        let params = if params.is_empty() {
            vec![ParamType::Any]
        } else {
            params.to_vec()
        };
        Self {
            params,
            variadic: true,
        }
    }

    pub fn params(&self) -> &[ParamType] {
        &self.params
    }

    pub fn is_variadic(&self) -> bool {
        self.variadic
    }

    /// Number of declared formals, the variadic tail included
    pub fn param_count(&self) -> usize {
        self.params.len()
    }

    /// Smallest accepted argument count
    pub fn min_arity(&self) -> usize {
        if self.variadic {
            self.params.len() - 1
        } else {
            self.params.len()
        }
    }
}

/// The host side of a callable: already-converted arguments in, value or
/// [`HostError`] out
pub type HostFn = Rc<dyn Fn(&[Value]) -> Result<Value, HostError>>;

/// A host callable wrapped as a script value.
///
/// Binding happens at construction: a method imported from a live object
/// captures its receiver inside `func`. The wrapper is opaque to script code
/// outside of invocation.
#[derive(Clone)]
pub struct HostFunction {
    name: String,
    signature: Signature,
    func: HostFn,
}

impl fmt::Debug for HostFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostFunction")
            .field("name", &self.name)
            .field("signature", &self.signature)
            .finish()
    }
}

impl HostFunction {
    pub fn new(
        name: impl Into<String>,
        signature: Signature,
        func: impl Fn(&[Value]) -> Result<Value, HostError> + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            signature,
            func: Rc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Invoke the wrapped host callable.
    ///
    /// `call_site` is used only for diagnostics. Arguments are coerced to
    /// the declared parameter types through `converter`; with a variadic
    /// signature, arguments at or beyond the last formal index are each
    /// coerced to [`ParamType::Any`] and collected into one array argument.
    pub fn invoke(
        &self,
        converter: &dyn ValueConverter,
        call_site: SourceSpan,
        args: &[Value],
    ) -> Result<Value, ScriptError> {
        let formals = self.signature.param_count();
        let min = self.signature.min_arity();
        let arity_ok = if self.signature.variadic {
            args.len() >= min
        } else {
            args.len() == formals
        };
        if !arity_ok {
            return Err(ScriptError::ArityMismatch {
                name: self.name.clone(),
                supplied: args.len(),
                expected: min,
                variadic: self.signature.variadic,
                span: call_site,
            });
        }

        let fixed = min;
        let mut converted = Vec::with_capacity(formals);
        for (index, arg) in args.iter().take(fixed).enumerate() {
            let target = self
                .signature
                .params
                .get(index)
                .copied()
                .unwrap_or(ParamType::Any);
            let value = converter.convert(call_site, arg, target).map_err(|source| {
                ScriptError::ArgumentConversion {
                    name: self.name.clone(),
                    index,
                    from: arg.kind(),
                    to: target,
                    span: call_site,
                    source,
                }
            })?;
            converted.push(value);
        }

        if self.signature.variadic {
            let mut tail = Vec::with_capacity(args.len() - fixed);
            for (offset, arg) in args.iter().skip(fixed).enumerate() {
                let value = converter
                    .convert(call_site, arg, ParamType::Any)
                    .map_err(|source| ScriptError::ArgumentConversion {
                        name: self.name.clone(),
                        index: fixed + offset,
                        from: arg.kind(),
                        to: ParamType::Any,
                        span: call_site,
                        source,
                    })?;
                tail.push(value);
            }
            converted.push(Value::array(tail));
        }

        match (self.func)(&converted) {
            Ok(result) => Ok(result),
            Err(source) => {
                tracing::debug!(function = %self.name, error = %source, "host call failed");
                Err(ScriptError::CallFailed {
                    name: self.name.clone(),
                    span: call_site,
                    source,
                })
            }
        }
    }
}
