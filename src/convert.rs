//! Argument conversion service
//!
//! The function adapter coerces every supplied call argument to the declared
//! parameter type through this trait. It is a collaborator seam: engines
//! with richer coercion rules plug in their own implementation, while
//! [`DefaultConverter`] covers the conversions the runtime itself needs.

use thiserror::Error;

use crate::error::SourceSpan;
use crate::function::ParamType;
use crate::value::{Value, ValueKind};

/// A single failed coercion, carried as the cause inside
/// [`crate::ScriptError::ArgumentConversion`]
#[derive(Debug, Clone, Error)]
#[error("no conversion from {from} to {to}")]
pub struct ConvertError {
    pub from: ValueKind,
    pub to: ParamType,
}

/// Coerces script values to declared parameter types
pub trait ValueConverter {
    /// Convert `value` to `target`, or fail with the source/destination pair.
    ///
    /// `span` is the call site, for implementations that produce their own
    /// positioned diagnostics.
    fn convert(
        &self,
        span: SourceSpan,
        value: &Value,
        target: ParamType,
    ) -> Result<Value, ConvertError>;
}

/// The conversions the runtime relies on: identity on matching kinds,
/// numeric widening, exact float-to-int narrowing, and primitive-to-string.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultConverter;

impl ValueConverter for DefaultConverter {
    fn convert(
        &self,
        _span: SourceSpan,
        value: &Value,
        target: ParamType,
    ) -> Result<Value, ConvertError> {
        let mismatch = || ConvertError {
            from: value.kind(),
            to: target,
        };

        match target {
            ParamType::Any => Ok(value.clone()),
            ParamType::Bool => match value {
                Value::Bool(_) => Ok(value.clone()),
                _ => Err(mismatch()),
            },
            ParamType::Int => match value {
                Value::Int(_) => Ok(value.clone()),
                Value::Float(f) if f.fract() == 0.0 && f.is_finite() => {
                    Ok(Value::Int(*f as i64))
                }
                _ => Err(mismatch()),
            },
            ParamType::Float => match value {
                Value::Float(_) => Ok(value.clone()),
                Value::Int(n) => Ok(Value::Float(*n as f64)),
                _ => Err(mismatch()),
            },
            ParamType::Str => match value {
                Value::String(_) => Ok(value.clone()),
                Value::Bool(b) => Ok(Value::from(b.to_string())),
                Value::Int(n) => Ok(Value::from(n.to_string())),
                Value::Float(f) => Ok(Value::from(f.to_string())),
                _ => Err(mismatch()),
            },
            ParamType::Array => match value {
                Value::Array(_) => Ok(value.clone()),
                _ => Err(mismatch()),
            },
            ParamType::Object => match value {
                Value::Object(_) => Ok(value.clone()),
                _ => Err(mismatch()),
            },
        }
    }
}
