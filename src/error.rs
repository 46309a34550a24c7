//! Error types for the template scripting runtime

use std::fmt;

use thiserror::Error;

use crate::convert::ConvertError;
use crate::function::ParamType;
use crate::value::ValueKind;

/// Source position information for script-level diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceSpan {
    pub line: u32,
    pub column: u32,
}

impl SourceSpan {
    /// A span for values constructed by host code rather than parsed source
    pub const NONE: SourceSpan = SourceSpan { line: 0, column: 0 };

    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for SourceSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A failure raised by host code invoked from script.
///
/// This is the host side of the dispatch boundary: host methods report
/// failures as values of this type, and the function adapter wraps them
/// into [`ScriptError::CallFailed`] before they reach the evaluator.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct HostError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + 'static>>,
}

impl HostError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<String> for HostError {
    fn from(message: String) -> Self {
        HostError::new(message)
    }
}

impl From<&str> for HostError {
    fn from(message: &str) -> Self {
        HostError::new(message)
    }
}

/// Main error type for the runtime
#[derive(Debug, Error)]
pub enum ScriptError {
    /// Structural misuse by host glue code (e.g. an empty member name)
    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: &'static str },

    /// Attempted import of a value kind that has no importable members
    #[error("cannot import a value of type {kind}")]
    UnsupportedType { kind: ValueKind },

    #[error("{name}: wrong number of arguments at {span}: {supplied} supplied, {} expected", format_expected(.expected, .variadic))]
    ArityMismatch {
        name: String,
        supplied: usize,
        expected: usize,
        variadic: bool,
        span: SourceSpan,
    },

    #[error("{name}: cannot convert argument {index} from {from} to {to} at {span}")]
    ArgumentConversion {
        name: String,
        index: usize,
        from: ValueKind,
        to: ParamType,
        span: SourceSpan,
        #[source]
        source: ConvertError,
    },

    #[error("{name}: call failed at {span}")]
    CallFailed {
        name: String,
        span: SourceSpan,
        #[source]
        source: HostError,
    },

    #[error("cannot call a value of type {kind} at {span}")]
    NotCallable { kind: ValueKind, span: SourceSpan },

    #[error("cannot access member '{member}' on a value of type {kind} at {span}")]
    InvalidMemberAccess {
        member: String,
        kind: ValueKind,
        span: SourceSpan,
    },

    #[error("cannot assign to read-only member '{name}' at {span}")]
    ReadOnlyMember { name: String, span: SourceSpan },

    #[error("invalid assignment target at {span}")]
    InvalidTarget { span: SourceSpan },
}

fn format_expected(expected: &usize, variadic: &bool) -> String {
    if *variadic {
        format!("at least {}", expected)
    } else {
        expected.to_string()
    }
}

impl ScriptError {
    /// The empty string is the null-name sentinel; every name-taking store
    /// operation rejects it with this error.
    pub fn empty_name() -> Self {
        ScriptError::InvalidArgument {
            reason: "member name must not be empty",
        }
    }

    pub fn unsupported_type(kind: ValueKind) -> Self {
        ScriptError::UnsupportedType { kind }
    }

    pub fn not_callable(kind: ValueKind, span: SourceSpan) -> Self {
        ScriptError::NotCallable { kind, span }
    }

    pub fn read_only_member(name: impl Into<String>, span: SourceSpan) -> Self {
        ScriptError::ReadOnlyMember {
            name: name.into(),
            span,
        }
    }

    pub fn invalid_member_access(
        member: impl Into<String>,
        kind: ValueKind,
        span: SourceSpan,
    ) -> Self {
        ScriptError::InvalidMemberAccess {
            member: member.into(),
            kind,
            span,
        }
    }
}
