//! Expression nodes for the template scripting surface
//!
//! Only the expression shapes the object runtime participates in live here;
//! the full statement set and the parser producing it belong to the engine
//! above. Nodes carry their source span and reproduce surface syntax through
//! `Display`, so a tree renders back to the text it was built from.

use std::fmt;

use crate::context::EvalContext;
use crate::error::{ScriptError, SourceSpan};
use crate::value::Value;

/// An expression tree node
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Literal(LiteralExpression),
    Variable(VariableExpression),
    Member(MemberExpression),
    Index(IndexExpression),
    Call(CallExpression),
    Assign(AssignExpression),
}

/// A constant value written in source
#[derive(Debug, Clone, PartialEq)]
pub struct LiteralExpression {
    pub value: Value,
    pub leading_trivia: Option<Box<str>>,
    pub span: SourceSpan,
}

/// A bare name resolved against the current scope
#[derive(Debug, Clone, PartialEq)]
pub struct VariableExpression {
    pub name: String,
    pub leading_trivia: Option<Box<str>>,
    pub span: SourceSpan,
}

/// `target.member`
#[derive(Debug, Clone, PartialEq)]
pub struct MemberExpression {
    pub target: Box<Expression>,
    pub member: String,
    pub leading_trivia: Option<Box<str>>,
    pub span: SourceSpan,
}

/// `target[index]`
#[derive(Debug, Clone, PartialEq)]
pub struct IndexExpression {
    pub target: Box<Expression>,
    pub index: Box<Expression>,
    pub leading_trivia: Option<Box<str>>,
    pub span: SourceSpan,
}

/// `callee(arguments...)`
#[derive(Debug, Clone, PartialEq)]
pub struct CallExpression {
    pub callee: Box<Expression>,
    pub arguments: Vec<Expression>,
    pub leading_trivia: Option<Box<str>>,
    pub span: SourceSpan,
}

/// `target = value`
///
/// The equality token is kept verbatim for round-trip formatting. An
/// assignment is not a valid position for standalone leading trivia in the
/// surface syntax, so unlike every other node it refuses attachments.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignExpression {
    pub target: Box<Expression>,
    pub equal_token: Box<str>,
    pub value: Box<Expression>,
    pub span: SourceSpan,
}

impl AssignExpression {
    pub fn new(target: Expression, value: Expression) -> Self {
        Self {
            target: Box::new(target),
            equal_token: " = ".into(),
            value: Box::new(value),
            span: SourceSpan::NONE,
        }
    }

    /// Replace the equality token with the text as written in source
    pub fn with_equal_token(mut self, token: &str) -> Self {
        self.equal_token = token.into();
        self
    }

    /// Evaluate the assignment against a context.
    ///
    /// Evaluates the value expression, then delegates the write to the
    /// context; target resolution is entirely the context's concern. The
    /// node's own result is always the no-value marker, and evaluation
    /// leaves no state behind, so the node can be re-evaluated on each pass.
    pub fn evaluate(&self, ctx: &mut dyn EvalContext) -> Result<Value, ScriptError> {
        let value = ctx.evaluate(&self.value)?;
        ctx.set_value(&self.target, value)?;
        Ok(Value::Unit)
    }
}

impl Expression {
    pub fn literal(value: impl Into<Value>) -> Expression {
        Expression::Literal(LiteralExpression {
            value: value.into(),
            leading_trivia: None,
            span: SourceSpan::NONE,
        })
    }

    pub fn variable(name: impl Into<String>) -> Expression {
        Expression::Variable(VariableExpression {
            name: name.into(),
            leading_trivia: None,
            span: SourceSpan::NONE,
        })
    }

    pub fn member(target: Expression, member: impl Into<String>) -> Expression {
        Expression::Member(MemberExpression {
            target: Box::new(target),
            member: member.into(),
            leading_trivia: None,
            span: SourceSpan::NONE,
        })
    }

    pub fn index(target: Expression, index: Expression) -> Expression {
        Expression::Index(IndexExpression {
            target: Box::new(target),
            index: Box::new(index),
            leading_trivia: None,
            span: SourceSpan::NONE,
        })
    }

    pub fn call(callee: Expression, arguments: Vec<Expression>) -> Expression {
        Expression::Call(CallExpression {
            callee: Box::new(callee),
            arguments,
            leading_trivia: None,
            span: SourceSpan::NONE,
        })
    }

    pub fn assign(target: Expression, value: Expression) -> Expression {
        Expression::Assign(AssignExpression::new(target, value))
    }

    pub fn span(&self) -> SourceSpan {
        match self {
            Expression::Literal(e) => e.span,
            Expression::Variable(e) => e.span,
            Expression::Member(e) => e.span,
            Expression::Index(e) => e.span,
            Expression::Call(e) => e.span,
            Expression::Assign(e) => e.span,
        }
    }

    pub fn with_span(mut self, span: SourceSpan) -> Self {
        match &mut self {
            Expression::Literal(e) => e.span = span,
            Expression::Variable(e) => e.span = span,
            Expression::Member(e) => e.span = span,
            Expression::Index(e) => e.span = span,
            Expression::Call(e) => e.span = span,
            Expression::Assign(e) => e.span = span,
        }
        self
    }

    /// Whether standalone leading whitespace/comments may attach here
    pub fn can_have_leading_trivia(&self) -> bool {
        !matches!(self, Expression::Assign(_))
    }

    /// Attach leading trivia, reproduced verbatim before the node when
    /// formatting. Returns `false` (attaching nothing) on an assignment
    /// node.
    pub fn try_attach_leading_trivia(&mut self, trivia: &str) -> bool {
        let slot = match self {
            Expression::Literal(e) => &mut e.leading_trivia,
            Expression::Variable(e) => &mut e.leading_trivia,
            Expression::Member(e) => &mut e.leading_trivia,
            Expression::Index(e) => &mut e.leading_trivia,
            Expression::Call(e) => &mut e.leading_trivia,
            Expression::Assign(_) => return false,
        };
        *slot = Some(trivia.into());
        true
    }
}

fn write_trivia(f: &mut fmt::Formatter<'_>, trivia: &Option<Box<str>>) -> fmt::Result {
    if let Some(text) = trivia {
        write!(f, "{}", text)?;
    }
    Ok(())
}

fn write_literal(f: &mut fmt::Formatter<'_>, value: &Value) -> fmt::Result {
    match value {
        Value::Unit => Ok(()),
        Value::Null => write!(f, "null"),
        Value::Bool(b) => write!(f, "{}", b),
        Value::Int(n) => write!(f, "{}", n),
        Value::Float(n) => write!(f, "{}", n),
        Value::String(s) => write!(f, "\"{}\"", s),
        other => write!(f, "{:?}", other),
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Literal(e) => {
                write_trivia(f, &e.leading_trivia)?;
                write_literal(f, &e.value)
            }
            Expression::Variable(e) => {
                write_trivia(f, &e.leading_trivia)?;
                write!(f, "{}", e.name)
            }
            Expression::Member(e) => {
                write_trivia(f, &e.leading_trivia)?;
                write!(f, "{}.{}", e.target, e.member)
            }
            Expression::Index(e) => {
                write_trivia(f, &e.leading_trivia)?;
                write!(f, "{}[{}]", e.target, e.index)
            }
            Expression::Call(e) => {
                write_trivia(f, &e.leading_trivia)?;
                write!(f, "{}(", e.callee)?;
                for (i, arg) in e.arguments.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
            // target, equality token and value reproduce verbatim
            Expression::Assign(e) => {
                write!(f, "{}{}{}", e.target, e.equal_token, e.value)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_round_trip() {
        let expr = Expression::assign(
            Expression::member(Expression::variable("page"), "title"),
            Expression::literal("Home"),
        );
        assert_eq!(expr.to_string(), "page.title = \"Home\"");

        let indexed = Expression::index(
            Expression::variable("items"),
            Expression::literal(0i64),
        );
        assert_eq!(indexed.to_string(), "items[0]");

        let call = Expression::call(
            Expression::variable("join"),
            vec![Expression::literal(","), Expression::variable("parts")],
        );
        assert_eq!(call.to_string(), "join(\",\", parts)");
    }

    #[test]
    fn test_equal_token_reproduces_verbatim() {
        let expr = Expression::Assign(
            AssignExpression::new(Expression::variable("x"), Expression::literal(7i64))
                .with_equal_token("="),
        );
        assert_eq!(expr.to_string(), "x=7");
    }

    #[test]
    fn test_assignment_refuses_leading_trivia() {
        let mut assign =
            Expression::assign(Expression::variable("x"), Expression::literal(1i64));
        assert!(!assign.can_have_leading_trivia());
        assert!(!assign.try_attach_leading_trivia("  "));
        assert_eq!(assign.to_string(), "x = 1");

        let mut var = Expression::variable("x");
        assert!(var.can_have_leading_trivia());
        assert!(var.try_attach_leading_trivia("  "));
        assert_eq!(var.to_string(), "  x");
    }
}
