//! Tests for callable invocation through the evaluation context

use std::error::Error as _;

use weft::{
    EvalContext, Expression, HostError, ParamType, ScriptContext, ScriptError, Signature, Value,
};

fn context_with_functions() -> ScriptContext {
    let ctx = ScriptContext::new();
    ctx.globals()
        .import_function(
            "add",
            Signature::fixed(&[ParamType::Int, ParamType::Int]),
            |args| match args {
                [Value::Int(a), Value::Int(b)] => Ok(Value::Int(a + b)),
                _ => Err(HostError::new("bad arguments")),
            },
        )
        .unwrap();
    ctx.globals()
        .import_function(
            "sum",
            Signature::variadic(&[ParamType::Any]),
            |args| match args {
                [Value::Array(items)] => {
                    let mut total = 0i64;
                    for item in items.borrow().iter() {
                        let Value::Int(n) = item else {
                            return Err(HostError::new("sum expects integers"));
                        };
                        total += n;
                    }
                    Ok(Value::Int(total))
                }
                _ => Err(HostError::new("bad arguments")),
            },
        )
        .unwrap();
    ctx
}

#[test]
fn test_call_through_context() {
    let mut ctx = context_with_functions();
    let call = Expression::call(
        Expression::variable("add"),
        vec![Expression::literal(20i64), Expression::literal(22i64)],
    );
    assert_eq!(ctx.evaluate(&call).unwrap(), Value::from(42i64));
}

#[test]
fn test_variadic_call_accepts_any_count() {
    let mut ctx = context_with_functions();
    for (args, expected) in [
        (vec![], 0i64),
        (vec![Expression::literal(1i64)], 1),
        (
            vec![
                Expression::literal(1i64),
                Expression::literal(2i64),
                Expression::literal(3i64),
                Expression::literal(4i64),
                Expression::literal(5i64),
            ],
            15,
        ),
    ] {
        let call = Expression::call(Expression::variable("sum"), args);
        assert_eq!(ctx.evaluate(&call).unwrap(), Value::from(expected));
    }
}

#[test]
fn test_arity_error_reports_call_site() {
    let mut ctx = context_with_functions();
    let span = weft::SourceSpan::new(7, 3);
    let call = Expression::call(
        Expression::variable("add"),
        vec![Expression::literal(1i64)],
    )
    .with_span(span);

    match ctx.evaluate(&call) {
        Err(ScriptError::ArityMismatch {
            name,
            supplied,
            expected,
            span: reported,
            ..
        }) => {
            assert_eq!(name, "add");
            assert_eq!(supplied, 1);
            assert_eq!(expected, 2);
            assert_eq!(reported, span);
        }
        other => panic!("expected ArityMismatch, got {other:?}"),
    }
}

#[test]
fn test_conversion_error_reports_argument() {
    let mut ctx = context_with_functions();
    let call = Expression::call(
        Expression::variable("add"),
        vec![Expression::literal(1i64), Expression::literal("two")],
    );

    match ctx.evaluate(&call) {
        Err(ScriptError::ArgumentConversion { index, to, .. }) => {
            assert_eq!(index, 1);
            assert_eq!(to, ParamType::Int);
        }
        other => panic!("expected ArgumentConversion, got {other:?}"),
    }
}

#[test]
fn test_host_failure_keeps_its_cause() {
    let mut ctx = context_with_functions();
    // the tail converts fine (Any), the host rejects the payload itself
    let call = Expression::call(
        Expression::variable("sum"),
        vec![Expression::literal("nope")],
    );

    let err = ctx.evaluate(&call).unwrap_err();
    match &err {
        ScriptError::CallFailed { name, .. } => assert_eq!(name, "sum"),
        other => panic!("expected CallFailed, got {other:?}"),
    }
    let cause = err.source().expect("cause should be chained");
    assert_eq!(cause.to_string(), "sum expects integers");
}

#[test]
fn test_calling_a_non_function_fails() {
    let mut ctx = ScriptContext::new();
    ctx.globals()
        .soft_set("n", Value::from(3i64), false)
        .unwrap();

    let call = Expression::call(Expression::variable("n"), vec![]);
    assert!(matches!(
        ctx.evaluate(&call),
        Err(ScriptError::NotCallable { .. })
    ));
}

#[test]
fn test_call_function_uses_the_context_converter() {
    /// Converter that refuses everything, to prove it is consulted
    struct Strict;
    impl weft::ValueConverter for Strict {
        fn convert(
            &self,
            _span: weft::SourceSpan,
            value: &Value,
            target: ParamType,
        ) -> Result<Value, weft::ConvertError> {
            Err(weft::ConvertError {
                from: value.kind(),
                to: target,
            })
        }
    }

    let mut ctx = context_with_functions();
    let add = ctx.globals().get("add");
    let func = add.as_function().unwrap().clone();
    assert_eq!(func.signature().params().len(), 2);
    assert!(!func.signature().is_variadic());

    let ok = ctx
        .call_function(
            &func,
            weft::SourceSpan::NONE,
            &[Value::from(1i64), Value::from(2i64)],
        )
        .unwrap();
    assert_eq!(ok, Value::from(3i64));

    let mut strict = context_with_functions().with_converter(Strict);
    let err = strict
        .call_function(
            &func,
            weft::SourceSpan::NONE,
            &[Value::from(1i64), Value::from(2i64)],
        )
        .unwrap_err();
    assert!(matches!(err, ScriptError::ArgumentConversion { index: 0, .. }));
}

#[test]
fn test_call_result_flows_into_assignment() {
    let mut ctx = context_with_functions();
    let assign = Expression::assign(
        Expression::variable("total"),
        Expression::call(
            Expression::variable("add"),
            vec![Expression::literal(40i64), Expression::literal(2i64)],
        ),
    );

    assert_eq!(ctx.evaluate(&assign).unwrap(), Value::Unit);
    assert_eq!(ctx.globals().get("total"), Value::from(42i64));
}
