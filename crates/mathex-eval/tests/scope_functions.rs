use mathex_builtins::{EvalError, Scope, Value};
use mathex_eval::compile;
use mathex_parser::parse;
use mathex_runtime::standard_host;

fn eval(src: &str, scope: &Scope) -> Result<Value, EvalError> {
    let node = parse(src).unwrap();
    compile(&node, &standard_host()).eval(scope)
}

#[test]
fn assignment_writes_the_caller_scope_and_returns_the_value() {
    let scope = Scope::new();
    assert_eq!(eval("a = 3", &scope).unwrap(), Value::Num(3.0));
    assert_eq!(scope.get("a"), Some(Value::Num(3.0)));
}

#[test]
fn assignment_chains() {
    let scope = Scope::new();
    assert_eq!(eval("a = b = 3", &scope).unwrap(), Value::Num(3.0));
    assert_eq!(scope.get("a"), Some(Value::Num(3.0)));
    assert_eq!(scope.get("b"), Some(Value::Num(3.0)));
}

#[test]
fn function_captures_the_defining_scope_by_reference() {
    let scope = Scope::new();
    eval("a = 3", &scope).unwrap();
    eval("f(x) = a * x", &scope).unwrap();
    assert_eq!(eval("f(2)", &scope).unwrap(), Value::Num(6.0));
    eval("a = 5", &scope).unwrap();
    assert_eq!(eval("f(2)", &scope).unwrap(), Value::Num(10.0));
}

#[test]
fn callable_exposes_its_syntax() {
    let scope = Scope::new();
    eval("f(x) = x^2", &scope).unwrap();
    match scope.get("f") {
        Some(Value::Function(f)) => assert_eq!(f.syntax, "f(x)"),
        other => panic!("function expected, got {other:?}"),
    }
}

#[test]
fn parameters_shadow_and_do_not_leak() {
    let scope = Scope::new();
    eval("x = 10", &scope).unwrap();
    eval("f(x) = x + 1", &scope).unwrap();
    assert_eq!(eval("f(2)", &scope).unwrap(), Value::Num(3.0));
    assert_eq!(scope.get("x"), Some(Value::Num(10.0)));
}

#[test]
fn body_assignments_stay_in_the_call_frame() {
    let scope = Scope::new();
    eval("f(x) = (t = x * 2)", &scope).unwrap();
    assert_eq!(eval("f(4)", &scope).unwrap(), Value::Num(8.0));
    assert_eq!(scope.get("t"), None);
}

#[test]
fn undefined_body_symbols_fail_at_call_time() {
    let scope = Scope::new();
    eval("f(x) = q * x", &scope).unwrap();
    let err = eval("f(2)", &scope).unwrap_err();
    assert_eq!(err.to_string(), "Undefined symbol q");
}

#[test]
fn wrong_argument_count() {
    let scope = Scope::new();
    eval("f(x) = x", &scope).unwrap();
    let err = eval("f(1, 2)", &scope).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Wrong number of arguments in function f (2 provided, 1 expected)"
    );
}

#[test]
fn host_operators_win_over_scope_bindings() {
    let scope = Scope::new();
    scope.set("add", Value::Num(1.0));
    assert_eq!(eval("add(4, 2)", &scope).unwrap(), Value::Num(6.0));
}

#[test]
fn functions_can_call_functions() {
    let scope = Scope::new();
    eval("f(x) = x + 1", &scope).unwrap();
    eval("g(x) = f(x) * 2", &scope).unwrap();
    assert_eq!(eval("g(3)", &scope).unwrap(), Value::Num(8.0));
}
