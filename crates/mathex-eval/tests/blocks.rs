use mathex_builtins::{EvalError, Scope, Value};
use mathex_eval::compile;
use mathex_parser::parse;
use mathex_runtime::standard_host;

fn eval(src: &str, scope: &Scope) -> Result<Value, EvalError> {
    let node = parse(src).unwrap();
    compile(&node, &standard_host()).eval(scope)
}

#[test]
fn visible_entries_collect_into_a_result_set() {
    let scope = Scope::new();
    let result = eval("a=3\nb=4\na*b", &scope).unwrap();
    assert_eq!(
        result,
        Value::ResultSet(vec![Value::Num(3.0), Value::Num(4.0), Value::Num(12.0)])
    );
    assert_eq!(scope.get("a"), Some(Value::Num(3.0)));
    assert_eq!(scope.get("b"), Some(Value::Num(4.0)));
}

#[test]
fn semicolon_suppresses_output_but_still_evaluates() {
    let scope = Scope::new();
    let result = eval("a=3; b=4; a*b", &scope).unwrap();
    assert_eq!(result, Value::ResultSet(vec![Value::Num(12.0)]));
    assert_eq!(scope.get("b"), Some(Value::Num(4.0)));
}

#[test]
fn single_visible_entry_is_still_a_result_set() {
    let scope = Scope::new();
    let result = eval("f(x) = x^2; f(3)", &scope).unwrap();
    assert_eq!(result, Value::ResultSet(vec![Value::Num(9.0)]));
    assert!(matches!(scope.get("f"), Some(Value::Function(_))));
}

#[test]
fn fully_suppressed_block_yields_an_empty_result_set() {
    let result = eval("2+2;", &Scope::new()).unwrap();
    assert_eq!(result, Value::ResultSet(vec![]));
}

#[test]
fn entries_evaluate_in_textual_order() {
    let scope = Scope::new();
    let result = eval("a=1; a=a+1; a=a*10\na", &scope).unwrap();
    assert_eq!(
        result,
        Value::ResultSet(vec![Value::Num(20.0), Value::Num(20.0)])
    );
}

#[test]
fn plain_expressions_do_not_wrap() {
    assert_eq!(eval("2+2", &Scope::new()).unwrap(), Value::Num(4.0));
}

#[test]
fn errors_stop_the_block() {
    let scope = Scope::new();
    let err = eval("a=1\nx\nb=2", &scope).unwrap_err();
    assert_eq!(err.to_string(), "Undefined symbol x");
    assert_eq!(scope.get("a"), Some(Value::Num(1.0)));
    assert_eq!(scope.get("b"), None);
}
