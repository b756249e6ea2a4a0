use mathex_builtins::{EvalError, Matrix, Scope, Value};
use mathex_eval::compile;
use mathex_parser::parse;
use mathex_runtime::standard_host;

fn eval(src: &str, scope: &Scope) -> Result<Value, EvalError> {
    let node = parse(src).unwrap();
    compile(&node, &standard_host()).eval(scope)
}

fn nums(data: Vec<f64>, shape: Vec<usize>) -> Value {
    Value::Matrix(Matrix::from_numbers(data, shape).unwrap())
}

#[test]
fn indexing_is_one_based() {
    let scope = Scope::new();
    eval("a = [10, 20, 30]", &scope).unwrap();
    assert_eq!(eval("a[1]", &scope).unwrap(), Value::Num(10.0));
    assert_eq!(eval("a[3]", &scope).unwrap(), Value::Num(30.0));
}

#[test]
fn out_of_range_errors_are_one_based() {
    let scope = Scope::new();
    eval("a = [10, 20, 30]", &scope).unwrap();
    assert_eq!(
        eval("a[4]", &scope).unwrap_err().to_string(),
        "Index out of range (4 > 3)"
    );
    assert_eq!(
        eval("a[0]", &scope).unwrap_err().to_string(),
        "Index out of range (0 < 1)"
    );
}

#[test]
fn two_dimensional_access() {
    let scope = Scope::new();
    eval("a = [1,2;3,4]", &scope).unwrap();
    assert_eq!(eval("a[2,1]", &scope).unwrap(), Value::Num(3.0));
    assert_eq!(eval("a[1,2]", &scope).unwrap(), Value::Num(2.0));
    assert_eq!(
        eval("a[1:2,2]", &scope).unwrap(),
        nums(vec![2.0, 4.0], vec![2, 1])
    );
}

#[test]
fn end_resolves_per_dimension() {
    let scope = Scope::new();
    eval("a = [10, 20, 30]", &scope).unwrap();
    assert_eq!(eval("a[end]", &scope).unwrap(), Value::Num(30.0));
    assert_eq!(eval("a[end-1]", &scope).unwrap(), Value::Num(20.0));
    eval("m = [1,2;3,4]", &scope).unwrap();
    assert_eq!(eval("m[end,end]", &scope).unwrap(), Value::Num(4.0));
}

#[test]
fn string_indexing_with_reverse_range() {
    let scope = Scope::new();
    eval("c = \"hello\"", &scope).unwrap();
    assert_eq!(
        eval("c[end-2:-1:1]", &scope).unwrap(),
        Value::Str("leh".into())
    );
    assert_eq!(eval("c[1]", &scope).unwrap(), Value::Str("h".into()));
}

#[test]
fn full_range_shortcut() {
    let scope = Scope::new();
    eval("a = [10, 20, 30]", &scope).unwrap();
    assert_eq!(
        eval("a[:]", &scope).unwrap(),
        nums(vec![10.0, 20.0, 30.0], vec![3])
    );
}

#[test]
fn update_writes_back_and_returns_the_container() {
    let scope = Scope::new();
    eval("a = [10, 20, 30]", &scope).unwrap();
    let result = eval("a[2] = 99", &scope).unwrap();
    assert_eq!(result, nums(vec![10.0, 99.0, 30.0], vec![3]));
    assert_eq!(scope.get("a"), Some(nums(vec![10.0, 99.0, 30.0], vec![3])));
}

#[test]
fn update_resizes_with_zero_fill() {
    let scope = Scope::new();
    eval("a = [1,2;3,4]", &scope).unwrap();
    eval("a[2:3,2:3] = [10,11;12,13]", &scope).unwrap();
    assert_eq!(
        scope.get("a"),
        Some(nums(
            vec![1.0, 2.0, 0.0, 3.0, 10.0, 11.0, 0.0, 12.0, 13.0],
            vec![3, 3]
        ))
    );
}

#[test]
fn update_of_an_undefined_name_fails() {
    let err = eval("nope[1] = 2", &Scope::new()).unwrap_err();
    assert_eq!(err.to_string(), "Undefined symbol nope");
}

#[test]
fn scope_with_reserved_end_is_rejected() {
    let scope = Scope::new();
    scope.set("end", Value::Num(1.0));
    let err = eval("1 + 1", &scope).unwrap_err();
    assert_eq!(err.to_string(), "Scope contains an illegal symbol");
}

#[test]
fn end_outside_an_index_is_undefined() {
    let err = eval("end + 1", &Scope::new()).unwrap_err();
    assert_eq!(err.to_string(), "Undefined symbol end");
}

#[test]
fn nested_matrix_literal_stacks() {
    assert_eq!(
        eval("[[1,2],[3,4]]", &Scope::new()).unwrap(),
        nums(vec![1.0, 2.0, 3.0, 4.0], vec![2, 2])
    );
}
