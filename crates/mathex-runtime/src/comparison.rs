//! Relational kernels. All six return booleans, element-wise over matrices.

use mathex_builtins::{EvalError, Value};

use crate::arithmetic::{as_num, broadcast};

fn scalar_equal(a: &Value, b: &Value) -> Result<Value, EvalError> {
    if let (Some(x), Some(y)) = (as_num(a), as_num(b)) {
        return Ok(Value::Bool(x == y));
    }
    match (a, b) {
        (Value::Str(x), Value::Str(y)) => Ok(Value::Bool(x == y)),
        (Value::Complex(x), Value::Complex(y)) => Ok(Value::Bool(x == y)),
        (Value::Unit(x), Value::Unit(y)) => {
            if x.dimension != y.dimension {
                return Err(cmp_type_error("equal", a, b));
            }
            Ok(Value::Bool(x.value == y.value))
        }
        (Value::Null, Value::Null) => Ok(Value::Bool(true)),
        _ => Err(cmp_type_error("equal", a, b)),
    }
}

fn ordered(fn_name: &'static str, cmp: fn(f64, f64) -> bool) -> impl Fn(&Value, &Value) -> Result<Value, EvalError> {
    move |a, b| {
        if let (Some(x), Some(y)) = (as_num(a), as_num(b)) {
            return Ok(Value::Bool(cmp(x, y)));
        }
        match (a, b) {
            (Value::Unit(x), Value::Unit(y)) => {
                if x.dimension != y.dimension {
                    return Err(cmp_type_error(fn_name, a, b));
                }
                Ok(Value::Bool(cmp(x.value, y.value)))
            }
            _ => Err(cmp_type_error(fn_name, a, b)),
        }
    }
}

fn cmp_type_error(fn_name: &str, a: &Value, b: &Value) -> EvalError {
    EvalError::type_error(
        fn_name,
        format!("unexpected {} and {}", a.type_name(), b.type_name()),
    )
}

pub fn equal(a: &Value, b: &Value) -> Result<Value, EvalError> {
    broadcast(a, b, &scalar_equal)
}

pub fn unequal(a: &Value, b: &Value) -> Result<Value, EvalError> {
    broadcast(a, b, &|x, y| match scalar_equal(x, y)? {
        Value::Bool(eq) => Ok(Value::Bool(!eq)),
        other => Ok(other),
    })
}

pub fn smaller(a: &Value, b: &Value) -> Result<Value, EvalError> {
    broadcast(a, b, &ordered("smaller", |x, y| x < y))
}

pub fn larger(a: &Value, b: &Value) -> Result<Value, EvalError> {
    broadcast(a, b, &ordered("larger", |x, y| x > y))
}

pub fn smaller_eq(a: &Value, b: &Value) -> Result<Value, EvalError> {
    broadcast(a, b, &ordered("smallerEq", |x, y| x <= y))
}

pub fn larger_eq(a: &Value, b: &Value) -> Result<Value, EvalError> {
    broadcast(a, b, &ordered("largerEq", |x, y| x >= y))
}

builtin!("equal", "comparison", binary, equal);
builtin!("unequal", "comparison", binary, unequal);
builtin!("smaller", "comparison", binary, smaller);
builtin!("larger", "comparison", binary, larger);
builtin!("smallerEq", "comparison", binary, smaller_eq);
builtin!("largerEq", "comparison", binary, larger_eq);
