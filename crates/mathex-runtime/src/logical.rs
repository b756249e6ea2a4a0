//! Logical and bitwise kernels, plus the host truthiness predicate.

use mathex_builtins::{EvalError, Value};

use crate::arithmetic::{as_num, broadcast, broadcast_unary};

/// Truthiness: numbers are true when nonzero, booleans are themselves,
/// null is false, every other value is true.
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Num(n) => *n != 0.0,
        Value::Bool(b) => *b,
        Value::Complex(c) => c.re != 0.0 || c.im != 0.0,
        Value::Null => false,
        _ => true,
    }
}

pub fn and(a: &Value, b: &Value) -> Result<Value, EvalError> {
    broadcast(a, b, &|x, y| Ok(Value::Bool(truthy(x) && truthy(y))))
}

pub fn or(a: &Value, b: &Value) -> Result<Value, EvalError> {
    broadcast(a, b, &|x, y| Ok(Value::Bool(truthy(x) || truthy(y))))
}

pub fn xor(a: &Value, b: &Value) -> Result<Value, EvalError> {
    broadcast(a, b, &|x, y| Ok(Value::Bool(truthy(x) != truthy(y))))
}

pub fn not(a: &Value) -> Result<Value, EvalError> {
    broadcast_unary(a, &|v| Ok(Value::Bool(!truthy(v))))
}

fn as_int(fn_name: &str, v: &Value) -> Result<i64, EvalError> {
    match as_num(v) {
        Some(n) if n.fract() == 0.0 => Ok(n as i64),
        _ => Err(EvalError::type_error(
            fn_name,
            format!("an integer is expected, got {}", v.type_name()),
        )),
    }
}

pub fn bit_and(a: &Value, b: &Value) -> Result<Value, EvalError> {
    broadcast(a, b, &|x, y| {
        Ok(Value::Num((as_int("bitAnd", x)? & as_int("bitAnd", y)?) as f64))
    })
}

pub fn bit_or(a: &Value, b: &Value) -> Result<Value, EvalError> {
    broadcast(a, b, &|x, y| {
        Ok(Value::Num((as_int("bitOr", x)? | as_int("bitOr", y)?) as f64))
    })
}

pub fn left_shift(a: &Value, b: &Value) -> Result<Value, EvalError> {
    broadcast(a, b, &|x, y| {
        let shift = as_int("leftShift", y)?;
        if !(0..64).contains(&shift) {
            return Err(EvalError::type_error("leftShift", "shift out of range"));
        }
        Ok(Value::Num((as_int("leftShift", x)? << shift) as f64))
    })
}

pub fn right_arith_shift(a: &Value, b: &Value) -> Result<Value, EvalError> {
    broadcast(a, b, &|x, y| {
        let shift = as_int("rightArithShift", y)?;
        if !(0..64).contains(&shift) {
            return Err(EvalError::type_error("rightArithShift", "shift out of range"));
        }
        Ok(Value::Num((as_int("rightArithShift", x)? >> shift) as f64))
    })
}

builtin!("and", "logical", binary, and);
builtin!("or", "logical", binary, or);
builtin!("xor", "logical", binary, xor);
builtin!("not", "logical", unary, not);
builtin!("bitAnd", "logical", binary, bit_and);
builtin!("bitOr", "logical", binary, bit_or);
builtin!("leftShift", "logical", binary, left_shift);
builtin!("rightArithShift", "logical", binary, right_arith_shift);
