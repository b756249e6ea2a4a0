//! Scalar and element-wise arithmetic kernels.
//!
//! Binary operations broadcast scalars over matrices; matrix-matrix forms
//! require equal shapes. `multiply` is the one exception: two 2-D matrices
//! take the matrix product (see `matrix::matmul`).

use mathex_builtins::{Complex64, EvalError, Matrix, UnitVal, Value};

use crate::matrix::matmul;

pub(crate) fn as_num(v: &Value) -> Option<f64> {
    match v {
        Value::Num(n) => Some(*n),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

pub(crate) fn as_complex(v: &Value) -> Option<Complex64> {
    match v {
        Value::Complex(c) => Some(*c),
        _ => as_num(v).map(|n| Complex64::new(n, 0.0)),
    }
}

/// Narrows a complex result back to a real number when the imaginary part
/// vanished.
fn complex_value(c: Complex64) -> Value {
    if c.im == 0.0 {
        Value::Num(c.re)
    } else {
        Value::Complex(c)
    }
}

type ScalarFn = dyn Fn(&Value, &Value) -> Result<Value, EvalError>;

/// Applies a scalar kernel element-wise, broadcasting scalars over matrices.
pub(crate) fn broadcast(a: &Value, b: &Value, f: &ScalarFn) -> Result<Value, EvalError> {
    match (a, b) {
        (Value::Matrix(ma), Value::Matrix(mb)) => {
            if ma.shape != mb.shape {
                return Err(EvalError::DimensionMismatch(format!(
                    "{:?} vs {:?}",
                    ma.shape, mb.shape
                )));
            }
            let data = ma
                .data
                .iter()
                .zip(mb.data.iter())
                .map(|(x, y)| f(x, y))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::Matrix(Matrix::new(data, ma.shape.clone())?))
        }
        (Value::Matrix(m), scalar) => {
            let data = m
                .data
                .iter()
                .map(|x| f(x, scalar))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::Matrix(Matrix::new(data, m.shape.clone())?))
        }
        (scalar, Value::Matrix(m)) => {
            let data = m
                .data
                .iter()
                .map(|x| f(scalar, x))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::Matrix(Matrix::new(data, m.shape.clone())?))
        }
        _ => f(a, b),
    }
}

pub(crate) fn broadcast_unary(
    a: &Value,
    f: &dyn Fn(&Value) -> Result<Value, EvalError>,
) -> Result<Value, EvalError> {
    match a {
        Value::Matrix(m) => {
            let data = m.data.iter().map(f).collect::<Result<Vec<_>, _>>()?;
            Ok(Value::Matrix(Matrix::new(data, m.shape.clone())?))
        }
        _ => f(a),
    }
}

fn scalar_add(a: &Value, b: &Value) -> Result<Value, EvalError> {
    if let (Some(x), Some(y)) = (as_num(a), as_num(b)) {
        return Ok(Value::Num(x + y));
    }
    match (a, b) {
        (Value::Complex(_), _) | (_, Value::Complex(_)) => {
            match (as_complex(a), as_complex(b)) {
                (Some(x), Some(y)) => Ok(complex_value(x + y)),
                _ => Err(type_pair("add", a, b)),
            }
        }
        (Value::Unit(x), Value::Unit(y)) => {
            if x.dimension != y.dimension {
                return Err(type_pair("add", a, b));
            }
            Ok(Value::Unit(UnitVal {
                value: x.value + y.value,
                unit: x.unit.clone(),
                factor: x.factor,
                dimension: x.dimension,
            }))
        }
        _ => Err(type_pair("add", a, b)),
    }
}

fn scalar_subtract(a: &Value, b: &Value) -> Result<Value, EvalError> {
    if let (Some(x), Some(y)) = (as_num(a), as_num(b)) {
        return Ok(Value::Num(x - y));
    }
    match (a, b) {
        (Value::Complex(_), _) | (_, Value::Complex(_)) => {
            match (as_complex(a), as_complex(b)) {
                (Some(x), Some(y)) => Ok(complex_value(x - y)),
                _ => Err(type_pair("subtract", a, b)),
            }
        }
        (Value::Unit(x), Value::Unit(y)) => {
            if x.dimension != y.dimension {
                return Err(type_pair("subtract", a, b));
            }
            Ok(Value::Unit(UnitVal {
                value: x.value - y.value,
                unit: x.unit.clone(),
                factor: x.factor,
                dimension: x.dimension,
            }))
        }
        _ => Err(type_pair("subtract", a, b)),
    }
}

pub(crate) fn scalar_multiply(a: &Value, b: &Value) -> Result<Value, EvalError> {
    if let (Some(x), Some(y)) = (as_num(a), as_num(b)) {
        return Ok(Value::Num(x * y));
    }
    match (a, b) {
        (Value::Complex(_), _) | (_, Value::Complex(_)) => {
            match (as_complex(a), as_complex(b)) {
                (Some(x), Some(y)) => Ok(complex_value(x * y)),
                _ => Err(type_pair("multiply", a, b)),
            }
        }
        (Value::Unit(u), other) if as_num(other).is_some() => {
            let s = as_num(other).unwrap();
            Ok(Value::Unit(UnitVal {
                value: u.value * s,
                unit: u.unit.clone(),
                factor: u.factor,
                dimension: u.dimension,
            }))
        }
        (other, Value::Unit(u)) if as_num(other).is_some() => {
            let s = as_num(other).unwrap();
            Ok(Value::Unit(UnitVal {
                value: s * u.value,
                unit: u.unit.clone(),
                factor: u.factor,
                dimension: u.dimension,
            }))
        }
        _ => Err(type_pair("multiply", a, b)),
    }
}

fn scalar_divide(a: &Value, b: &Value) -> Result<Value, EvalError> {
    if let (Some(x), Some(y)) = (as_num(a), as_num(b)) {
        return Ok(Value::Num(x / y));
    }
    match (a, b) {
        (Value::Complex(_), _) | (_, Value::Complex(_)) => {
            match (as_complex(a), as_complex(b)) {
                (Some(x), Some(y)) => Ok(complex_value(x / y)),
                _ => Err(type_pair("divide", a, b)),
            }
        }
        (Value::Unit(u), other) if as_num(other).is_some() => {
            let s = as_num(other).unwrap();
            Ok(Value::Unit(UnitVal {
                value: u.value / s,
                unit: u.unit.clone(),
                factor: u.factor,
                dimension: u.dimension,
            }))
        }
        _ => Err(type_pair("divide", a, b)),
    }
}

fn scalar_pow(a: &Value, b: &Value) -> Result<Value, EvalError> {
    if let (Some(x), Some(y)) = (as_num(a), as_num(b)) {
        return Ok(Value::Num(x.powf(y)));
    }
    match (as_complex(a), as_complex(b)) {
        (Some(x), Some(y)) => Ok(complex_value(x.powc(y))),
        _ => Err(type_pair("pow", a, b)),
    }
}

/// Modulus with the sign of the divisor (`mod`, `%`). A zero divisor
/// returns the dividend unchanged.
fn scalar_mod(a: &Value, b: &Value) -> Result<Value, EvalError> {
    match (as_num(a), as_num(b)) {
        (Some(x), Some(y)) => {
            if y == 0.0 {
                Ok(Value::Num(x))
            } else {
                Ok(Value::Num(x - y * (x / y).floor()))
            }
        }
        _ => Err(type_pair("mod", a, b)),
    }
}

pub fn add(a: &Value, b: &Value) -> Result<Value, EvalError> {
    broadcast(a, b, &scalar_add)
}

pub fn subtract(a: &Value, b: &Value) -> Result<Value, EvalError> {
    broadcast(a, b, &scalar_subtract)
}

pub fn multiply(a: &Value, b: &Value) -> Result<Value, EvalError> {
    match (a, b) {
        (Value::Matrix(ma), Value::Matrix(mb)) => matmul(ma, mb),
        _ => broadcast(a, b, &scalar_multiply),
    }
}

pub fn divide(a: &Value, b: &Value) -> Result<Value, EvalError> {
    match (a, b) {
        (Value::Matrix(_), Value::Matrix(_)) => Err(EvalError::type_error(
            "divide",
            "matrix division is not supported, use dotDivide",
        )),
        _ => broadcast(a, b, &scalar_divide),
    }
}

pub fn pow(a: &Value, b: &Value) -> Result<Value, EvalError> {
    match (a, b) {
        (Value::Matrix(_), _) | (_, Value::Matrix(_)) => Err(EvalError::type_error(
            "pow",
            "matrix exponent is not supported, use dotPow",
        )),
        _ => scalar_pow(a, b),
    }
}

pub fn modulus(a: &Value, b: &Value) -> Result<Value, EvalError> {
    broadcast(a, b, &scalar_mod)
}

pub fn dot_multiply(a: &Value, b: &Value) -> Result<Value, EvalError> {
    broadcast(a, b, &scalar_multiply)
}

pub fn dot_divide(a: &Value, b: &Value) -> Result<Value, EvalError> {
    broadcast(a, b, &scalar_divide)
}

pub fn dot_pow(a: &Value, b: &Value) -> Result<Value, EvalError> {
    broadcast(a, b, &scalar_pow)
}

pub fn unary_minus(a: &Value) -> Result<Value, EvalError> {
    broadcast_unary(a, &|v| match v {
        Value::Num(n) => Ok(Value::Num(-n)),
        Value::Bool(b) => Ok(Value::Num(if *b { -1.0 } else { 0.0 })),
        Value::Complex(c) => Ok(Value::Complex(-c)),
        Value::Unit(u) => Ok(Value::Unit(UnitVal {
            value: -u.value,
            unit: u.unit.clone(),
            factor: u.factor,
            dimension: u.dimension,
        })),
        _ => Err(EvalError::type_error(
            "unaryMinus",
            format!("unexpected {}", v.type_name()),
        )),
    })
}

pub fn unary_plus(a: &Value) -> Result<Value, EvalError> {
    broadcast_unary(a, &|v| match v {
        Value::Num(n) => Ok(Value::Num(*n)),
        Value::Bool(b) => Ok(Value::Num(if *b { 1.0 } else { 0.0 })),
        Value::Complex(c) => Ok(Value::Complex(*c)),
        Value::Unit(u) => Ok(Value::Unit(u.clone())),
        _ => Err(EvalError::type_error(
            "unaryPlus",
            format!("unexpected {}", v.type_name()),
        )),
    })
}

pub fn factorial(a: &Value) -> Result<Value, EvalError> {
    broadcast_unary(a, &|v| {
        let n = as_num(v).ok_or_else(|| {
            EvalError::type_error("factorial", format!("unexpected {}", v.type_name()))
        })?;
        if n < 0.0 || n.fract() != 0.0 {
            return Err(EvalError::type_error(
                "factorial",
                "a non-negative integer is expected",
            ));
        }
        if n > 170.0 {
            return Ok(Value::Num(f64::INFINITY));
        }
        let mut result = 1.0;
        let mut k = 2.0;
        while k <= n {
            result *= k;
            k += 1.0;
        }
        Ok(Value::Num(result))
    })
}

/// The big-number literal hook. This host has no arbitrary-precision tower,
/// so the literal text maps onto the native number; hosts that carry one
/// override this through their own `bignumber`.
pub fn bignumber(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arguments("bignumber", args.len(), 1));
    }
    match &args[0] {
        Value::Str(text) => text
            .parse::<f64>()
            .map(Value::Num)
            .map_err(|_| EvalError::Runtime(format!("Invalid number {text}"))),
        Value::Num(n) => Ok(Value::Num(*n)),
        other => Err(EvalError::type_error(
            "bignumber",
            format!("unexpected {}", other.type_name()),
        )),
    }
}

fn type_pair(fn_name: &str, a: &Value, b: &Value) -> EvalError {
    EvalError::type_error(
        fn_name,
        format!("unexpected {} and {}", a.type_name(), b.type_name()),
    )
}

builtin!("add", "arithmetic", binary, add);
builtin!("subtract", "arithmetic", binary, subtract);
builtin!("multiply", "arithmetic", binary, multiply);
builtin!("divide", "arithmetic", binary, divide);
builtin!("pow", "arithmetic", binary, pow);
builtin!("mod", "arithmetic", binary, modulus);
builtin!("dotMultiply", "arithmetic", binary, dot_multiply);
builtin!("dotDivide", "arithmetic", binary, dot_divide);
builtin!("dotPow", "arithmetic", binary, dot_pow);
builtin!("unaryMinus", "arithmetic", unary, unary_minus);
builtin!("unaryPlus", "arithmetic", unary, unary_plus);
builtin!("factorial", "arithmetic", unary, factorial);
builtin!("bignumber", "arithmetic", variadic, bignumber);
