//! Range construction: inclusive endpoints, direction from the sign of the
//! step. A step that never reaches the end yields an empty sequence.

use mathex_builtins::{EvalError, Matrix, Value};

use crate::arithmetic::as_num;

pub fn range(args: &[Value]) -> Result<Value, EvalError> {
    let (start, end, step) = match args {
        [start, end] => (start, end, 1.0),
        [start, end, step] => {
            let step = as_num(step).ok_or_else(|| {
                EvalError::type_error("range", format!("unexpected {}", step.type_name()))
            })?;
            (start, end, step)
        }
        _ => return Err(EvalError::arguments("range", args.len(), 3)),
    };
    let start = as_num(start).ok_or_else(|| {
        EvalError::type_error("range", format!("unexpected {}", start.type_name()))
    })?;
    let end = as_num(end).ok_or_else(|| {
        EvalError::type_error("range", format!("unexpected {}", end.type_name()))
    })?;
    if step == 0.0 {
        return Err(EvalError::type_error("range", "step must not be zero"));
    }
    let mut data = Vec::new();
    let mut x = start;
    if step > 0.0 {
        while x <= end {
            data.push(Value::Num(x));
            x += step;
        }
    } else {
        while x >= end {
            data.push(Value::Num(x));
            x += step;
        }
    }
    Ok(Value::Matrix(Matrix::vector(data)))
}

builtin!("range", "matrix", variadic, range);

#[cfg(test)]
mod tests {
    use super::*;

    fn values(v: &Value) -> Vec<f64> {
        match v {
            Value::Matrix(m) => m.as_numbers().unwrap(),
            _ => panic!("matrix expected"),
        }
    }

    #[test]
    fn forward_inclusive() {
        let r = range(&[Value::Num(1.0), Value::Num(4.0)]).unwrap();
        assert_eq!(values(&r), vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn stepped_and_reverse() {
        let r = range(&[Value::Num(0.0), Value::Num(10.0), Value::Num(2.5)]).unwrap();
        assert_eq!(values(&r), vec![0.0, 2.5, 5.0, 7.5, 10.0]);
        let r = range(&[Value::Num(3.0), Value::Num(1.0), Value::Num(-1.0)]).unwrap();
        assert_eq!(values(&r), vec![3.0, 2.0, 1.0]);
    }

    #[test]
    fn unreachable_end_is_empty() {
        let r = range(&[Value::Num(3.0), Value::Num(1.0), Value::Num(1.0)]).unwrap();
        assert!(values(&r).is_empty());
    }
}
