//! Matrix construction, concatenation, product and transpose.

use mathex_builtins::{EvalError, Matrix, Value};

/// Builds a matrix from one row of cells. A row of matrices with identical
/// shapes stacks into a higher-dimensional value (`[[1,2],[3,4]]` is 2x2);
/// anything else is a plain vector of the cell values.
pub fn matrix(args: &[Value]) -> Result<Value, EvalError> {
    if args.is_empty() {
        return Ok(Value::Matrix(Matrix::empty()));
    }
    let inner: Option<Vec<&Matrix>> = args
        .iter()
        .map(|v| match v {
            Value::Matrix(m) => Some(m),
            _ => None,
        })
        .collect();
    if let Some(cells) = inner {
        let shape = cells[0].shape.clone();
        if cells.iter().all(|m| m.shape == shape) {
            let mut stacked_shape = vec![cells.len()];
            stacked_shape.extend_from_slice(&shape);
            let data = cells
                .iter()
                .flat_map(|m| m.data.iter().cloned())
                .collect::<Vec<_>>();
            return Ok(Value::Matrix(Matrix::new(data, stacked_shape)?));
        }
    }
    Ok(Value::Matrix(Matrix::vector(args.to_vec())))
}

/// Stacks equally-shaped matrices as the rows of a higher-rank matrix;
/// matrix literals with `;` separators come through here.
pub fn concat(args: &[Value]) -> Result<Value, EvalError> {
    if args.is_empty() {
        return Ok(Value::Matrix(Matrix::empty()));
    }
    let rows: Vec<&Matrix> = args
        .iter()
        .map(|v| match v {
            Value::Matrix(m) => Ok(m),
            other => Err(EvalError::type_error(
                "concat",
                format!("unexpected {}", other.type_name()),
            )),
        })
        .collect::<Result<_, _>>()?;
    let shape = rows[0].shape.clone();
    if rows.iter().any(|m| m.shape != shape) {
        return Err(EvalError::ColumnDimensionsMismatch);
    }
    let mut stacked_shape = vec![rows.len()];
    stacked_shape.extend_from_slice(&shape);
    let data = rows
        .iter()
        .flat_map(|m| m.data.iter().cloned())
        .collect::<Vec<_>>();
    Ok(Value::Matrix(Matrix::new(data, stacked_shape)?))
}

/// Matrix product of two 2-D numeric matrices.
pub fn matmul(a: &Matrix, b: &Matrix) -> Result<Value, EvalError> {
    if a.rank() != 2 || b.rank() != 2 {
        return Err(EvalError::type_error(
            "multiply",
            "matrix product expects 2-D matrices",
        ));
    }
    let (m, k) = (a.shape[0], a.shape[1]);
    let (k2, n) = (b.shape[0], b.shape[1]);
    if k != k2 {
        return Err(EvalError::DimensionMismatch(format!(
            "{m}x{k} * {k2}x{n}"
        )));
    }
    let lhs = a.as_numbers().ok_or_else(|| {
        EvalError::type_error("multiply", "matrix product expects numeric matrices")
    })?;
    let rhs = b.as_numbers().ok_or_else(|| {
        EvalError::type_error("multiply", "matrix product expects numeric matrices")
    })?;
    let mut data = vec![0.0; m * n];
    for i in 0..m {
        for j in 0..n {
            let mut acc = 0.0;
            for l in 0..k {
                acc += lhs[i * k + l] * rhs[l * n + j];
            }
            data[i * n + j] = acc;
        }
    }
    Ok(Value::Matrix(Matrix::from_numbers(data, vec![m, n])?))
}

/// Transpose. Scalars and vectors pass through unchanged.
pub fn transpose(a: &Value) -> Result<Value, EvalError> {
    match a {
        Value::Matrix(m) if m.rank() == 2 => {
            let (rows, cols) = (m.shape[0], m.shape[1]);
            let mut data = Vec::with_capacity(m.data.len());
            for c in 0..cols {
                for r in 0..rows {
                    data.push(m.data[r * cols + c].clone());
                }
            }
            Ok(Value::Matrix(Matrix::new(data, vec![cols, rows])?))
        }
        Value::Matrix(m) if m.rank() <= 1 => Ok(Value::Matrix(m.clone())),
        Value::Matrix(_) => Err(EvalError::type_error(
            "transpose",
            "transpose expects a 2-D matrix",
        )),
        Value::Num(_) | Value::Bool(_) | Value::Complex(_) => Ok(a.clone()),
        other => Err(EvalError::type_error(
            "transpose",
            format!("unexpected {}", other.type_name()),
        )),
    }
}

builtin!("matrix", "matrix", variadic, matrix);
builtin!("concat", "matrix", variadic, concat);
builtin!("transpose", "matrix", unary, transpose);
