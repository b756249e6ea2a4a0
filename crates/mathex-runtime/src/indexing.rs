//! Subset access. Indices are 1-based on this surface; the 0-based
//! translation lives entirely inside this module, so out-of-range errors
//! are already 1-based when they leave it.

use mathex_builtins::{EvalError, Matrix, Value};

/// Shape of a value, as a vector of dimension sizes. Scalars have no
/// dimensions; strings have one.
pub fn size(v: &Value) -> Result<Value, EvalError> {
    let dims: Vec<usize> = match v {
        Value::Matrix(m) => m.shape.clone(),
        Value::Str(s) => vec![s.chars().count()],
        _ => Vec::new(),
    };
    Ok(Value::Matrix(Matrix::vector(
        dims.into_iter().map(|d| Value::Num(d as f64)).collect(),
    )))
}

/// Packages dimension specifiers (scalars or index lists) into one value
/// for `subset`.
pub fn index(args: &[Value]) -> Result<Value, EvalError> {
    Ok(Value::Matrix(Matrix::vector(args.to_vec())))
}

/// `subset(obj, index)` reads, `subset(obj, index, replacement)` writes and
/// returns the new container, growing it zero-filled when an index points
/// past the current size.
pub fn subset(args: &[Value]) -> Result<Value, EvalError> {
    match args.len() {
        2 => subset_get(&args[0], &args[1]),
        3 => subset_set(&args[0], &args[1], &args[2]),
        n => Err(EvalError::arguments("subset", n, 2)),
    }
}

struct DimSpec {
    indices: Vec<i64>,
    scalar: bool,
}

fn resolve_spec(v: &Value) -> Result<DimSpec, EvalError> {
    let as_index = |n: f64| -> Result<i64, EvalError> {
        if n.fract() != 0.0 {
            return Err(EvalError::type_error("subset", "indices must be integers"));
        }
        Ok(n as i64)
    };
    match v {
        Value::Num(n) => Ok(DimSpec {
            indices: vec![as_index(*n)?],
            scalar: true,
        }),
        Value::Matrix(m) => {
            let indices = m
                .data
                .iter()
                .map(|e| match e {
                    Value::Num(n) => as_index(*n),
                    other => Err(EvalError::type_error(
                        "subset",
                        format!("indices must be numbers, got {}", other.type_name()),
                    )),
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(DimSpec {
                indices,
                scalar: false,
            })
        }
        other => Err(EvalError::type_error(
            "subset",
            format!("indices must be numbers, got {}", other.type_name()),
        )),
    }
}

fn check_bounds(indices: &[i64], max: usize) -> Result<(), EvalError> {
    for &i in indices {
        if i < 1 {
            return Err(EvalError::IndexTooSmall { index: i });
        }
        if i as usize > max {
            return Err(EvalError::IndexOutOfRange { index: i, max });
        }
    }
    Ok(())
}

fn check_lower(indices: &[i64]) -> Result<(), EvalError> {
    for &i in indices {
        if i < 1 {
            return Err(EvalError::IndexTooSmall { index: i });
        }
    }
    Ok(())
}

fn specs_from(idx: &Value) -> Result<Vec<DimSpec>, EvalError> {
    match idx {
        Value::Matrix(m) => m.data.iter().map(resolve_spec).collect(),
        other => Err(EvalError::type_error(
            "subset",
            format!("an index is expected, got {}", other.type_name()),
        )),
    }
}

fn row_major_strides(shape: &[usize]) -> Vec<usize> {
    let mut strides = vec![1usize; shape.len()];
    for d in (0..shape.len().saturating_sub(1)).rev() {
        strides[d] = strides[d + 1] * shape[d + 1];
    }
    strides
}

/// Walks the cartesian product of the dimension specs in row-major order,
/// yielding linear offsets into a matrix with the given strides.
fn for_each_offset(
    specs: &[DimSpec],
    strides: &[usize],
    mut visit: impl FnMut(usize) -> Result<(), EvalError>,
) -> Result<(), EvalError> {
    let lens: Vec<usize> = specs.iter().map(|s| s.indices.len()).collect();
    let total: usize = lens.iter().product();
    let mut counters = vec![0usize; specs.len()];
    for _ in 0..total {
        let mut linear = 0usize;
        for (d, counter) in counters.iter().enumerate() {
            linear += (specs[d].indices[*counter] as usize - 1) * strides[d];
        }
        visit(linear)?;
        for d in (0..counters.len()).rev() {
            counters[d] += 1;
            if counters[d] < lens[d] {
                break;
            }
            counters[d] = 0;
        }
    }
    Ok(())
}

fn subset_get(obj: &Value, idx: &Value) -> Result<Value, EvalError> {
    let specs = specs_from(idx)?;
    match obj {
        Value::Str(s) => {
            if specs.len() != 1 {
                return Err(EvalError::DimensionMismatch(format!(
                    "{} != 1",
                    specs.len()
                )));
            }
            let chars: Vec<char> = s.chars().collect();
            check_bounds(&specs[0].indices, chars.len())?;
            let selected: String = specs[0]
                .indices
                .iter()
                .map(|&i| chars[i as usize - 1])
                .collect();
            Ok(Value::Str(selected))
        }
        Value::Matrix(m) => {
            if specs.len() != m.rank() {
                return Err(EvalError::DimensionMismatch(format!(
                    "{} != {}",
                    specs.len(),
                    m.rank()
                )));
            }
            for (d, spec) in specs.iter().enumerate() {
                check_bounds(&spec.indices, m.dim(d))?;
            }
            let strides = row_major_strides(&m.shape);
            if specs.iter().all(|s| s.scalar) {
                let mut linear = 0usize;
                for (d, spec) in specs.iter().enumerate() {
                    linear += (spec.indices[0] as usize - 1) * strides[d];
                }
                return Ok(m.data[linear].clone());
            }
            let mut data = Vec::new();
            for_each_offset(&specs, &strides, |linear| {
                data.push(m.data[linear].clone());
                Ok(())
            })?;
            let shape: Vec<usize> = specs.iter().map(|s| s.indices.len()).collect();
            Ok(Value::Matrix(Matrix::new(data, shape)?))
        }
        other => Err(EvalError::type_error(
            "subset",
            format!("a matrix or string is expected, got {}", other.type_name()),
        )),
    }
}

fn subset_set(obj: &Value, idx: &Value, replacement: &Value) -> Result<Value, EvalError> {
    let specs = specs_from(idx)?;
    match obj {
        Value::Str(s) => {
            if specs.len() != 1 {
                return Err(EvalError::DimensionMismatch(format!(
                    "{} != 1",
                    specs.len()
                )));
            }
            check_lower(&specs[0].indices)?;
            let mut chars: Vec<char> = s.chars().collect();
            let needed = specs[0]
                .indices
                .iter()
                .map(|&i| i as usize)
                .max()
                .unwrap_or(0);
            if needed > chars.len() {
                chars.resize(needed, ' ');
            }
            let text: String = replacement.try_into()?;
            let repl: Vec<char> = text.chars().collect();
            if repl.len() != specs[0].indices.len() {
                return Err(EvalError::DimensionMismatch(format!(
                    "{} != {}",
                    repl.len(),
                    specs[0].indices.len()
                )));
            }
            for (&i, &c) in specs[0].indices.iter().zip(repl.iter()) {
                chars[i as usize - 1] = c;
            }
            Ok(Value::Str(chars.into_iter().collect()))
        }
        Value::Matrix(m) => {
            if specs.len() != m.rank() {
                return Err(EvalError::DimensionMismatch(format!(
                    "{} != {}",
                    specs.len(),
                    m.rank()
                )));
            }
            for spec in &specs {
                check_lower(&spec.indices)?;
            }
            // Grow the container if any index points past the current size.
            let mut target_shape = m.shape.clone();
            for (d, spec) in specs.iter().enumerate() {
                let needed = spec.indices.iter().map(|&i| i as usize).max().unwrap_or(0);
                if needed > target_shape[d] {
                    target_shape[d] = needed;
                }
            }
            let mut result = if target_shape == m.shape {
                m.clone()
            } else {
                grow(m, &target_shape)?
            };
            let strides = row_major_strides(&result.shape);
            let total: usize = specs.iter().map(|s| s.indices.len()).product();
            let values: Vec<Value> = match replacement {
                Value::Matrix(r) => {
                    if r.len() != total {
                        return Err(EvalError::DimensionMismatch(format!(
                            "{} != {}",
                            r.len(),
                            total
                        )));
                    }
                    r.data.clone()
                }
                scalar => vec![scalar.clone(); total],
            };
            let mut next = 0usize;
            for_each_offset(&specs, &strides, |linear| {
                result.data[linear] = values[next].clone();
                next += 1;
                Ok(())
            })?;
            Ok(Value::Matrix(result))
        }
        other => Err(EvalError::type_error(
            "subset",
            format!("a matrix or string is expected, got {}", other.type_name()),
        )),
    }
}

/// Copies a matrix into a larger zero-filled one of the same rank.
fn grow(m: &Matrix, target_shape: &[usize]) -> Result<Matrix, EvalError> {
    let total: usize = target_shape.iter().product();
    let mut data = vec![Value::Num(0.0); total];
    let new_strides = row_major_strides(target_shape);
    let old_strides = row_major_strides(&m.shape);
    for (old_linear, value) in m.data.iter().enumerate() {
        let mut new_linear = 0usize;
        for d in 0..m.shape.len() {
            let coord = (old_linear / old_strides[d]) % m.shape[d];
            new_linear += coord * new_strides[d];
        }
        data[new_linear] = value.clone();
    }
    Matrix::new(data, target_shape.to_vec())
}

builtin!("size", "indexing", unary, size);
builtin!("index", "indexing", variadic, index);
builtin!("subset", "indexing", variadic, subset);

#[cfg(test)]
mod tests {
    use super::*;

    fn nums(data: Vec<f64>, shape: Vec<usize>) -> Value {
        Value::Matrix(Matrix::from_numbers(data, shape).unwrap())
    }

    fn idx(specs: Vec<Value>) -> Value {
        index(&specs).unwrap()
    }

    #[test]
    fn scalar_get_is_one_based() {
        let v = nums(vec![10.0, 20.0, 30.0], vec![3]);
        let got = subset(&[v, idx(vec![Value::Num(1.0)])]).unwrap();
        assert_eq!(got, Value::Num(10.0));
    }

    #[test]
    fn out_of_range_reports_one_based_bounds() {
        let v = nums(vec![10.0, 20.0, 30.0], vec![3]);
        let err = subset(&[v.clone(), idx(vec![Value::Num(4.0)])]).unwrap_err();
        assert_eq!(err.to_string(), "Index out of range (4 > 3)");
        let err = subset(&[v, idx(vec![Value::Num(0.0)])]).unwrap_err();
        assert_eq!(err.to_string(), "Index out of range (0 < 1)");
    }

    #[test]
    fn string_subset() {
        let c = Value::Str("hello".into());
        let list = nums(vec![3.0, 2.0, 1.0], vec![3]);
        let got = subset(&[c, idx(vec![list])]).unwrap();
        assert_eq!(got, Value::Str("leh".into()));
    }

    #[test]
    fn set_grows_zero_filled() {
        let a = nums(vec![1.0, 2.0, 3.0, 4.0], vec![2, 2]);
        let rows = nums(vec![2.0, 3.0], vec![2]);
        let cols = nums(vec![2.0, 3.0], vec![2]);
        let replacement = nums(vec![10.0, 11.0, 12.0, 13.0], vec![2, 2]);
        let updated = subset(&[a, idx(vec![rows, cols]), replacement]).unwrap();
        assert_eq!(
            updated,
            nums(
                vec![1.0, 2.0, 0.0, 3.0, 10.0, 11.0, 0.0, 12.0, 13.0],
                vec![3, 3]
            )
        );
    }
}
