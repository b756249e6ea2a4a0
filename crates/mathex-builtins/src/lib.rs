pub use inventory;
use std::convert::TryFrom;
use std::fmt;
use std::rc::Rc;

pub use num_complex::Complex64;

mod error;
mod host;
mod scope;

pub use error::EvalError;
pub use host::{EvalConfig, Host, HostRef, NumberKind};
pub use scope::Scope;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Num(f64),
    Complex(Complex64),
    Bool(bool),
    Str(String),
    Matrix(Matrix),
    Unit(UnitVal),
    Function(Function),
    /// Outputs of the visible entries of a multi-statement block, in order.
    ResultSet(Vec<Value>),
    Null,
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Num(_) => "number",
            Value::Complex(_) => "complex",
            Value::Bool(_) => "boolean",
            Value::Str(_) => "string",
            Value::Matrix(_) => "matrix",
            Value::Unit(_) => "unit",
            Value::Function(_) => "function",
            Value::ResultSet(_) => "resultset",
            Value::Null => "null",
        }
    }
}

/// Row-major n-dimensional array of values. Shape `[n]` is a vector,
/// `[r, c]` a matrix; nesting array literals produces higher ranks.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    pub data: Vec<Value>,
    pub shape: Vec<usize>,
}

impl Matrix {
    pub fn new(data: Vec<Value>, shape: Vec<usize>) -> Result<Self, EvalError> {
        let expected: usize = shape.iter().product();
        if data.len() != expected {
            return Err(EvalError::DimensionMismatch(format!(
                "data length {} does not match shape {:?}",
                data.len(),
                shape
            )));
        }
        Ok(Matrix { data, shape })
    }

    pub fn empty() -> Self {
        Matrix {
            data: Vec::new(),
            shape: vec![0],
        }
    }

    pub fn vector(data: Vec<Value>) -> Self {
        let len = data.len();
        Matrix {
            data,
            shape: vec![len],
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    /// Size of dimension `dim` (0-based), 1 for dimensions beyond the rank.
    pub fn dim(&self, dim: usize) -> usize {
        self.shape.get(dim).copied().unwrap_or(1)
    }

    /// All elements as f64, or None if any element is not numeric.
    pub fn as_numbers(&self) -> Option<Vec<f64>> {
        self.data
            .iter()
            .map(|v| match v {
                Value::Num(n) => Some(*n),
                Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
                _ => None,
            })
            .collect()
    }

    pub fn from_numbers(data: Vec<f64>, shape: Vec<usize>) -> Result<Self, EvalError> {
        Matrix::new(data.into_iter().map(Value::Num).collect(), shape)
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.shape.len() {
            2 => {
                let rows = self.shape[0];
                let cols = self.shape[1];
                write!(f, "[")?;
                for r in 0..rows {
                    if r > 0 {
                        write!(f, "; ")?;
                    }
                    for c in 0..cols {
                        if c > 0 {
                            write!(f, " ")?;
                        }
                        write!(f, "{}", self.data[r * cols + c])?;
                    }
                }
                write!(f, "]")
            }
            _ => {
                write!(f, "[")?;
                for (i, v) in self.data.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{v}")?;
                }
                write!(f, "]")
            }
        }
    }
}

/// Physical dimension of a unit. The stand-in host only carries the
/// dimensions its tests exercise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Length,
    Mass,
    Time,
}

/// A quantity with a unit. `value` is the magnitude in the base unit of the
/// dimension (metres, kilograms, seconds); `factor` is the scale of the
/// display unit, so the displayed magnitude is `value / factor`.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitVal {
    pub value: f64,
    pub unit: String,
    pub factor: f64,
    pub dimension: Dimension,
}

impl UnitVal {
    pub fn magnitude(&self) -> f64 {
        self.value / self.factor
    }
}

impl fmt::Display for UnitVal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", format_number(self.magnitude()), self.unit)
    }
}

/// A compiled, scope-parameterised computation. Cloning shares the closure.
#[derive(Clone)]
pub struct Evaluable(Rc<dyn Fn(&Scope) -> Result<Value, EvalError>>);

impl Evaluable {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Scope) -> Result<Value, EvalError> + 'static,
    {
        Evaluable(Rc::new(f))
    }

    pub fn constant(value: Value) -> Self {
        Evaluable::new(move |_| Ok(value.clone()))
    }

    /// An evaluable that always fails; used when a literal is rejected at
    /// compile time but the error must surface at eval time.
    pub fn fail(err: EvalError) -> Self {
        Evaluable::new(move |_| Err(err.clone()))
    }

    pub fn eval(&self, scope: &Scope) -> Result<Value, EvalError> {
        (self.0)(scope)
    }
}

impl fmt::Debug for Evaluable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<evaluable>")
    }
}

/// A user-defined function value. The body is the compiled function body;
/// `scope` is the defining scope captured by reference, so bindings changed
/// after the definition are visible on invocation.
#[derive(Clone)]
pub struct Function {
    pub name: String,
    pub params: Vec<String>,
    pub syntax: String,
    pub body: Evaluable,
    pub scope: Scope,
}

impl Function {
    pub fn call(&self, args: &[Value]) -> Result<Value, EvalError> {
        if args.len() != self.params.len() {
            return Err(EvalError::arguments(&self.name, args.len(), self.params.len()));
        }
        let frame = Scope::child(&self.scope);
        for (param, arg) in self.params.iter().zip(args) {
            frame.set(param, arg.clone());
        }
        self.body.eval(&frame)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Function({})", self.syntax)
    }
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.params == other.params && self.syntax == other.syntax
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Num(n) => write!(f, "{}", format_number(*n)),
            Value::Complex(c) => {
                if c.im < 0.0 {
                    write!(f, "{} - {}i", format_number(c.re), format_number(-c.im))
                } else {
                    write!(f, "{} + {}i", format_number(c.re), format_number(c.im))
                }
            }
            Value::Bool(b) => write!(f, "{b}"),
            Value::Str(s) => write!(f, "\"{s}\""),
            Value::Matrix(m) => write!(f, "{m}"),
            Value::Unit(u) => write!(f, "{u}"),
            Value::Function(func) => write!(f, "{}", func.syntax),
            Value::ResultSet(values) => {
                write!(f, "[")?;
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{v}")?;
                }
                write!(f, "]")
            }
            Value::Null => write!(f, "null"),
        }
    }
}

/// Compact float formatting: integral values print without a fraction.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value < 0.0 { "-Infinity" } else { "Infinity" }.to_string();
    }
    if value == value.trunc() && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Num(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<Matrix> for Value {
    fn from(m: Matrix) -> Self {
        Value::Matrix(m)
    }
}

impl TryFrom<&Value> for f64 {
    type Error = EvalError;
    fn try_from(v: &Value) -> Result<Self, Self::Error> {
        match v {
            Value::Num(n) => Ok(*n),
            Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
            _ => Err(EvalError::Runtime(format!(
                "cannot convert {} to a number",
                v.type_name()
            ))),
        }
    }
}

impl TryFrom<&Value> for bool {
    type Error = EvalError;
    fn try_from(v: &Value) -> Result<Self, Self::Error> {
        match v {
            Value::Bool(b) => Ok(*b),
            Value::Num(n) => Ok(*n != 0.0),
            _ => Err(EvalError::Runtime(format!(
                "cannot convert {} to a boolean",
                v.type_name()
            ))),
        }
    }
}

impl TryFrom<&Value> for String {
    type Error = EvalError;
    fn try_from(v: &Value) -> Result<Self, Self::Error> {
        match v {
            Value::Str(s) => Ok(s.clone()),
            _ => Err(EvalError::Runtime(format!(
                "cannot convert {} to a string",
                v.type_name()
            ))),
        }
    }
}

/// A host function registered with `inventory::submit!`. The implementation
/// is a plain fn pointer so entries can live in statics.
pub struct BuiltinFunction {
    pub name: &'static str,
    pub category: &'static str,
    pub implementation: fn(&[Value]) -> Result<Value, EvalError>,
}

inventory::collect!(BuiltinFunction);

/// A named constant. The value is produced by a fn pointer because `Value`
/// is not `Sync`.
pub struct Constant {
    pub name: &'static str,
    pub value: fn() -> Value,
}

inventory::collect!(Constant);

pub fn builtin_functions() -> impl Iterator<Item = &'static BuiltinFunction> {
    inventory::iter::<BuiltinFunction>.into_iter()
}

pub fn constants() -> impl Iterator<Item = &'static Constant> {
    inventory::iter::<Constant>.into_iter()
}
