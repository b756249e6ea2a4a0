use std::rc::Rc;

use crate::{EvalError, Value};

/// How bare numeric literals compile. `Number` parses to the host's native
/// float; `BigNumber` routes the literal text through the host's `bignumber`
/// function so a host with an arbitrary-precision tower can take over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NumberKind {
    #[default]
    Number,
    BigNumber,
}

#[derive(Debug, Clone, Default)]
pub struct EvalConfig {
    pub number: NumberKind,
}

/// The numeric host consumed by compiled trees. Operator nodes dispatch to
/// `call` by function name; symbol lookup falls back to `lookup_constant`
/// after the scope; conditionals consult `is_truthy`.
pub trait Host {
    fn call(&self, name: &str, args: &[Value]) -> Result<Value, EvalError>;

    fn has_function(&self, name: &str) -> bool;

    /// Truthiness: numbers are true when nonzero, booleans are themselves,
    /// null is false, every other value is true.
    fn is_truthy(&self, value: &Value) -> Result<bool, EvalError>;

    fn lookup_constant(&self, name: &str) -> Option<Value>;

    fn config(&self) -> &EvalConfig;

    fn number_literal(&self, text: &str) -> Result<Value, EvalError> {
        match self.config().number {
            NumberKind::Number => text
                .parse::<f64>()
                .map(Value::Num)
                .map_err(|_| EvalError::Runtime(format!("Invalid number {text}"))),
            NumberKind::BigNumber => self.call("bignumber", &[Value::Str(text.to_string())]),
        }
    }
}

pub type HostRef = Rc<dyn Host>;
