//! Name-based dispatch over the builtin registry.

use mathex_builtins::{builtin_functions, BuiltinFunction, EvalError, Value};
use once_cell::sync::Lazy;
use std::collections::HashMap;

static BUILTINS: Lazy<HashMap<&'static str, &'static BuiltinFunction>> =
    Lazy::new(|| builtin_functions().map(|f| (f.name, f)).collect());

pub fn call_builtin(name: &str, args: &[Value]) -> Result<Value, EvalError> {
    let function = BUILTINS
        .get(name)
        .ok_or_else(|| EvalError::UnknownFunction(name.to_string()))?;
    (function.implementation)(args)
}

pub fn has_builtin(name: &str) -> bool {
    BUILTINS.contains_key(name)
}
