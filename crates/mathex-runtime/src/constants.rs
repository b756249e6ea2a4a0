//! Named constants resolved after scope lookup fails. Unit names resolve
//! here too, so user bindings shadow units.

use mathex_builtins::{constants, Complex64, Constant, Value};
use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::units::unit_constant;

inventory::submit! {
    Constant { name: "pi", value: || Value::Num(std::f64::consts::PI) }
}
inventory::submit! {
    Constant { name: "e", value: || Value::Num(std::f64::consts::E) }
}
inventory::submit! {
    Constant { name: "tau", value: || Value::Num(std::f64::consts::TAU) }
}
inventory::submit! {
    Constant { name: "i", value: || Value::Complex(Complex64::new(0.0, 1.0)) }
}

static TABLE: Lazy<HashMap<&'static str, fn() -> Value>> =
    Lazy::new(|| constants().map(|c| (c.name, c.value)).collect());

pub fn lookup_constant(name: &str) -> Option<Value> {
    if let Some(value) = TABLE.get(name) {
        return Some(value());
    }
    unit_constant(name)
}
