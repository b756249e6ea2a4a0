//! A small table-driven unit system: enough for unit literals, arithmetic
//! on quantities and `to`/`in` conversion. The magnitude of a `UnitVal` is
//! stored in the base unit of its dimension (metre, kilogram, second).

use mathex_builtins::{Dimension, EvalError, UnitVal, Value};

pub struct UnitDef {
    pub name: &'static str,
    pub dimension: Dimension,
    pub factor: f64,
}

pub static UNITS: &[UnitDef] = &[
    UnitDef { name: "m", dimension: Dimension::Length, factor: 1.0 },
    UnitDef { name: "meter", dimension: Dimension::Length, factor: 1.0 },
    UnitDef { name: "mm", dimension: Dimension::Length, factor: 0.001 },
    UnitDef { name: "cm", dimension: Dimension::Length, factor: 0.01 },
    UnitDef { name: "km", dimension: Dimension::Length, factor: 1000.0 },
    UnitDef { name: "in", dimension: Dimension::Length, factor: 0.0254 },
    UnitDef { name: "inch", dimension: Dimension::Length, factor: 0.0254 },
    UnitDef { name: "ft", dimension: Dimension::Length, factor: 0.3048 },
    UnitDef { name: "foot", dimension: Dimension::Length, factor: 0.3048 },
    UnitDef { name: "mi", dimension: Dimension::Length, factor: 1609.344 },
    UnitDef { name: "mile", dimension: Dimension::Length, factor: 1609.344 },
    UnitDef { name: "g", dimension: Dimension::Mass, factor: 0.001 },
    UnitDef { name: "gram", dimension: Dimension::Mass, factor: 0.001 },
    UnitDef { name: "kg", dimension: Dimension::Mass, factor: 1.0 },
    UnitDef { name: "lb", dimension: Dimension::Mass, factor: 0.45359237 },
    UnitDef { name: "ms", dimension: Dimension::Time, factor: 0.001 },
    UnitDef { name: "s", dimension: Dimension::Time, factor: 1.0 },
    UnitDef { name: "sec", dimension: Dimension::Time, factor: 1.0 },
    UnitDef { name: "second", dimension: Dimension::Time, factor: 1.0 },
    UnitDef { name: "minute", dimension: Dimension::Time, factor: 60.0 },
    UnitDef { name: "h", dimension: Dimension::Time, factor: 3600.0 },
    UnitDef { name: "hour", dimension: Dimension::Time, factor: 3600.0 },
    UnitDef { name: "day", dimension: Dimension::Time, factor: 86400.0 },
];

pub fn lookup_unit(name: &str) -> Option<&'static UnitDef> {
    UNITS.iter().find(|u| u.name == name)
}

/// One of the named unit, e.g. `1 cm`. Unit names resolve through the host
/// constant lookup, so `5 cm` is `5 * cm`.
pub fn unit_constant(name: &str) -> Option<Value> {
    lookup_unit(name).map(|def| {
        Value::Unit(UnitVal {
            value: def.factor,
            unit: def.name.to_string(),
            factor: def.factor,
            dimension: def.dimension,
        })
    })
}

/// `unit(value, name)` constructs a quantity.
pub fn unit(a: &Value, b: &Value) -> Result<Value, EvalError> {
    let name: String = b.try_into().map_err(|_| {
        EvalError::type_error("unit", format!("a unit name is expected, got {}", b.type_name()))
    })?;
    let def = lookup_unit(&name)
        .ok_or_else(|| EvalError::Runtime(format!("Unknown unit {name}")))?;
    match a {
        Value::Num(n) => Ok(Value::Unit(UnitVal {
            value: n * def.factor,
            unit: def.name.to_string(),
            factor: def.factor,
            dimension: def.dimension,
        })),
        other => Err(EvalError::type_error(
            "unit",
            format!("a number is expected, got {}", other.type_name()),
        )),
    }
}

/// Conversion (`to`, `in`). The right operand supplies the target unit; a
/// plain number on the left takes the target unit as its own.
pub fn to(a: &Value, b: &Value) -> Result<Value, EvalError> {
    let target = match b {
        Value::Unit(u) => u,
        other => {
            return Err(EvalError::type_error(
                "to",
                format!("a unit is expected, got {}", other.type_name()),
            ))
        }
    };
    match a {
        Value::Unit(u) => {
            if u.dimension != target.dimension {
                return Err(EvalError::type_error(
                    "to",
                    format!("cannot convert {} to {}", u.unit, target.unit),
                ));
            }
            Ok(Value::Unit(UnitVal {
                value: u.value,
                unit: target.unit.clone(),
                factor: target.factor,
                dimension: target.dimension,
            }))
        }
        Value::Num(n) => Ok(Value::Unit(UnitVal {
            value: n * target.factor,
            unit: target.unit.clone(),
            factor: target.factor,
            dimension: target.dimension,
        })),
        other => Err(EvalError::type_error(
            "to",
            format!("unexpected {}", other.type_name()),
        )),
    }
}

builtin!("unit", "units", binary, unit);
builtin!("to", "units", binary, to);
