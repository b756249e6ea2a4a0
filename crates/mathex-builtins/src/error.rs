use thiserror::Error;

/// Runtime error taxonomy. Parse-time errors live in the parser crate;
/// everything that can escape `eval` is one of these.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("Undefined symbol {0}")]
    UndefinedSymbol(String),

    /// A caller-provided scope contains a reserved name (`end`).
    #[error("Scope contains an illegal symbol")]
    IllegalScope,

    /// One-based index above the size of the indexed dimension.
    #[error("Index out of range ({index} > {max})")]
    IndexOutOfRange { index: i64, max: usize },

    /// One-based index below 1.
    #[error("Index out of range ({index} < 1)")]
    IndexTooSmall { index: i64 },

    #[error("Column dimensions mismatch")]
    ColumnDimensionsMismatch,

    #[error("Dimension mismatch ({0})")]
    DimensionMismatch(String),

    #[error("Wrong number of arguments in function {name} ({actual} provided, {expected} expected)")]
    Arguments {
        name: String,
        actual: usize,
        expected: usize,
    },

    #[error("Unexpected type of argument in function {fn_name} ({detail})")]
    Type { fn_name: String, detail: String },

    #[error("Unknown function {0}")]
    UnknownFunction(String),

    #[error("{0}")]
    Runtime(String),
}

impl EvalError {
    pub fn type_error(fn_name: &str, detail: impl Into<String>) -> Self {
        EvalError::Type {
            fn_name: fn_name.to_string(),
            detail: detail.into(),
        }
    }

    pub fn arguments(name: &str, actual: usize, expected: usize) -> Self {
        EvalError::Arguments {
            name: name.to_string(),
            actual,
            expected,
        }
    }
}
