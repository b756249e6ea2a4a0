//! mathex: a mathematical expression language.
//!
//! Source text is parsed into an AST, compiled against a numeric host into
//! a tree of evaluables, and evaluated against a caller-owned scope:
//!
//! ```
//! use mathex::{eval, Scope, Value};
//!
//! let scope = Scope::new();
//! assert_eq!(eval("2 + 6 / 3", &scope).unwrap(), Value::Num(4.0));
//! ```

use thiserror::Error;

pub use mathex_builtins::{
    Complex64, Dimension, EvalConfig, EvalError, Evaluable, Function, Host, HostRef, Matrix,
    NumberKind, Scope, UnitVal, Value,
};
pub use mathex_eval::{compile as compile_tree, Compile, Compiled};
pub use mathex_parser::{
    parse, parse_all, parse_with, BlockEntry, ConstantKind, CustomNode, CustomNodeFactory,
    CustomRef, Node, ParseError, ParseOptions,
};
pub use mathex_runtime::{standard_host, standard_host_with, StandardHost};

/// Either phase can fail: syntax errors surface eagerly from `parse`,
/// runtime errors from `eval`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Eval(#[from] EvalError),
}

/// Parses and compiles against the standard host.
pub fn compile(source: &str) -> Result<Compiled, ParseError> {
    compile_with_host(source, &standard_host())
}

pub fn compile_with_host(source: &str, host: &HostRef) -> Result<Compiled, ParseError> {
    let node = parse(source)?;
    Ok(compile_tree(&node, host))
}

/// Parse, compile and evaluate in one step against the standard host.
pub fn eval(source: &str, scope: &Scope) -> Result<Value, Error> {
    log::debug!("eval: {source}");
    let compiled = compile(source)?;
    Ok(compiled.eval(scope)?)
}

/// Evaluates a sequence of sources against a shared scope, returning the
/// value of each.
pub fn eval_all(sources: &[&str], scope: &Scope) -> Result<Vec<Value>, Error> {
    let host = standard_host();
    parse_all(sources)?
        .iter()
        .map(|node| Ok(compile_tree(node, &host).eval(scope)?))
        .collect()
}
