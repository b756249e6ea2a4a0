//! Compilation of AST nodes into evaluables.
//!
//! Compilation is a pure tree transformation: each node becomes a closure
//! over its compiled children and the host handle. Evaluables own no state
//! outside the scope they are handed.

use mathex_builtins::{EvalError, Evaluable, Function, HostRef, Scope, Value};
use mathex_parser::{ConstantKind, Node};

/// Node-level compile entry point, so `node.compile(&host)` reads the way
/// the public contract is written.
pub trait Compile {
    fn compile(&self, host: &HostRef) -> Evaluable;
}

impl Compile for Node {
    fn compile(&self, host: &HostRef) -> Evaluable {
        compile_node(self, host)
    }
}

/// A compiled tree ready for evaluation. Checks the caller scope for
/// reserved names before running.
pub struct Compiled {
    root: Evaluable,
}

impl Compiled {
    pub fn new(root: Evaluable) -> Self {
        Compiled { root }
    }

    pub fn eval(&self, scope: &Scope) -> Result<Value, EvalError> {
        if scope.contains("end") {
            return Err(EvalError::IllegalScope);
        }
        self.root.eval(scope)
    }

    /// Evaluation against a fresh empty scope.
    pub fn eval_new(&self) -> Result<Value, EvalError> {
        self.eval(&Scope::new())
    }
}

pub fn compile(node: &Node, host: &HostRef) -> Compiled {
    log::trace!("compiling {node}");
    Compiled::new(compile_node(node, host))
}

fn compile_node(node: &Node, host: &HostRef) -> Evaluable {
    match node {
        Node::Constant { value, kind } => compile_constant(value, *kind, host),
        Node::Symbol { name } => {
            let host = host.clone();
            let name = name.clone();
            Evaluable::new(move |scope| {
                if let Some(v) = scope.get(&name) {
                    return Ok(v);
                }
                if let Some(v) = host.lookup_constant(&name) {
                    return Ok(v);
                }
                Err(EvalError::UndefinedSymbol(name.clone()))
            })
        }
        Node::Operator { fn_name, args, .. } => {
            let host = host.clone();
            let fn_name = fn_name.clone();
            let args: Vec<Evaluable> = args.iter().map(|a| compile_node(a, &host)).collect();
            Evaluable::new(move |scope| {
                let mut values = Vec::with_capacity(args.len());
                for arg in &args {
                    values.push(arg.eval(scope)?);
                }
                host.call(&fn_name, &values)
            })
        }
        Node::Conditional {
            condition,
            true_expr,
            false_expr,
        } => {
            let host = host.clone();
            let condition = compile_node(condition, &host);
            let true_expr = compile_node(true_expr, &host);
            let false_expr = compile_node(false_expr, &host);
            Evaluable::new(move |scope| {
                let cond = condition.eval(scope)?;
                if host.is_truthy(&cond)? {
                    true_expr.eval(scope)
                } else {
                    false_expr.eval(scope)
                }
            })
        }
        Node::Range { start, end, step } => {
            let host = host.clone();
            let start = compile_node(start, &host);
            let end = compile_node(end, &host);
            let step = step.as_ref().map(|s| compile_node(s, &host));
            Evaluable::new(move |scope| {
                let start = start.eval(scope)?;
                let end = end.eval(scope)?;
                let step = match &step {
                    Some(step) => step.eval(scope)?,
                    None => Value::Num(1.0),
                };
                host.call("range", &[start, end, step])
            })
        }
        Node::Array { rows } => {
            let host = host.clone();
            let rows: Vec<Vec<Evaluable>> = rows
                .iter()
                .map(|row| row.iter().map(|cell| compile_node(cell, &host)).collect())
                .collect();
            Evaluable::new(move |scope| {
                let mut row_values = Vec::with_capacity(rows.len());
                for row in &rows {
                    let mut cells = Vec::with_capacity(row.len());
                    for cell in row {
                        cells.push(cell.eval(scope)?);
                    }
                    row_values.push(host.call("matrix", &cells)?);
                }
                if row_values.len() == 1 {
                    Ok(row_values.pop().unwrap())
                } else if row_values.is_empty() {
                    host.call("matrix", &[])
                } else {
                    host.call("concat", &row_values)
                }
            })
        }
        Node::Index { object, dims, .. } => {
            let host = host.clone();
            let object = compile_node(object, &host);
            let dims: Vec<Evaluable> = dims.iter().map(|d| compile_node(d, &host)).collect();
            Evaluable::new(move |scope| {
                let obj = object.eval(scope)?;
                let index = eval_index(&host, &dims, &obj, scope)?;
                host.call("subset", &[obj, index])
            })
        }
        Node::Assignment { name, value } => {
            let name = name.clone();
            let value = compile_node(value, host);
            Evaluable::new(move |scope| {
                let v = value.eval(scope)?;
                scope.set(&name, v.clone());
                Ok(v)
            })
        }
        Node::Update { name, index, value } => {
            let host = host.clone();
            let name = name.clone();
            let value = compile_node(value, &host);
            let dims: Vec<Evaluable> = match index.as_ref() {
                Node::Index { dims, .. } => dims.iter().map(|d| compile_node(d, &host)).collect(),
                _ => {
                    return Evaluable::fail(EvalError::Runtime(
                        "malformed update node".to_string(),
                    ))
                }
            };
            Evaluable::new(move |scope| {
                let obj = scope
                    .get(&name)
                    .ok_or_else(|| EvalError::UndefinedSymbol(name.clone()))?;
                let index = eval_index(&host, &dims, &obj, scope)?;
                let replacement = value.eval(scope)?;
                let updated = host.call("subset", &[obj, index, replacement])?;
                scope.set(&name, updated.clone());
                Ok(updated)
            })
        }
        Node::FunctionCall { name, args } => compile_call(name, args, host),
        Node::FunctionAssignment {
            name,
            params,
            body,
            syntax,
        } => {
            let name = name.clone();
            let params = params.clone();
            let syntax = syntax.clone();
            let body = compile_node(body, host);
            Evaluable::new(move |scope| {
                let function = Function {
                    name: name.clone(),
                    params: params.clone(),
                    syntax: syntax.clone(),
                    body: body.clone(),
                    scope: scope.clone(),
                };
                let value = Value::Function(function);
                scope.set(&name, value.clone());
                Ok(value)
            })
        }
        Node::Block { entries } => {
            let entries: Vec<(Evaluable, bool)> = entries
                .iter()
                .map(|e| (compile_node(&e.node, host), e.visible))
                .collect();
            Evaluable::new(move |scope| {
                let mut results = Vec::new();
                for (entry, visible) in &entries {
                    let value = entry.eval(scope)?;
                    if *visible {
                        results.push(value);
                    }
                }
                Ok(Value::ResultSet(results))
            })
        }
        Node::Parenthesis { inner } => compile_node(inner, host),
        Node::Custom(custom) => custom.0.compile(host),
    }
}

fn compile_constant(value: &str, kind: ConstantKind, host: &HostRef) -> Evaluable {
    match kind {
        ConstantKind::Number => match host.number_literal(value) {
            Ok(v) => Evaluable::constant(v),
            Err(e) => Evaluable::fail(e),
        },
        ConstantKind::String => Evaluable::constant(Value::Str(value.to_string())),
        ConstantKind::Boolean => Evaluable::constant(Value::Bool(value == "true")),
        ConstantKind::Undefined => Evaluable::constant(Value::Null),
    }
}

/// Evaluates index dimensions with `end` bound to the size of the matching
/// dimension of the object, then packages them with the host.
fn eval_index(
    host: &HostRef,
    dims: &[Evaluable],
    obj: &Value,
    scope: &Scope,
) -> Result<Value, EvalError> {
    let sizes = match host.call("size", &[obj.clone()])? {
        Value::Matrix(m) => m.as_numbers().unwrap_or_default(),
        _ => Vec::new(),
    };
    let mut dim_values = Vec::with_capacity(dims.len());
    for (i, dim) in dims.iter().enumerate() {
        let frame = Scope::child(scope);
        frame.set("end", Value::Num(sizes.get(i).copied().unwrap_or(1.0)));
        dim_values.push(dim.eval(&frame)?);
    }
    host.call("index", &dim_values)
}

fn compile_call(name: &str, args: &[Node], host: &HostRef) -> Evaluable {
    let compiled: Vec<Evaluable> = args.iter().map(|a| compile_node(a, host)).collect();
    let name = name.to_string();
    let host = host.clone();
    if host.has_function(&name) {
        return Evaluable::new(move |scope| {
            let mut values = Vec::with_capacity(compiled.len());
            for arg in &compiled {
                values.push(arg.eval(scope)?);
            }
            host.call(&name, &values)
        });
    }
    Evaluable::new(move |scope| {
        let callee = scope
            .get(&name)
            .or_else(|| host.lookup_constant(&name))
            .ok_or_else(|| EvalError::UndefinedSymbol(name.clone()))?;
        match callee {
            Value::Function(function) => {
                let mut values = Vec::with_capacity(compiled.len());
                for arg in &compiled {
                    values.push(arg.eval(scope)?);
                }
                function.call(&values)
            }
            other => Err(EvalError::Runtime(format!(
                "{} is not a function ({} found)",
                name,
                other.type_name()
            ))),
        }
    })
}
