use std::fmt;
use std::rc::Rc;

use mathex_builtins::{Evaluable, HostRef};

/// The kind of a constant literal. The literal text is kept verbatim so
/// number literals can compile per the host's number configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstantKind {
    Number,
    String,
    Boolean,
    Undefined,
}

/// Extension hook: a node supplied by the embedder through
/// `ParseOptions::nodes`. Responsible for its own compilation and printing.
pub trait CustomNode: fmt::Debug {
    fn compile(&self, host: &HostRef) -> Evaluable;
    fn format(&self) -> String;
}

/// Shared handle to a custom node. Equality is identity: two handles are
/// equal when they point at the same node.
#[derive(Debug, Clone)]
pub struct CustomRef(pub Rc<dyn CustomNode>);

impl PartialEq for CustomRef {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlockEntry {
    pub node: Node,
    /// Entries terminated by `;` are invisible; newline-terminated (and
    /// final) entries are visible.
    pub visible: bool,
}

/// The closed set of AST node variants.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Constant {
        value: String,
        kind: ConstantKind,
    },
    Symbol {
        name: String,
    },
    /// `fn_name` names the host function invoked on evaluation; `op` is the
    /// operator as written (`*`, `mod`, `in`, ...).
    Operator {
        op: String,
        fn_name: String,
        args: Vec<Node>,
    },
    Conditional {
        condition: Box<Node>,
        true_expr: Box<Node>,
        false_expr: Box<Node>,
    },
    Range {
        start: Box<Node>,
        end: Box<Node>,
        step: Option<Box<Node>>,
    },
    /// Matrix literal. `[1,2;3,4]` has two rows; `[[1,2],[3,4]]` has a
    /// single row whose cells are nested arrays.
    Array {
        rows: Vec<Vec<Node>>,
    },
    Index {
        object: Box<Node>,
        dims: Vec<Node>,
        is_assignment: bool,
    },
    Assignment {
        name: String,
        value: Box<Node>,
    },
    /// Indexed assignment `a[...] = value`; `index` is always `Node::Index`.
    Update {
        name: String,
        index: Box<Node>,
        value: Box<Node>,
    },
    FunctionCall {
        name: String,
        args: Vec<Node>,
    },
    FunctionAssignment {
        name: String,
        params: Vec<String>,
        body: Box<Node>,
        /// `name(p1, p2)`, exposed on the resulting callable.
        syntax: String,
    },
    Block {
        entries: Vec<BlockEntry>,
    },
    /// Kept only as a stringification marker; compilation is transparent.
    Parenthesis {
        inner: Box<Node>,
    },
    Custom(CustomRef),
}

impl Node {
    pub fn children(&self) -> Vec<&Node> {
        match self {
            Node::Constant { .. } | Node::Symbol { .. } | Node::Custom(_) => Vec::new(),
            Node::Operator { args, .. } | Node::FunctionCall { args, .. } => args.iter().collect(),
            Node::Conditional {
                condition,
                true_expr,
                false_expr,
            } => vec![condition, true_expr, false_expr],
            Node::Range { start, end, step } => {
                let mut out: Vec<&Node> = vec![start, end];
                if let Some(step) = step {
                    out.push(step);
                }
                out
            }
            Node::Array { rows } => rows.iter().flatten().collect(),
            Node::Index { object, dims, .. } => {
                let mut out: Vec<&Node> = vec![object];
                out.extend(dims.iter());
                out
            }
            Node::Assignment { value, .. } => vec![value],
            Node::Update { index, value, .. } => vec![index, value],
            Node::FunctionAssignment { body, .. } => vec![body],
            Node::Block { entries } => entries.iter().map(|e| &e.node).collect(),
            Node::Parenthesis { inner } => vec![inner],
        }
    }

    /// Structural traversal: every node (including `self`) matching the
    /// predicate, in depth-first pre-order.
    pub fn find<F>(&self, predicate: F) -> Vec<&Node>
    where
        F: Fn(&Node) -> bool,
    {
        let mut out = Vec::new();
        self.collect(&predicate, &mut out);
        out
    }

    fn collect<'a>(&'a self, predicate: &dyn Fn(&Node) -> bool, out: &mut Vec<&'a Node>) {
        if predicate(self) {
            out.push(self);
        }
        for child in self.children() {
            child.collect(predicate, out);
        }
    }

    /// A copy of the tree with every `Parenthesis` wrapper removed. Round
    /// trips through `to_string` are equal up to these wrappers.
    pub fn strip_parens(&self) -> Node {
        match self {
            Node::Parenthesis { inner } => inner.strip_parens(),
            Node::Constant { .. } | Node::Symbol { .. } | Node::Custom(_) => self.clone(),
            Node::Operator { op, fn_name, args } => Node::Operator {
                op: op.clone(),
                fn_name: fn_name.clone(),
                args: args.iter().map(Node::strip_parens).collect(),
            },
            Node::Conditional {
                condition,
                true_expr,
                false_expr,
            } => Node::Conditional {
                condition: Box::new(condition.strip_parens()),
                true_expr: Box::new(true_expr.strip_parens()),
                false_expr: Box::new(false_expr.strip_parens()),
            },
            Node::Range { start, end, step } => Node::Range {
                start: Box::new(start.strip_parens()),
                end: Box::new(end.strip_parens()),
                step: step.as_ref().map(|s| Box::new(s.strip_parens())),
            },
            Node::Array { rows } => Node::Array {
                rows: rows
                    .iter()
                    .map(|row| row.iter().map(Node::strip_parens).collect())
                    .collect(),
            },
            Node::Index {
                object,
                dims,
                is_assignment,
            } => Node::Index {
                object: Box::new(object.strip_parens()),
                dims: dims.iter().map(Node::strip_parens).collect(),
                is_assignment: *is_assignment,
            },
            Node::Assignment { name, value } => Node::Assignment {
                name: name.clone(),
                value: Box::new(value.strip_parens()),
            },
            Node::Update { name, index, value } => Node::Update {
                name: name.clone(),
                index: Box::new(index.strip_parens()),
                value: Box::new(value.strip_parens()),
            },
            Node::FunctionCall { name, args } => Node::FunctionCall {
                name: name.clone(),
                args: args.iter().map(Node::strip_parens).collect(),
            },
            Node::FunctionAssignment {
                name,
                params,
                body,
                syntax,
            } => Node::FunctionAssignment {
                name: name.clone(),
                params: params.clone(),
                body: Box::new(body.strip_parens()),
                syntax: syntax.clone(),
            },
            Node::Block { entries } => Node::Block {
                entries: entries
                    .iter()
                    .map(|e| BlockEntry {
                        node: e.node.strip_parens(),
                        visible: e.visible,
                    })
                    .collect(),
            },
        }
    }
}

/// True when a printed operand would be ambiguous without parentheses.
/// Printing prefers explicit parentheses over precedence reasoning.
fn needs_parens(node: &Node) -> bool {
    matches!(
        node,
        Node::Operator { .. }
            | Node::Conditional { .. }
            | Node::Range { .. }
            | Node::Assignment { .. }
            | Node::FunctionAssignment { .. }
            | Node::Update { .. }
    )
}

fn fmt_operand(node: &Node, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if needs_parens(node) {
        write!(f, "({node})")
    } else {
        write!(f, "{node}")
    }
}

/// Wrap range/conditional operands only when nesting the same construct.
fn fmt_part(node: &Node, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if matches!(
        node,
        Node::Range { .. } | Node::Conditional { .. } | Node::Assignment { .. }
    ) {
        write!(f, "({node})")
    } else {
        write!(f, "{node}")
    }
}

const POSTFIX_OPS: &[&str] = &["!", "'", ".'"];

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Constant { value, kind } => match kind {
                ConstantKind::String => write!(f, "\"{value}\""),
                _ => write!(f, "{value}"),
            },
            Node::Symbol { name } => write!(f, "{name}"),
            Node::Operator { op, args, .. } => match args.len() {
                1 => {
                    if POSTFIX_OPS.contains(&op.as_str()) {
                        fmt_operand(&args[0], f)?;
                        write!(f, "{op}")
                    } else if op.chars().all(|c| c.is_ascii_alphabetic()) {
                        write!(f, "{op} ")?;
                        fmt_operand(&args[0], f)
                    } else {
                        write!(f, "{op}")?;
                        fmt_operand(&args[0], f)
                    }
                }
                2 => {
                    fmt_operand(&args[0], f)?;
                    write!(f, " {op} ")?;
                    fmt_operand(&args[1], f)
                }
                _ => {
                    // n-ary: print as chained binary
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            write!(f, " {op} ")?;
                        }
                        fmt_operand(arg, f)?;
                    }
                    Ok(())
                }
            },
            Node::Conditional {
                condition,
                true_expr,
                false_expr,
            } => {
                fmt_part(condition, f)?;
                write!(f, " ? ")?;
                fmt_part(true_expr, f)?;
                write!(f, " : ")?;
                fmt_part(false_expr, f)
            }
            Node::Range { start, end, step } => {
                fmt_part(start, f)?;
                if let Some(step) = step {
                    write!(f, ":")?;
                    fmt_part(step, f)?;
                }
                write!(f, ":")?;
                fmt_part(end, f)
            }
            Node::Array { rows } => {
                write!(f, "[")?;
                for (r, row) in rows.iter().enumerate() {
                    if r > 0 {
                        write!(f, "; ")?;
                    }
                    for (c, cell) in row.iter().enumerate() {
                        if c > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{cell}")?;
                    }
                }
                write!(f, "]")
            }
            Node::Index { object, dims, .. } => {
                write!(f, "{object}[")?;
                for (i, dim) in dims.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{dim}")?;
                }
                write!(f, "]")
            }
            Node::Assignment { name, value } => write!(f, "{name} = {value}"),
            Node::Update { index, value, .. } => write!(f, "{index} = {value}"),
            Node::FunctionCall { name, args } => {
                write!(f, "{name}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, ")")
            }
            Node::FunctionAssignment { syntax, body, .. } => write!(f, "{syntax} = {body}"),
            Node::Block { entries } => {
                for (i, entry) in entries.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{}", entry.node)?;
                    if !entry.visible {
                        write!(f, ";")?;
                    }
                }
                Ok(())
            }
            Node::Parenthesis { inner } => write!(f, "({inner})"),
            Node::Custom(custom) => write!(f, "{}", custom.0.format()),
        }
    }
}
