//! Expression tree produced by the parser.

use core::fmt;
use std::sync::Arc;

/// A parsed expression.
///
/// The tree owns its children exclusively and is never mutated after
/// construction, so a parsed tree can be evaluated from several threads at
/// once.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Number(f64),
    Str(Arc<str>),
    Ident(String),
    BinaryOp {
        op: String,
        left: Box<Node>,
        right: Box<Node>,
    },
    Prefix {
        op: String,
        operand: Box<Node>,
    },
    Call {
        name: String,
        args: Vec<Node>,
    },
}

impl Node {
    pub fn binary(op: impl Into<String>, left: Node, right: Node) -> Self {
        Node::BinaryOp {
            op: op.into(),
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn prefix(op: impl Into<String>, operand: Node) -> Self {
        Node::Prefix {
            op: op.into(),
            operand: Box::new(operand),
        }
    }

    pub fn call(name: impl Into<String>, args: Vec<Node>) -> Self {
        Node::Call {
            name: name.into(),
            args,
        }
    }
}

/// Fully parenthesized rendering, mainly for debugging and tests.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Number(n) => write!(f, "{}", n),
            Node::Str(s) => write!(f, "{:?}", s),
            Node::Ident(name) => f.write_str(name),
            Node::BinaryOp { op, left, right } => write!(f, "({} {} {})", left, op, right),
            Node::Prefix { op, operand } => write!(f, "({}{})", op, operand),
            Node::Call { name, args } => {
                write!(f, "{}(", name)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
        }
    }
}
