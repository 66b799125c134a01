//! Defines the Abstract Syntax Tree (AST) for JPath expressions.
use serde_json::Value;

/// The top-level representation of a parsed expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// A literal value, like a string, number, or boolean.
    Literal(Value),
    /// A path to select data from the context.
    Selection(Selection),
    /// A call to a registered function.
    FunctionCall { name: String, args: Vec<Expression> },
    /// A prefix operator applied to an operand.
    Unary { op: UnaryOp, operand: Box<Expression> },
    /// An infix operator applied to two operands.
    Binary { op: BinaryOp, left: Box<Expression>, right: Box<Expression> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

/// Represents a segment in a JPath selection.
#[derive(Debug, Clone, PartialEq)]
pub enum PathSegment {
    /// An object key (e.g., `.name`).
    Key(String),
    /// An array index (e.g., `[0]`).
    Index(usize),
    /// A zero-argument accessor call (e.g., `.name()`), read from the `@name` member.
    Accessor(String),
}

/// Represents a path for selecting data.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    /// Selects the current context node (`.`).
    CurrentContext,
    /// Selects a value from the current variable scope (`$name`).
    Variable(String),
    /// Selects a node using a sequence of key/index lookups. The first key is
    /// looked up in the variable scope before the context node.
    Path(Vec<PathSegment>),
}
