//! Expression nodes.
//!
//! Expressions cover what a client surface needs: names, constants,
//! attribute references, calls with keyword arguments, awaits, operators,
//! and container displays. Anything else the external parser meets is
//! carried as [`Expression::Opaque`] source text and never rewritten.

use serde::{Deserialize, Serialize};

// ── Constants ────────────────────────────────────────────────────────

/// A literal value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Constant {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

// ── Operators ────────────────────────────────────────────────────────

/// Comparison operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompareOp {
    Eq,
    NotEq,
    Lt,
    LtE,
    Gt,
    GtE,
    Is,
    IsNot,
    In,
    NotIn,
}

impl std::fmt::Display for CompareOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Eq => write!(f, "=="),
            Self::NotEq => write!(f, "!="),
            Self::Lt => write!(f, "<"),
            Self::LtE => write!(f, "<="),
            Self::Gt => write!(f, ">"),
            Self::GtE => write!(f, ">="),
            Self::Is => write!(f, "is"),
            Self::IsNot => write!(f, "is not"),
            Self::In => write!(f, "in"),
            Self::NotIn => write!(f, "not in"),
        }
    }
}

/// Short-circuiting boolean operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoolOpKind {
    And,
    Or,
}

impl std::fmt::Display for BoolOpKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::And => write!(f, "and"),
            Self::Or => write!(f, "or"),
        }
    }
}

/// Binary arithmetic and bitwise operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinOpKind {
    Add,
    Sub,
    Mult,
    MatMult,
    Div,
    FloorDiv,
    Mod,
    Pow,
    LShift,
    RShift,
    BitOr,
    BitXor,
    BitAnd,
}

impl std::fmt::Display for BinOpKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let symbol = match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mult => "*",
            Self::MatMult => "@",
            Self::Div => "/",
            Self::FloorDiv => "//",
            Self::Mod => "%",
            Self::Pow => "**",
            Self::LShift => "<<",
            Self::RShift => ">>",
            Self::BitOr => "|",
            Self::BitXor => "^",
            Self::BitAnd => "&",
        };
        f.write_str(symbol)
    }
}

/// Prefix operators other than `not`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnaryOpKind {
    Neg,
    Pos,
    Invert,
}

impl std::fmt::Display for UnaryOpKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Neg => write!(f, "-"),
            Self::Pos => write!(f, "+"),
            Self::Invert => write!(f, "~"),
        }
    }
}

// ── Keyword Argument ─────────────────────────────────────────────────

/// A keyword argument at a call site. `arg == None` is a `**mapping` splat.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Keyword {
    pub arg: Option<String>,
    pub value: Expression,
}

impl Keyword {
    pub fn new(arg: impl Into<String>, value: Expression) -> Self {
        Self {
            arg: Some(arg.into()),
            value,
        }
    }

    pub fn splat(value: Expression) -> Self {
        Self { arg: None, value }
    }
}

// ── Expression ───────────────────────────────────────────────────────

/// An expression node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Expression {
    Name {
        id: String,
    },
    Constant {
        value: Constant,
    },
    /// `value.attr`
    Attribute {
        value: Box<Expression>,
        attr: String,
    },
    Call {
        func: Box<Expression>,
        args: Vec<Expression>,
        #[serde(default)]
        keywords: Vec<Keyword>,
    },
    Await {
        value: Box<Expression>,
    },
    Compare {
        left: Box<Expression>,
        op: CompareOp,
        right: Box<Expression>,
    },
    BoolOp {
        op: BoolOpKind,
        values: Vec<Expression>,
    },
    Not {
        operand: Box<Expression>,
    },
    BinOp {
        left: Box<Expression>,
        op: BinOpKind,
        right: Box<Expression>,
    },
    UnaryOp {
        op: UnaryOpKind,
        operand: Box<Expression>,
    },
    List {
        elts: Vec<Expression>,
    },
    Tuple {
        elts: Vec<Expression>,
    },
    Dict {
        entries: Vec<(Expression, Expression)>,
    },
    Subscript {
        value: Box<Expression>,
        index: Box<Expression>,
    },
    Starred {
        value: Box<Expression>,
    },
    /// Source text of a construct with no structured node (lambdas,
    /// comprehensions, f-strings, ...). Walks treat it as a leaf.
    Opaque {
        source: String,
    },
}

impl Expression {
    pub fn name(id: impl Into<String>) -> Self {
        Self::Name { id: id.into() }
    }

    pub fn none() -> Self {
        Self::Constant {
            value: Constant::None,
        }
    }

    pub fn bool(value: bool) -> Self {
        Self::Constant {
            value: Constant::Bool(value),
        }
    }

    pub fn int(value: i64) -> Self {
        Self::Constant {
            value: Constant::Int(value),
        }
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::Constant {
            value: Constant::Str(value.into()),
        }
    }

    /// `self.<attr>`
    pub fn self_attr(attr: impl Into<String>) -> Self {
        Self::name("self").attr(attr)
    }

    /// `<self>.<attr>`
    pub fn attr(self, attr: impl Into<String>) -> Self {
        Self::Attribute {
            value: Box::new(self),
            attr: attr.into(),
        }
    }

    /// `<self>(args...)`
    pub fn call(self, args: Vec<Expression>) -> Self {
        self.call_with(args, Vec::new())
    }

    /// `<self>(args..., keywords...)`
    pub fn call_with(self, args: Vec<Expression>, keywords: Vec<Keyword>) -> Self {
        Self::Call {
            func: Box::new(self),
            args,
            keywords,
        }
    }

    /// `await <self>`
    pub fn awaited(self) -> Self {
        Self::Await {
            value: Box::new(self),
        }
    }

    pub fn compare(self, op: CompareOp, right: Expression) -> Self {
        Self::Compare {
            left: Box::new(self),
            op,
            right: Box::new(right),
        }
    }

    pub fn binop(self, op: BinOpKind, right: Expression) -> Self {
        Self::BinOp {
            left: Box::new(self),
            op,
            right: Box::new(right),
        }
    }

    pub fn opaque(source: impl Into<String>) -> Self {
        Self::Opaque {
            source: source.into(),
        }
    }

    pub fn and(values: Vec<Expression>) -> Self {
        Self::BoolOp {
            op: BoolOpKind::And,
            values,
        }
    }

    /// Name of the callee for a call expression: the identifier of a bare
    /// name call, or the attribute of a method call on any receiver.
    pub fn call_target_name(&self) -> Option<&str> {
        match self {
            Self::Call { func, .. } => match func.as_ref() {
                Self::Name { id } => Some(id),
                Self::Attribute { attr, .. } => Some(attr),
                _ => None,
            },
            _ => None,
        }
    }

    /// Attribute name when this expression is an attribute reference.
    pub fn attribute_name(&self) -> Option<&str> {
        match self {
            Self::Attribute { attr, .. } => Some(attr),
            _ => None,
        }
    }

    pub fn is_call(&self) -> bool {
        matches!(self, Self::Call { .. })
    }

    pub fn is_await(&self) -> bool {
        matches!(self, Self::Await { .. })
    }

    /// Short label for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Name { .. } => "name",
            Self::Constant { .. } => "constant",
            Self::Attribute { .. } => "attribute",
            Self::Call { .. } => "call",
            Self::Await { .. } => "await",
            Self::Compare { .. } => "compare",
            Self::BoolOp { .. } => "bool-op",
            Self::Not { .. } => "not",
            Self::BinOp { .. } => "bin-op",
            Self::UnaryOp { .. } => "unary-op",
            Self::List { .. } => "list",
            Self::Tuple { .. } => "tuple",
            Self::Dict { .. } => "dict",
            Self::Subscript { .. } => "subscript",
            Self::Starred { .. } => "starred",
            Self::Opaque { .. } => "opaque",
        }
    }
}
