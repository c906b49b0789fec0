//! Statement nodes.
//!
//! Statements form a strict tree: every block exclusively owns its child
//! statements, and no node is shared between two parents.

use serde::{Deserialize, Serialize};

use crate::expr::{BinOpKind, Expression};

/// One `except` clause of a `try` statement.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExceptHandler {
    /// Error kind caught by this handler; `None` catches everything.
    pub kind: Option<String>,
    /// Name the caught error is bound to.
    #[serde(default)]
    pub name: Option<String>,
    pub body: Vec<Statement>,
}

impl ExceptHandler {
    pub fn new(kind: impl Into<String>, body: Vec<Statement>) -> Self {
        Self {
            kind: Some(kind.into()),
            name: None,
            body,
        }
    }

    pub fn bare(body: Vec<Statement>) -> Self {
        Self {
            kind: None,
            name: None,
            body,
        }
    }
}

/// One context manager of a `with` statement.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WithItem {
    pub context: Expression,
    pub binding: Option<Expression>,
}

/// A statement node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Statement {
    Assign {
        targets: Vec<Expression>,
        value: Expression,
    },
    AnnAssign {
        target: Expression,
        annotation: String,
        value: Option<Expression>,
    },
    Expr {
        value: Expression,
    },
    Return {
        value: Option<Expression>,
    },
    /// `target op= value`
    AugAssign {
        target: Expression,
        op: BinOpKind,
        value: Expression,
    },
    If {
        test: Expression,
        body: Vec<Statement>,
        #[serde(default)]
        orelse: Vec<Statement>,
    },
    While {
        test: Expression,
        body: Vec<Statement>,
    },
    For {
        target: Expression,
        iter: Expression,
        body: Vec<Statement>,
    },
    With {
        items: Vec<WithItem>,
        body: Vec<Statement>,
    },
    Try {
        body: Vec<Statement>,
        handlers: Vec<ExceptHandler>,
        #[serde(default)]
        orelse: Vec<Statement>,
        #[serde(default)]
        finalbody: Vec<Statement>,
    },
    Raise {
        exc: Option<Expression>,
    },
    Pass,
    Break,
    Continue,
    Block {
        body: Vec<Statement>,
    },
    /// Source text of a statement with no structured node (`del`,
    /// `assert`, `global`, nested definitions, ...). Kept verbatim.
    Opaque {
        source: String,
    },
}

impl Statement {
    /// `target = value`
    pub fn assign(target: Expression, value: Expression) -> Self {
        Self::Assign {
            targets: vec![target],
            value,
        }
    }

    /// `target: annotation = value`
    pub fn ann_assign(
        target: Expression,
        annotation: impl Into<String>,
        value: Option<Expression>,
    ) -> Self {
        Self::AnnAssign {
            target,
            annotation: annotation.into(),
            value,
        }
    }

    /// `target op= value`
    pub fn aug_assign(target: Expression, op: BinOpKind, value: Expression) -> Self {
        Self::AugAssign { target, op, value }
    }

    pub fn opaque(source: impl Into<String>) -> Self {
        Self::Opaque {
            source: source.into(),
        }
    }

    pub fn expr(value: Expression) -> Self {
        Self::Expr { value }
    }

    pub fn ret(value: Option<Expression>) -> Self {
        Self::Return { value }
    }

    pub fn if_then(test: Expression, body: Vec<Statement>) -> Self {
        Self::If {
            test,
            body,
            orelse: Vec::new(),
        }
    }

    pub fn try_except(body: Vec<Statement>, handlers: Vec<ExceptHandler>) -> Self {
        Self::Try {
            body,
            handlers,
            orelse: Vec::new(),
            finalbody: Vec::new(),
        }
    }

    /// Targets bound by a plain or annotated assignment, in source order.
    /// Augmented assignments rebind an existing target and are not included.
    pub fn assignment_targets(&self) -> Option<Vec<&Expression>> {
        match self {
            Self::Assign { targets, .. } => Some(targets.iter().collect()),
            Self::AnnAssign { target, .. } => Some(vec![target]),
            _ => None,
        }
    }

    /// Short label for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Assign { .. } => "assign",
            Self::AnnAssign { .. } => "annotated-assign",
            Self::AugAssign { .. } => "augmented-assign",
            Self::Expr { .. } => "expression",
            Self::Return { .. } => "return",
            Self::If { .. } => "if",
            Self::While { .. } => "while",
            Self::For { .. } => "for",
            Self::With { .. } => "with",
            Self::Try { .. } => "try",
            Self::Raise { .. } => "raise",
            Self::Pass => "pass",
            Self::Break => "break",
            Self::Continue => "continue",
            Self::Block { .. } => "block",
            Self::Opaque { .. } => "opaque",
        }
    }
}
