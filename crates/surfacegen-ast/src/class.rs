//! Class and method definitions, the top-level units of a client surface.

use serde::{Deserialize, Serialize};

use crate::error::{AstError, AstResult};
use crate::expr::Expression;
use crate::stmt::Statement;

// ── Parameters ───────────────────────────────────────────────────────

/// How a parameter binds arguments.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamKind {
    #[default]
    Positional,
    /// `*args`
    VarPositional,
    KeywordOnly,
    /// `**kwargs`
    VarKeyword,
}

/// A method parameter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(default)]
    pub kind: ParamKind,
    /// Annotation text, carried through verbatim.
    #[serde(default)]
    pub annotation: Option<String>,
    #[serde(default)]
    pub default: Option<Expression>,
}

impl Parameter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ParamKind::Positional,
            annotation: None,
            default: None,
        }
    }

    pub fn annotated(mut self, annotation: impl Into<String>) -> Self {
        self.annotation = Some(annotation.into());
        self
    }

    pub fn with_default(mut self, default: Expression) -> Self {
        self.default = Some(default);
        self
    }

    pub fn with_kind(mut self, kind: ParamKind) -> Self {
        self.kind = kind;
        self
    }
}

// ── Method ───────────────────────────────────────────────────────────

/// A method defined directly in a class body.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MethodDefinition {
    /// Unique within the enclosing class.
    pub name: String,
    #[serde(default)]
    pub params: Vec<Parameter>,
    #[serde(default)]
    pub body: Vec<Statement>,
    /// Return annotation text. Informational only.
    #[serde(default)]
    pub returns: Option<String>,
    /// Whether the method uses the suspending calling convention.
    #[serde(default)]
    pub is_async: bool,
}

impl MethodDefinition {
    /// A blocking method taking only `self`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: vec![Parameter::new("self")],
            body: Vec::new(),
            returns: None,
            is_async: false,
        }
    }

    pub fn with_param(mut self, param: Parameter) -> Self {
        self.params.push(param);
        self
    }

    pub fn with_statement(mut self, stmt: Statement) -> Self {
        self.body.push(stmt);
        self
    }

    pub fn with_body(mut self, body: Vec<Statement>) -> Self {
        self.body = body;
        self
    }

    pub fn with_returns(mut self, returns: impl Into<String>) -> Self {
        self.returns = Some(returns.into());
        self
    }

    pub fn suspending(mut self) -> Self {
        self.is_async = true;
        self
    }
}

// ── Class ────────────────────────────────────────────────────────────

/// A class definition: an ordered sequence of methods.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClassDefinition {
    pub name: String,
    #[serde(default)]
    pub bases: Vec<String>,
    #[serde(default)]
    pub methods: Vec<MethodDefinition>,
}

impl ClassDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bases: Vec::new(),
            methods: Vec::new(),
        }
    }

    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.bases.push(base.into());
        self
    }

    /// Add a method (builder pattern).
    pub fn with_method(mut self, method: MethodDefinition) -> Self {
        self.methods.push(method);
        self
    }

    pub fn method(&self, name: &str) -> Option<&MethodDefinition> {
        self.methods.iter().find(|m| m.name == name)
    }

    pub fn method_names(&self) -> Vec<&str> {
        self.methods.iter().map(|m| m.name.as_str()).collect()
    }

    pub fn method_count(&self) -> usize {
        self.methods.len()
    }

    /// Parse a class from its JSON interchange form.
    pub fn from_json(json: &str) -> AstResult<Self> {
        serde_json::from_str(json).map_err(|e| AstError::SerializationFailed(e.to_string()))
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> AstResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| AstError::SerializationFailed(e.to_string()))
    }
}
