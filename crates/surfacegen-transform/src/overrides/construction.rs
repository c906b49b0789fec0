//! Construction override: strip non-blocking transport bindings from the
//! constructor.
//!
//! Only the constructor's own statement sequence is inspected. A plain or
//! annotated assignment is dropped when its attribute target carries the
//! policy's transport marker; every other statement is kept in order.

use surfacegen_ast::{Expression, Fold, MethodDefinition, Statement};
use tracing::debug;

use crate::error::{TransformError, TransformResult};
use crate::policy::TransformationPolicy;

/// Constructor after stripping, plus the attribute names that were removed.
#[derive(Clone, Debug, PartialEq)]
pub struct StrippedConstructor {
    pub method: MethodDefinition,
    pub removed: Vec<String>,
}

/// Apply the construction override to `method`.
pub fn strip_transport_bindings(
    method: MethodDefinition,
    policy: &TransformationPolicy,
) -> TransformResult<StrippedConstructor> {
    let MethodDefinition {
        name,
        params,
        body,
        returns,
        is_async,
    } = method;
    let mut stripper = BindingStripper {
        method: &name,
        policy,
        removed: Vec::new(),
    };
    let body = stripper.fold_block(body)?;
    let removed = stripper.removed;

    Ok(StrippedConstructor {
        method: MethodDefinition {
            name,
            params,
            body,
            returns,
            is_async,
        },
        removed,
    })
}

struct BindingStripper<'a> {
    method: &'a str,
    policy: &'a TransformationPolicy,
    removed: Vec<String>,
}

impl BindingStripper<'_> {
    fn transport_attr<'e>(&self, target: &'e Expression) -> Option<&'e str> {
        target
            .attribute_name()
            .filter(|attr| self.policy.is_transport_binding(attr))
    }

    fn contains_transport_attr(&self, target: &Expression) -> bool {
        match target {
            Expression::Tuple { elts } | Expression::List { elts } => {
                elts.iter().any(|e| self.contains_transport_attr(e))
            }
            Expression::Starred { value } => self.contains_transport_attr(value),
            other => self.transport_attr(other).is_some(),
        }
    }

    fn unmatched(&self, reason: impl Into<String>) -> TransformError {
        TransformError::UnmatchedOverride {
            method: self.method.to_string(),
            reason: reason.into(),
        }
    }

    fn drop_binding(&mut self, attrs: Vec<String>) -> TransformResult<Option<Statement>> {
        for attr in &attrs {
            debug!(method = %self.method, attr = %attr, "Dropped transport binding");
        }
        self.removed.extend(attrs);
        Ok(None)
    }
}

impl Fold for BindingStripper<'_> {
    type Error = TransformError;

    fn fold_statement(&mut self, stmt: Statement) -> TransformResult<Option<Statement>> {
        let Some(targets) = stmt.assignment_targets() else {
            return Ok(Some(stmt));
        };
        if targets.is_empty() {
            return Err(self.unmatched("assignment without targets"));
        }
        let marked: Vec<String> = targets
            .iter()
            .filter_map(|t| self.transport_attr(t))
            .map(str::to_string)
            .collect();
        if marked.is_empty() {
            if targets.iter().any(|t| self.contains_transport_attr(t)) {
                return Err(self.unmatched("transport binding inside a destructuring assignment"));
            }
            return Ok(Some(stmt));
        }
        if marked.len() != targets.len() {
            return Err(self.unmatched(format!(
                "assignment binds transport field '{}' together with other targets",
                marked[0]
            )));
        }
        self.drop_binding(marked)
    }
}
