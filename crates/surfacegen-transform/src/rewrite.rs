//! Generic conversion engine.
//!
//! Turns a blocking method into its suspending counterpart: the signature
//! switches to the suspending convention, and every call whose target name
//! is a suspending target under the policy is wrapped in an await. All
//! other nodes are rebuilt unchanged.
//!
//! Call targets are matched by name alone: a bare `name(...)` call or an
//! attribute call `<receiver>.name(...)` on any receiver, so calls through
//! aliases of `self` or through transport stubs are covered too.

use surfacegen_ast::fold::{walk_expression, Fold};
use surfacegen_ast::{Expression, MethodDefinition};
use tracing::trace;

use crate::error::{TransformError, TransformResult};
use crate::policy::TransformationPolicy;

/// Outcome of converting one method.
#[derive(Clone, Debug, PartialEq)]
pub struct Conversion {
    pub method: MethodDefinition,
    /// Call sites newly wrapped in an await.
    pub awaited_calls: usize,
    /// Call sites whose type name was replaced via `class_replace_map`.
    pub renamed_calls: usize,
}

/// Converts methods classified as `Converted`.
pub struct AsyncRewriter<'p> {
    policy: &'p TransformationPolicy,
}

impl<'p> AsyncRewriter<'p> {
    pub fn new(policy: &'p TransformationPolicy) -> Self {
        Self { policy }
    }

    /// Convert a method to the suspending convention.
    ///
    /// A method already in suspending form is returned as-is, which makes
    /// the conversion idempotent.
    pub fn convert(&self, method: MethodDefinition) -> TransformResult<Conversion> {
        if method.is_async {
            trace!(method = %method.name, "Already suspending; conversion skipped");
            return Ok(Conversion {
                method,
                awaited_calls: 0,
                renamed_calls: 0,
            });
        }

        let mut folder = CallSiteFolder {
            policy: self.policy,
            awaited_calls: 0,
            renamed_calls: 0,
        };
        let MethodDefinition {
            name,
            params,
            body,
            returns,
            ..
        } = method;
        let body = folder.fold_block(body)?;

        Ok(Conversion {
            method: MethodDefinition {
                name,
                params,
                body,
                returns,
                is_async: true,
            },
            awaited_calls: folder.awaited_calls,
            renamed_calls: folder.renamed_calls,
        })
    }
}

struct CallSiteFolder<'p> {
    policy: &'p TransformationPolicy,
    awaited_calls: usize,
    renamed_calls: usize,
}

impl CallSiteFolder<'_> {
    /// Fold a call's children and apply the type rename, without deciding
    /// whether the call itself suspends.
    fn fold_call(&mut self, call: Expression) -> TransformResult<Expression> {
        let call = walk_expression(self, call)?;
        Ok(match call {
            Expression::Call {
                func,
                args,
                keywords,
            } => {
                let func = match *func {
                    Expression::Name { id } => match self.policy.renamed_class(&id) {
                        Some(renamed) => {
                            self.renamed_calls += 1;
                            Expression::name(renamed)
                        }
                        None => Expression::Name { id },
                    },
                    other => other,
                };
                Expression::Call {
                    func: Box::new(func),
                    args,
                    keywords,
                }
            }
            other => other,
        })
    }
}

impl Fold for CallSiteFolder<'_> {
    type Error = TransformError;

    fn fold_expression(&mut self, expr: Expression) -> TransformResult<Expression> {
        match expr {
            // Already suspending: rewrite inside the call but never wrap it twice.
            Expression::Await { value } => {
                let inner = if value.is_call() {
                    self.fold_call(*value)?
                } else {
                    self.fold_expression(*value)?
                };
                Ok(inner.awaited())
            }
            call @ Expression::Call { .. } => {
                let call = self.fold_call(call)?;
                let suspends = call
                    .call_target_name()
                    .is_some_and(|name| self.policy.is_suspending_target(name));
                if suspends {
                    self.awaited_calls += 1;
                    Ok(call.awaited())
                } else {
                    Ok(call)
                }
            }
            other => walk_expression(self, other),
        }
    }
}
