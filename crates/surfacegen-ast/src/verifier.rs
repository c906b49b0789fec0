//! Structural verification of class definitions.

use std::collections::HashSet;

use crate::class::{ClassDefinition, MethodDefinition};
use crate::error::{AstError, AstResult};
use crate::expr::Expression;
use crate::stmt::Statement;
use crate::visit;

/// Verifier that checks a [`ClassDefinition`] is well-formed input for a
/// source printer.
pub struct TreeVerifier;

impl TreeVerifier {
    /// Verify a class definition.
    ///
    /// Returns a list of non-fatal warnings on success, or the first hard
    /// error.
    ///
    /// # Checks performed
    ///
    /// 1. Class name must not be empty.
    /// 2. Method names must be non-empty and unique.
    /// 3. Parameter names must be non-empty and unique within a method.
    /// 4. Attribute references must name an attribute.
    /// 5. Assignments must have at least one target, and every target must
    ///    be assignable (name, attribute, subscript, starred, or a
    ///    tuple/list of those).
    ///    Annotated and augmented targets must be a single name, attribute,
    ///    or subscript.
    /// 6. `try` needs at least one handler or a `finally` block.
    /// 7. `await` may only appear in a suspending method.
    /// 8. `break` and `continue` must sit inside a loop body.
    ///
    /// Opaque nodes are not inspected; each method carrying them gets a
    /// warning.
    pub fn verify(class: &ClassDefinition) -> AstResult<Vec<String>> {
        let mut warnings = Vec::new();

        if class.name.is_empty() {
            return Err(AstError::MalformedTree("class name must not be empty".into()));
        }

        let mut seen = HashSet::new();
        for (i, method) in class.methods.iter().enumerate() {
            if method.name.is_empty() {
                return Err(AstError::MalformedTree(format!(
                    "method at index {} has an empty name",
                    i
                )));
            }
            if !seen.insert(method.name.as_str()) {
                return Err(AstError::DuplicateMethod(method.name.clone()));
            }
            Self::verify_method(method, &mut warnings)?;
        }

        if class.methods.is_empty() {
            warnings.push(format!("class '{}' has no methods", class.name));
        }

        Ok(warnings)
    }

    /// Verify a single method in isolation.
    pub fn verify_method(method: &MethodDefinition, warnings: &mut Vec<String>) -> AstResult<()> {
        let mut params = HashSet::new();
        for param in &method.params {
            if param.name.is_empty() {
                return Err(AstError::MalformedTree(format!(
                    "method '{}' has a parameter with an empty name",
                    method.name
                )));
            }
            if !params.insert(param.name.as_str()) {
                return Err(AstError::MalformedTree(format!(
                    "method '{}' declares parameter '{}' twice",
                    method.name, param.name
                )));
            }
        }

        let mut failure: Option<AstError> = None;
        visit::for_each_statement(&method.body, &mut |stmt| {
            if failure.is_none() {
                failure = Self::check_statement(&method.name, stmt).err();
            }
        });
        if let Some(err) = failure {
            return Err(err);
        }

        Self::check_loop_control(&method.name, &method.body, false)?;

        let mut opaque = 0usize;
        visit::for_each_statement(&method.body, &mut |stmt| {
            if matches!(stmt, Statement::Opaque { .. }) {
                opaque += 1;
            }
        });

        let mut empty_attr = false;
        let mut awaits = false;
        visit::for_each_expression(&method.body, &mut |expr| match expr {
            Expression::Attribute { attr, .. } if attr.is_empty() => empty_attr = true,
            Expression::Await { .. } => awaits = true,
            Expression::Opaque { .. } => opaque += 1,
            _ => {}
        });
        if empty_attr {
            return Err(AstError::MalformedTree(format!(
                "method '{}' references an attribute with an empty name",
                method.name
            )));
        }
        if awaits && !method.is_async {
            return Err(AstError::AwaitOutsideSuspending(method.name.clone()));
        }

        if method.body.is_empty() {
            warnings.push(format!("method '{}' has an empty body", method.name));
        }
        if opaque > 0 {
            warnings.push(format!(
                "method '{}' carries {} opaque node(s) that are passed through unchanged",
                method.name, opaque
            ));
        }
        Ok(())
    }

    fn check_loop_control(method: &str, body: &[Statement], in_loop: bool) -> AstResult<()> {
        for stmt in body {
            match stmt {
                Statement::Break | Statement::Continue if !in_loop => {
                    return Err(AstError::MalformedTree(format!(
                        "'{}' outside a loop in '{}'",
                        stmt.kind_name(),
                        method
                    )));
                }
                Statement::While { body, .. } | Statement::For { body, .. } => {
                    Self::check_loop_control(method, body, true)?;
                }
                other => {
                    for child in visit::child_blocks(other) {
                        Self::check_loop_control(method, child, in_loop)?;
                    }
                }
            }
        }
        Ok(())
    }

    fn check_statement(method: &str, stmt: &Statement) -> AstResult<()> {
        match stmt {
            Statement::Assign { targets, .. } => {
                if targets.is_empty() {
                    return Err(AstError::InvalidTarget {
                        method: method.to_string(),
                        detail: "assignment without targets".into(),
                    });
                }
                for target in targets {
                    Self::check_target(method, target)?;
                }
                Ok(())
            }
            Statement::AnnAssign { target, .. } => {
                Self::check_single_target(method, "annotated", target)
            }
            Statement::AugAssign { target, .. } => {
                Self::check_single_target(method, "augmented", target)
            }
            Statement::For { target, .. } => Self::check_target(method, target),
            Statement::Try {
                handlers,
                finalbody,
                ..
            } if handlers.is_empty() && finalbody.is_empty() => Err(AstError::MalformedTree(
                format!("try in '{}' has neither handlers nor finally", method),
            )),
            _ => Ok(()),
        }
    }

    fn check_single_target(method: &str, form: &str, target: &Expression) -> AstResult<()> {
        match target {
            Expression::Name { .. } | Expression::Attribute { .. } | Expression::Subscript { .. } => {
                Ok(())
            }
            other => Err(AstError::InvalidTarget {
                method: method.to_string(),
                detail: format!("{} {} target", form, other.kind_name()),
            }),
        }
    }

    fn check_target(method: &str, target: &Expression) -> AstResult<()> {
        match target {
            Expression::Name { .. } | Expression::Attribute { .. } | Expression::Subscript { .. } => {
                Ok(())
            }
            Expression::Starred { value } => Self::check_target(method, value),
            Expression::Tuple { elts } | Expression::List { elts } => {
                elts.iter().try_for_each(|e| Self::check_target(method, e))
            }
            other => Err(AstError::InvalidTarget {
                method: method.to_string(),
                detail: format!("{} expression", other.kind_name()),
            }),
        }
    }
}
