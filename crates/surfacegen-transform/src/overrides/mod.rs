//! Hand-authored rewrites for lifecycle methods.
//!
//! Each [`OverrideRule`] maps to exactly one rewrite function here; the
//! match in [`apply`] is exhaustive over the closed rule set.

pub mod construction;
pub mod shutdown;

use surfacegen_ast::MethodDefinition;

use crate::classify::OverrideRule;
use crate::error::TransformResult;
use crate::policy::TransformationPolicy;

pub use construction::{strip_transport_bindings, StrippedConstructor};
pub use shutdown::shutdown_template;

/// Replacement produced by an override rule.
#[derive(Clone, Debug, PartialEq)]
pub struct Overridden {
    pub method: MethodDefinition,
    /// Transport bindings removed from the original body.
    pub stripped: Vec<String>,
}

/// Apply `rule` to `method`, returning the replacement method.
pub fn apply(
    rule: OverrideRule,
    method: MethodDefinition,
    policy: &TransformationPolicy,
) -> TransformResult<Overridden> {
    match rule {
        OverrideRule::Construction => {
            let StrippedConstructor { method, removed } =
                strip_transport_bindings(method, policy)?;
            Ok(Overridden {
                method,
                stripped: removed,
            })
        }
        OverrideRule::Shutdown => Ok(Overridden {
            method: shutdown_template(),
            stripped: Vec::new(),
        }),
    }
}
