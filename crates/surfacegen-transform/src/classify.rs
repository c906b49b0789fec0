//! Method classification.
//!
//! Classification is a total function of `(method name, policy)`. The
//! precedence order is fixed: exclusion, then the override table, then
//! keep-sync, then conversion.

use serde::{Deserialize, Serialize};

use crate::policy::TransformationPolicy;

/// Name of the canonical constructor.
pub const CONSTRUCTOR: &str = "__init__";

/// Name of the canonical shutdown method.
pub const SHUTDOWN: &str = "close";

// ── Override Rules ───────────────────────────────────────────────────

/// Hand-authored rewrite for a lifecycle method.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OverrideRule {
    /// Strip non-blocking transport bindings from the constructor.
    Construction,
    /// Replace the shutdown method with the fail-soft template.
    Shutdown,
}

impl std::fmt::Display for OverrideRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Construction => write!(f, "construction"),
            Self::Shutdown => write!(f, "shutdown"),
        }
    }
}

/// The closed override table.
pub const OVERRIDE_RULES: [(&str, OverrideRule); 2] = [
    (CONSTRUCTOR, OverrideRule::Construction),
    (SHUTDOWN, OverrideRule::Shutdown),
];

/// Override rule registered for `name`, if any.
pub fn override_rule(name: &str) -> Option<OverrideRule> {
    OVERRIDE_RULES
        .iter()
        .find(|(rule_name, _)| *rule_name == name)
        .map(|(_, rule)| *rule)
}

// ── Classification ───────────────────────────────────────────────────

/// How a single method is treated in one generation run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MethodClassification {
    /// Omitted from the output.
    Excluded,
    /// Rewritten by [`OverrideRule::Construction`].
    ConstructionOverride,
    /// Replaced by [`OverrideRule::Shutdown`].
    ShutdownOverride,
    /// Passed through unmodified.
    KeptSync,
    /// Rewritten by the generic conversion engine.
    Converted,
}

impl MethodClassification {
    /// Whether the method appears in the output class.
    pub fn is_emitted(&self) -> bool {
        !matches!(self, Self::Excluded)
    }
}

impl From<OverrideRule> for MethodClassification {
    fn from(rule: OverrideRule) -> Self {
        match rule {
            OverrideRule::Construction => Self::ConstructionOverride,
            OverrideRule::Shutdown => Self::ShutdownOverride,
        }
    }
}

impl std::fmt::Display for MethodClassification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Excluded => write!(f, "excluded"),
            Self::ConstructionOverride => write!(f, "construction-override"),
            Self::ShutdownOverride => write!(f, "shutdown-override"),
            Self::KeptSync => write!(f, "kept-sync"),
            Self::Converted => write!(f, "converted"),
        }
    }
}

/// Classify a method by name under `policy`. First match wins.
pub fn classify(name: &str, policy: &TransformationPolicy) -> MethodClassification {
    if policy.is_excluded(name) {
        return MethodClassification::Excluded;
    }
    if let Some(rule) = override_rule(name) {
        return rule.into();
    }
    if policy.is_kept_sync(name) {
        return MethodClassification::KeptSync;
    }
    MethodClassification::Converted
}
