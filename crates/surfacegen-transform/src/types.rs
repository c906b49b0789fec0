//! Core types for generation runs.
//!
//! Defines run identifiers, per-method outcomes, summaries, and the
//! output bundle handed to the printer.

use serde::{Deserialize, Serialize};
use surfacegen_ast::ClassDefinition;

use crate::classify::MethodClassification;

// ── Identifiers ──────────────────────────────────────────────────────

/// Unique identifier for a generation run.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GenerationId(pub String);

impl GenerationId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl Default for GenerationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for GenerationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "gen:{}", self.0)
    }
}

// ── Method Outcome ───────────────────────────────────────────────────

/// Classification applied to one input method.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodOutcome {
    pub name: String,
    pub classification: MethodClassification,
}

// ── Summary ──────────────────────────────────────────────────────────

/// Counts for one generation run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationSummary {
    pub total_methods: usize,
    pub excluded: usize,
    pub overridden: usize,
    pub kept_sync: usize,
    pub converted: usize,
    pub awaited_calls: usize,
    pub renamed_calls: usize,
    pub stripped_bindings: usize,
}

impl GenerationSummary {
    pub(crate) fn record(&mut self, classification: MethodClassification) {
        self.total_methods += 1;
        match classification {
            MethodClassification::Excluded => self.excluded += 1,
            MethodClassification::ConstructionOverride
            | MethodClassification::ShutdownOverride => self.overridden += 1,
            MethodClassification::KeptSync => self.kept_sync += 1,
            MethodClassification::Converted => self.converted += 1,
        }
    }

    /// Number of methods present in the output class.
    pub fn emitted(&self) -> usize {
        self.total_methods - self.excluded
    }
}

impl std::fmt::Display for GenerationSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Generation(methods={}, excluded={}, overridden={}, kept_sync={}, converted={}, awaited_calls={})",
            self.total_methods,
            self.excluded,
            self.overridden,
            self.kept_sync,
            self.converted,
            self.awaited_calls,
        )
    }
}

// ── Output ───────────────────────────────────────────────────────────

/// Result of a successful generation run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GenerationOutput {
    pub id: GenerationId,
    /// The derived class, verified well-formed.
    pub class: ClassDefinition,
    /// One entry per input method, in input order.
    pub classifications: Vec<MethodOutcome>,
    pub summary: GenerationSummary,
    /// BLAKE3 hex digest of the output class's JSON form.
    pub content_hash: String,
    pub generated_at: chrono::DateTime<chrono::Utc>,
}

impl GenerationOutput {
    /// Classification applied to the input method `name`.
    pub fn classification_of(&self, name: &str) -> Option<MethodClassification> {
        self.classifications
            .iter()
            .find(|o| o.name == name)
            .map(|o| o.classification)
    }

    /// Hash of a class's JSON form, used for drift detection between runs.
    pub fn compute_hash(class: &ClassDefinition) -> Result<String, serde_json::Error> {
        let bytes = serde_json::to_vec(class)?;
        Ok(blake3::hash(&bytes).to_hex().to_string())
    }

    /// Whether `content_hash` still matches the class.
    pub fn verify_hash(&self) -> bool {
        Self::compute_hash(&self.class)
            .map(|h| h == self.content_hash)
            .unwrap_or(false)
    }
}
