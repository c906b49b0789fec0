//! Generation driver.
//!
//! `AsyncSurfaceGenerator` runs the whole derivation in one linear pass:
//! verify input → classify each method → apply its rule → rename the
//! class → verify output → hash. A fault at any step aborts the run and
//! no partial class is returned.

use surfacegen_ast::{AstError, ClassDefinition, TreeVerifier};
use tracing::{debug, info, warn};

use crate::classify::{classify, override_rule, MethodClassification};
use crate::error::{TransformError, TransformResult};
use crate::overrides;
use crate::policy::TransformationPolicy;
use crate::rewrite::AsyncRewriter;
use crate::types::{GenerationId, GenerationOutput, GenerationSummary, MethodOutcome};

// ── Generator ────────────────────────────────────────────────────────

/// Derives the non-blocking class from the blocking one.
pub struct AsyncSurfaceGenerator {
    policy: TransformationPolicy,
}

impl AsyncSurfaceGenerator {
    pub fn new(policy: TransformationPolicy) -> Self {
        Self { policy }
    }

    /// Access the policy driving this generator.
    pub fn policy(&self) -> &TransformationPolicy {
        &self.policy
    }

    /// Derive the non-blocking counterpart of `input`.
    pub fn generate(&self, input: &ClassDefinition) -> TransformResult<GenerationOutput> {
        self.policy.validate()?;

        // Step 1: Input must be well-formed
        let input_warnings = TreeVerifier::verify(input).map_err(TransformError::InvalidInput)?;
        for warning in &input_warnings {
            warn!(class = %input.name, warning = %warning, "Input tree warning");
        }

        // Step 2: Classify and rewrite, one method at a time
        let id = GenerationId::new();
        let rewriter = AsyncRewriter::new(&self.policy);
        let mut summary = GenerationSummary::default();
        let mut classifications = Vec::with_capacity(input.method_count());
        let mut methods = Vec::with_capacity(input.method_count());

        for method in &input.methods {
            let classification = classify(&method.name, &self.policy);
            debug!(
                generation = %id,
                method = %method.name,
                classification = %classification,
                "Classified method"
            );
            summary.record(classification);
            classifications.push(MethodOutcome {
                name: method.name.clone(),
                classification,
            });

            match classification {
                MethodClassification::Excluded => {}
                MethodClassification::ConstructionOverride
                | MethodClassification::ShutdownOverride => {
                    let rule = override_rule(&method.name).ok_or_else(|| {
                        TransformError::UnmatchedOverride {
                            method: method.name.clone(),
                            reason: "no override rule registered".into(),
                        }
                    })?;
                    let overridden = overrides::apply(rule, method.clone(), &self.policy)?;
                    summary.stripped_bindings += overridden.stripped.len();
                    methods.push(overridden.method);
                }
                MethodClassification::KeptSync => methods.push(method.clone()),
                MethodClassification::Converted => {
                    let conversion = rewriter.convert(method.clone())?;
                    summary.awaited_calls += conversion.awaited_calls;
                    summary.renamed_calls += conversion.renamed_calls;
                    methods.push(conversion.method);
                }
            }
        }

        // Step 3: Assemble the output class
        let class = ClassDefinition {
            name: self.rename(&input.name),
            bases: input.bases.iter().map(|b| self.rename(b)).collect(),
            methods,
        };

        // Step 4: Output must be well-formed too
        TreeVerifier::verify(&class).map_err(TransformError::InvalidOutput)?;

        let content_hash = GenerationOutput::compute_hash(&class).map_err(|e| {
            TransformError::InvalidOutput(AstError::SerializationFailed(e.to_string()))
        })?;

        info!(
            generation = %id,
            input = %input.name,
            output = %class.name,
            methods = input.method_count(),
            emitted = class.method_count(),
            excluded = summary.excluded,
            converted = summary.converted,
            awaited_calls = summary.awaited_calls,
            "Generated non-blocking surface"
        );

        Ok(GenerationOutput {
            id,
            class,
            classifications,
            summary,
            content_hash,
            generated_at: chrono::Utc::now(),
        })
    }

    fn rename(&self, name: &str) -> String {
        self.policy
            .renamed_class(name)
            .unwrap_or(name)
            .to_string()
    }
}
