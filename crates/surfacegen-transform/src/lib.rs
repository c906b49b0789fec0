//! # surfacegen-transform
//!
//! Derives a non-blocking client class from its blocking counterpart.
//! A declarative [`TransformationPolicy`] says which methods convert,
//! which stay blocking, and which are dropped; two lifecycle methods,
//! the constructor and `close`, are handled by fixed override rules.
//!
//! ## Pipeline
//!
//! ```text
//!  ClassDefinition (blocking)
//!          │
//!          ▼
//!  ┌────────────────┐   ┌──────────────────────┐
//!  │  TreeVerifier  │   │ TransformationPolicy │
//!  └───────┬────────┘   └──────────┬───────────┘
//!          ▼                       │
//!  ┌────────────────┐◄─────────────┘
//!  │    classify    │  Excluded > overrides > KeptSync > Converted
//!  └───────┬────────┘
//!          ├── Excluded ─────────────► (dropped)
//!          ├── Construction/Shutdown ► overrides::apply
//!          ├── KeptSync ─────────────► (unchanged)
//!          └── Converted ────────────► AsyncRewriter
//!          ▼
//!  ┌────────────────┐
//!  │  TreeVerifier  │ → GenerationOutput (class, summary, hash)
//!  └────────────────┘
//! ```
//!
//! [`ShutdownSimulator`] executes a generated `close` against a scripted
//! client to check its fail-soft behavior.

#![deny(unsafe_code)]

pub mod classify;
pub mod driver;
pub mod error;
pub mod overrides;
pub mod policy;
pub mod rewrite;
pub mod simulate;
pub mod types;

// ── Re-exports ───────────────────────────────────────────────────────

pub use classify::{classify, override_rule, MethodClassification, OverrideRule};
pub use driver::AsyncSurfaceGenerator;
pub use error::{TransformError, TransformResult};
pub use overrides::{shutdown_template, strip_transport_bindings, Overridden};
pub use policy::TransformationPolicy;
pub use rewrite::{AsyncRewriter, Conversion};
pub use simulate::{ChannelState, CloseOutcome, ShutdownSimulator, SimulatedClient, SimulationReport};
pub use types::{GenerationId, GenerationOutput, GenerationSummary, MethodOutcome};
