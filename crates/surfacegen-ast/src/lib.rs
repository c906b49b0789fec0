//! # surfacegen-ast
//!
//! Syntax-tree model for client surface generation. A class is an ordered
//! sequence of methods; each method owns a tree of statements and
//! expressions. Trees are plain owned data: serializable to JSON for
//! interchange with an external parser and printer, rewritable through
//! [`fold::Fold`], and checked by [`TreeVerifier`] before a printer sees
//! them.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────┐
//! │                ClassDefinition                 │
//! │  ┌──────────────────┐  ┌──────────────────┐    │
//! │  │ MethodDefinition │  │ MethodDefinition │ …  │
//! │  │  params          │  └──────────────────┘    │
//! │  │  body: Statement │                          │
//! │  │   └ Expression   │                          │
//! │  └──────────────────┘                          │
//! ├────────────────────────────────────────────────┤
//! │  Fold (rewrite)  │  visit (read)  │  Verifier  │
//! └────────────────────────────────────────────────┘
//! ```

#![deny(unsafe_code)]

pub mod class;
pub mod error;
pub mod expr;
pub mod fold;
pub mod render;
pub mod stmt;
pub mod verifier;
pub mod visit;

// ── Re-exports ───────────────────────────────────────────────────────

pub use class::{ClassDefinition, MethodDefinition, ParamKind, Parameter};
pub use error::{AstError, AstResult};
pub use expr::{BinOpKind, BoolOpKind, CompareOp, Constant, Expression, Keyword, UnaryOpKind};
pub use fold::Fold;
pub use stmt::{ExceptHandler, Statement, WithItem};
pub use verifier::TreeVerifier;
