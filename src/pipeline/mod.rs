//! Pipeline stages for document-to-risk scoring.
//!
//! Each submodule implements exactly one transformation step and is
//! independently testable.
//!
//! ## Data Flow
//!
//! ```text
//! fetch ──▶ extract ──▶ parse ──▶ reconcile ──▶ assemble
//! (reqwest)  (lopdf)    (regex)   (schema)      (scorer)
//! ```
//!
//! 1. [`fetch`]    : download the document; the only stage with network I/O
//! 2. [`extract`]  : concatenate per-page text; runs in `spawn_blocking`
//! 3. [`parse`]    : scrape `'name': number` pairs into a sparse map
//! 4. [`reconcile`]: align the sparse map with the scorer's schema, filling
//!    gaps from the default template
//! 5. [`assemble`] : score the vector and package provenance
//!
//! Failures in stages 1–3 are absorbed by [`crate::predict::RiskPipeline`];
//! a failure in stage 5 is fatal.

pub mod assemble;
pub mod extract;
pub mod fetch;
pub mod parse;
pub mod reconcile;
