#![cfg_attr(docsrs, feature(doc_cfg))]

//! The proof kernel: propositions, inference rules, and assumption
//! contexts.
//!
//! A proof is a proposition whose `proven` flag was set through a checked
//! derivation. This crate is the only place that flag can be set.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                        proof-search                       │
//! │         (backward prover - depends on this crate)         │
//! └───────────────────────────────────────────────────────────┘
//!                              │ calls only the public API below
//!                              ▼
//! ┌───────────────────────────────────────────────────────────┐
//! │                          context                           │
//! │     AssumptionStack: open/close/assume/conclude            │
//! └───────────────────────────────────────────────────────────┘
//!                              │
//!               ┌──────────────┴──────────────┐
//!               ▼                             ▼
//! ┌─────────────────────────┐   ┌─────────────────────────────┐
//! │         rules           │   │          oracle             │
//! │  the 18 checked rule    │   │  by_inspection / by_eval /   │
//! │  primitives of §4.2     │   │  by_simplification           │
//! └─────────────────────────┘   └─────────────────────────────┘
//!               │                             │
//!               ▼                             ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    proposition, term, subst                 │
//! │   the data model and capture-avoiding substitution/matching │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                          provenance                          │
//! │       append-only proof log; propositions hold indices      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Boundary invariant
//!
//! This crate has no path to the backward prover. Adding a new search
//! strategy in `proof-search` never triggers a recompile of the kernel: the
//! kernel exposes a fixed rule table and the prover is just another caller
//! of it, same as any other client.

pub mod config;
pub mod context;
pub mod error;
pub mod oracle;
pub mod proposition;
pub mod provenance;
pub mod rules;
pub mod subst;
pub mod term;

pub use config::{ComparisonOutput, Config};
pub use context::{AssumptionStack, FrameGuard};
pub use error::{KernelError, KernelResult};
pub use oracle::Oracle;
pub use proposition::{PropKind, Proposition};
pub use provenance::{EntryId, ProofLog, Provenance, ProvenanceEntry};
pub use rules::{RuleName, Side};
pub use term::{Attributes, Op, Term, Tri};
