//! The backward proof-search engine: a goal-directed depth-first prover
//! over the propositional and first-order fragment the kernel checks.
//!
//! This crate never mints a proven proposition itself. Every step of a
//! search is a call into [`proof_kernel::rules`], [`proof_kernel::context`],
//! or [`proof_kernel::oracle`] - `proof-search` only decides *which* checked
//! primitive to try next and *backtracks* when one fails. Adding a search
//! heuristic here never requires touching the kernel's rule table.

pub mod search;

pub use search::{prove, prove_with_depth, BackwardProver};
