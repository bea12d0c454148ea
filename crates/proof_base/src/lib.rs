#![cfg_attr(docsrs, feature(doc_cfg))]

//! # proof-base
//!
//! The one structural atom the kernel and prover share: interned symbols.
//!
//! A proof object never touches source text — propositions and terms are
//! built directly by constructor calls, never parsed — so this crate is
//! smaller than a typical "base" crate in an ecosystem with a front end:
//! no arena (nothing here is parsed into a tree that needs bump-allocated
//! stable references), no source span (nothing here ever reports an error
//! against a byte offset). What's left is [`Interner`]/[`Symbol`], used for
//! atom names, variable names, and every other user-chosen identifier that
//! flows through `proof-kernel` and needs O(1) equality instead of string
//! comparison.
//!
//! # Design Principles
//!
//! This crate has no knowledge of propositional logic. It provides one
//! piece of generic, reusable infrastructure that `proof-kernel` builds
//! its `Term`/`Proposition` identifiers on top of.
//!
//! # Example
//!
//! ```
//! use proof_base::Interner;
//!
//! let mut interner = Interner::new();
//! let p = interner.intern("P");
//! let q = interner.intern("Q");
//! assert_ne!(p, q);
//! assert_eq!(interner.resolve(p), "P");
//! ```

pub mod intern;

pub use intern::{Interner, Symbol, SymbolEq};
