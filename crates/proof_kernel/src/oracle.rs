//! External oracles: the only place `proven` can be minted without an
//! inference rule.
//!
//! `by_inspection`, `by_eval`, and `by_simplification` are narrow trusted
//! interfaces. The kernel does not implement ground arithmetic, algebraic
//! normalization, or a theorem encyclopedia itself - those live in
//! collaborator crates this workspace treats as black boxes, reached only
//! through the [`Oracle`] trait. Keeping the trait's surface this small
//! makes every oracle implementation separately auditable: a caller can
//! swap in a stub that always refuses, or a real decision procedure,
//! without touching a single rule in [`crate::rules`].

use crate::error::{KernelError, KernelResult};
use crate::proposition::Proposition;
use crate::provenance::ProofLog;
use crate::rules::RuleName;

/// A trusted external decision procedure.
///
/// Every method returns `Some(true)` to mint the proposition as proven,
/// `Some(false)` to mint its negation is left to the caller (the oracle
/// itself never produces a proposition shape, only a verdict on the one
/// it's handed), or `None` when the oracle cannot decide at all.
pub trait Oracle {
    /// Decides a ground arithmetic/set proposition by direct inspection,
    /// e.g. `2 prime`, `¬(2 | 1)`.
    fn by_inspection(&self, prop: &Proposition) -> Option<bool>;

    /// Evaluates both sides of an equality (or ordering relation) via a
    /// trusted simplifier and reports whether the relation holds.
    fn by_eval(&self, prop: &Proposition) -> Option<bool>;

    /// Like [`Oracle::by_eval`] but may use algebraic identities of a known
    /// theory rather than pure evaluation.
    fn by_simplification(&self, prop: &Proposition) -> Option<bool>;
}

/// An oracle that never decides anything. Useful as a default when no
/// collaborator crate is wired in, or in tests that must not silently rely
/// on oracle output.
pub struct RefusingOracle;

impl Oracle for RefusingOracle {
    fn by_inspection(&self, _prop: &Proposition) -> Option<bool> {
        None
    }
    fn by_eval(&self, _prop: &Proposition) -> Option<bool> {
        None
    }
    fn by_simplification(&self, _prop: &Proposition) -> Option<bool> {
        None
    }
}

fn mint_from_oracle(
    prop: &Proposition,
    verdict: Option<bool>,
    rule: RuleName,
    log: &mut ProofLog,
) -> KernelResult<Proposition> {
    match verdict {
        Some(true) => {
            let mut minted = prop.unproven_copy();
            let id = log.record(rule, vec![]);
            minted.proven = true;
            minted.inference = crate::provenance::Provenance::Oracle(rule);
            let _ = id; // the oracle tag itself carries the rule; log kept for symmetry with rule-derived entries
            Ok(minted)
        }
        Some(false) => Err(KernelError::OracleRefused(format!(
            "{rule:?} determined the proposition is false"
        ))),
        None => Err(KernelError::OracleRefused(format!("{rule:?} could not decide"))),
    }
}

/// Asks the oracle to decide `prop` by direct inspection.
pub fn by_inspection(
    prop: &Proposition,
    oracle: &dyn Oracle,
    log: &mut ProofLog,
) -> KernelResult<Proposition> {
    let verdict = oracle.by_inspection(prop);
    mint_from_oracle(prop, verdict, RuleName::ByInspection, log)
}

/// Asks the oracle to decide `prop` by evaluation.
pub fn by_eval(prop: &Proposition, oracle: &dyn Oracle, log: &mut ProofLog) -> KernelResult<Proposition> {
    let verdict = oracle.by_eval(prop);
    mint_from_oracle(prop, verdict, RuleName::ByEval, log)
}

/// Asks the oracle to decide `prop` by algebraic simplification.
pub fn by_simplification(
    prop: &Proposition,
    oracle: &dyn Oracle,
    log: &mut ProofLog,
) -> KernelResult<Proposition> {
    let verdict = oracle.by_simplification(prop);
    mint_from_oracle(prop, verdict, RuleName::BySimplification, log)
}
