//! The kernel's error taxonomy.
//!
//! Every error is returned to the immediate caller; none are recovered
//! silently inside the kernel. Rule failures never mutate state: a
//! `RuleNotApplicable` leaves every input proposition exactly as it was.

use crate::rules::RuleName;
use std::fmt;

/// A structural precondition of a rule failed: wrong connective, unproven
/// input, arity mismatch. Carries the rule name and a human-readable reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleNotApplicable {
    pub rule: RuleName,
    pub reason: String,
}

/// The kernel's error taxonomy, returned by fallible kernel operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KernelError {
    /// A rule's structural precondition failed.
    RuleNotApplicable(RuleNotApplicable),
    /// A rule received an input whose `proven` flag was false.
    UnprovenInput { rule: RuleName, which: String },
    /// `close()` without `open()`, `conclude()` outside any frame, or a
    /// frame closed while it still owns references the enclosing frame
    /// needs.
    ContextMisuse(String),
    /// The backward prover exhausted its rule table for this goal.
    NoRuleApplies(String),
    /// `by_inspection` / `by_eval` / `by_simplification` could not decide.
    OracleRefused(String),
    /// A substitution would capture a free variable. Surfaces only as an
    /// internal invariant check - a well-behaved caller never triggers it.
    CaptureViolation { variable: String },
}

impl KernelError {
    pub fn rule_not_applicable(rule: RuleName, reason: impl Into<String>) -> KernelError {
        KernelError::RuleNotApplicable(RuleNotApplicable {
            rule,
            reason: reason.into(),
        })
    }

    pub fn unproven(rule: RuleName, which: impl Into<String>) -> KernelError {
        KernelError::UnprovenInput {
            rule,
            which: which.into(),
        }
    }
}

impl fmt::Display for KernelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KernelError::RuleNotApplicable(RuleNotApplicable { rule, reason }) => {
                write!(f, "rule {rule:?} not applicable: {reason}")
            }
            KernelError::UnprovenInput { rule, which } => {
                write!(f, "rule {rule:?} received unproven input: {which}")
            }
            KernelError::ContextMisuse(msg) => write!(f, "assumption context misuse: {msg}"),
            KernelError::NoRuleApplies(goal) => write!(f, "no rule applies to goal: {goal}"),
            KernelError::OracleRefused(msg) => write!(f, "oracle refused: {msg}"),
            KernelError::CaptureViolation { variable } => {
                write!(f, "substitution would capture free variable {variable}")
            }
        }
    }
}

impl std::error::Error for KernelError {}

/// Alias for `std::result::Result<T, KernelError>`.
pub type KernelResult<T> = std::result::Result<T, KernelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_rule_and_reason() {
        let err = KernelError::rule_not_applicable(RuleName::ModusPonens, "impl is not an Implies");
        let msg = format!("{err}");
        assert!(msg.contains("ModusPonens"));
        assert!(msg.contains("impl is not an Implies"));
    }
}
