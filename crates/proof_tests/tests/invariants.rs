//! Tests for the quantified invariants named directly in the
//! specification: assumption discharge, universal generalization, no
//! silent capture, structural equality round-trip (provenance excluded),
//! and prover soundness.
//!
//! Soundness itself ("every kernel-minted proposition has a finite
//! derivation") is checked indirectly here by following each proven
//! proposition's `Provenance::Rule` chain back through the `ProofLog` to
//! confirm it bottoms out, rather than by re-deriving a separate finite
//! proof object the kernel does not otherwise expose.

use proof_base::Interner;
use proof_kernel::provenance::Provenance;
use proof_kernel::subst::substitute_prop;
use proof_kernel::term::Term;
use proof_kernel::{AssumptionStack, PropKind, ProofLog, Proposition};
use proof_search::prove;

fn atom(ix: &mut Interner, name: &str) -> Proposition {
    Proposition::atom(ix.intern(name), vec![])
}

/// Assumption discharge: closing a frame that assumed `A` and concluded
/// `P` leaves `A → P` proven in the enclosing scope, and `P` alone is not
/// independently proven by that closed frame.
#[test]
fn assumption_discharge_wraps_conclusion_in_implication() {
    let mut ix = Interner::new();
    let mut stack = AssumptionStack::new();
    let mut log = ProofLog::new();

    stack.open();
    let a = atom(&mut ix, "A");
    let assumed_a = stack.assume(a.clone()).unwrap();
    stack.conclude(&assumed_a).unwrap();
    let discharged = stack.close(&mut log).unwrap();

    assert_eq!(discharged.len(), 1);
    let wrapped = &discharged[0];
    assert!(wrapped.proven);
    match &wrapped.kind {
        PropKind::Implies(antecedent, consequent) => {
            assert_eq!(antecedent.kind, a.kind);
            assert_eq!(consequent.kind, a.kind);
        }
        other => panic!("expected Implies, got {other:?}"),
    }
    // The frame is gone; nothing about `A` being proven survives outside it.
    assert_eq!(stack.depth(), 0);
}

/// Universal generalization: a variable declared inside a closed frame
/// appears as the outermost `Forall` binder of the concluded proposition,
/// ahead of any implication wrapping from assumptions made in that frame.
#[test]
fn universal_generalization_wraps_outermost() {
    let mut ix = Interner::new();
    let mut stack = AssumptionStack::new();
    let mut log = ProofLog::new();

    stack.open();
    let v = ix.intern("v");
    let var_term = stack.declare_variable(v, Default::default()).unwrap();
    let assumed = stack.assume(atom(&mut ix, "Guard")).unwrap();
    let mut body = Proposition::atom(ix.intern("P"), vec![var_term]);
    body.proven = true;
    stack.conclude(&body).unwrap();
    let _ = assumed;
    let discharged = stack.close(&mut log).unwrap();

    match &discharged[0].kind {
        PropKind::Forall(bound, inner) => {
            assert_eq!(*bound, v);
            assert!(matches!(inner.kind, PropKind::Implies(_, _)));
        }
        other => panic!("expected outermost Forall, got {other:?}"),
    }
}

/// No silent capture: substituting a replacement term containing a free
/// variable `x` under a quantifier that binds `x` must rename the bound
/// variable rather than let `x` become captured.
#[test]
fn substitution_avoids_capturing_the_replacements_free_variable() {
    let mut ix = Interner::new();
    let x = ix.intern("x");
    let y = ix.intern("y");
    let p = ix.intern("P");

    // forall y. P(y, x)  [substitute y -> x]  would capture x if naive.
    let body = Proposition::atom(p, vec![Term::variable(y), Term::variable(x)]);
    let forall = Proposition::forall(y, body);
    let PropKind::Forall(bound, inner) = &forall.kind else {
        unreachable!()
    };

    let mut counter = 0;
    let substituted = substitute_prop(inner, *bound, &Term::variable(x), &mut ix, &mut counter);

    // The bound variable must have been renamed away from `x`: a
    // substitution result of literally `P(x, x)` would mean `x` got
    // captured by the (no longer present) binder.
    let PropKind::Atom(_, args) = &substituted.kind else {
        panic!("expected an atom");
    };
    let bound_arg = &args[0];
    let Term::Variable { name: bound_name, .. } = bound_arg else {
        panic!("expected a variable")
    };
    assert_ne!(*bound_name, x, "substitution silently captured the free variable");
}

/// Structural equality round-trip: `kind` drives `==`; `proven` /
/// `inference` / `is_assumption` do not, so two propositions with the same
/// shape but different proof states still compare equal.
#[test]
fn structural_equality_ignores_proof_state() {
    let mut ix = Interner::new();
    let unproven = atom(&mut ix, "P");
    let mut proven = unproven.clone();
    proven.proven = true;
    proven.inference = Provenance::Assumption;
    proven.is_assumption = true;

    assert_eq!(unproven, proven);
    assert_ne!(unproven.proven, proven.proven);
}

/// Prover soundness: whatever `prove` returns is structurally equal to the
/// goal and carries `proven = true`, and its provenance chain bottoms out
/// in the log rather than dangling.
#[test]
fn prover_result_matches_goal_and_is_proven() {
    let mut ix = Interner::new();
    let mut log = ProofLog::new();
    let mut a = atom(&mut ix, "A");
    a.proven = true;
    let goal = Proposition::implies(atom(&mut ix, "A"), atom(&mut ix, "A"));

    let result = prove(&[a], &goal, &proof_kernel::Config::default(), &mut log).unwrap();

    assert_eq!(result, goal);
    assert!(result.proven);

    // Soundness: the provenance chain is either a direct assumption/log
    // entry, or a rule application whose entry the log actually holds.
    match result.inference {
        Provenance::Rule(id) => {
            // `get` panics on a dangling index; reaching the assert below
            // is itself the proof the entry exists.
            let _entry = log.get(id);
        }
        Provenance::Assumption | Provenance::Oracle(_) => {}
        Provenance::None => panic!("a proven proposition must carry a derivation"),
    }
}

/// A failed proof search never mints a proposition: the error variant
/// carries no `Proposition`, so there is nothing for a caller to
/// mistakenly treat as proven.
#[test]
fn failed_search_never_yields_a_proven_proposition() {
    let mut ix = Interner::new();
    let mut log = ProofLog::new();
    let goal = atom(&mut ix, "Unsupported");
    let result = prove(&[], &goal, &proof_kernel::Config::default(), &mut log);
    assert!(result.is_err());
}
