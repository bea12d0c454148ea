//! The checked inference-rule primitives.
//!
//! Every rule is a free function dispatching on `PropKind` by exhaustive
//! pattern matching rather than a method on a dynamically-dispatched trait
//! object: the dozens of rule "methods" described by the source design
//! become one function per rule, all operating on the single `Proposition`
//! sum type. Each rule checks its inputs' `proven` flags and structural
//! preconditions; on violation it returns `RuleNotApplicable` or
//! `UnprovenInput` and leaves every input untouched.

use crate::error::{KernelError, KernelResult};
use crate::proposition::{PropKind, Proposition};
use crate::provenance::{EntryId, ProofLog, Provenance};
use crate::subst;
use crate::term::Term;
use proof_base::Symbol;

/// Identifies which rule produced a [`crate::provenance::ProvenanceEntry`].
/// Also doubles as the oracle tag for facts minted outside the rule table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleName {
    ModusPonens,
    ModusTollens,
    AndIntro,
    OrIntro,
    ByCases,
    HypotheticalSyllogism,
    Contrapositive,
    IffForward,
    IffBackward,
    Resolve,
    UnitResolve,
    DeMorgan,
    UniversalInstantiation,
    ExistentialIntroduction,
    ExistentialElimination,
    Substitute,
    Contradicts,
    ExFalso,
    DoubleNegationElimination,
    NegationIntroduction,
    CloseAssumptionsContext,
    ByInspection,
    ByEval,
    BySimplification,
}

/// Which side of a proven equality to rewrite with in [`substitute`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

fn mint(kind: PropKind, log: &mut ProofLog, rule: RuleName, inputs: Vec<EntryId>) -> Proposition {
    let id = log.record(rule, inputs);
    log::trace!("{rule:?} minted {id:?}");
    Proposition {
        kind,
        proven: true,
        inference: Provenance::Rule(id),
        is_assumption: false,
    }
}

fn require_proven(p: &Proposition, rule: RuleName, which: &str) -> KernelResult<()> {
    if p.proven {
        Ok(())
    } else {
        Err(KernelError::unproven(rule, which))
    }
}

fn not_applicable(rule: RuleName, reason: impl Into<String>) -> KernelError {
    KernelError::rule_not_applicable(rule, reason)
}

fn entry_of(p: &Proposition) -> Vec<EntryId> {
    match p.inference {
        Provenance::Rule(id) => vec![id],
        _ => vec![],
    }
}

/// `self = A` proven, `impl_ = A → B` proven, yields `B`.
pub fn modus_ponens(self_: &Proposition, impl_: &Proposition, log: &mut ProofLog) -> KernelResult<Proposition> {
    require_proven(self_, RuleName::ModusPonens, "self")?;
    require_proven(impl_, RuleName::ModusPonens, "impl")?;
    let PropKind::Implies(a, b) = &impl_.kind else {
        return Err(not_applicable(RuleName::ModusPonens, "impl is not an Implies"));
    };
    if a.kind != self_.kind {
        return Err(not_applicable(RuleName::ModusPonens, "self does not match antecedent"));
    }
    let mut inputs = entry_of(self_);
    inputs.extend(entry_of(impl_));
    Ok(mint((**b).kind.clone(), log, RuleName::ModusPonens, inputs))
}

/// `self = ¬B` proven, `impl_ = A → B` proven, yields `¬A`.
pub fn modus_tollens(self_: &Proposition, impl_: &Proposition, log: &mut ProofLog) -> KernelResult<Proposition> {
    require_proven(self_, RuleName::ModusTollens, "self")?;
    require_proven(impl_, RuleName::ModusTollens, "impl")?;
    let PropKind::Not(not_b) = &self_.kind else {
        return Err(not_applicable(RuleName::ModusTollens, "self is not a negation"));
    };
    let PropKind::Implies(a, b) = &impl_.kind else {
        return Err(not_applicable(RuleName::ModusTollens, "impl is not an Implies"));
    };
    if not_b.kind != b.kind {
        return Err(not_applicable(RuleName::ModusTollens, "negated consequent does not match"));
    }
    let mut inputs = entry_of(self_);
    inputs.extend(entry_of(impl_));
    Ok(mint(PropKind::Not(a.clone()), log, RuleName::ModusTollens, inputs))
}

/// Every conjunct must be proven; yields their conjunction in argument order.
pub fn and_(conjuncts: &[Proposition], log: &mut ProofLog) -> KernelResult<Proposition> {
    if conjuncts.is_empty() {
        return Err(not_applicable(RuleName::AndIntro, "no conjuncts supplied"));
    }
    let mut inputs = Vec::new();
    for (i, c) in conjuncts.iter().enumerate() {
        require_proven(c, RuleName::AndIntro, &format!("conjunct {i}"))?;
        inputs.extend(entry_of(c));
    }
    Ok(mint(
        PropKind::And(conjuncts.iter().map(|p| p.unproven_copy()).collect()),
        log,
        RuleName::AndIntro,
        inputs,
    ))
}

/// `self` proven, introduces a disjunction `self ∨ others...`. The other
/// disjuncts need not be proven - this is introduction, not elimination.
pub fn or_(self_: &Proposition, others: &[Proposition], log: &mut ProofLog) -> KernelResult<Proposition> {
    require_proven(self_, RuleName::OrIntro, "self")?;
    let mut disjuncts = vec![self_.unproven_copy()];
    disjuncts.extend(others.iter().map(|p| p.unproven_copy()));
    let inputs = entry_of(self_);
    Ok(mint(PropKind::Or(disjuncts), log, RuleName::OrIntro, inputs))
}

/// Like [`or_`] but slots the proof into `shape[index]` rather than always
/// leading - used by the backward prover, which may find a proof for any one
/// disjunct of a goal whose disjuncts were given in a fixed order.
pub fn or_intro_at(
    shape: &[Proposition],
    index: usize,
    proof: &Proposition,
    log: &mut ProofLog,
) -> KernelResult<Proposition> {
    require_proven(proof, RuleName::OrIntro, "selected disjunct")?;
    match shape.get(index) {
        Some(d) if d.kind == proof.kind => {}
        _ => return Err(not_applicable(RuleName::OrIntro, "proof does not match the disjunct at this position")),
    }
    let disjuncts = shape.iter().map(|d| d.unproven_copy()).collect();
    let inputs = entry_of(proof);
    Ok(mint(PropKind::Or(disjuncts), log, RuleName::OrIntro, inputs))
}

/// `disj = A1 ∨ ... ∨ An` proven, each `impls[i] = Ai → C` proven, all with
/// the same conclusion `C`; yields `C`.
pub fn by_cases(disj: &Proposition, impls: &[Proposition], log: &mut ProofLog) -> KernelResult<Proposition> {
    require_proven(disj, RuleName::ByCases, "disjunction")?;
    let PropKind::Or(disjuncts) = &disj.kind else {
        return Err(not_applicable(RuleName::ByCases, "first argument is not a disjunction"));
    };
    if disjuncts.len() != impls.len() {
        return Err(not_applicable(RuleName::ByCases, "one implication is required per disjunct"));
    }
    let mut conclusion: Option<&Proposition> = None;
    let mut inputs = entry_of(disj);
    for (i, (disjunct, imp)) in disjuncts.iter().zip(impls).enumerate() {
        require_proven(imp, RuleName::ByCases, &format!("implication {i}"))?;
        let PropKind::Implies(a, c) = &imp.kind else {
            return Err(not_applicable(RuleName::ByCases, "each case must be an Implies"));
        };
        if a.kind != disjunct.kind {
            return Err(not_applicable(RuleName::ByCases, "case antecedent does not match disjunct"));
        }
        match conclusion {
            None => conclusion = Some(c),
            Some(existing) => {
                if existing.kind != c.kind {
                    return Err(not_applicable(RuleName::ByCases, "cases do not share a conclusion"));
                }
            }
        }
        inputs.extend(entry_of(imp));
    }
    let conclusion = conclusion.expect("non-empty impls checked above").unproven_copy();
    Ok(mint(conclusion.kind, log, RuleName::ByCases, inputs))
}

/// `ab = A → B`, `bc = B → C`, both proven; yields `A → C`.
pub fn hypothetical_syllogism(ab: &Proposition, bc: &Proposition, log: &mut ProofLog) -> KernelResult<Proposition> {
    require_proven(ab, RuleName::HypotheticalSyllogism, "A -> B")?;
    require_proven(bc, RuleName::HypotheticalSyllogism, "B -> C")?;
    let PropKind::Implies(a, b1) = &ab.kind else {
        return Err(not_applicable(RuleName::HypotheticalSyllogism, "first argument is not an Implies"));
    };
    let PropKind::Implies(b2, c) = &bc.kind else {
        return Err(not_applicable(RuleName::HypotheticalSyllogism, "second argument is not an Implies"));
    };
    if b1.kind != b2.kind {
        return Err(not_applicable(RuleName::HypotheticalSyllogism, "middle terms do not match"));
    }
    let mut inputs = entry_of(ab);
    inputs.extend(entry_of(bc));
    Ok(mint(
        PropKind::Implies(a.clone(), c.clone()),
        log,
        RuleName::HypotheticalSyllogism,
        inputs,
    ))
}

/// `ab = A → B` proven; yields `¬B → ¬A`.
pub fn contrapositive(ab: &Proposition, log: &mut ProofLog) -> KernelResult<Proposition> {
    require_proven(ab, RuleName::Contrapositive, "A -> B")?;
    let PropKind::Implies(a, b) = &ab.kind else {
        return Err(not_applicable(RuleName::Contrapositive, "argument is not an Implies"));
    };
    let inputs = entry_of(ab);
    Ok(mint(
        PropKind::Implies(
            Box::new(Proposition::new(PropKind::Not(b.clone()))),
            Box::new(Proposition::new(PropKind::Not(a.clone()))),
        ),
        log,
        RuleName::Contrapositive,
        inputs,
    ))
}

/// `iff = A ↔ B` proven; yields `A → B`.
pub fn iff_forward(iff: &Proposition, log: &mut ProofLog) -> KernelResult<Proposition> {
    require_proven(iff, RuleName::IffForward, "A <-> B")?;
    let PropKind::Iff(a, b) = &iff.kind else {
        return Err(not_applicable(RuleName::IffForward, "argument is not an Iff"));
    };
    let inputs = entry_of(iff);
    Ok(mint(PropKind::Implies(a.clone(), b.clone()), log, RuleName::IffForward, inputs))
}

/// `iff = A ↔ B` proven; yields `B → A`.
pub fn iff_backward(iff: &Proposition, log: &mut ProofLog) -> KernelResult<Proposition> {
    require_proven(iff, RuleName::IffBackward, "A <-> B")?;
    let PropKind::Iff(a, b) = &iff.kind else {
        return Err(not_applicable(RuleName::IffBackward, "argument is not an Iff"));
    };
    let inputs = entry_of(iff);
    Ok(mint(PropKind::Implies(b.clone(), a.clone()), log, RuleName::IffBackward, inputs))
}

/// Classical resolution: `p = A ∨ B`, `q = ¬A ∨ C`, both proven; yields `B ∨ C`.
pub fn resolve(p: &Proposition, q: &Proposition, log: &mut ProofLog) -> KernelResult<Proposition> {
    require_proven(p, RuleName::Resolve, "A or B")?;
    require_proven(q, RuleName::Resolve, "not-A or C")?;
    let PropKind::Or(ps) = &p.kind else {
        return Err(not_applicable(RuleName::Resolve, "first argument is not a disjunction"));
    };
    let PropKind::Or(qs) = &q.kind else {
        return Err(not_applicable(RuleName::Resolve, "second argument is not a disjunction"));
    };
    if ps.len() != 2 || qs.len() != 2 {
        return Err(not_applicable(RuleName::Resolve, "resolve expects binary disjunctions"));
    }
    let (a, b) = (&ps[0], &ps[1]);
    let (not_a, c) = (&qs[0], &qs[1]);
    let PropKind::Not(inner) = &not_a.kind else {
        return Err(not_applicable(RuleName::Resolve, "second disjunction must lead with a negation"));
    };
    if inner.kind != a.kind {
        return Err(not_applicable(RuleName::Resolve, "negated literal does not match"));
    }
    let inputs = [entry_of(p), entry_of(q)].concat();
    Ok(mint(
        PropKind::Or(vec![b.unproven_copy(), c.unproven_copy()]),
        log,
        RuleName::Resolve,
        inputs,
    ))
}

/// `p = A ∨ B`, `not_a = ¬A`, both proven; yields `B`.
pub fn unit_resolve(p: &Proposition, not_a: &Proposition, log: &mut ProofLog) -> KernelResult<Proposition> {
    require_proven(p, RuleName::UnitResolve, "A or B")?;
    require_proven(not_a, RuleName::UnitResolve, "not-A")?;
    let PropKind::Or(ps) = &p.kind else {
        return Err(not_applicable(RuleName::UnitResolve, "first argument is not a disjunction"));
    };
    let PropKind::Not(a) = &not_a.kind else {
        return Err(not_applicable(RuleName::UnitResolve, "second argument is not a negation"));
    };
    let matching_index = ps.iter().position(|d| d.kind == a.kind);
    let Some(idx) = matching_index else {
        return Err(not_applicable(RuleName::UnitResolve, "negation does not match any disjunct"));
    };
    let remaining: Vec<Proposition> = ps
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != idx)
        .map(|(_, d)| d.unproven_copy())
        .collect();
    let inputs = [entry_of(p), entry_of(not_a)].concat();
    let result_kind = if remaining.len() == 1 {
        remaining.into_iter().next().unwrap().kind
    } else {
        PropKind::Or(remaining)
    };
    Ok(mint(result_kind, log, RuleName::UnitResolve, inputs))
}

/// De Morgan normalization: pushes every negation in `p` as far toward the
/// leaves as it will go (De Morgan normal form), recursing through `And`/
/// `Or`/`Implies`/`Iff`/quantifiers along the way. `p` must already be
/// proven; the result is logically equivalent so its proof status transfers
/// as a single step.
///
/// `¬(A∧B) → ¬A∨¬B` and `¬(A→B) → A∧¬B` require excluded middle and only
/// fire when `classical` is true; `¬(A∨B) → ¬A∧¬B` is intuitionistically
/// valid unconditionally.
pub fn de_morgan(p: &Proposition, classical: bool, log: &mut ProofLog) -> KernelResult<Proposition> {
    require_proven(p, RuleName::DeMorgan, "self")?;
    let dual = de_morgan_dual(&p.kind, classical)
        .ok_or_else(|| not_applicable(RuleName::DeMorgan, "already in De Morgan normal form"))?;
    let inputs = entry_of(p);
    Ok(mint(dual, log, RuleName::DeMorgan, inputs))
}

/// Returns the De Morgan normal form of `kind`, or `None` if pushing
/// negations inward would not change it at all.
pub fn de_morgan_dual(kind: &PropKind, classical: bool) -> Option<PropKind> {
    let pushed = push_negations(kind, classical);
    if &pushed == kind {
        None
    } else {
        Some(pushed)
    }
}

/// Recursively rebuilds `kind` with every negation pushed toward its atoms.
fn push_negations(kind: &PropKind, classical: bool) -> PropKind {
    use PropKind::*;
    match kind {
        Not(inner) => negate(&inner.kind, classical),
        And(ps) => And(push_each(ps, classical)),
        Or(ps) => Or(push_each(ps, classical)),
        ExOr(ps) => ExOr(push_each(ps, classical)),
        Implies(a, b) => Implies(
            Box::new(Proposition::new(push_negations(&a.kind, classical))),
            Box::new(Proposition::new(push_negations(&b.kind, classical))),
        ),
        Iff(a, b) => Iff(
            Box::new(Proposition::new(push_negations(&a.kind, classical))),
            Box::new(Proposition::new(push_negations(&b.kind, classical))),
        ),
        Forall(v, body) => Forall(*v, Box::new(Proposition::new(push_negations(&body.kind, classical)))),
        Exists(v, body) => Exists(*v, Box::new(Proposition::new(push_negations(&body.kind, classical)))),
        other => other.clone(),
    }
}

fn push_each(ps: &[Proposition], classical: bool) -> Vec<Proposition> {
    ps.iter()
        .map(|p| Proposition::new(push_negations(&p.kind, classical)))
        .collect()
}

/// Computes the De Morgan normal form of `¬kind`.
fn negate(kind: &PropKind, classical: bool) -> PropKind {
    use PropKind::*;
    match kind {
        // ¬¬A -> A requires excluded middle; left as a double negation
        // otherwise, with its interior still pushed.
        Not(inner) if classical => push_negations(&inner.kind, classical),
        And(ps) if classical => Or(ps.iter().map(|p| Proposition::new(negate(&p.kind, classical))).collect()),
        Or(ps) => And(ps.iter().map(|p| Proposition::new(negate(&p.kind, classical))).collect()),
        Implies(a, b) if classical => And(vec![
            Proposition::new(push_negations(&a.kind, classical)),
            Proposition::new(negate(&b.kind, classical)),
        ]),
        other => Not(Box::new(Proposition::new(push_negations(other, classical)))),
    }
}

/// `forall = ∀v. P(v)` proven, term `t`; yields `P(t)`.
///
/// `ix`/`fresh_counter` must be the caller's real interner and a persistent
/// rename counter, not freshly-constructed ones: substitution may need to
/// rename a bound variable nested inside `body` to avoid capturing a free
/// variable of `t`, and that rename resolves symbols that only exist in
/// whichever interner originally minted them.
pub fn universal_instantiation(
    forall: &Proposition,
    t: &Term,
    ix: &mut proof_base::Interner,
    fresh_counter: &mut u32,
    log: &mut ProofLog,
) -> KernelResult<Proposition> {
    require_proven(forall, RuleName::UniversalInstantiation, "forall")?;
    let PropKind::Forall(v, body) = &forall.kind else {
        return Err(not_applicable(RuleName::UniversalInstantiation, "argument is not a Forall"));
    };
    let instantiated = subst::substitute_prop(body, *v, t, ix, fresh_counter);
    let inputs = entry_of(forall);
    Ok(mint(instantiated.kind, log, RuleName::UniversalInstantiation, inputs))
}

/// `instance` proven `P(t)` for some witness `t`; `target = ∃v. P(v)` names
/// the quantified shape to mint. The witness is recovered implicitly by
/// matching `instance` against `target`'s body with `v` free.
pub fn existential_introduction(
    instance: &Proposition,
    target: &Proposition,
    log: &mut ProofLog,
) -> KernelResult<Proposition> {
    require_proven(instance, RuleName::ExistentialIntroduction, "witness instance")?;
    let PropKind::Exists(v, body) = &target.kind else {
        return Err(not_applicable(RuleName::ExistentialIntroduction, "target is not an Exists"));
    };
    if subst::match_prop(body, *v, instance).is_none() {
        return Err(not_applicable(
            RuleName::ExistentialIntroduction,
            "instance does not match the existential body for any witness",
        ));
    }
    let inputs = entry_of(instance);
    Ok(mint(target.kind.clone(), log, RuleName::ExistentialIntroduction, inputs))
}

/// Outcome of eliminating an existential: a fresh variable and the assumed
/// instance proposition `P(w)`. The caller is responsible for opening a
/// frame before calling this and recording `assumed` via `assume()`.
pub struct ExistentialWitness {
    pub variable: Symbol,
    pub assumed: PropKind,
}

/// `exists = ∃v. P(v)` proven; yields a fresh variable `w` and the shape of
/// `P(w)`, ready to be opened as an assumption in a new frame.
///
/// `ix`/`fresh_counter` must be the caller's real interner and a persistent
/// rename counter; see [`universal_instantiation`] for why a freshly
/// constructed interner cannot be substituted in their place.
pub fn existential_elimination(
    exists: &Proposition,
    fresh: Symbol,
    ix: &mut proof_base::Interner,
    fresh_counter: &mut u32,
) -> KernelResult<ExistentialWitness> {
    if !exists.proven {
        return Err(KernelError::unproven(RuleName::ExistentialElimination, "exists"));
    }
    let PropKind::Exists(v, body) = &exists.kind else {
        return Err(not_applicable(RuleName::ExistentialElimination, "argument is not an Exists"));
    };
    let witness_body = subst::substitute_prop(body, *v, &Term::variable(fresh), ix, fresh_counter);
    Ok(ExistentialWitness {
        variable: fresh,
        assumed: witness_body.kind,
    })
}

/// `self` proven, `eq = a = b` proven; yields `self` with one side of `eq`
/// rewritten to the other.
pub fn substitute(self_: &Proposition, eq: &Proposition, side: Side, log: &mut ProofLog) -> KernelResult<Proposition> {
    require_proven(self_, RuleName::Substitute, "self")?;
    require_proven(eq, RuleName::Substitute, "equality")?;
    let PropKind::Equals(a, b) = &eq.kind else {
        return Err(not_applicable(RuleName::Substitute, "second argument is not an Equals"));
    };
    let (from, to) = match side {
        Side::Left => (a, b),
        Side::Right => (b, a),
    };
    let rewritten = subst::replace_term_in_prop(self_, from, to);
    let inputs = [entry_of(self_), entry_of(eq)].concat();
    Ok(mint(rewritten.kind, log, RuleName::Substitute, inputs))
}

/// `self = p` proven, `other = ¬p` proven (in either order); yields `⊥`.
pub fn contradicts(self_: &Proposition, other: &Proposition, log: &mut ProofLog) -> KernelResult<Proposition> {
    require_proven(self_, RuleName::Contradicts, "self")?;
    require_proven(other, RuleName::Contradicts, "other")?;
    let matches = match &other.kind {
        PropKind::Not(inner) => inner.kind == self_.kind,
        _ => match &self_.kind {
            PropKind::Not(inner) => inner.kind == other.kind,
            _ => false,
        },
    };
    if !matches {
        return Err(not_applicable(RuleName::Contradicts, "propositions are not direct negations"));
    }
    let inputs = [entry_of(self_), entry_of(other)].concat();
    Ok(mint(PropKind::Contradiction, log, RuleName::Contradicts, inputs))
}

/// `self = ⊥` proven; yields any target proposition, proven.
pub fn ex_falso(self_: &Proposition, target: &Proposition, log: &mut ProofLog) -> KernelResult<Proposition> {
    require_proven(self_, RuleName::ExFalso, "contradiction")?;
    if self_.kind != PropKind::Contradiction {
        return Err(not_applicable(RuleName::ExFalso, "self is not Contradiction"));
    }
    let inputs = entry_of(self_);
    Ok(mint(target.kind.clone(), log, RuleName::ExFalso, inputs))
}

/// `discharge = A → ⊥` proven (typically the output of closing a frame that
/// assumed `A` and derived `Contradiction`); yields `¬A`. This is the
/// negation-introduction step a proof-by-contradiction search performs
/// after discharging its assumption, reinterpreting `A → ⊥` as `¬A`.
pub fn negation_introduction(discharge: &Proposition, log: &mut ProofLog) -> KernelResult<Proposition> {
    require_proven(discharge, RuleName::NegationIntroduction, "self")?;
    let PropKind::Implies(a, consequent) = &discharge.kind else {
        return Err(not_applicable(RuleName::NegationIntroduction, "self is not an Implies"));
    };
    if consequent.kind != PropKind::Contradiction {
        return Err(not_applicable(RuleName::NegationIntroduction, "consequent is not Contradiction"));
    }
    let inputs = entry_of(discharge);
    Ok(mint(PropKind::Not(a.clone()), log, RuleName::NegationIntroduction, inputs))
}

/// Classical-only: `not_not_p = ¬¬P` proven; yields `P`. Gated by the
/// caller on `Config::use_classical_logic`.
pub fn double_negation_elimination(not_not_p: &Proposition, log: &mut ProofLog) -> KernelResult<Proposition> {
    require_proven(not_not_p, RuleName::DoubleNegationElimination, "self")?;
    let PropKind::Not(inner) = &not_not_p.kind else {
        return Err(not_applicable(RuleName::DoubleNegationElimination, "self is not a negation"));
    };
    let PropKind::Not(p) = &inner.kind else {
        return Err(not_applicable(RuleName::DoubleNegationElimination, "self is not a double negation"));
    };
    let inputs = entry_of(not_not_p);
    Ok(mint(p.kind.clone(), log, RuleName::DoubleNegationElimination, inputs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proof_base::Interner;

    fn atom(ix: &mut Interner, name: &str) -> Proposition {
        let sym = ix.intern(name);
        Proposition::atom(sym, vec![])
    }

    fn proven(mut p: Proposition, log: &mut ProofLog) -> Proposition {
        let id = log.record(RuleName::ByInspection, vec![]);
        p.proven = true;
        p.inference = Provenance::Rule(id);
        p
    }

    #[test]
    fn modus_ponens_produces_consequent() {
        let mut ix = Interner::new();
        let mut log = ProofLog::new();
        let a = proven(atom(&mut ix, "A"), &mut log);
        let imp = proven(Proposition::implies(atom(&mut ix, "A"), atom(&mut ix, "B")), &mut log);
        let result = modus_ponens(&a, &imp, &mut log).unwrap();
        assert_eq!(result.kind, atom(&mut ix, "B").kind);
        assert!(result.proven);
    }

    #[test]
    fn modus_ponens_rejects_unproven_input() {
        let mut ix = Interner::new();
        let mut log = ProofLog::new();
        let a = atom(&mut ix, "A");
        let imp = proven(Proposition::implies(atom(&mut ix, "A"), atom(&mut ix, "B")), &mut log);
        assert!(matches!(
            modus_ponens(&a, &imp, &mut log),
            Err(KernelError::UnprovenInput { .. })
        ));
    }

    #[test]
    fn modus_ponens_rejects_mismatched_antecedent() {
        let mut ix = Interner::new();
        let mut log = ProofLog::new();
        let a = proven(atom(&mut ix, "A"), &mut log);
        let imp = proven(Proposition::implies(atom(&mut ix, "X"), atom(&mut ix, "B")), &mut log);
        assert!(matches!(
            modus_ponens(&a, &imp, &mut log),
            Err(KernelError::RuleNotApplicable(_))
        ));
    }

    #[test]
    fn by_cases_requires_shared_conclusion() {
        let mut ix = Interner::new();
        let mut log = ProofLog::new();
        let disj = proven(Proposition::or(vec![atom(&mut ix, "A"), atom(&mut ix, "B")]), &mut log);
        let i1 = proven(Proposition::implies(atom(&mut ix, "A"), atom(&mut ix, "C")), &mut log);
        let i2 = proven(Proposition::implies(atom(&mut ix, "B"), atom(&mut ix, "D")), &mut log);
        assert!(by_cases(&disj, &[i1, i2], &mut log).is_err());
    }

    #[test]
    fn by_cases_succeeds_with_shared_conclusion() {
        let mut ix = Interner::new();
        let mut log = ProofLog::new();
        let disj = proven(Proposition::or(vec![atom(&mut ix, "A"), atom(&mut ix, "B")]), &mut log);
        let i1 = proven(Proposition::implies(atom(&mut ix, "A"), atom(&mut ix, "C")), &mut log);
        let i2 = proven(Proposition::implies(atom(&mut ix, "B"), atom(&mut ix, "C")), &mut log);
        let result = by_cases(&disj, &[i1, i2], &mut log).unwrap();
        assert_eq!(result.kind, atom(&mut ix, "C").kind);
    }

    #[test]
    fn de_morgan_not_and_becomes_or_of_nots() {
        let mut ix = Interner::new();
        let mut log = ProofLog::new();
        let p = proven(
            Proposition::not(Proposition::and(vec![atom(&mut ix, "A"), atom(&mut ix, "B")])),
            &mut log,
        );
        let dual = de_morgan(&p, true, &mut log).unwrap();
        assert_eq!(
            dual.kind,
            PropKind::Or(vec![Proposition::not(atom(&mut ix, "A")), Proposition::not(atom(&mut ix, "B"))])
        );
    }

    #[test]
    fn de_morgan_pushes_through_nested_junctions() {
        let mut ix = Interner::new();
        let mut log = ProofLog::new();
        let p_atom = atom(&mut ix, "P");
        let q = atom(&mut ix, "Q");
        let r = atom(&mut ix, "R");
        let s = atom(&mut ix, "S");
        let nested = Proposition::not(Proposition::and(vec![p_atom.clone(), Proposition::or(vec![q.clone(), r.clone(), s.clone()])]));
        let proven_nested = proven(nested, &mut log);
        let dual = de_morgan(&proven_nested, true, &mut log).unwrap();
        let expected = PropKind::Or(vec![
            Proposition::not(p_atom),
            Proposition::and(vec![Proposition::not(q), Proposition::not(r), Proposition::not(s)]),
        ]);
        assert_eq!(dual.kind, expected);
    }

    #[test]
    fn de_morgan_not_and_fails_without_classical_logic() {
        let mut ix = Interner::new();
        let mut log = ProofLog::new();
        let p = proven(
            Proposition::not(Proposition::and(vec![atom(&mut ix, "A"), atom(&mut ix, "B")])),
            &mut log,
        );
        assert!(de_morgan(&p, false, &mut log).is_err());
    }

    #[test]
    fn contradicts_and_ex_falso_round_trip() {
        let mut ix = Interner::new();
        let mut log = ProofLog::new();
        let p = proven(atom(&mut ix, "P"), &mut log);
        let not_p = proven(Proposition::not(atom(&mut ix, "P")), &mut log);
        let bottom = contradicts(&p, &not_p, &mut log).unwrap();
        assert_eq!(bottom.kind, PropKind::Contradiction);
        let anything = atom(&mut ix, "Q");
        let derived = ex_falso(&bottom, &anything, &mut log).unwrap();
        assert!(derived.proven);
        assert_eq!(derived.kind, anything.kind);
    }

    #[test]
    fn universal_instantiation_substitutes_witness() {
        let mut ix = Interner::new();
        let mut log = ProofLog::new();
        let v = ix.intern("v");
        let p_name = ix.intern("P");
        let c = ix.intern("c");
        let body = Proposition::atom(p_name, vec![Term::variable(v)]);
        let forall = proven(Proposition::forall(v, body), &mut log);
        let mut counter = 0;
        let result = universal_instantiation(&forall, &Term::constant(c), &mut ix, &mut counter, &mut log).unwrap();
        assert_eq!(result.kind, PropKind::Atom(p_name, vec![Term::constant(c)]));
    }

    #[test]
    fn universal_instantiation_renames_a_captured_nested_binder() {
        let mut ix = Interner::new();
        let mut log = ProofLog::new();
        let v = ix.intern("v");
        let w = ix.intern("w");
        let p_name = ix.intern("P");
        // forall v. (forall w. P(v, w))  instantiated with `w`: the inner
        // binder `w` would capture the witness term `w` unless renamed.
        let inner = Proposition::forall(w, Proposition::atom(p_name, vec![Term::variable(v), Term::variable(w)]));
        let forall = proven(Proposition::forall(v, inner), &mut log);
        let mut counter = 0;
        let result = universal_instantiation(&forall, &Term::variable(w), &mut ix, &mut counter, &mut log).unwrap();
        let PropKind::Forall(bound, _) = &result.kind else {
            panic!("expected a Forall to remain after instantiating the outer variable");
        };
        assert_ne!(*bound, w, "nested binder must be renamed, not left to capture the witness");
    }
}
