//! The backward chainer: works from a goal toward the premises, trying the
//! nine-rule table of kernel primitives in priority order.
//!
//! Mirrors the shape of a classic backward-chaining engine - a `prove`
//! entry point that normalizes its input once and dispatches into a
//! depth-tracked, memoized recursive search - except every inference step
//! below is a call into `proof_kernel::rules` rather than a private
//! unifier. The prover never mints a proven proposition on its own.

use proof_kernel::error::{KernelError, KernelResult};
use proof_kernel::proposition::{PropKind, Proposition};
use proof_kernel::provenance::ProofLog;
use proof_kernel::rules;
use proof_kernel::term::Attributes;
use proof_kernel::{AssumptionStack, Config};
use proof_base::Symbol;

/// Default maximum search depth when the caller does not request a specific
/// bound: proportional to the size of the premise set, per "default:
/// proportional to the size of the premises."
const DEPTH_PER_PREMISE: usize = 4;
const MIN_DEPTH: usize = 12;

/// Attempts to prove `goal` from `premises` under `config`, recording every
/// rule application in `log`. Returns a proposition structurally equal to
/// `goal` with `proven = true`, or [`KernelError::NoRuleApplies`] once the
/// rule table and loop-avoidance bookkeeping are exhausted.
pub fn prove(
    premises: &[Proposition],
    goal: &Proposition,
    config: &Config,
    log: &mut ProofLog,
) -> KernelResult<Proposition> {
    let max_depth = (premises.len() * DEPTH_PER_PREMISE).max(MIN_DEPTH);
    prove_with_depth(premises, goal, config, max_depth, log)
}

/// Like [`prove`] but with an explicit depth bound, for callers that know
/// their search shape or want a tighter bound than the default heuristic.
pub fn prove_with_depth(
    premises: &[Proposition],
    goal: &Proposition,
    config: &Config,
    max_depth: usize,
    log: &mut ProofLog,
) -> KernelResult<Proposition> {
    let mut prover = BackwardProver::new(*config, max_depth, log);
    prover.find(premises, goal, 0, false)
}

/// Holds the search-local state threaded through a single `prove` call: the
/// assumption stack backing introduction rules, and the two loop-avoidance
/// bookkeeping sets the backward prover maintains.
pub struct BackwardProver<'a> {
    config: Config,
    max_depth: usize,
    log: &'a mut ProofLog,
    stack: AssumptionStack,
    visited: Vec<(PropKind, usize)>,
    no_recurse_on: Vec<PropKind>,
}

impl<'a> BackwardProver<'a> {
    pub fn new(config: Config, max_depth: usize, log: &'a mut ProofLog) -> Self {
        BackwardProver {
            config,
            max_depth,
            log,
            stack: AssumptionStack::new(),
            visited: Vec::new(),
            no_recurse_on: Vec::new(),
        }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Depth-first search for a proof of `goal` from `known`, honoring the
    /// rule-table priority order of the backward prover.
    ///
    /// `demorgan_tried` is the one-shot guard on rule 9: once a branch has
    /// normalized via De Morgan, it does not try again further down the
    /// same branch.
    pub fn find(
        &mut self,
        known: &[Proposition],
        goal: &Proposition,
        depth: usize,
        demorgan_tried: bool,
    ) -> KernelResult<Proposition> {
        if depth > self.max_depth {
            return Err(KernelError::NoRuleApplies(format!(
                "max search depth {} exceeded",
                self.max_depth
            )));
        }

        let visit_key = (goal.kind.clone(), self.stack.depth());
        if self.visited.contains(&visit_key) {
            log::trace!("depth {depth}: loop guard tripped on an already-visited goal");
            return Err(KernelError::NoRuleApplies(
                "already visited this (goal, frame depth) pair on this branch".into(),
            ));
        }
        self.visited.push(visit_key.clone());
        let result = self.try_rule_table(known, goal, depth, demorgan_tried);
        self.visited.retain(|k| k != &visit_key);
        match &result {
            Ok(_) => log::debug!("depth {depth}: goal proved"),
            Err(e) => log::trace!("depth {depth}: goal search failed ({e})"),
        }
        result
    }

    fn try_rule_table(
        &mut self,
        known: &[Proposition],
        goal: &Proposition,
        depth: usize,
        demorgan_tried: bool,
    ) -> KernelResult<Proposition> {
        // 1. Identity.
        if let Some(found) = known.iter().find(|p| p.proven && p.kind == goal.kind) {
            return Ok(found.clone());
        }

        // Ex falso quodlibet: a directly contradictory pair already in scope
        // (e.g. a premise `¬B` against a case-analysis assumption `B`)
        // proves any goal via `contradicts` + `ex_falso`. This is what makes
        // rule 8's "search for Contradiction" and rule 7's by-cases
        // "contradiction" branch findable at all - `Contradiction` itself
        // never otherwise appears in a premise set, only among its
        // immediate consequences.
        if let Some(bottom) = self.find_direct_contradiction(known) {
            if let Ok(p) = rules::ex_falso(&bottom, goal, self.log) {
                return Ok(p);
            }
        }

        // 2. Conjunction introduction.
        if let PropKind::And(conjuncts) = &goal.kind {
            if let Some(p) = self.introduce_and(known, conjuncts, depth) {
                return Ok(p);
            }
        }

        // 3. Disjunction introduction.
        if let PropKind::Or(disjuncts) = &goal.kind {
            for (i, d) in disjuncts.iter().enumerate() {
                if let Ok(proof) = self.find(known, d, depth + 1, false) {
                    if let Ok(p) = rules::or_intro_at(disjuncts, i, &proof, self.log) {
                        return Ok(p);
                    }
                }
            }
        }

        // 4. Implication introduction.
        if let PropKind::Implies(a, b) = &goal.kind {
            if let Ok(p) = self.introduce_implication(known, a, b, depth) {
                return Ok(p);
            }
        }

        // 5. Universal introduction (only when the variable is not free in
        // any premise still in scope).
        if let PropKind::Forall(v, body) = &goal.kind {
            let free_elsewhere = known.iter().any(|p| p.free_symbols().contains(v));
            if !free_elsewhere {
                if let Ok(p) = self.introduce_forall(known, *v, body, depth) {
                    return Ok(p);
                }
            }
        }

        // 6. Modus ponens on any premise `A -> goal`.
        if let Some(p) = self.modus_ponens_on_premises(known, goal, depth) {
            return Ok(p);
        }

        // 7. Case analysis on any disjunctive premise.
        if let Some(p) = self.case_analysis_on_premises(known, goal, depth) {
            return Ok(p);
        }

        // 8. Negation introduction / proof by contradiction (classical
        // mode only).
        if self.config.use_classical_logic {
            if let Ok(p) = self.proof_by_contradiction(known, goal, depth) {
                return Ok(p);
            }
        }

        // 9. De Morgan normalization of the premises, tried once per branch.
        if !demorgan_tried {
            if let Ok(p) = self.normalize_premises_and_retry(known, goal, depth) {
                return Ok(p);
            }
        }

        Err(KernelError::NoRuleApplies(format!("{:?}", goal.kind)))
    }

    fn find_direct_contradiction(&mut self, known: &[Proposition]) -> Option<Proposition> {
        for i in 0..known.len() {
            for j in 0..known.len() {
                if i == j {
                    continue;
                }
                if let Ok(bottom) = rules::contradicts(&known[i], &known[j], self.log) {
                    return Some(bottom);
                }
            }
        }
        None
    }

    fn introduce_and(&mut self, known: &[Proposition], conjuncts: &[Proposition], depth: usize) -> Option<Proposition> {
        let mut proofs = Vec::with_capacity(conjuncts.len());
        for c in conjuncts {
            proofs.push(self.find(known, c, depth + 1, false).ok()?);
        }
        rules::and_(&proofs, self.log).ok()
    }

    fn introduce_implication(
        &mut self,
        known: &[Proposition],
        a: &Proposition,
        b: &Proposition,
        depth: usize,
    ) -> KernelResult<Proposition> {
        self.stack.open();
        let assumed = match self.stack.assume(a.unproven_copy()) {
            Ok(p) => p,
            Err(e) => {
                let _ = self.stack.close(self.log);
                return Err(e);
            }
        };
        let mut known2 = known.to_vec();
        known2.push(assumed);
        match self.find(&known2, b, depth + 1, false) {
            Ok(b_proof) => {
                let _ = self.stack.conclude(&b_proof);
                let discharged = self.stack.close(self.log)?;
                discharged
                    .into_iter()
                    .next()
                    .ok_or_else(|| KernelError::NoRuleApplies("implication introduction produced nothing".into()))
            }
            Err(e) => {
                let _ = self.stack.close(self.log);
                Err(e)
            }
        }
    }

    fn introduce_forall(
        &mut self,
        known: &[Proposition],
        v: Symbol,
        body: &Proposition,
        depth: usize,
    ) -> KernelResult<Proposition> {
        self.stack.open();
        if let Err(e) = self.stack.declare_variable(v, Attributes::default()) {
            let _ = self.stack.close(self.log);
            return Err(e);
        }
        match self.find(known, body, depth + 1, false) {
            Ok(body_proof) => {
                let _ = self.stack.conclude(&body_proof);
                let discharged = self.stack.close(self.log)?;
                discharged
                    .into_iter()
                    .next()
                    .ok_or_else(|| KernelError::NoRuleApplies("universal introduction produced nothing".into()))
            }
            Err(e) => {
                let _ = self.stack.close(self.log);
                Err(e)
            }
        }
    }

    fn modus_ponens_on_premises(&mut self, known: &[Proposition], goal: &Proposition, depth: usize) -> Option<Proposition> {
        for premise in known {
            if self.no_recurse_on.contains(&premise.kind) {
                continue;
            }
            let PropKind::Implies(a, c) = &premise.kind else {
                continue;
            };
            if c.kind != goal.kind {
                continue;
            }
            let antecedent = (**a).clone();
            let premise = premise.clone();
            self.no_recurse_on.push(premise.kind.clone());
            let attempt = self
                .find(known, &antecedent, depth + 1, false)
                .and_then(|a_proof| rules::modus_ponens(&a_proof, &premise, self.log));
            self.no_recurse_on.pop();
            if let Ok(p) = attempt {
                return Some(p);
            }
        }
        None
    }

    fn case_analysis_on_premises(&mut self, known: &[Proposition], goal: &Proposition, depth: usize) -> Option<Proposition> {
        for premise in known {
            if self.no_recurse_on.contains(&premise.kind) {
                continue;
            }
            let PropKind::Or(disjuncts) = premise.kind.clone() else {
                continue;
            };
            let premise = premise.clone();
            self.no_recurse_on.push(premise.kind.clone());
            let attempt = self.case_split(known, &premise, &disjuncts, goal, depth);
            self.no_recurse_on.pop();
            if let Ok(p) = attempt {
                return Some(p);
            }
        }
        None
    }

    fn case_split(
        &mut self,
        known: &[Proposition],
        premise: &Proposition,
        disjuncts: &[Proposition],
        goal: &Proposition,
        depth: usize,
    ) -> KernelResult<Proposition> {
        let mut impls = Vec::with_capacity(disjuncts.len());
        for d in disjuncts {
            self.stack.open();
            let assumed = match self.stack.assume(d.unproven_copy()) {
                Ok(p) => p,
                Err(e) => {
                    let _ = self.stack.close(self.log);
                    return Err(e);
                }
            };
            let mut known2 = known.to_vec();
            known2.push(assumed);
            match self.find(&known2, goal, depth + 1, false) {
                Ok(goal_proof) => {
                    let _ = self.stack.conclude(&goal_proof);
                    let mut discharged = self.stack.close(self.log)?;
                    match discharged.pop() {
                        Some(p) => impls.push(p),
                        None => {
                            return Err(KernelError::NoRuleApplies(
                                "case analysis discharge produced nothing".into(),
                            ))
                        }
                    }
                }
                Err(e) => {
                    let _ = self.stack.close(self.log);
                    return Err(e);
                }
            }
        }
        rules::by_cases(premise, &impls, self.log)
    }

    fn proof_by_contradiction(&mut self, known: &[Proposition], goal: &Proposition, depth: usize) -> KernelResult<Proposition> {
        self.stack.open();
        let not_goal = Proposition::not(goal.unproven_copy());
        let assumed = match self.stack.assume(not_goal) {
            Ok(p) => p,
            Err(e) => {
                let _ = self.stack.close(self.log);
                return Err(e);
            }
        };
        let mut known2 = known.to_vec();
        known2.push(assumed);
        let bottom_goal = Proposition::contradiction();
        match self.find(&known2, &bottom_goal, depth + 1, false) {
            Ok(bottom_proof) => {
                let _ = self.stack.conclude(&bottom_proof);
                let discharged = self.stack.close(self.log)?;
                let discharge = discharged
                    .into_iter()
                    .next()
                    .ok_or_else(|| KernelError::NoRuleApplies("contradiction discharge produced nothing".into()))?;
                let not_not_goal = rules::negation_introduction(&discharge, self.log)?;
                rules::double_negation_elimination(&not_not_goal, self.log)
            }
            Err(e) => {
                let _ = self.stack.close(self.log);
                Err(e)
            }
        }
    }

    /// Rule 9: pushes every proven premise toward its De Morgan normal form
    /// and retries the (unchanged) goal against the full rule table once
    /// more. Only the premises move - a goal already in normal form, as in
    /// the classic "`¬(P∧(Q∨R∨S))` implies `¬P∨(¬Q∧¬R∧¬S)`" shape, becomes
    /// reachable by identity once its matching premise has been pushed.
    fn normalize_premises_and_retry(
        &mut self,
        known: &[Proposition],
        goal: &Proposition,
        depth: usize,
    ) -> KernelResult<Proposition> {
        let mut extra = Vec::new();
        for p in known {
            if p.proven {
                if let Ok(dual) = rules::de_morgan(p, self.config.use_classical_logic, self.log) {
                    extra.push(dual);
                }
            }
        }
        if extra.is_empty() {
            return Err(KernelError::NoRuleApplies(
                "no premise has a De Morgan normal form to push toward".into(),
            ));
        }
        let mut known2 = known.to_vec();
        known2.append(&mut extra);
        self.find(&known2, goal, depth + 1, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proof_base::Interner;

    fn atom(ix: &mut Interner, name: &str) -> Proposition {
        Proposition::atom(ix.intern(name), vec![])
    }

    fn assumed_premise(p: Proposition) -> Proposition {
        let mut p = p;
        p.proven = true;
        p
    }

    #[test]
    fn proves_goal_via_two_modus_ponens() {
        let mut ix = Interner::new();
        let mut log = ProofLog::new();
        let p = assumed_premise(atom(&mut ix, "P"));
        let q = atom(&mut ix, "Q");
        let r = atom(&mut ix, "R");
        let s = atom(&mut ix, "S");
        let p_implies_qr = assumed_premise(Proposition::implies(atom(&mut ix, "P"), Proposition::or(vec![q.clone(), r.clone()])));
        let qr_implies_not_s = assumed_premise(Proposition::implies(
            Proposition::or(vec![q, r]),
            Proposition::not(s.clone()),
        ));
        let premises = vec![p, p_implies_qr, qr_implies_not_s];
        let goal = Proposition::not(s);
        let config = Config::default();
        let result = prove(&premises, &goal, &config, &mut log).unwrap();
        assert!(result.proven);
        assert_eq!(result.kind, goal.kind);
    }

    #[test]
    fn proves_disjunctive_syllogism_via_by_cases() {
        let mut ix = Interner::new();
        let mut log = ProofLog::new();
        let a = atom(&mut ix, "A");
        let b = atom(&mut ix, "B");
        let a_or_b = assumed_premise(Proposition::or(vec![a.clone(), b.clone()]));
        let not_b = assumed_premise(Proposition::not(b));
        let premises = vec![a_or_b, not_b];
        let config = Config::default();
        let result = prove(&premises, &a, &config, &mut log).unwrap();
        assert!(result.proven);
        assert_eq!(result.kind, a.kind);
    }

    #[test]
    fn proves_double_negation_elimination_classically() {
        let mut ix = Interner::new();
        let mut log = ProofLog::new();
        let p = atom(&mut ix, "P");
        let not_not_p = assumed_premise(Proposition::not(Proposition::not(p.clone())));
        let config = Config::default();
        let result = prove(&[not_not_p.clone()], &p, &config, &mut log).unwrap();
        assert!(result.proven);
        assert_eq!(result.kind, p.kind);

        let mut log2 = ProofLog::new();
        let failure = prove(&[not_not_p], &p, &Config::intuitionistic(), &mut log2);
        assert!(matches!(failure, Err(KernelError::NoRuleApplies(_))));
    }

    #[test]
    fn proves_case_analysis_over_two_implications() {
        let mut ix = Interner::new();
        let mut log = ProofLog::new();
        let b = atom(&mut ix, "B");
        let c = atom(&mut ix, "C");
        let f = atom(&mut ix, "F");
        let g = atom(&mut ix, "G");
        let c_implies_g = assumed_premise(Proposition::implies(c.clone(), g.clone()));
        let b_implies_f = assumed_premise(Proposition::implies(b.clone(), f.clone()));
        let b_or_c = assumed_premise(Proposition::or(vec![b, c]));
        let premises = vec![c_implies_g, b_implies_f, b_or_c];
        let goal = Proposition::or(vec![f, g]);
        let config = Config::default();
        let result = prove(&premises, &goal, &config, &mut log).unwrap();
        assert!(result.proven);
        assert_eq!(result.kind, goal.kind);
    }

    #[test]
    fn proves_nested_implication_with_no_premises() {
        let mut ix = Interner::new();
        let mut log = ProofLog::new();
        let a = atom(&mut ix, "A");
        let b = atom(&mut ix, "B");
        // B -> (!A -> B)
        let goal = Proposition::implies(b.clone(), Proposition::implies(Proposition::not(a), b));
        let config = Config::default();
        let result = prove(&[], &goal, &config, &mut log).unwrap();
        assert!(result.proven);
        assert_eq!(result.kind, goal.kind);
    }

    #[test]
    fn classical_de_morgan_scenario_succeeds_only_with_classical_logic() {
        let mut ix = Interner::new();
        let p_atom = atom(&mut ix, "P");
        let q = atom(&mut ix, "Q");
        let r = atom(&mut ix, "R");
        let s = atom(&mut ix, "S");
        let premise = assumed_premise(Proposition::not(Proposition::and(vec![
            p_atom.clone(),
            Proposition::or(vec![q.clone(), r.clone(), s.clone()]),
        ])));
        let goal = Proposition::or(vec![
            Proposition::not(p_atom),
            Proposition::and(vec![Proposition::not(q), Proposition::not(r), Proposition::not(s)]),
        ]);

        let mut log = ProofLog::new();
        let classical = Config::default();
        let result = prove(&[premise.clone()], &goal, &classical, &mut log).unwrap();
        assert!(result.proven);
        assert_eq!(result.kind, goal.kind);

        let mut log2 = ProofLog::new();
        let intuitionistic = Config::intuitionistic();
        let failure = prove(&[premise], &goal, &intuitionistic, &mut log2);
        assert!(matches!(failure, Err(KernelError::NoRuleApplies(_))));
    }

    #[test]
    fn exhausted_search_reports_no_rule_applies() {
        let mut ix = Interner::new();
        let mut log = ProofLog::new();
        let goal = atom(&mut ix, "Unreachable");
        let config = Config::default();
        let result = prove(&[], &goal, &config, &mut log);
        assert!(matches!(result, Err(KernelError::NoRuleApplies(_))));
    }
}
