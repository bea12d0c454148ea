//! Capture-avoiding substitution and first-order matching.
//!
//! Substitution walks a proposition replacing free occurrences of a term by
//! another; it refuses to descend under a quantifier that would capture a
//! free variable of the replacement, renaming the bound variable instead.
//! Matching walks a quantifier's body against a candidate instance, binding
//! the quantified variable (and checking repeated occurrences agree) while
//! requiring every other free symbol to match identically.

use crate::proposition::{PropKind, Proposition};
use crate::term::Term;
use proof_base::{Interner, Symbol};
use std::collections::HashMap;

/// Replaces every free occurrence of `var` with `replacement` inside `term`.
pub fn substitute_term(term: &Term, var: Symbol, replacement: &Term) -> Term {
    match term {
        Term::Variable { name, .. } if *name == var => replacement.clone(),
        Term::Variable { .. } | Term::Constant { .. } => term.clone(),
        Term::SetSymbol { name, predicate } => Term::SetSymbol {
            name: *name,
            predicate: predicate.as_ref().map(|p| {
                if p.bound_name == var {
                    p.clone()
                } else {
                    Box::new(crate::term::SetPredicate {
                        bound_name: p.bound_name,
                        condition: substitute_term(&p.condition, var, replacement),
                    })
                }
            }),
        },
        Term::Sequence { name, nth_term } => Term::Sequence {
            name: *name,
            nth_term: nth_term
                .as_ref()
                .map(|t| Box::new(substitute_term(t, var, replacement))),
        },
        Term::Expr { op, args } => Term::Expr {
            op: *op,
            args: args
                .iter()
                .map(|a| substitute_term(a, var, replacement))
                .collect(),
        },
    }
}

/// Renames every free occurrence of `var` in `term` to `fresh`.
fn rename_term(term: &Term, var: Symbol, fresh: Symbol) -> Term {
    substitute_term(term, var, &Term::variable(fresh))
}

/// Capture-avoiding substitution of `replacement` for the free term `target`
/// inside a proposition. `target` must be a bare `Term::Variable` symbol for
/// capture checking to apply; substitution for arbitrary term shapes (used
/// by `substitute(side, eq)`) is handled by [`substitute_equal_terms`].
pub fn substitute_prop(
    prop: &Proposition,
    var: Symbol,
    replacement: &Term,
    ix: &mut Interner,
    fresh_counter: &mut u32,
) -> Proposition {
    let free_in_replacement = replacement.free_symbols();
    walk_prop(prop, var, replacement, &free_in_replacement, ix, fresh_counter)
}

fn walk_prop(
    prop: &Proposition,
    var: Symbol,
    replacement: &Term,
    free_in_replacement: &[Symbol],
    ix: &mut Interner,
    fresh_counter: &mut u32,
) -> Proposition {
    let mut out = prop.unproven_copy();
    out.kind = match &prop.kind {
        PropKind::Atom(name, args) => PropKind::Atom(
            *name,
            args.iter().map(|a| substitute_term(a, var, replacement)).collect(),
        ),
        PropKind::Not(p) => PropKind::Not(Box::new(walk_prop(
            p,
            var,
            replacement,
            free_in_replacement,
            ix,
            fresh_counter,
        ))),
        PropKind::And(ps) => PropKind::And(
            ps.iter()
                .map(|p| walk_prop(p, var, replacement, free_in_replacement, ix, fresh_counter))
                .collect(),
        ),
        PropKind::Or(ps) => PropKind::Or(
            ps.iter()
                .map(|p| walk_prop(p, var, replacement, free_in_replacement, ix, fresh_counter))
                .collect(),
        ),
        PropKind::ExOr(ps) => PropKind::ExOr(
            ps.iter()
                .map(|p| walk_prop(p, var, replacement, free_in_replacement, ix, fresh_counter))
                .collect(),
        ),
        PropKind::Implies(a, b) => PropKind::Implies(
            Box::new(walk_prop(a, var, replacement, free_in_replacement, ix, fresh_counter)),
            Box::new(walk_prop(b, var, replacement, free_in_replacement, ix, fresh_counter)),
        ),
        PropKind::Iff(a, b) => PropKind::Iff(
            Box::new(walk_prop(a, var, replacement, free_in_replacement, ix, fresh_counter)),
            Box::new(walk_prop(b, var, replacement, free_in_replacement, ix, fresh_counter)),
        ),
        PropKind::Forall(bound, body) => {
            let (bound, body) =
                rebind_if_captured(*bound, body, var, free_in_replacement, ix, fresh_counter);
            PropKind::Forall(
                bound,
                Box::new(walk_prop(&body, var, replacement, free_in_replacement, ix, fresh_counter)),
            )
        }
        PropKind::Exists(bound, body) => {
            let (bound, body) =
                rebind_if_captured(*bound, body, var, free_in_replacement, ix, fresh_counter);
            PropKind::Exists(
                bound,
                Box::new(walk_prop(&body, var, replacement, free_in_replacement, ix, fresh_counter)),
            )
        }
        PropKind::ExistsUnique(bound, body) => {
            let (bound, body) =
                rebind_if_captured(*bound, body, var, free_in_replacement, ix, fresh_counter);
            PropKind::ExistsUnique(
                bound,
                Box::new(walk_prop(&body, var, replacement, free_in_replacement, ix, fresh_counter)),
            )
        }
        PropKind::ForallInSet(bound, set, body) => {
            let (bound, body) =
                rebind_if_captured(*bound, body, var, free_in_replacement, ix, fresh_counter);
            PropKind::ForallInSet(
                bound,
                substitute_term(set, var, replacement),
                Box::new(walk_prop(&body, var, replacement, free_in_replacement, ix, fresh_counter)),
            )
        }
        PropKind::ExistsInSet(bound, set, body) => {
            let (bound, body) =
                rebind_if_captured(*bound, body, var, free_in_replacement, ix, fresh_counter);
            PropKind::ExistsInSet(
                bound,
                substitute_term(set, var, replacement),
                Box::new(walk_prop(&body, var, replacement, free_in_replacement, ix, fresh_counter)),
            )
        }
        PropKind::Equals(a, b) => {
            PropKind::Equals(substitute_term(a, var, replacement), substitute_term(b, var, replacement))
        }
        PropKind::LessThan(a, b) => {
            PropKind::LessThan(substitute_term(a, var, replacement), substitute_term(b, var, replacement))
        }
        PropKind::GreaterThan(a, b) => {
            PropKind::GreaterThan(substitute_term(a, var, replacement), substitute_term(b, var, replacement))
        }
        PropKind::LessOrEqual(a, b) => {
            PropKind::LessOrEqual(substitute_term(a, var, replacement), substitute_term(b, var, replacement))
        }
        PropKind::GreaterOrEqual(a, b) => {
            PropKind::GreaterOrEqual(substitute_term(a, var, replacement), substitute_term(b, var, replacement))
        }
        PropKind::IsContainedIn(a, b) => PropKind::IsContainedIn(
            substitute_term(a, var, replacement),
            substitute_term(b, var, replacement),
        ),
        PropKind::IsSubsetOf(a, b) => PropKind::IsSubsetOf(
            substitute_term(a, var, replacement),
            substitute_term(b, var, replacement),
        ),
        PropKind::Divides(a, b) => {
            PropKind::Divides(substitute_term(a, var, replacement), substitute_term(b, var, replacement))
        }
        PropKind::Prime(a) => PropKind::Prime(substitute_term(a, var, replacement)),
        PropKind::Contradiction => PropKind::Contradiction,
    };
    out
}

/// If the quantifier's bound variable is `var` itself, substitution must not
/// descend (the bound occurrence shadows it): returns the body unchanged. If
/// the bound variable is free in the replacement term, renames it to a fresh
/// symbol first to avoid capture.
fn rebind_if_captured(
    bound: Symbol,
    body: &Proposition,
    var: Symbol,
    free_in_replacement: &[Symbol],
    ix: &mut Interner,
    fresh_counter: &mut u32,
) -> (Symbol, Proposition) {
    if bound == var {
        return (bound, body.unproven_copy_deep());
    }
    if free_in_replacement.contains(&bound) {
        *fresh_counter += 1;
        let fresh_name = format!("{}${}", ix.resolve(bound), fresh_counter);
        let fresh = ix.intern(&fresh_name);
        let renamed = rename_prop(body, bound, fresh);
        (fresh, renamed)
    } else {
        (bound, body.unproven_copy_deep())
    }
}

fn rename_prop(prop: &Proposition, var: Symbol, fresh: Symbol) -> Proposition {
    // Renaming never needs capture-checking against itself: a fresh symbol
    // by construction does not occur anywhere in `prop`.
    let mut zero = 0u32;
    let mut dummy = Interner::new();
    walk_prop(prop, var, &Term::variable(fresh), &[], &mut dummy, &mut zero)
}

impl Proposition {
    /// Deep structural copy with proof state reset at every node, used when
    /// substitution must clone a subtree it does not otherwise touch.
    pub fn unproven_copy_deep(&self) -> Proposition {
        fn deep(kind: &PropKind) -> PropKind {
            use PropKind::*;
            match kind {
                Atom(n, a) => Atom(*n, a.clone()),
                Not(p) => Not(Box::new(Proposition::new(deep(&p.kind)))),
                And(ps) => And(ps.iter().map(|p| Proposition::new(deep(&p.kind))).collect()),
                Or(ps) => Or(ps.iter().map(|p| Proposition::new(deep(&p.kind))).collect()),
                ExOr(ps) => ExOr(ps.iter().map(|p| Proposition::new(deep(&p.kind))).collect()),
                Implies(a, b) => Implies(
                    Box::new(Proposition::new(deep(&a.kind))),
                    Box::new(Proposition::new(deep(&b.kind))),
                ),
                Iff(a, b) => Iff(
                    Box::new(Proposition::new(deep(&a.kind))),
                    Box::new(Proposition::new(deep(&b.kind))),
                ),
                Forall(v, b) => Forall(*v, Box::new(Proposition::new(deep(&b.kind)))),
                Exists(v, b) => Exists(*v, Box::new(Proposition::new(deep(&b.kind)))),
                ExistsUnique(v, b) => ExistsUnique(*v, Box::new(Proposition::new(deep(&b.kind)))),
                ForallInSet(v, s, b) => ForallInSet(*v, s.clone(), Box::new(Proposition::new(deep(&b.kind)))),
                ExistsInSet(v, s, b) => ExistsInSet(*v, s.clone(), Box::new(Proposition::new(deep(&b.kind)))),
                Equals(a, b) => Equals(a.clone(), b.clone()),
                LessThan(a, b) => LessThan(a.clone(), b.clone()),
                GreaterThan(a, b) => GreaterThan(a.clone(), b.clone()),
                LessOrEqual(a, b) => LessOrEqual(a.clone(), b.clone()),
                GreaterOrEqual(a, b) => GreaterOrEqual(a.clone(), b.clone()),
                IsContainedIn(a, b) => IsContainedIn(a.clone(), b.clone()),
                IsSubsetOf(a, b) => IsSubsetOf(a.clone(), b.clone()),
                Divides(a, b) => Divides(a.clone(), b.clone()),
                Prime(a) => Prime(a.clone()),
                Contradiction => Contradiction,
            }
        }
        Proposition::new(deep(&self.kind))
    }
}

/// Binds discovered during matching: quantified variable -> instantiating
/// term. Repeated occurrences of the same pattern variable must agree.
pub type Bindings = HashMap<Symbol, Term>;

/// First-order matching of a quantifier body against a candidate instance.
///
/// `pattern` is the quantifier body with `bound` free inside it; `instance`
/// is the proposition a caller claims is `pattern[bound := t]` for some `t`.
/// Returns the binding for `bound` if one consistent term can be found for
/// every occurrence. Free symbols of `pattern` other than `bound` must
/// appear identically in `instance`; this makes matching linear-time in the
/// size of the pattern.
pub fn match_prop(pattern: &Proposition, bound: Symbol, instance: &Proposition) -> Option<Term> {
    let mut bindings = Bindings::new();
    if match_prop_into(pattern, bound, instance, &mut bindings) {
        bindings.get(&bound).cloned()
    } else {
        None
    }
}

fn match_prop_into(pattern: &Proposition, bound: Symbol, instance: &Proposition, b: &mut Bindings) -> bool {
    use PropKind::*;
    match (&pattern.kind, &instance.kind) {
        (Atom(n1, a1), Atom(n2, a2)) => {
            n1 == n2 && a1.len() == a2.len() && a1.iter().zip(a2).all(|(x, y)| match_term_into(x, bound, y, b))
        }
        (Not(p1), Not(p2)) => match_prop_into(p1, bound, p2, b),
        (And(ps1), And(ps2)) | (Or(ps1), Or(ps2)) | (ExOr(ps1), ExOr(ps2)) => {
            ps1.len() == ps2.len() && ps1.iter().zip(ps2).all(|(x, y)| match_prop_into(x, bound, y, b))
        }
        (Implies(a1, b1), Implies(a2, b2)) | (Iff(a1, b1), Iff(a2, b2)) => {
            match_prop_into(a1, bound, a2, b) && match_prop_into(b1, bound, b2, b)
        }
        (Forall(v1, p1), Forall(v2, p2))
        | (Exists(v1, p1), Exists(v2, p2))
        | (ExistsUnique(v1, p1), ExistsUnique(v2, p2)) => v1 == v2 && match_prop_into(p1, bound, p2, b),
        (Equals(a1, b1), Equals(a2, b2))
        | (LessThan(a1, b1), LessThan(a2, b2))
        | (GreaterThan(a1, b1), GreaterThan(a2, b2))
        | (LessOrEqual(a1, b1), LessOrEqual(a2, b2))
        | (GreaterOrEqual(a1, b1), GreaterOrEqual(a2, b2))
        | (IsContainedIn(a1, b1), IsContainedIn(a2, b2))
        | (IsSubsetOf(a1, b1), IsSubsetOf(a2, b2))
        | (Divides(a1, b1), Divides(a2, b2)) => {
            match_term_into(a1, bound, a2, b) && match_term_into(b1, bound, b2, b)
        }
        (Prime(a1), Prime(a2)) => match_term_into(a1, bound, a2, b),
        (Contradiction, Contradiction) => true,
        _ => false,
    }
}

fn match_term_into(pattern: &Term, bound: Symbol, instance: &Term, b: &mut Bindings) -> bool {
    if let Term::Variable { name, .. } = pattern {
        if *name == bound {
            return match b.get(&bound) {
                Some(existing) => existing == instance,
                None => {
                    b.insert(bound, instance.clone());
                    true
                }
            };
        }
    }
    match (pattern, instance) {
        (Term::Variable { name: n1, .. }, Term::Variable { name: n2, .. }) => n1 == n2,
        (Term::Constant { name: n1, value: v1 }, Term::Constant { name: n2, value: v2 }) => {
            n1 == n2 && v1 == v2
        }
        (Term::Expr { op: o1, args: a1 }, Term::Expr { op: o2, args: a2 }) => {
            o1 == o2 && a1.len() == a2.len() && a1.iter().zip(a2).all(|(x, y)| match_term_into(x, bound, y, b))
        }
        (Term::SetSymbol { name: n1, .. }, Term::SetSymbol { name: n2, .. }) => n1 == n2,
        (Term::Sequence { name: n1, .. }, Term::Sequence { name: n2, .. }) => n1 == n2,
        _ => false,
    }
}

/// Replaces every structural occurrence of `from` with `to` inside `term`,
/// used by the `substitute(side, eq)` rule which rewrites by a proven
/// equality rather than by variable name.
pub fn replace_term(term: &Term, from: &Term, to: &Term) -> Term {
    if term == from {
        return to.clone();
    }
    match term {
        Term::Variable { .. } | Term::Constant { .. } => term.clone(),
        Term::SetSymbol { name, predicate } => Term::SetSymbol {
            name: *name,
            predicate: predicate.as_ref().map(|p| {
                Box::new(crate::term::SetPredicate {
                    bound_name: p.bound_name,
                    condition: replace_term(&p.condition, from, to),
                })
            }),
        },
        Term::Sequence { name, nth_term } => Term::Sequence {
            name: *name,
            nth_term: nth_term.as_ref().map(|t| Box::new(replace_term(t, from, to))),
        },
        Term::Expr { op, args } => Term::Expr {
            op: *op,
            args: args.iter().map(|a| replace_term(a, from, to)).collect(),
        },
    }
}

/// Rewrites every structural occurrence of `from` with `to` in a
/// proposition's term positions.
pub fn replace_term_in_prop(prop: &Proposition, from: &Term, to: &Term) -> Proposition {
    let mut out = prop.unproven_copy();
    out.kind = replace_in_kind(&prop.kind, from, to);
    out
}

fn replace_in_kind(kind: &PropKind, from: &Term, to: &Term) -> PropKind {
    use PropKind::*;
    match kind {
        Atom(n, args) => Atom(*n, args.iter().map(|a| replace_term(a, from, to)).collect()),
        Not(p) => Not(Box::new(replace_term_in_prop(p, from, to))),
        And(ps) => And(ps.iter().map(|p| replace_term_in_prop(p, from, to)).collect()),
        Or(ps) => Or(ps.iter().map(|p| replace_term_in_prop(p, from, to)).collect()),
        ExOr(ps) => ExOr(ps.iter().map(|p| replace_term_in_prop(p, from, to)).collect()),
        Implies(a, b) => Implies(
            Box::new(replace_term_in_prop(a, from, to)),
            Box::new(replace_term_in_prop(b, from, to)),
        ),
        Iff(a, b) => Iff(
            Box::new(replace_term_in_prop(a, from, to)),
            Box::new(replace_term_in_prop(b, from, to)),
        ),
        Forall(v, b) => Forall(*v, Box::new(replace_term_in_prop(b, from, to))),
        Exists(v, b) => Exists(*v, Box::new(replace_term_in_prop(b, from, to))),
        ExistsUnique(v, b) => ExistsUnique(*v, Box::new(replace_term_in_prop(b, from, to))),
        ForallInSet(v, s, b) => ForallInSet(*v, replace_term(s, from, to), Box::new(replace_term_in_prop(b, from, to))),
        ExistsInSet(v, s, b) => ExistsInSet(*v, replace_term(s, from, to), Box::new(replace_term_in_prop(b, from, to))),
        Equals(a, b) => Equals(replace_term(a, from, to), replace_term(b, from, to)),
        LessThan(a, b) => LessThan(replace_term(a, from, to), replace_term(b, from, to)),
        GreaterThan(a, b) => GreaterThan(replace_term(a, from, to), replace_term(b, from, to)),
        LessOrEqual(a, b) => LessOrEqual(replace_term(a, from, to), replace_term(b, from, to)),
        GreaterOrEqual(a, b) => GreaterOrEqual(replace_term(a, from, to), replace_term(b, from, to)),
        IsContainedIn(a, b) => IsContainedIn(replace_term(a, from, to), replace_term(b, from, to)),
        IsSubsetOf(a, b) => IsSubsetOf(replace_term(a, from, to), replace_term(b, from, to)),
        Divides(a, b) => Divides(replace_term(a, from, to), replace_term(b, from, to)),
        Prime(a) => Prime(replace_term(a, from, to)),
        Contradiction => Contradiction,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::Op;

    #[test]
    fn substitute_term_replaces_free_occurrence() {
        let mut ix = Interner::new();
        let x = ix.intern("x");
        let y = ix.intern("y");
        let t = Term::variable(x);
        let replaced = substitute_term(&t, x, &Term::variable(y));
        assert_eq!(replaced, Term::variable(y));
    }

    #[test]
    fn substitute_prop_avoids_capture_by_renaming_bound_variable() {
        let mut ix = Interner::new();
        let x = ix.intern("x");
        let y = ix.intern("y");
        let p_name = ix.intern("P");
        // forall y. P(x, y); substitute x := y should rename the bound y.
        let body = Proposition::atom(p_name, vec![Term::variable(x), Term::variable(y)]);
        let forall = Proposition::forall(y, body);
        let mut counter = 0;
        let result = substitute_prop(&forall, x, &Term::variable(y), &mut ix, &mut counter);
        if let PropKind::Forall(bound, inner) = &result.kind {
            assert_ne!(*bound, y, "bound variable must be renamed to avoid capture");
            if let PropKind::Atom(_, args) = &inner.kind {
                assert_eq!(args[1], Term::variable(*bound));
            } else {
                panic!("expected atom body");
            }
        } else {
            panic!("expected forall");
        }
    }

    #[test]
    fn match_prop_binds_quantified_variable() {
        let mut ix = Interner::new();
        let v = ix.intern("v");
        let p_name = ix.intern("P");
        let c = ix.intern("c");
        let pattern = Proposition::atom(p_name, vec![Term::variable(v)]);
        let instance = Proposition::atom(p_name, vec![Term::constant(c)]);
        let binding = match_prop(&pattern, v, &instance);
        assert_eq!(binding, Some(Term::constant(c)));
    }

    #[test]
    fn match_prop_requires_consistent_binding_across_occurrences() {
        let mut ix = Interner::new();
        let v = ix.intern("v");
        let eq = ix.intern("eq");
        let c1 = ix.intern("c1");
        let c2 = ix.intern("c2");
        let pattern = Proposition::atom(eq, vec![Term::variable(v), Term::variable(v)]);
        let bad = Proposition::atom(eq, vec![Term::constant(c1), Term::constant(c2)]);
        assert_eq!(match_prop(&pattern, v, &bad), None);
        let good = Proposition::atom(eq, vec![Term::constant(c1), Term::constant(c1)]);
        assert_eq!(match_prop(&pattern, v, &good), Some(Term::constant(c1)));
    }

    #[test]
    fn match_term_requires_same_op_and_arity() {
        let mut ix = Interner::new();
        let v = ix.intern("v");
        let a = ix.intern("a");
        let mut b = Bindings::new();
        let pattern = Term::expr(Op::Add, vec![Term::variable(v), Term::constant(a)]);
        let instance = Term::expr(Op::Mul, vec![Term::constant(a), Term::constant(a)]);
        assert!(!match_term_into(&pattern, v, &instance, &mut b));
    }
}
