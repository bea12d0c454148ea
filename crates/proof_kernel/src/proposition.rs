//! The proposition AST: atoms, logical connectives, and the built-in
//! relations, each carrying the `proven` / `inference` / `is_assumption`
//! triple described by the data model.

use crate::provenance::Provenance;
use crate::term::Term;
use proof_base::{Interner, Symbol};
use std::fmt;

/// The logical shape of a proposition, independent of its proof state.
///
/// Structural equality (`PartialEq`) compares only this shape: `proven` is
/// deliberately not part of identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropKind {
    Atom(Symbol, Vec<Term>),
    Not(Box<Proposition>),
    And(Vec<Proposition>),
    Or(Vec<Proposition>),
    /// Exactly one of the arguments is true - not parity, even above two.
    ExOr(Vec<Proposition>),
    Implies(Box<Proposition>, Box<Proposition>),
    Iff(Box<Proposition>, Box<Proposition>),
    Forall(Symbol, Box<Proposition>),
    Exists(Symbol, Box<Proposition>),
    ExistsUnique(Symbol, Box<Proposition>),
    ForallInSet(Symbol, Term, Box<Proposition>),
    ExistsInSet(Symbol, Term, Box<Proposition>),
    Equals(Term, Term),
    LessThan(Term, Term),
    GreaterThan(Term, Term),
    LessOrEqual(Term, Term),
    GreaterOrEqual(Term, Term),
    IsContainedIn(Term, Term),
    IsSubsetOf(Term, Term),
    Divides(Term, Term),
    Prime(Term),
    Contradiction,
}

/// A proposition: a logical shape plus its current proof state.
///
/// `proven` and `inference` are mutated only by the operations in
/// [`crate::rules`], [`crate::context`], and [`crate::oracle`] - never
/// constructed as already-true from outside the kernel.
#[derive(Debug, Clone)]
pub struct Proposition {
    pub kind: PropKind,
    pub proven: bool,
    pub inference: Provenance,
    pub is_assumption: bool,
}

impl PartialEq for Proposition {
    /// Only `kind` participates in equality - `proven` is not part of
    /// identity, per the data model.
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl Eq for Proposition {}

impl Proposition {
    /// Builds an unproven proposition of the given shape. This is the only
    /// public constructor; proof state can only change via kernel
    /// operations afterward.
    pub fn new(kind: PropKind) -> Proposition {
        Proposition {
            kind,
            proven: false,
            inference: Provenance::None,
            is_assumption: false,
        }
    }

    pub fn atom(name: Symbol, args: Vec<Term>) -> Proposition {
        Proposition::new(PropKind::Atom(name, args))
    }

    pub fn not(p: Proposition) -> Proposition {
        Proposition::new(PropKind::Not(Box::new(p)))
    }

    pub fn and(ps: Vec<Proposition>) -> Proposition {
        Proposition::new(PropKind::And(ps))
    }

    pub fn or(ps: Vec<Proposition>) -> Proposition {
        Proposition::new(PropKind::Or(ps))
    }

    pub fn exor(ps: Vec<Proposition>) -> Proposition {
        Proposition::new(PropKind::ExOr(ps))
    }

    pub fn implies(a: Proposition, b: Proposition) -> Proposition {
        Proposition::new(PropKind::Implies(Box::new(a), Box::new(b)))
    }

    pub fn iff(a: Proposition, b: Proposition) -> Proposition {
        Proposition::new(PropKind::Iff(Box::new(a), Box::new(b)))
    }

    pub fn forall(v: Symbol, body: Proposition) -> Proposition {
        Proposition::new(PropKind::Forall(v, Box::new(body)))
    }

    pub fn exists(v: Symbol, body: Proposition) -> Proposition {
        Proposition::new(PropKind::Exists(v, Box::new(body)))
    }

    pub fn contradiction() -> Proposition {
        Proposition::new(PropKind::Contradiction)
    }

    /// Bare structural clone with proof state reset - used when a rule wants
    /// to quote an input's shape into a fresh, unproven goal.
    pub fn unproven_copy(&self) -> Proposition {
        Proposition::new(self.kind.clone())
    }

    pub fn display<'a>(&'a self, interner: &'a Interner) -> PropDisplay<'a> {
        PropDisplay { prop: self, interner }
    }

    /// Every symbol occurring free in this proposition (variables bound by
    /// `Forall`/`Exists`/etc. within it are excluded), deduplicated in
    /// first-occurrence order.
    pub fn free_symbols(&self) -> Vec<Symbol> {
        let mut out = Vec::new();
        collect_free(self, &mut out);
        out
    }
}

fn push_unique(out: &mut Vec<Symbol>, s: Symbol) {
    if !out.contains(&s) {
        out.push(s);
    }
}

fn collect_free(p: &Proposition, out: &mut Vec<Symbol>) {
    use PropKind::*;
    match &p.kind {
        Atom(_, args) => {
            for t in args {
                for s in t.free_symbols() {
                    push_unique(out, s);
                }
            }
        }
        Not(inner) => collect_free(inner, out),
        And(ps) | Or(ps) | ExOr(ps) => {
            for q in ps {
                collect_free(q, out);
            }
        }
        Implies(a, b) | Iff(a, b) => {
            collect_free(a, out);
            collect_free(b, out);
        }
        Forall(bound, body) | Exists(bound, body) | ExistsUnique(bound, body) => {
            let mut inner = Vec::new();
            collect_free(body, &mut inner);
            for s in inner {
                if s != *bound {
                    push_unique(out, s);
                }
            }
        }
        ForallInSet(bound, set, body) | ExistsInSet(bound, set, body) => {
            for s in set.free_symbols() {
                push_unique(out, s);
            }
            let mut inner = Vec::new();
            collect_free(body, &mut inner);
            for s in inner {
                if s != *bound {
                    push_unique(out, s);
                }
            }
        }
        Equals(a, b)
        | LessThan(a, b)
        | GreaterThan(a, b)
        | LessOrEqual(a, b)
        | GreaterOrEqual(a, b)
        | IsContainedIn(a, b)
        | IsSubsetOf(a, b)
        | Divides(a, b) => {
            for t in [a, b] {
                for s in t.free_symbols() {
                    push_unique(out, s);
                }
            }
        }
        Prime(a) => {
            for s in a.free_symbols() {
                push_unique(out, s);
            }
        }
        Contradiction => {}
    }
}

pub struct PropDisplay<'a> {
    prop: &'a Proposition,
    interner: &'a Interner,
}

impl<'a> fmt::Display for PropDisplay<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_kind(&self.prop.kind, self.prop.proven, self.interner, f)
    }
}

fn fmt_kind(
    kind: &PropKind,
    _proven: bool,
    ix: &Interner,
    f: &mut fmt::Formatter<'_>,
) -> fmt::Result {
    use PropKind::*;
    match kind {
        Atom(name, args) => {
            write!(f, "{}", ix.resolve(*name))?;
            if !args.is_empty() {
                write!(f, "(")?;
                for (i, a) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", a.display(ix))?;
                }
                write!(f, ")")?;
            }
            Ok(())
        }
        Not(p) => write!(f, "¬{}", p.display(ix)),
        And(ps) => write_joined(ps, " ∧ ", ix, f),
        Or(ps) => write_joined(ps, " ∨ ", ix, f),
        ExOr(ps) => write_joined(ps, " ⊕ ", ix, f),
        Implies(a, b) => write!(f, "({} → {})", a.display(ix), b.display(ix)),
        Iff(a, b) => write!(f, "({} ↔ {})", a.display(ix), b.display(ix)),
        Forall(v, body) => write!(f, "∀{}. {}", ix.resolve(*v), body.display(ix)),
        Exists(v, body) => write!(f, "∃{}. {}", ix.resolve(*v), body.display(ix)),
        ExistsUnique(v, body) => write!(f, "∃!{}. {}", ix.resolve(*v), body.display(ix)),
        ForallInSet(v, set, body) => {
            write!(f, "∀{}∈{}. {}", ix.resolve(*v), set.display(ix), body.display(ix))
        }
        ExistsInSet(v, set, body) => {
            write!(f, "∃{}∈{}. {}", ix.resolve(*v), set.display(ix), body.display(ix))
        }
        Equals(a, b) => write!(f, "{} = {}", a.display(ix), b.display(ix)),
        LessThan(a, b) => write!(f, "{} < {}", a.display(ix), b.display(ix)),
        GreaterThan(a, b) => write!(f, "{} > {}", a.display(ix), b.display(ix)),
        LessOrEqual(a, b) => write!(f, "{} ≤ {}", a.display(ix), b.display(ix)),
        GreaterOrEqual(a, b) => write!(f, "{} ≥ {}", a.display(ix), b.display(ix)),
        IsContainedIn(a, b) => write!(f, "{} ∈ {}", a.display(ix), b.display(ix)),
        IsSubsetOf(a, b) => write!(f, "{} ⊆ {}", a.display(ix), b.display(ix)),
        Divides(a, b) => write!(f, "{} | {}", a.display(ix), b.display(ix)),
        Prime(a) => write!(f, "{} prime", a.display(ix)),
        Contradiction => write!(f, "⊥"),
    }
}

fn write_joined(
    ps: &[Proposition],
    sep: &str,
    ix: &Interner,
    f: &mut fmt::Formatter<'_>,
) -> fmt::Result {
    write!(f, "(")?;
    for (i, p) in ps.iter().enumerate() {
        if i > 0 {
            write!(f, "{sep}")?;
        }
        write!(f, "{}", p.display(ix))?;
    }
    write!(f, ")")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structural_equality_ignores_proven_flag() {
        let mut ix = Interner::new();
        let p = ix.intern("P");
        let mut a = Proposition::atom(p, vec![]);
        let b = Proposition::atom(p, vec![]);
        a.proven = true;
        assert_eq!(a, b);
    }

    #[test]
    fn new_proposition_is_unproven() {
        let mut ix = Interner::new();
        let p = Proposition::atom(ix.intern("P"), vec![]);
        assert!(!p.proven);
        assert!(!p.is_assumption);
        assert_eq!(p.inference, Provenance::None);
    }

    #[test]
    fn free_symbols_excludes_bound_variable() {
        let mut ix = Interner::new();
        let v = ix.intern("x");
        let p_pred = ix.intern("P");
        let c = ix.intern("c");
        let body = Proposition::atom(
            p_pred,
            vec![crate::term::Term::variable(v), crate::term::Term::constant(c)],
        );
        let forall = Proposition::forall(v, body);
        assert_eq!(forall.free_symbols(), vec![c]);
    }

    #[test]
    fn display_renders_implication() {
        let mut ix = Interner::new();
        let a = Proposition::atom(ix.intern("A"), vec![]);
        let b = Proposition::atom(ix.intern("B"), vec![]);
        let imp = Proposition::implies(a, b);
        assert_eq!(format!("{}", imp.display(&ix)), "(A → B)");
    }
}
