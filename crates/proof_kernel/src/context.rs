//! The assumption context stack: hypothetical reasoning and universal
//! generalization.
//!
//! Frames nest in a LIFO stack. Opening a frame lets a caller `assume` local
//! propositions and `declare_variable` fresh symbols; `conclude` records a
//! desired result; `close` discharges the frame by wrapping concluded
//! results in `Forall` for each declared variable (outermost first) and in
//! `assumption → ...` for each live assumption (innermost assumption ends
//! up as the outermost antecedent), then mints the wrapped proposition as
//! proven in the enclosing frame.
//!
//! The only propositions a closed frame hands back to its caller are the
//! discharged results returned by [`AssumptionStack::close`] - raw
//! propositions proven only by virtue of a now-closed assumption are never
//! exposed through this API as independently proven facts.

use crate::error::{KernelError, KernelResult};
use crate::proposition::{PropKind, Proposition};
use crate::provenance::{ProofLog, Provenance};
use crate::rules::RuleName;
use crate::term::{Attributes, Term};
use proof_base::Symbol;

struct Frame {
    declared_variables: Vec<Symbol>,
    assumptions: Vec<Proposition>,
    concluded: Vec<Proposition>,
}

impl Frame {
    fn new() -> Self {
        Frame {
            declared_variables: Vec::new(),
            assumptions: Vec::new(),
            concluded: Vec::new(),
        }
    }
}

/// A LIFO stack of assumption frames.
#[derive(Default)]
pub struct AssumptionStack {
    frames: Vec<Frame>,
}

impl AssumptionStack {
    pub fn new() -> Self {
        AssumptionStack { frames: Vec::new() }
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Pushes a new frame.
    pub fn open(&mut self) {
        self.frames.push(Frame::new());
    }

    /// Creates a fresh variable owned by the current frame. If any
    /// proposition concluded inside this frame mentions it, closing the
    /// frame generalizes it into an outermost `Forall`.
    pub fn declare_variable(&mut self, name: Symbol, attrs: Attributes) -> KernelResult<Term> {
        let frame = self.current_mut()?;
        frame.declared_variables.push(name);
        Ok(Term::Variable {
            name,
            deps: Vec::new(),
            bound: false,
            attrs,
        })
    }

    /// Marks `p` as proven with `is_assumption = true` and records it in the
    /// current frame.
    pub fn assume(&mut self, mut p: Proposition) -> KernelResult<Proposition> {
        p.proven = true;
        p.is_assumption = true;
        p.inference = Provenance::Assumption;
        let frame = self.current_mut()?;
        frame.assumptions.push(p.clone());
        Ok(p)
    }

    /// Records `p` as a desired conclusion of the current frame. A no-op if
    /// `p` is not proven.
    pub fn conclude(&mut self, p: &Proposition) -> KernelResult<()> {
        let frame = self.current_mut()?;
        if p.proven {
            frame.concluded.push(p.clone());
        }
        Ok(())
    }

    /// Returns the current frame's concluded propositions (pre-discharge).
    pub fn get_proven(&self) -> KernelResult<&[Proposition]> {
        Ok(&self.current()?.concluded)
    }

    /// Pops the current frame and discharges every concluded proposition:
    /// wraps in `Forall` for each declared variable (outermost first), then
    /// in `assumption → ...` for each live assumption (innermost assumption
    /// becomes the outermost antecedent), and mints the result as proven
    /// with provenance `CloseAssumptionsContext`.
    pub fn close(&mut self, log: &mut ProofLog) -> KernelResult<Vec<Proposition>> {
        let frame = self
            .frames
            .pop()
            .ok_or_else(|| KernelError::ContextMisuse("close() without a matching open()".into()))?;

        let mut results = Vec::with_capacity(frame.concluded.len());
        for concluded in &frame.concluded {
            let inputs = match concluded.inference {
                Provenance::Rule(id) => vec![id],
                _ => vec![],
            };

            let mut wrapped = concluded.unproven_copy();
            for assumption in frame.assumptions.iter() {
                wrapped = Proposition::new(PropKind::Implies(
                    Box::new(assumption.unproven_copy()),
                    Box::new(wrapped),
                ));
            }
            for var in frame.declared_variables.iter().rev() {
                wrapped = Proposition::new(PropKind::Forall(*var, Box::new(wrapped)));
            }

            let id = log.record(RuleName::CloseAssumptionsContext, inputs);
            wrapped.proven = true;
            wrapped.inference = Provenance::Rule(id);
            results.push(wrapped);
        }
        Ok(results)
    }

    fn current(&self) -> KernelResult<&Frame> {
        self.frames
            .last()
            .ok_or_else(|| KernelError::ContextMisuse("no open frame".into()))
    }

    fn current_mut(&mut self) -> KernelResult<&mut Frame> {
        self.frames
            .last_mut()
            .ok_or_else(|| KernelError::ContextMisuse("no open frame".into()))
    }
}

/// A scope guard that closes its frame when dropped, if the caller did not
/// already call [`AssumptionStack::close`] explicitly. Used on rule-failure
/// exit paths so a partially-built frame never leaks into the enclosing
/// scope's frame count; any concluded results are discarded, not
/// discharged, since a guard-driven close is an abnormal exit.
pub struct FrameGuard<'a> {
    stack: &'a mut AssumptionStack,
    closed: bool,
}

impl<'a> FrameGuard<'a> {
    /// Opens a new frame and returns a guard that will pop it on drop.
    pub fn open(stack: &'a mut AssumptionStack) -> Self {
        stack.open();
        FrameGuard { stack, closed: false }
    }

    pub fn stack(&mut self) -> &mut AssumptionStack {
        self.stack
    }

    /// Explicitly discharges the frame, consuming the guard normally.
    pub fn close(mut self, log: &mut ProofLog) -> KernelResult<Vec<Proposition>> {
        self.closed = true;
        self.stack.close(log)
    }
}

impl<'a> Drop for FrameGuard<'a> {
    fn drop(&mut self) {
        if !self.closed {
            let _ = self.stack.frames.pop();
        }
    }
}
