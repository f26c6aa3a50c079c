//! Graph recording: the primitive-operation contract and the call mechanics
//! that link operations into the dynamic graph as they execute.

pub mod grad_check;
pub(crate) mod scheduler;

mod backward;

use std::cell::Cell;
use std::cell::RefCell;
use std::fmt::Debug;
use std::rc::{Rc, Weak};

use log::trace;

use crate::config;
use crate::error::GradixError;
use crate::tensor::Tensor;
use crate::variable::{Variable, VariableData};

/// A differentiable primitive.
///
/// Implemented once per operation kind. `forward` runs on raw tensor values
/// and may capture state the backward rule needs (saved shapes, constants);
/// `backward` maps the output gradients to one gradient per input, in input
/// order. Backward rules are written in terms of `Variable`-level operations
/// so that, under `create_graph`, the backward computation is itself recorded
/// and can be differentiated again.
///
/// Both methods are required: a primitive without a backward rule does not
/// compile.
pub trait Op: Debug {
    /// Stable operation name for diagnostics.
    fn name(&self) -> &'static str;

    /// Computes the forward values. Takes `&mut self` so the operation can
    /// capture state for its backward rule.
    fn forward(&mut self, xs: &[Tensor]) -> Result<Vec<Tensor>, GradixError>;

    /// Computes one gradient per input, given one gradient per output.
    fn backward(&self, inputs: &[Variable], gys: &[Variable])
        -> Result<Vec<Variable>, GradixError>;
}

/// A recorded operation invocation: one node of the computation graph.
///
/// Inputs are held strongly (backward re-reads them), outputs weakly (the
/// reverse strong link would form a cycle; see [`Variable`] docs).
#[derive(Debug)]
pub struct OpNode {
    pub(crate) op: Box<dyn Op>,
    pub(crate) inputs: Vec<Variable>,
    pub(crate) outputs: Vec<Weak<RefCell<VariableData>>>,
    /// `max(generation of inputs)`; each output sits at `generation + 1`.
    pub(crate) generation: u32,
    /// Creation sequence number, the deterministic tie-breaker among
    /// equal-generation nodes during backward.
    pub(crate) seq: u64,
}

impl OpNode {
    pub fn name(&self) -> &'static str {
        self.op.name()
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Ordered inputs of the recorded invocation.
    pub fn inputs(&self) -> &[Variable] {
        &self.inputs
    }

    /// Ordered outputs; `None` where an output has already been dropped.
    pub fn outputs(&self) -> Vec<Option<Variable>> {
        self.outputs
            .iter()
            .map(|weak| weak.upgrade().map(Variable::from_inner))
            .collect()
    }
}

thread_local! {
    static NEXT_SEQ: Cell<u64> = const { Cell::new(0) };
}

fn next_seq() -> u64 {
    NEXT_SEQ.with(|counter| {
        let seq = counter.get();
        counter.set(seq + 1);
        seq
    })
}

/// Runs a primitive through the uniform recording call contract.
///
/// Values are extracted from the inputs, the forward rule runs, and results
/// are wrapped as fresh variables. If recording is enabled, the invocation is
/// linked into the graph: the node takes `max(input generations)`, stores
/// strong inputs and weak outputs, and each output's creator is set. With
/// recording disabled no bookkeeping is stored at all, which is what keeps
/// inference loops from growing an unbounded graph.
pub(crate) fn apply(
    mut op: Box<dyn Op>,
    inputs: &[Variable],
) -> Result<Vec<Variable>, GradixError> {
    let xs: Vec<Tensor> = inputs.iter().map(Variable::value).collect();
    let ys = op.forward(&xs)?;
    let outputs: Vec<Variable> = ys.into_iter().map(Variable::new).collect();

    if config::is_recording() {
        let generation = inputs.iter().map(Variable::generation).max().unwrap_or(0);
        trace!("recording '{}' at generation {}", op.name(), generation);
        let node = Rc::new(OpNode {
            op,
            inputs: inputs.to_vec(),
            outputs: outputs.iter().map(Variable::downgrade).collect(),
            generation,
            seq: next_seq(),
        });
        for output in &outputs {
            output.set_creator(Rc::clone(&node));
        }
    }

    Ok(outputs)
}

/// [`apply`] for the common single-output case.
pub(crate) fn apply1(op: Box<dyn Op>, inputs: &[Variable]) -> Result<Variable, GradixError> {
    let name = op.name();
    let mut outputs = apply(op, inputs)?;
    if outputs.len() == 1 {
        Ok(outputs.remove(0))
    } else {
        Err(GradixError::InternalError(format!(
            "operation '{}' produced {} outputs, expected 1",
            name,
            outputs.len()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops;

    #[test]
    fn recorded_op_links_creator_and_generations() {
        let x = Variable::scalar(2.0);
        let y = ops::square(&x).unwrap();
        assert_eq!(y.item().unwrap(), 4.0);
        assert_eq!(y.generation(), 1);

        let creator = y.creator().expect("output must have a creator");
        assert_eq!(creator.generation(), 0);
        assert_eq!(creator.inputs().len(), 1);
        assert!(creator.inputs()[0].ptr_eq(&x));

        let outputs = creator.outputs();
        assert_eq!(outputs.len(), 1);
        assert!(outputs[0].as_ref().unwrap().ptr_eq(&y));
    }

    #[test]
    fn generation_is_max_of_inputs() {
        let x = Variable::scalar(2.0);
        let deep = ops::square(&ops::square(&x).unwrap()).unwrap(); // generation 2
        let y = ops::add(&deep, &x).unwrap();
        assert_eq!(y.creator().unwrap().generation(), 2);
        assert_eq!(y.generation(), 3);
    }

    #[test]
    fn disabled_recording_stores_nothing() {
        let x = Variable::scalar(2.0);
        let _guard = config::no_grad();
        let y = ops::square(&x).unwrap();
        assert_eq!(y.item().unwrap(), 4.0);
        assert!(y.creator().is_none());
        assert_eq!(y.generation(), 0);
    }

    #[test]
    fn dropped_output_upgrades_to_none() {
        let x = Variable::scalar(2.0);
        let y = ops::square(&x).unwrap();
        let creator = y.creator().unwrap();
        drop(y);
        assert!(creator.outputs()[0].is_none());
    }
}
