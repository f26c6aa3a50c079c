//! The backward executor: drives the scheduler, invokes backward rules,
//! accumulates gradients and releases non-terminal ones.

use std::rc::Rc;

use log::{debug, trace};

use crate::autograd::scheduler::PendingOps;
use crate::config;
use crate::error::GradixError;
use crate::tensor;
use crate::variable::Variable;

impl Variable {
    /// Backpropagates from this variable with default options: intermediate
    /// gradients are released and the backward computation is not recorded.
    ///
    /// See [`backward_with`](Variable::backward_with).
    pub fn backward(&self) -> Result<(), GradixError> {
        self.backward_with(false, false)
    }

    /// Backpropagates from this variable, populating `grad` on every variable
    /// that participated in producing it.
    ///
    /// If this variable has no gradient yet it is seeded with a ones tensor
    /// of its own shape (the generic vector-Jacobian seed). Gradients
    /// accumulate by out-of-place addition, so a leaf consumed several times
    /// receives the sum of all contributions.
    ///
    /// * `retain_grad` — keep gradients on intermediate variables instead of
    ///   releasing them once their producer has been processed. Off by
    ///   default to bound peak memory on deep graphs; the root and leaves
    ///   always keep theirs.
    /// * `create_graph` — record the backward computation itself, making the
    ///   resulting gradients differentiable (higher-order derivatives).
    ///
    /// # Errors
    /// * [`GradixError::NoGraph`] if this variable has no creator (leaf, or
    ///   built with recording disabled).
    /// * [`GradixError::DanglingOutput`] if an operation's output was dropped
    ///   before the traversal reached it; this indicates a violated lifetime
    ///   contract and the traversal aborts.
    pub fn backward_with(&self, retain_grad: bool, create_graph: bool) -> Result<(), GradixError> {
        let root_creator = self.creator().ok_or(GradixError::NoGraph)?;

        if self.grad().is_none() {
            let seed = tensor::ones_like(&self.value())?;
            self.set_grad(Variable::new(seed));
        }

        debug!(
            "backward from generation {} (root op '{}')",
            self.generation(),
            root_creator.name()
        );

        let mut pending = PendingOps::new();
        pending.push(root_creator);

        while let Some(node) = pending.pop() {
            trace!(
                "processing '{}' at generation {} ({} pending)",
                node.name(),
                node.generation(),
                pending.len()
            );

            // Gather output gradients through the weak links. An output that
            // died before its producer was processed is a lifetime-contract
            // violation, not a recoverable condition.
            let mut gys = Vec::with_capacity(node.outputs.len());
            for weak in &node.outputs {
                let output = weak.upgrade().ok_or(GradixError::DanglingOutput {
                    operation: node.name(),
                })?;
                let gy = output.borrow().grad.clone().ok_or_else(|| {
                    GradixError::InternalError(format!(
                        "output of '{}' reached backward without a gradient",
                        node.name()
                    ))
                })?;
                gys.push(gy);
            }

            {
                // The backward rule and the accumulation both run under the
                // create_graph setting: recorded, they form the graph a
                // second-order backward walks.
                let _guard = config::scoped_recording(create_graph);

                let gxs = node.op.backward(&node.inputs, &gys)?;
                if gxs.len() != node.inputs.len() {
                    return Err(GradixError::GradientCountMismatch {
                        operation: node.name(),
                        expected: node.inputs.len(),
                        actual: gxs.len(),
                    });
                }

                for (input, gx) in node.inputs.iter().zip(gxs) {
                    input.accumulate_grad(gx)?;
                    if let Some(creator) = input.creator() {
                        pending.push(creator);
                    }
                }
            }

            if !retain_grad {
                // This node's outputs have handed their gradients on; release
                // them so deep graphs don't hold every intermediate gradient
                // at once. The root's own gradient stays.
                for weak in &node.outputs {
                    if let Some(output) = weak.upgrade() {
                        if !Rc::ptr_eq(&output, &self.inner) {
                            output.borrow_mut().grad = None;
                        }
                    }
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops;

    #[test]
    fn backward_on_leaf_is_no_graph() {
        let x = Variable::scalar(1.0);
        assert_eq!(x.backward(), Err(GradixError::NoGraph));
    }

    #[test]
    fn failed_backward_does_not_seed_a_gradient() {
        let x = Variable::scalar(1.0);
        assert!(x.backward().is_err());
        assert!(x.grad().is_none());

        let y = {
            let _guard = crate::config::no_grad();
            ops::square(&x).unwrap()
        };
        assert!(y.backward().is_err());
        assert!(y.grad().is_none());
    }

    #[test]
    fn root_gradient_seeded_with_ones() {
        let x = Variable::from_vec(vec![1.0, 2.0]);
        let y = ops::square(&x).unwrap();
        y.backward_with(true, false).unwrap();
        assert_eq!(y.grad_value().unwrap().to_vec(), vec![1.0, 1.0]);
        assert_eq!(x.grad_value().unwrap().to_vec(), vec![2.0, 4.0]);
    }

    #[test]
    fn root_keeps_gradient_without_retain() {
        let x = Variable::scalar(3.0);
        let y = ops::square(&x).unwrap();
        y.backward().unwrap();
        assert!(y.grad().is_some());
        assert_eq!(x.grad_value().unwrap().item().unwrap(), 6.0);
    }

    #[test]
    fn intermediate_gradients_released_by_default() {
        let x = Variable::scalar(2.0);
        let a = ops::square(&x).unwrap();
        let y = ops::square(&a).unwrap();

        y.backward().unwrap();
        assert!(a.grad().is_none());
        assert!(x.grad().is_some());

        x.clear_grad();
        let a = ops::square(&x).unwrap();
        let y = ops::square(&a).unwrap();
        y.backward_with(true, false).unwrap();
        assert_eq!(a.grad_value().unwrap().item().unwrap(), 8.0);
        assert_eq!(x.grad_value().unwrap().item().unwrap(), 32.0);
    }

    #[test]
    fn explicit_seed_is_respected() {
        let x = Variable::from_vec(vec![1.0, 2.0, 3.0]);
        let y = ops::square(&x).unwrap();
        y.set_grad(Variable::from_vec(vec![1.0, 0.0, -1.0]));
        y.backward().unwrap();
        assert_eq!(x.grad_value().unwrap().to_vec(), vec![2.0, 0.0, -6.0]);
    }
}
