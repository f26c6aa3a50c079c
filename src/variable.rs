//! The graph node type: a tensor value plus autograd metadata.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::autograd::OpNode;
use crate::error::GradixError;
use crate::ops;
use crate::tensor::Tensor;

/// A node in the dynamically recorded computation graph.
///
/// `Variable` wraps `Rc<RefCell<VariableData>>`: clones share the node, and
/// autograd metadata (gradient, creator link) is updated through interior
/// mutability. The engine is single-threaded, so `Rc`/`RefCell` suffice.
///
/// Reference directionality is the load-bearing invariant: a `Variable`
/// strongly owns its creator [`OpNode`], while the `OpNode` holds only weak
/// handles to its outputs. A strong link in both directions would keep every
/// output alive together with its whole producing subgraph, an uncollectable
/// cycle.
#[derive(Clone)]
pub struct Variable {
    pub(crate) inner: Rc<RefCell<VariableData>>,
}

pub(crate) struct VariableData {
    pub(crate) value: Tensor,
    /// The gradient is itself a `Variable` so that, under `create_graph`, it
    /// carries a recorded graph and can be differentiated again.
    pub(crate) grad: Option<Variable>,
    /// Owning back-pointer to the producing operation; `None` for leaves.
    pub(crate) creator: Option<Rc<OpNode>>,
    /// Topological depth: `creator.generation + 1`, or 0 for leaves.
    pub(crate) generation: u32,
    pub(crate) name: Option<String>,
}

impl Variable {
    /// Creates a leaf variable (generation 0, no creator).
    pub fn new(value: Tensor) -> Self {
        Variable {
            inner: Rc::new(RefCell::new(VariableData {
                value,
                grad: None,
                creator: None,
                generation: 0,
                name: None,
            })),
        }
    }

    /// Creates a named leaf variable.
    pub fn with_name(value: Tensor, name: impl Into<String>) -> Self {
        let v = Variable::new(value);
        v.set_name(name);
        v
    }

    /// Creates a 0-dimensional leaf variable.
    pub fn scalar(value: f64) -> Self {
        Variable::new(Tensor::scalar(value))
    }

    /// Creates a 1-dimensional leaf variable.
    pub fn from_vec(data: Vec<f64>) -> Self {
        Variable::new(Tensor::from_vec(data))
    }

    /// Returns the wrapped tensor value (cheap clone, shared buffer).
    pub fn value(&self) -> Tensor {
        self.inner.borrow().value.clone()
    }

    pub fn shape(&self) -> Vec<usize> {
        self.inner.borrow().value.shape().to_vec()
    }

    pub fn ndim(&self) -> usize {
        self.inner.borrow().value.ndim()
    }

    pub fn numel(&self) -> usize {
        self.inner.borrow().value.numel()
    }

    /// Extracts the value of a single-element variable.
    pub fn item(&self) -> Result<f64, GradixError> {
        self.inner.borrow().value.item()
    }

    /// Returns the accumulated gradient, if any.
    pub fn grad(&self) -> Option<Variable> {
        self.inner.borrow().grad.clone()
    }

    /// Returns the gradient's tensor value, if any.
    pub fn grad_value(&self) -> Option<Tensor> {
        self.grad().map(|g| g.value())
    }

    /// Clears the accumulated gradient. Call between backward passes when a
    /// leaf is reused, otherwise gradients keep summing.
    pub fn clear_grad(&self) {
        self.inner.borrow_mut().grad = None;
    }

    pub(crate) fn set_grad(&self, grad: Variable) {
        self.inner.borrow_mut().grad = Some(grad);
    }

    /// Adds `gx` into the stored gradient, out of place: the previous
    /// gradient tensor may still be referenced elsewhere (shared inputs, or
    /// nodes kept alive by `create_graph`), so it is never mutated.
    pub(crate) fn accumulate_grad(&self, gx: Variable) -> Result<(), GradixError> {
        let updated = match self.grad() {
            Some(existing) => ops::add(&existing, &gx)?,
            None => gx,
        };
        self.set_grad(updated);
        Ok(())
    }

    pub fn name(&self) -> Option<String> {
        self.inner.borrow().name.clone()
    }

    pub fn set_name(&self, name: impl Into<String>) {
        self.inner.borrow_mut().name = Some(name.into());
    }

    /// The operation that produced this variable, or `None` for leaves.
    /// Exposed read-only for graph introspection.
    pub fn creator(&self) -> Option<Rc<OpNode>> {
        self.inner.borrow().creator.clone()
    }

    /// Topological depth of this node.
    pub fn generation(&self) -> u32 {
        self.inner.borrow().generation
    }

    /// Links this variable to its producing operation and derives its
    /// generation from it.
    pub(crate) fn set_creator(&self, node: Rc<OpNode>) {
        let mut data = self.inner.borrow_mut();
        data.generation = node.generation() + 1;
        data.creator = Some(node);
    }

    pub(crate) fn downgrade(&self) -> Weak<RefCell<VariableData>> {
        Rc::downgrade(&self.inner)
    }

    pub(crate) fn from_inner(inner: Rc<RefCell<VariableData>>) -> Self {
        Variable { inner }
    }

    /// Whether two handles refer to the same graph node.
    pub fn ptr_eq(&self, other: &Variable) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    // --- Convenience forwarding to the recorded ops ---

    pub fn reshape(&self, shape: &[usize]) -> Result<Variable, GradixError> {
        ops::reshape(self, shape)
    }

    pub fn transpose(&self) -> Result<Variable, GradixError> {
        ops::transpose(self)
    }

    pub fn sum(&self, axes: Option<&[usize]>, keepdims: bool) -> Result<Variable, GradixError> {
        ops::sum(self, axes, keepdims)
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.inner.borrow();
        write!(f, "variable({:?})", data.value.as_slice())
    }
}

impl fmt::Debug for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.inner.borrow();
        f.debug_struct("Variable")
            .field("name", &data.name)
            .field("shape", &data.value.shape())
            .field("generation", &data.generation)
            .field("creator", &data.creator.as_ref().map(|c| c.name()))
            .finish()
    }
}
