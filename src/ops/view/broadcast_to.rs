use crate::autograd::{apply1, Op};
use crate::error::GradixError;
use crate::ops::{single_grad, sum_to, unary};
use crate::tensor::Tensor;
use crate::variable::Variable;

/// Expands a variable to a target shape per broadcasting rules.
///
/// The dual of [`sum_to`]: backward sums the incoming gradient over every
/// broadcast axis, including newly introduced leading ones.
#[derive(Debug)]
struct BroadcastTo {
    target: Vec<usize>,
    x_shape: Vec<usize>,
}

impl Op for BroadcastTo {
    fn name(&self) -> &'static str {
        "broadcast_to"
    }

    fn forward(&mut self, xs: &[Tensor]) -> Result<Vec<Tensor>, GradixError> {
        let x = unary(xs, self.name())?;
        self.x_shape = x.shape().to_vec();
        Ok(vec![x.broadcast_to(&self.target)?])
    }

    fn backward(
        &self,
        _inputs: &[Variable],
        gys: &[Variable],
    ) -> Result<Vec<Variable>, GradixError> {
        let gy = single_grad(gys, self.name())?;
        Ok(vec![sum_to(gy, &self.x_shape)?])
    }
}

/// Broadcasts `x` up to `target`. Identity (and not recorded) when the shape
/// already matches.
pub fn broadcast_to(x: &Variable, target: &[usize]) -> Result<Variable, GradixError> {
    if x.shape() == target {
        return Ok(x.clone());
    }
    apply1(
        Box::new(BroadcastTo {
            target: target.to_vec(),
            x_shape: vec![],
        }),
        &[x.clone()],
    )
}
