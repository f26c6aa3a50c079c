use crate::autograd::{apply1, Op};
use crate::error::GradixError;
use crate::ops::{single_grad, unary};
use crate::tensor::Tensor;
use crate::variable::Variable;

#[derive(Debug)]
struct Reshape {
    target: Vec<usize>,
    x_shape: Vec<usize>,
}

impl Op for Reshape {
    fn name(&self) -> &'static str {
        "reshape"
    }

    fn forward(&mut self, xs: &[Tensor]) -> Result<Vec<Tensor>, GradixError> {
        let x = unary(xs, self.name())?;
        self.x_shape = x.shape().to_vec();
        Ok(vec![x.reshape(self.target.clone())?])
    }

    fn backward(
        &self,
        _inputs: &[Variable],
        gys: &[Variable],
    ) -> Result<Vec<Variable>, GradixError> {
        let gy = single_grad(gys, self.name())?;
        Ok(vec![reshape(gy, &self.x_shape)?])
    }
}

/// Reshapes `x`. Identity (and not recorded) when the shape already matches.
pub fn reshape(x: &Variable, shape: &[usize]) -> Result<Variable, GradixError> {
    if x.shape() == shape {
        return Ok(x.clone());
    }
    apply1(
        Box::new(Reshape {
            target: shape.to_vec(),
            x_shape: vec![],
        }),
        &[x.clone()],
    )
}
