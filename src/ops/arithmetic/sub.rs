use crate::autograd::{apply1, Op};
use crate::error::GradixError;
use crate::ops::{binary, neg, single_grad, sum_to};
use crate::tensor::Tensor;
use crate::variable::Variable;

/// Elementwise subtraction with broadcasting.
#[derive(Debug, Default)]
struct Sub {
    x0_shape: Vec<usize>,
    x1_shape: Vec<usize>,
}

impl Op for Sub {
    fn name(&self) -> &'static str {
        "sub"
    }

    fn forward(&mut self, xs: &[Tensor]) -> Result<Vec<Tensor>, GradixError> {
        let (x0, x1) = binary(xs, self.name())?;
        self.x0_shape = x0.shape().to_vec();
        self.x1_shape = x1.shape().to_vec();
        Ok(vec![x0.sub(x1)?])
    }

    fn backward(
        &self,
        _inputs: &[Variable],
        gys: &[Variable],
    ) -> Result<Vec<Variable>, GradixError> {
        let gy = single_grad(gys, self.name())?;
        let gx0 = sum_to(gy, &self.x0_shape)?;
        let gx1 = sum_to(&neg(gy)?, &self.x1_shape)?;
        Ok(vec![gx0, gx1])
    }
}

pub fn sub(x0: &Variable, x1: &Variable) -> Result<Variable, GradixError> {
    apply1(Box::new(Sub::default()), &[x0.clone(), x1.clone()])
}
