use crate::autograd::{apply1, Op};
use crate::error::GradixError;
use crate::ops::{binary, binary_inputs, single_grad, sum_to};
use crate::tensor::Tensor;
use crate::variable::Variable;

/// Elementwise multiplication with broadcasting.
///
/// Each gradient contribution is formed at the broadcast shape first and
/// reduced to the operand's shape afterwards, so mixed-shape operands stay
/// consistent.
#[derive(Debug, Default)]
struct Mul {
    x0_shape: Vec<usize>,
    x1_shape: Vec<usize>,
}

impl Op for Mul {
    fn name(&self) -> &'static str {
        "mul"
    }

    fn forward(&mut self, xs: &[Tensor]) -> Result<Vec<Tensor>, GradixError> {
        let (x0, x1) = binary(xs, self.name())?;
        self.x0_shape = x0.shape().to_vec();
        self.x1_shape = x1.shape().to_vec();
        Ok(vec![x0.mul(x1)?])
    }

    fn backward(
        &self,
        inputs: &[Variable],
        gys: &[Variable],
    ) -> Result<Vec<Variable>, GradixError> {
        let gy = single_grad(gys, self.name())?;
        let (x0, x1) = binary_inputs(inputs, self.name())?;
        let gx0 = sum_to(&mul(gy, x1)?, &self.x0_shape)?;
        let gx1 = sum_to(&mul(gy, x0)?, &self.x1_shape)?;
        Ok(vec![gx0, gx1])
    }
}

pub fn mul(x0: &Variable, x1: &Variable) -> Result<Variable, GradixError> {
    apply1(Box::new(Mul::default()), &[x0.clone(), x1.clone()])
}
