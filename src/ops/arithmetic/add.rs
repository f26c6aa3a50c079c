use crate::autograd::{apply1, Op};
use crate::error::GradixError;
use crate::ops::{binary, single_grad, sum_to};
use crate::tensor::Tensor;
use crate::variable::Variable;

/// Elementwise addition with broadcasting.
///
/// Forward broadcasts silently, so backward reduces each gradient back to
/// its operand's original shape.
#[derive(Debug, Default)]
struct Add {
    x0_shape: Vec<usize>,
    x1_shape: Vec<usize>,
}

impl Op for Add {
    fn name(&self) -> &'static str {
        "add"
    }

    fn forward(&mut self, xs: &[Tensor]) -> Result<Vec<Tensor>, GradixError> {
        let (x0, x1) = binary(xs, self.name())?;
        self.x0_shape = x0.shape().to_vec();
        self.x1_shape = x1.shape().to_vec();
        Ok(vec![x0.add(x1)?])
    }

    fn backward(
        &self,
        _inputs: &[Variable],
        gys: &[Variable],
    ) -> Result<Vec<Variable>, GradixError> {
        let gy = single_grad(gys, self.name())?;
        let gx0 = sum_to(gy, &self.x0_shape)?;
        let gx1 = sum_to(gy, &self.x1_shape)?;
        Ok(vec![gx0, gx1])
    }
}

pub fn add(x0: &Variable, x1: &Variable) -> Result<Variable, GradixError> {
    apply1(Box::new(Add::default()), &[x0.clone(), x1.clone()])
}
