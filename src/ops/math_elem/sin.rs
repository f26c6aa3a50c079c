use crate::autograd::{apply1, Op};
use crate::error::GradixError;
use crate::ops::{cos, mul, single_grad, unary, unary_input};
use crate::tensor::Tensor;
use crate::variable::Variable;

/// Elementwise sine.
#[derive(Debug)]
struct Sin;

impl Op for Sin {
    fn name(&self) -> &'static str {
        "sin"
    }

    fn forward(&mut self, xs: &[Tensor]) -> Result<Vec<Tensor>, GradixError> {
        let x = unary(xs, self.name())?;
        Ok(vec![x.sin()])
    }

    fn backward(
        &self,
        inputs: &[Variable],
        gys: &[Variable],
    ) -> Result<Vec<Variable>, GradixError> {
        let gy = single_grad(gys, self.name())?;
        let x = unary_input(inputs, self.name())?;
        Ok(vec![mul(gy, &cos(x)?)?])
    }
}

pub fn sin(x: &Variable) -> Result<Variable, GradixError> {
    apply1(Box::new(Sin), &[x.clone()])
}
