use crate::autograd::{apply1, Op};
use crate::error::GradixError;
use crate::ops::{single_grad, unary};
use crate::tensor::Tensor;
use crate::variable::Variable;

/// Axis-reversing transpose; its own inverse, so backward transposes the
/// gradient back.
#[derive(Debug)]
struct Transpose;

impl Op for Transpose {
    fn name(&self) -> &'static str {
        "transpose"
    }

    fn forward(&mut self, xs: &[Tensor]) -> Result<Vec<Tensor>, GradixError> {
        let x = unary(xs, self.name())?;
        Ok(vec![x.transpose()])
    }

    fn backward(
        &self,
        _inputs: &[Variable],
        gys: &[Variable],
    ) -> Result<Vec<Variable>, GradixError> {
        let gy = single_grad(gys, self.name())?;
        Ok(vec![transpose(gy)?])
    }
}

pub fn transpose(x: &Variable) -> Result<Variable, GradixError> {
    apply1(Box::new(Transpose), &[x.clone()])
}
