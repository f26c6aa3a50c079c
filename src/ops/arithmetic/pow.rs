use crate::autograd::{apply1, Op};
use crate::error::GradixError;
use crate::ops::{mul, single_grad, unary, unary_input};
use crate::tensor::Tensor;
use crate::variable::Variable;

/// Elementwise power with a constant exponent.
#[derive(Debug)]
struct Pow {
    c: f64,
}

impl Op for Pow {
    fn name(&self) -> &'static str {
        "pow"
    }

    fn forward(&mut self, xs: &[Tensor]) -> Result<Vec<Tensor>, GradixError> {
        let x = unary(xs, self.name())?;
        Ok(vec![x.powf(self.c)])
    }

    fn backward(
        &self,
        inputs: &[Variable],
        gys: &[Variable],
    ) -> Result<Vec<Variable>, GradixError> {
        let gy = single_grad(gys, self.name())?;
        let x = unary_input(inputs, self.name())?;
        // d(x^c)/dx = c * x^(c-1)
        let gx = mul(gy, &mul(&pow(x, self.c - 1.0)?, &Variable::scalar(self.c))?)?;
        Ok(vec![gx])
    }
}

pub fn pow(x: &Variable, c: f64) -> Result<Variable, GradixError> {
    apply1(Box::new(Pow { c }), &[x.clone()])
}

/// Convenience wrapper for the ubiquitous `x^2`.
pub fn square(x: &Variable) -> Result<Variable, GradixError> {
    pow(x, 2.0)
}
