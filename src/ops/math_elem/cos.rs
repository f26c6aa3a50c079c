use crate::autograd::{apply1, Op};
use crate::error::GradixError;
use crate::ops::{mul, neg, sin, single_grad, unary, unary_input};
use crate::tensor::Tensor;
use crate::variable::Variable;

/// Elementwise cosine.
#[derive(Debug)]
struct Cos;

impl Op for Cos {
    fn name(&self) -> &'static str {
        "cos"
    }

    fn forward(&mut self, xs: &[Tensor]) -> Result<Vec<Tensor>, GradixError> {
        let x = unary(xs, self.name())?;
        Ok(vec![x.cos()])
    }

    fn backward(
        &self,
        inputs: &[Variable],
        gys: &[Variable],
    ) -> Result<Vec<Variable>, GradixError> {
        let gy = single_grad(gys, self.name())?;
        let x = unary_input(inputs, self.name())?;
        Ok(vec![neg(&mul(gy, &sin(x)?)?)?])
    }
}

pub fn cos(x: &Variable) -> Result<Variable, GradixError> {
    apply1(Box::new(Cos), &[x.clone()])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_3;

    #[test]
    fn forward_and_backward() {
        let x = Variable::scalar(FRAC_PI_3);
        let y = cos(&x).unwrap();
        assert_relative_eq!(y.item().unwrap(), FRAC_PI_3.cos(), max_relative = 1e-12);

        y.backward().unwrap();
        assert_relative_eq!(
            x.grad_value().unwrap().item().unwrap(),
            -FRAC_PI_3.sin(),
            max_relative = 1e-12
        );
    }
}
