use crate::autograd::{apply1, Op};
use crate::error::GradixError;
use crate::ops::{single_grad, unary};
use crate::tensor::Tensor;
use crate::variable::Variable;

/// Elementwise negation.
#[derive(Debug)]
struct Neg;

impl Op for Neg {
    fn name(&self) -> &'static str {
        "neg"
    }

    fn forward(&mut self, xs: &[Tensor]) -> Result<Vec<Tensor>, GradixError> {
        let x = unary(xs, self.name())?;
        Ok(vec![x.neg()])
    }

    fn backward(
        &self,
        _inputs: &[Variable],
        gys: &[Variable],
    ) -> Result<Vec<Variable>, GradixError> {
        let gy = single_grad(gys, self.name())?;
        Ok(vec![neg(gy)?])
    }
}

pub fn neg(x: &Variable) -> Result<Variable, GradixError> {
    apply1(Box::new(Neg), &[x.clone()])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_and_backward() {
        let x = Variable::from_vec(vec![1.0, -2.0]);
        let y = neg(&x).unwrap();
        assert_eq!(y.value().to_vec(), vec![-1.0, 2.0]);

        y.backward().unwrap();
        assert_eq!(x.grad_value().unwrap().to_vec(), vec![-1.0, -1.0]);
    }
}
