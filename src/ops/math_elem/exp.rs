use crate::autograd::{apply1, Op};
use crate::error::GradixError;
use crate::ops::{mul, single_grad, unary, unary_input};
use crate::tensor::Tensor;
use crate::variable::Variable;

/// Elementwise exponential.
#[derive(Debug)]
struct Exp;

impl Op for Exp {
    fn name(&self) -> &'static str {
        "exp"
    }

    fn forward(&mut self, xs: &[Tensor]) -> Result<Vec<Tensor>, GradixError> {
        let x = unary(xs, self.name())?;
        Ok(vec![x.exp()])
    }

    fn backward(
        &self,
        inputs: &[Variable],
        gys: &[Variable],
    ) -> Result<Vec<Variable>, GradixError> {
        let gy = single_grad(gys, self.name())?;
        let x = unary_input(inputs, self.name())?;
        // d(e^x)/dx = e^x, recomputed from the input so the rule itself is
        // differentiable under create_graph.
        Ok(vec![mul(gy, &exp(x)?)?])
    }
}

pub fn exp(x: &Variable) -> Result<Variable, GradixError> {
    apply1(Box::new(Exp), &[x.clone()])
}
