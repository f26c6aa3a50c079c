use crate::autograd::{apply1, Op};
use crate::error::GradixError;
use crate::ops::{binary, binary_inputs, mul, neg, single_grad, sum_to};
use crate::tensor::Tensor;
use crate::variable::Variable;

/// Elementwise division with broadcasting.
#[derive(Debug, Default)]
struct Div {
    x0_shape: Vec<usize>,
    x1_shape: Vec<usize>,
}

impl Op for Div {
    fn name(&self) -> &'static str {
        "div"
    }

    fn forward(&mut self, xs: &[Tensor]) -> Result<Vec<Tensor>, GradixError> {
        let (x0, x1) = binary(xs, self.name())?;
        self.x0_shape = x0.shape().to_vec();
        self.x1_shape = x1.shape().to_vec();
        Ok(vec![x0.div(x1)?])
    }

    fn backward(
        &self,
        inputs: &[Variable],
        gys: &[Variable],
    ) -> Result<Vec<Variable>, GradixError> {
        let gy = single_grad(gys, self.name())?;
        let (x0, x1) = binary_inputs(inputs, self.name())?;

        // d(x0/x1)/dx0 = 1/x1, d(x0/x1)/dx1 = -x0/x1^2
        let gx0 = div(gy, x1)?;
        let gx1 = mul(gy, &div(&neg(x0)?, &mul(x1, x1)?)?)?;

        Ok(vec![
            sum_to(&gx0, &self.x0_shape)?,
            sum_to(&gx1, &self.x1_shape)?,
        ])
    }
}

pub fn div(x0: &Variable, x1: &Variable) -> Result<Variable, GradixError> {
    apply1(Box::new(Div::default()), &[x0.clone(), x1.clone()])
}
