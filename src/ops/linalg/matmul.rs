use crate::autograd::{apply1, Op};
use crate::error::GradixError;
use crate::ops::{binary, binary_inputs, single_grad, transpose};
use crate::tensor::Tensor;
use crate::variable::Variable;

/// 2-D matrix product.
#[derive(Debug)]
struct MatMul;

impl Op for MatMul {
    fn name(&self) -> &'static str {
        "matmul"
    }

    fn forward(&mut self, xs: &[Tensor]) -> Result<Vec<Tensor>, GradixError> {
        let (x, w) = binary(xs, self.name())?;
        Ok(vec![x.matmul(w)?])
    }

    fn backward(
        &self,
        inputs: &[Variable],
        gys: &[Variable],
    ) -> Result<Vec<Variable>, GradixError> {
        let gy = single_grad(gys, self.name())?;
        let (x, w) = binary_inputs(inputs, self.name())?;
        // gx = gy . W^T, gW = x^T . gy
        let gx = matmul(gy, &transpose(w)?)?;
        let gw = matmul(&transpose(x)?, gy)?;
        Ok(vec![gx, gw])
    }
}

pub fn matmul(x: &Variable, w: &Variable) -> Result<Variable, GradixError> {
    apply1(Box::new(MatMul), &[x.clone(), w.clone()])
}
