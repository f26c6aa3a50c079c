use crate::autograd::{apply1, Op};
use crate::error::GradixError;
use crate::ops::{broadcast_to, single_grad, unary};
use crate::tensor::Tensor;
use crate::variable::Variable;

/// Reduces a variable to a target shape by summing over broadcast axes.
///
/// The dual of [`broadcast_to`]: elementwise forward rules broadcast
/// silently, so their backward rules pass every gradient contribution
/// through here to recover the operand's original shape.
#[derive(Debug)]
struct SumTo {
    target: Vec<usize>,
    x_shape: Vec<usize>,
}

impl Op for SumTo {
    fn name(&self) -> &'static str {
        "sum_to"
    }

    fn forward(&mut self, xs: &[Tensor]) -> Result<Vec<Tensor>, GradixError> {
        let x = unary(xs, self.name())?;
        self.x_shape = x.shape().to_vec();
        Ok(vec![x.sum_to(&self.target)?])
    }

    fn backward(
        &self,
        _inputs: &[Variable],
        gys: &[Variable],
    ) -> Result<Vec<Variable>, GradixError> {
        let gy = single_grad(gys, self.name())?;
        Ok(vec![broadcast_to(gy, &self.x_shape)?])
    }
}

/// Sums `x` down to `target`. Identity (and not recorded) when the shape
/// already matches.
pub fn sum_to(x: &Variable, target: &[usize]) -> Result<Variable, GradixError> {
    if x.shape() == target {
        return Ok(x.clone());
    }
    apply1(
        Box::new(SumTo {
            target: target.to_vec(),
            x_shape: vec![],
        }),
        &[x.clone()],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reduces_and_backward_broadcasts() {
        let x = Variable::new(
            Tensor::new(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], vec![2, 3]).unwrap(),
        );
        let y = sum_to(&x, &[3]).unwrap();
        assert_eq!(y.value().to_vec(), vec![5.0, 7.0, 9.0]);

        y.backward().unwrap();
        let g = x.grad_value().unwrap();
        assert_eq!(g.shape(), &[2, 3]);
        assert_eq!(g.to_vec(), vec![1.0; 6]);
    }

    #[test]
    fn matching_shape_is_identity_and_unrecorded() {
        let x = Variable::from_vec(vec![1.0, 2.0]);
        let y = sum_to(&x, &[2]).unwrap();
        assert!(y.ptr_eq(&x));
        assert!(y.creator().is_none());
    }

    #[test]
    fn irreconcilable_target_errors() {
        let x = Variable::new(Tensor::new(vec![0.0; 6], vec![2, 3]).unwrap());
        assert!(matches!(
            sum_to(&x, &[2, 2]),
            Err(GradixError::ReduceError { .. })
        ));
    }
}
