use crate::autograd::{apply1, Op};
use crate::error::GradixError;
use crate::ops::{broadcast_to, reshape, single_grad, unary};
use crate::tensor::Tensor;
use crate::variable::Variable;

/// Axis-set summation with optional axis retention.
#[derive(Debug)]
struct Sum {
    axes: Option<Vec<usize>>,
    keepdims: bool,
    x_shape: Vec<usize>,
}

impl Op for Sum {
    fn name(&self) -> &'static str {
        "sum"
    }

    fn forward(&mut self, xs: &[Tensor]) -> Result<Vec<Tensor>, GradixError> {
        let x = unary(xs, self.name())?;
        self.x_shape = x.shape().to_vec();
        Ok(vec![x.sum(self.axes.as_deref(), self.keepdims)?])
    }

    fn backward(
        &self,
        _inputs: &[Variable],
        gys: &[Variable],
    ) -> Result<Vec<Variable>, GradixError> {
        let gy = single_grad(gys, self.name())?;
        // Restore the reduced axes at size 1 so the broadcast lines up, then
        // expand back to the input shape.
        let mut kept = self.x_shape.clone();
        match &self.axes {
            None => kept.iter_mut().for_each(|d| *d = 1),
            Some(axes) => {
                for &axis in axes {
                    kept[axis] = 1;
                }
            }
        }
        let gx = broadcast_to(&reshape(gy, &kept)?, &self.x_shape)?;
        Ok(vec![gx])
    }
}

pub fn sum(x: &Variable, axes: Option<&[usize]>, keepdims: bool) -> Result<Variable, GradixError> {
    apply1(
        Box::new(Sum {
            axes: axes.map(<[usize]>::to_vec),
            keepdims,
            x_shape: vec![],
        }),
        &[x.clone()],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tensor;

    #[test]
    fn total_sum_backward_is_ones() {
        let x = Variable::new(Tensor::new(vec![1.0, 2.0, 3.0, 4.0], vec![2, 2]).unwrap());
        let y = sum(&x, None, false).unwrap();
        assert_eq!(y.item().unwrap(), 10.0);

        y.backward().unwrap();
        let g = x.grad_value().unwrap();
        assert_eq!(g.shape(), &[2, 2]);
        assert_eq!(g.to_vec(), vec![1.0; 4]);
    }

    #[test]
    fn axis_sum_broadcasts_gradient_back() {
        let x = Variable::new(
            Tensor::new(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], vec![2, 3]).unwrap(),
        );
        let y = sum(&x, Some(&[1]), false).unwrap();
        assert_eq!(y.value().to_vec(), vec![6.0, 15.0]);

        y.set_grad(Variable::from_vec(vec![10.0, 20.0]));
        y.backward().unwrap();
        let g = x.grad_value().unwrap();
        assert_eq!(g.shape(), &[2, 3]);
        assert_eq!(g.to_vec(), vec![10.0, 10.0, 10.0, 20.0, 20.0, 20.0]);
    }

    #[test]
    fn keepdims_sum() {
        let x = Variable::new(tensor::ones(&[2, 3]).unwrap());
        let y = sum(&x, Some(&[0]), true).unwrap();
        assert_eq!(y.shape(), vec![1, 3]);

        y.backward().unwrap();
        assert_eq!(x.grad_value().unwrap().to_vec(), vec![1.0; 6]);
    }
}
