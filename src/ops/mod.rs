//! Differentiable primitive operations on [`Variable`]s.

pub mod arithmetic;
pub mod linalg;
pub mod math_elem;
pub mod operators;
pub mod reduction;
pub mod view;

pub use arithmetic::{add, div, mul, neg, pow, square, sub};
pub use linalg::matmul;
pub use math_elem::{cos, exp, sin};
pub use reduction::{sum, sum_to};
pub use view::{broadcast_to, reshape, transpose};

use crate::error::GradixError;
use crate::tensor::Tensor;
use crate::variable::Variable;

// Arity helpers for forward/backward rules. A wrong count can only come from
// a miswired primitive, so these report it as an internal defect.

pub(crate) fn unary<'a>(xs: &'a [Tensor], operation: &'static str) -> Result<&'a Tensor, GradixError> {
    match xs {
        [x] => Ok(x),
        _ => Err(arity_error(operation, 1, xs.len())),
    }
}

pub(crate) fn binary<'a>(
    xs: &'a [Tensor],
    operation: &'static str,
) -> Result<(&'a Tensor, &'a Tensor), GradixError> {
    match xs {
        [x0, x1] => Ok((x0, x1)),
        _ => Err(arity_error(operation, 2, xs.len())),
    }
}

pub(crate) fn unary_input<'a>(
    inputs: &'a [Variable],
    operation: &'static str,
) -> Result<&'a Variable, GradixError> {
    match inputs {
        [x] => Ok(x),
        _ => Err(arity_error(operation, 1, inputs.len())),
    }
}

pub(crate) fn binary_inputs<'a>(
    inputs: &'a [Variable],
    operation: &'static str,
) -> Result<(&'a Variable, &'a Variable), GradixError> {
    match inputs {
        [x0, x1] => Ok((x0, x1)),
        _ => Err(arity_error(operation, 2, inputs.len())),
    }
}

pub(crate) fn single_grad<'a>(
    gys: &'a [Variable],
    operation: &'static str,
) -> Result<&'a Variable, GradixError> {
    match gys {
        [gy] => Ok(gy),
        _ => Err(arity_error(operation, 1, gys.len())),
    }
}

fn arity_error(operation: &'static str, expected: usize, actual: usize) -> GradixError {
    GradixError::InternalError(format!(
        "operation '{operation}' received {actual} operands, expected {expected}"
    ))
}
