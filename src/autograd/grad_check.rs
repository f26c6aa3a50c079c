//! Finite-difference gradient checking.
//!
//! Verifies analytical gradients produced by [`Variable::backward`] against
//! central differences of the summed output. The loss is `sum(f(inputs))`,
//! which is exactly what the default ones-seeded backward differentiates.

use approx::{abs_diff_eq, relative_eq};
use thiserror::Error;

use crate::config;
use crate::error::GradixError;
use crate::tensor::Tensor;
use crate::variable::Variable;

/// Error type specifically for gradient checking failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GradCheckError {
    #[error("gradient check failed for input {input_index}, element {element_index}: analytical {analytical} != numerical {numerical} (difference {difference})")]
    GradientMismatch {
        input_index: usize,
        element_index: usize,
        analytical: f64,
        numerical: f64,
        difference: f64,
    },

    #[error("input {input_index} has no gradient after the backward pass")]
    MissingAnalyticalGrad { input_index: usize },

    #[error("numerical gradient is not finite for input {input_index}, element {element_index}")]
    NumericalGradNotFinite {
        input_index: usize,
        element_index: usize,
    },

    #[error("engine error during gradient check: {0}")]
    Engine(#[from] GradixError),
}

/// Checks the analytical gradients of `func` at `inputs` against central
/// finite differences.
///
/// Every input is treated as differentiable; the scalar loss is the sum of
/// the output's elements. `epsilon` is the perturbation step, `tolerance`
/// bounds both the absolute and the relative deviation.
pub fn check_grad<F>(
    func: F,
    inputs: &[Variable],
    epsilon: f64,
    tolerance: f64,
) -> Result<(), GradCheckError>
where
    F: Fn(&[Variable]) -> Result<Variable, GradixError>,
{
    for input in inputs {
        input.clear_grad();
    }
    let output = func(inputs)?;
    output.backward()?;

    let analytical: Vec<Vec<f64>> = inputs
        .iter()
        .enumerate()
        .map(|(i, input)| {
            input
                .grad_value()
                .map(|g| g.to_vec())
                .ok_or(GradCheckError::MissingAnalyticalGrad { input_index: i })
        })
        .collect::<Result<_, _>>()?;

    for (i, input) in inputs.iter().enumerate() {
        let base = input.value().to_vec();
        let shape = input.shape();

        for elem in 0..base.len() {
            let loss_plus = perturbed_loss(&func, inputs, i, elem, epsilon, &base, &shape)?;
            let loss_minus = perturbed_loss(&func, inputs, i, elem, -epsilon, &base, &shape)?;
            let numerical = (loss_plus - loss_minus) / (2.0 * epsilon);
            if !numerical.is_finite() {
                return Err(GradCheckError::NumericalGradNotFinite {
                    input_index: i,
                    element_index: elem,
                });
            }

            let value = analytical[i][elem];
            let close = abs_diff_eq!(value, numerical, epsilon = tolerance)
                || relative_eq!(value, numerical, max_relative = tolerance);
            if !close {
                return Err(GradCheckError::GradientMismatch {
                    input_index: i,
                    element_index: elem,
                    analytical: value,
                    numerical,
                    difference: (value - numerical).abs(),
                });
            }
        }
    }

    Ok(())
}

/// Runs `func` with input `input_index` perturbed by `delta` at `elem`,
/// recording disabled, and returns the summed output.
fn perturbed_loss<F>(
    func: &F,
    inputs: &[Variable],
    input_index: usize,
    elem: usize,
    delta: f64,
    base: &[f64],
    shape: &[usize],
) -> Result<f64, GradCheckError>
where
    F: Fn(&[Variable]) -> Result<Variable, GradixError>,
{
    let mut data = base.to_vec();
    data[elem] += delta;
    let mut probe: Vec<Variable> = inputs.to_vec();
    probe[input_index] = Variable::new(Tensor::new(data, shape.to_vec())?);

    let _guard = config::no_grad();
    let output = func(&probe)?;
    Ok(output.value().sum(None, false)?.item()?)
}
