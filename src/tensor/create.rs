//! Tensor creation helpers.

use rand::Rng;
use rand_distr::{Distribution, StandardNormal};

use crate::error::GradixError;
use crate::tensor::Tensor;

/// Creates a tensor filled with zeros with the specified shape.
pub fn zeros(shape: &[usize]) -> Result<Tensor, GradixError> {
    full(shape, 0.0)
}

/// Creates a tensor filled with ones with the specified shape.
pub fn ones(shape: &[usize]) -> Result<Tensor, GradixError> {
    full(shape, 1.0)
}

/// Creates a tensor filled with `value` with the specified shape.
pub fn full(shape: &[usize], value: f64) -> Result<Tensor, GradixError> {
    let numel = shape.iter().product();
    Tensor::new(vec![value; numel], shape.to_vec())
}

/// Creates a zero tensor with the same shape as `tensor`.
pub fn zeros_like(tensor: &Tensor) -> Result<Tensor, GradixError> {
    zeros(tensor.shape())
}

/// Creates a ones tensor with the same shape as `tensor`.
/// Backward seeds the root gradient with this.
pub fn ones_like(tensor: &Tensor) -> Result<Tensor, GradixError> {
    ones(tensor.shape())
}

/// Creates a tensor with elements drawn uniformly from `[0, 1)`.
pub fn rand(shape: &[usize]) -> Result<Tensor, GradixError> {
    let numel: usize = shape.iter().product();
    let mut rng = rand::thread_rng();
    let data: Vec<f64> = (0..numel).map(|_| rng.gen::<f64>()).collect();
    Tensor::new(data, shape.to_vec())
}

/// Creates a tensor with elements drawn from the standard normal distribution.
pub fn randn(shape: &[usize]) -> Result<Tensor, GradixError> {
    let numel: usize = shape.iter().product();
    let mut rng = rand::thread_rng();
    let data: Vec<f64> = (0..numel).map(|_| StandardNormal.sample(&mut rng)).collect();
    Tensor::new(data, shape.to_vec())
}
