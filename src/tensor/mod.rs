//! Dense row-major f64 n-dimensional array.
//!
//! This is the plain value type the autograd engine wraps: it knows nothing
//! about graphs or gradients. The element buffer is shared behind an `Rc`,
//! so cloning a `Tensor` is cheap; every operation produces a fresh
//! contiguous buffer.

pub mod create;
pub mod utils;

pub use create::{full, ones, ones_like, rand, randn, zeros, zeros_like};

use std::fmt;
use std::rc::Rc;

use crate::error::GradixError;
use utils::{broadcast_shapes, calculate_strides, index_to_coord, reduction_axes};

/// A dense, contiguous, row-major f64 array with shared storage.
#[derive(Clone, PartialEq)]
pub struct Tensor {
    data: Rc<Vec<f64>>,
    shape: Vec<usize>,
}

impl Tensor {
    /// Creates a tensor from a flat row-major buffer and a shape.
    ///
    /// # Errors
    /// Returns [`GradixError::TensorCreationError`] if the buffer length does
    /// not match the number of elements the shape describes.
    pub fn new(data: Vec<f64>, shape: Vec<usize>) -> Result<Self, GradixError> {
        let numel: usize = shape.iter().product();
        if data.len() != numel {
            return Err(GradixError::TensorCreationError {
                data_len: data.len(),
                shape,
            });
        }
        Ok(Tensor {
            data: Rc::new(data),
            shape,
        })
    }

    /// Creates a 0-dimensional tensor holding a single value.
    pub fn scalar(value: f64) -> Self {
        Tensor {
            data: Rc::new(vec![value]),
            shape: vec![],
        }
    }

    /// Creates a 1-dimensional tensor from a vector.
    pub fn from_vec(data: Vec<f64>) -> Self {
        let len = data.len();
        Tensor {
            data: Rc::new(data),
            shape: vec![len],
        }
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    pub fn numel(&self) -> usize {
        self.shape.iter().product()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.data.as_ref().clone()
    }

    /// Extracts the value of a single-element tensor.
    ///
    /// # Errors
    /// Returns [`GradixError::NotScalar`] if the tensor holds more or fewer
    /// than one element.
    pub fn item(&self) -> Result<f64, GradixError> {
        if self.numel() != 1 {
            return Err(GradixError::NotScalar {
                shape: self.shape.clone(),
            });
        }
        Ok(self.data[0])
    }

    // --- Elementwise unary kernels ---

    /// Applies `f` to every element, producing a new tensor of the same shape.
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Tensor {
        Tensor {
            data: Rc::new(self.data.iter().map(|&x| f(x)).collect()),
            shape: self.shape.clone(),
        }
    }

    pub fn neg(&self) -> Tensor {
        self.map(|x| -x)
    }

    pub fn powf(&self, c: f64) -> Tensor {
        self.map(|x| x.powf(c))
    }

    pub fn exp(&self) -> Tensor {
        self.map(f64::exp)
    }

    pub fn sin(&self) -> Tensor {
        self.map(f64::sin)
    }

    pub fn cos(&self) -> Tensor {
        self.map(f64::cos)
    }

    // --- Elementwise binary kernels (broadcasting) ---

    pub fn add(&self, other: &Tensor) -> Result<Tensor, GradixError> {
        self.broadcast_zip(other, |a, b| a + b)
    }

    pub fn sub(&self, other: &Tensor) -> Result<Tensor, GradixError> {
        self.broadcast_zip(other, |a, b| a - b)
    }

    pub fn mul(&self, other: &Tensor) -> Result<Tensor, GradixError> {
        self.broadcast_zip(other, |a, b| a * b)
    }

    pub fn div(&self, other: &Tensor) -> Result<Tensor, GradixError> {
        self.broadcast_zip(other, |a, b| a / b)
    }

    /// Applies `f` pairwise after broadcasting both operands to their common
    /// shape.
    pub fn broadcast_zip(
        &self,
        other: &Tensor,
        f: impl Fn(f64, f64) -> f64,
    ) -> Result<Tensor, GradixError> {
        if self.shape == other.shape {
            let data: Vec<f64> = self
                .data
                .iter()
                .zip(other.data.iter())
                .map(|(&a, &b)| f(a, b))
                .collect();
            return Ok(Tensor {
                data: Rc::new(data),
                shape: self.shape.clone(),
            });
        }

        let out_shape = broadcast_shapes(&self.shape, &other.shape)?;
        let out_strides = calculate_strides(&out_shape);
        let numel: usize = out_shape.iter().product();
        let mut data = Vec::with_capacity(numel);
        for i in 0..numel {
            let coord = index_to_coord(i, &out_strides, &out_shape);
            let a = self.data[self.broadcast_offset(&coord, out_shape.len())];
            let b = other.data[other.broadcast_offset(&coord, out_shape.len())];
            data.push(f(a, b));
        }
        Ok(Tensor {
            data: Rc::new(data),
            shape: out_shape,
        })
    }

    /// Maps a coordinate in a broadcast result back to a linear offset in this
    /// tensor's buffer. Axes this tensor lacks are skipped; axes of size 1 are
    /// clamped to index 0.
    fn broadcast_offset(&self, out_coord: &[usize], out_rank: usize) -> usize {
        let strides = calculate_strides(&self.shape);
        let rank_diff = out_rank - self.shape.len();
        let mut offset = 0;
        for (i, &dim) in self.shape.iter().enumerate() {
            let idx = if dim == 1 { 0 } else { out_coord[rank_diff + i] };
            offset += idx * strides[i];
        }
        offset
    }

    // --- Reductions ---

    /// Sums over the given axes; `None` sums every element down to a scalar.
    /// With `keepdims`, reduced axes are retained with size 1.
    pub fn sum(&self, axes: Option<&[usize]>, keepdims: bool) -> Result<Tensor, GradixError> {
        let rank = self.shape.len();
        let axes: Vec<usize> = match axes {
            None => (0..rank).collect(),
            Some(axes) => {
                for &axis in axes {
                    if axis >= rank {
                        return Err(GradixError::InvalidAxis { axis, rank });
                    }
                }
                axes.to_vec()
            }
        };

        // Reduced shape with the summed axes kept at size 1.
        let mut kept_shape = self.shape.clone();
        for &axis in &axes {
            kept_shape[axis] = 1;
        }
        let kept_strides = calculate_strides(&kept_shape);
        let out_numel: usize = kept_shape.iter().product();
        let mut out = vec![0.0; out_numel];

        let in_strides = calculate_strides(&self.shape);
        for (i, &value) in self.data.iter().enumerate() {
            let mut coord = index_to_coord(i, &in_strides, &self.shape);
            for &axis in &axes {
                coord[axis] = 0;
            }
            let mut offset = 0;
            for (c, s) in coord.iter().zip(kept_strides.iter()) {
                offset += c * s;
            }
            out[offset] += value;
        }

        let out_shape = if keepdims {
            kept_shape
        } else {
            self.shape
                .iter()
                .enumerate()
                .filter(|(i, _)| !axes.contains(i))
                .map(|(_, &d)| d)
                .collect()
        };
        Ok(Tensor {
            data: Rc::new(out),
            shape: out_shape,
        })
    }

    /// Sums this tensor down to `target` shape over the axes `target` lacks
    /// or holds at size 1. The value-level half of the broadcast/reduce dual.
    pub fn sum_to(&self, target: &[usize]) -> Result<Tensor, GradixError> {
        if self.shape == target {
            return Ok(self.clone());
        }
        let axes = reduction_axes(&self.shape, target)?;
        let summed = self.sum(Some(&axes), true)?;
        // keepdims leaves the leading broadcast axes at size 1; squeeze them.
        summed.reshape(target.to_vec())
    }

    /// Expands this tensor to `target` per broadcasting rules, materializing
    /// the repeated elements.
    pub fn broadcast_to(&self, target: &[usize]) -> Result<Tensor, GradixError> {
        if self.shape == target {
            return Ok(self.clone());
        }
        // Valid iff every aligned source axis equals the target or is 1, and
        // no target axis is lost.
        let compatible = broadcast_shapes(&self.shape, target)
            .map(|result| result == target)
            .unwrap_or(false);
        if !compatible {
            return Err(GradixError::BroadcastError {
                shape1: self.shape.clone(),
                shape2: target.to_vec(),
            });
        }

        let out_strides = calculate_strides(target);
        let numel: usize = target.iter().product();
        let mut data = Vec::with_capacity(numel);
        for i in 0..numel {
            let coord = index_to_coord(i, &out_strides, target);
            data.push(self.data[self.broadcast_offset(&coord, target.len())]);
        }
        Ok(Tensor {
            data: Rc::new(data),
            shape: target.to_vec(),
        })
    }

    // --- Shape manipulation ---

    /// Reinterprets the buffer under a new shape with the same element count.
    /// The buffer is shared, not copied.
    pub fn reshape(&self, shape: Vec<usize>) -> Result<Tensor, GradixError> {
        let numel: usize = shape.iter().product();
        if numel != self.numel() {
            return Err(GradixError::ShapeMismatch {
                expected: self.shape.clone(),
                actual: shape,
                operation: "reshape".to_string(),
            });
        }
        Ok(Tensor {
            data: Rc::clone(&self.data),
            shape,
        })
    }

    /// Reverses the axis order (a full transpose). Scalars and vectors are
    /// returned unchanged.
    pub fn transpose(&self) -> Tensor {
        if self.ndim() < 2 {
            return self.clone();
        }
        let out_shape: Vec<usize> = self.shape.iter().rev().cloned().collect();
        let out_strides = calculate_strides(&out_shape);
        let in_strides = calculate_strides(&self.shape);
        let rank = self.ndim();
        let mut data = vec![0.0; self.numel()];
        for (i, &value) in self.data.iter().enumerate() {
            let coord = index_to_coord(i, &in_strides, &self.shape);
            let mut offset = 0;
            for (axis, &c) in coord.iter().enumerate() {
                offset += c * out_strides[rank - 1 - axis];
            }
            data[offset] = value;
        }
        Tensor {
            data: Rc::new(data),
            shape: out_shape,
        }
    }

    /// 2-D matrix product: `(m, k) x (k, n) -> (m, n)`.
    pub fn matmul(&self, other: &Tensor) -> Result<Tensor, GradixError> {
        if self.ndim() != 2 || other.ndim() != 2 || self.shape[1] != other.shape[0] {
            return Err(GradixError::ShapeMismatch {
                expected: self.shape.clone(),
                actual: other.shape.clone(),
                operation: "matmul".to_string(),
            });
        }
        let (m, k) = (self.shape[0], self.shape[1]);
        let n = other.shape[1];
        let mut data = vec![0.0; m * n];
        for i in 0..m {
            for p in 0..k {
                let a = self.data[i * k + p];
                for j in 0..n {
                    data[i * n + j] += a * other.data[p * n + j];
                }
            }
        }
        Ok(Tensor {
            data: Rc::new(data),
            shape: vec![m, n],
        })
    }
}

impl fmt::Debug for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tensor")
            .field("shape", &self.shape)
            .field("data", &self.data)
            .finish()
    }
}
