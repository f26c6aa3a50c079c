//! Shape and index utilities shared by the tensor kernels.

use crate::error::GradixError;

/// Calculates the strides for a contiguous row-major tensor of the given shape.
pub(crate) fn calculate_strides(shape: &[usize]) -> Vec<usize> {
    let mut strides = vec![0; shape.len()];
    if shape.is_empty() {
        return strides;
    }
    strides[shape.len() - 1] = 1;
    for i in (0..shape.len() - 1).rev() {
        strides[i] = strides[i + 1] * shape[i + 1];
    }
    strides
}

/// Converts a linear index into multi-dimensional coordinates for `shape`.
pub(crate) fn index_to_coord(index: usize, strides: &[usize], shape: &[usize]) -> Vec<usize> {
    let mut coord = vec![0; shape.len()];
    let mut remainder = index;
    for (i, &stride) in strides.iter().enumerate() {
        if stride == 0 {
            continue;
        }
        coord[i] = remainder / stride;
        remainder %= stride;
    }
    coord
}

/// Computes the broadcast result shape of two shapes per NumPy rules:
/// dimensions are aligned from the right; each pair must be equal or one of
/// them must be 1.
pub(crate) fn broadcast_shapes(
    shape1: &[usize],
    shape2: &[usize],
) -> Result<Vec<usize>, GradixError> {
    let rank = shape1.len().max(shape2.len());
    let mut result = vec![0; rank];
    for i in 0..rank {
        let d1 = dim_from_right(shape1, rank, i);
        let d2 = dim_from_right(shape2, rank, i);
        result[i] = if d1 == d2 {
            d1
        } else if d1 == 1 {
            d2
        } else if d2 == 1 {
            d1
        } else {
            return Err(GradixError::BroadcastError {
                shape1: shape1.to_vec(),
                shape2: shape2.to_vec(),
            });
        };
    }
    Ok(result)
}

fn dim_from_right(shape: &[usize], rank: usize, i: usize) -> usize {
    let diff = rank - shape.len();
    if i < diff {
        1
    } else {
        shape[i - diff]
    }
}

/// Determines which axes of `from` must be summed over to reach `to`:
/// the leading axes `to` lacks, plus every aligned axis where `to` is 1 and
/// `from` is not. Errors when the shapes are irreconcilable.
pub(crate) fn reduction_axes(from: &[usize], to: &[usize]) -> Result<Vec<usize>, GradixError> {
    if from.len() < to.len() {
        return Err(GradixError::ReduceError {
            from: from.to_vec(),
            to: to.to_vec(),
        });
    }
    let rank_diff = from.len() - to.len();
    let mut axes: Vec<usize> = (0..rank_diff).collect();
    for (i, &target_dim) in to.iter().enumerate() {
        let from_dim = from[rank_diff + i];
        if from_dim != target_dim {
            if target_dim == 1 {
                axes.push(rank_diff + i);
            } else {
                return Err(GradixError::ReduceError {
                    from: from.to_vec(),
                    to: to.to_vec(),
                });
            }
        }
    }
    Ok(axes)
}
