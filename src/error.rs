use thiserror::Error;

/// Custom error type for the gradix engine.
#[derive(Error, Debug, PartialEq, Clone)] // PartialEq for easier testing
pub enum GradixError {
    #[error("Tensor creation error: data length {data_len} does not match shape {shape:?}")]
    TensorCreationError { data_len: usize, shape: Vec<usize> },

    #[error("Shape mismatch: expected {expected:?}, got {actual:?} during operation {operation}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
        operation: String,
    },

    #[error("Cannot broadcast shapes: {shape1:?} and {shape2:?}")]
    BroadcastError {
        shape1: Vec<usize>,
        shape2: Vec<usize>,
    },

    #[error("Cannot reduce shape {from:?} to target shape {to:?}")]
    ReduceError { from: Vec<usize>, to: Vec<usize> },

    #[error("Axis {axis} is out of bounds for tensor of rank {rank}")]
    InvalidAxis { axis: usize, rank: usize },

    #[error("Expected a single-element tensor, got shape {shape:?}")]
    NotScalar { shape: Vec<usize> },

    #[error("Backward called on a variable with no creator; no graph was recorded")]
    NoGraph,

    #[error("Output of operation '{operation}' was dropped before backward could read its gradient")]
    DanglingOutput { operation: &'static str },

    #[error("Operation '{operation}' returned {actual} input gradients, expected {expected}")]
    GradientCountMismatch {
        operation: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Internal error: {0}")]
    InternalError(String),
}
