//! gradix — a define-by-run reverse-mode automatic differentiation engine.
//!
//! Operations on [`Variable`]s execute eagerly on concrete tensor values and,
//! while recording is enabled, link themselves into a computation graph.
//! [`Variable::backward`] replays that graph in decreasing topological
//! generation order, accumulating one gradient per participating variable.
//!
//! ```
//! use gradix::{ops, Variable};
//!
//! let x = Variable::scalar(2.0);
//! let a = ops::square(&x)?;
//! let y = ops::add(&ops::square(&a)?, &ops::pow(&a, 3.0)?)?;
//! y.backward()?;
//!
//! assert_eq!(y.item()?, 80.0);
//! assert_eq!(x.grad_value().unwrap().item()?, 224.0);
//! # Ok::<(), gradix::GradixError>(())
//! ```
//!
//! Recording can be scoped off for inference ([`no_grad`]), and backward can
//! itself be recorded for higher-order derivatives
//! ([`Variable::backward_with`] with `create_graph`).

pub mod autograd;
pub mod config;
pub mod error;
pub mod ops;
pub mod tensor;
pub mod variable;

pub use autograd::grad_check;
pub use autograd::{Op, OpNode};
pub use config::{is_recording, no_grad, scoped_recording, RecordingGuard};
pub use error::GradixError;
pub use tensor::Tensor;
pub use variable::Variable;
