pub mod cos;
pub mod exp;
pub mod sin;

pub use cos::cos;
pub use exp::exp;
pub use sin::sin;
