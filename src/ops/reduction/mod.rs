pub mod sum;
pub mod sum_to;

pub use sum::sum;
pub use sum_to::sum_to;
