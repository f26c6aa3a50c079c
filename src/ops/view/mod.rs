pub mod broadcast_to;
pub mod reshape;
pub mod transpose;

pub use broadcast_to::broadcast_to;
pub use reshape::reshape;
pub use transpose::transpose;
