pub mod definitions;
pub mod operations;
pub mod property;

pub use definitions::*;
pub use operations::*;
pub use property::VirtualProperty;
