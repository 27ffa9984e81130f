pub mod action;
pub mod derived;
pub mod inputs;

pub use action::*;
pub use derived::*;
pub use inputs::*;
