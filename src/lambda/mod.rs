pub mod parameter;
pub use parameter::*;

pub mod expr;
pub use expr::*;

pub mod lambda;
pub use lambda::*;
