pub mod navigation;
pub use navigation::*;
pub mod operator;
pub use operator::*;
