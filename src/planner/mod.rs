pub mod query_accumulator;
pub use query_accumulator::*;

pub mod compilation_state;
pub use compilation_state::*;

pub mod promotion;
pub use promotion::*;

pub mod include;

pub mod query_compiler;
pub use query_compiler::*;
