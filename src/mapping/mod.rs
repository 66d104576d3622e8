pub mod object_model;
pub use object_model::*;

pub mod object_activator;
pub use object_activator::*;

pub mod object_reader;
pub use object_reader::*;

pub mod mapping_data;
pub use mapping_data::*;
