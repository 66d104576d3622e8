pub mod scope_parameters;
pub use scope_parameters::*;

pub mod scope_tables;
pub use scope_tables::*;

pub mod parse_context;
pub use parse_context::*;

pub mod member_resolver;
pub use member_resolver::*;

pub mod general_expression_parser;
pub use general_expression_parser::*;

pub mod filter_predicate_parser;
pub use filter_predicate_parser::*;

pub mod group_key_selector_parser;
pub use group_key_selector_parser::*;

pub mod selector_resolver;
pub use selector_resolver::*;
