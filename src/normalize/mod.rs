//! Normalization: alias-driven field resolution and risk classification.

pub mod aliases;
pub mod classifier;
pub mod filter;
pub mod resolver;

pub use aliases::{Field, FieldAliasTable};
pub use filter::RecordFilter;
pub use resolver::FieldResolver;
