//! Aggregation engine.
//!
//! One engine serves every document kind; the kind only decides which
//! optional views are built.

pub mod aggregator;
pub mod views;

pub use aggregator::*;
pub use views::ViewSet;
