//! Record sources.
//!
//! Both the file reader and the API client end in the same place: a
//! fully materialized list of raw rows.

pub mod api;
pub mod file;
pub mod json;
pub mod text;

pub use api::ApiClient;
pub use file::read_rows;
