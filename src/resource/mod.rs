//! Result model
//!
//! - [`result`] - generic ordered rows and the result set states
//! - [`record`] - typed classification of rows into the known resource shapes

pub mod record;
pub mod result;

pub use record::ResourceRecord;
pub use result::{display_value, parse_results, ResultSet, SearchResult};
