//! Search backend interaction module
//!
//! # Module Structure
//!
//! - [`client`] - endpoint resolution and request URL construction
//! - [`http`] - request execution and response classification
//! - [`error`] - failure taxonomy and user-facing diagnostics
//!
//! # Example
//!
//! ```ignore
//! use cloudcate::api::SearchClient;
//! use cloudcate::query::SearchQuery;
//!
//! async fn example() -> anyhow::Result<()> {
//!     let client = SearchClient::new("http://localhost:8080", Duration::from_secs(30))?;
//!     let params = SearchQuery::new("bucket-1", "s3", "").request_params();
//!     let results = client.search(&params).await?;
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod http;

pub use client::SearchClient;
pub use error::{format_search_error, SearchError};
