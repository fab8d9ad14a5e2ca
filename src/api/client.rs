//! Search Client
//!
//! Resolves the backend endpoint and builds search request URLs.

use super::error::SearchError;
use super::http::SearchHttpClient;
use crate::query::SearchParams;
use crate::resource::ResultSet;
use anyhow::{Context, Result};
use std::time::Duration;
use url::Url;

/// Path of the search endpoint, relative to the backend root
const SEARCH_PATH: &str = "api/search";

/// Client for one search backend
#[derive(Clone)]
pub struct SearchClient {
    pub http: SearchHttpClient,
    endpoint: Url,
}

impl SearchClient {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
        let endpoint = normalize_endpoint(endpoint)?;
        let http = SearchHttpClient::new(timeout)?;
        Ok(Self { http, endpoint })
    }

    /// Backend root, always ending in `/`
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Full request URL for a set of search parameters
    pub fn search_url(&self, params: &SearchParams) -> Url {
        let mut url = self
            .endpoint
            .join(SEARCH_PATH)
            .unwrap_or_else(|_| self.endpoint.clone());
        url.query_pairs_mut().extend_pairs(params.pairs());
        url
    }

    pub async fn search(&self, params: &SearchParams) -> Result<ResultSet, SearchError> {
        let url = self.search_url(params);
        self.http.get_results(&url).await
    }
}

/// Parse an endpoint and make it usable as a join base
fn normalize_endpoint(endpoint: &str) -> Result<Url> {
    let mut url =
        Url::parse(endpoint).with_context(|| format!("Invalid endpoint URL: {}", endpoint))?;
    if url.cannot_be_a_base() {
        return Err(anyhow::anyhow!("Endpoint cannot be used as a base URL: {}", endpoint));
    }
    url.set_query(None);
    url.set_fragment(None);
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::SearchQuery;

    fn client(endpoint: &str) -> SearchClient {
        SearchClient::new(endpoint, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_search_url_without_subtype() {
        let params = SearchQuery::new("bucket-1", "s3", "").request_params();
        let url = client("http://localhost:8080").search_url(&params);
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/api/search?resource_name=bucket-1&resource_type=s3"
        );
    }

    #[test]
    fn test_search_url_with_subtype() {
        let params = SearchQuery::new("alice", "iam", "user").request_params();
        let url = client("http://localhost:8080/").search_url(&params);
        assert!(url.as_str().ends_with("&resource_subtype=user"));
    }

    #[test]
    fn test_search_url_encodes_term() {
        let params = SearchQuery::new("a b&c", "", "").request_params();
        let url = client("http://localhost:8080").search_url(&params);
        assert_eq!(url.query(), Some("resource_name=a+b%26c"));
    }

    #[test]
    fn test_endpoint_with_path_prefix() {
        let params = SearchQuery::new("x", "", "").request_params();
        let url = client("https://inventory.example.com/cloudcate?x=1").search_url(&params);
        assert_eq!(
            url.as_str(),
            "https://inventory.example.com/cloudcate/api/search?resource_name=x"
        );
    }

    #[test]
    fn test_invalid_endpoint() {
        assert!(SearchClient::new("localhost", Duration::from_secs(1)).is_err());
        assert!(SearchClient::new("mailto:a@b.c", Duration::from_secs(1)).is_err());
    }
}
