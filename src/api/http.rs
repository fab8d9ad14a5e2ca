//! HTTP utilities for the search endpoint

use super::error::SearchError;
use crate::resource::{parse_results, ResultSet};
use anyhow::{Context, Result};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Maximum length of response body to log
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Content kind the backend declares for result payloads
const JSON_CONTENT_TYPE: &str = "application/json";

/// Sanitize response body for logging
/// Truncates long responses and strips control characters
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.chars().count() > MAX_LOG_BODY_LENGTH {
        let head: String = body.chars().take(MAX_LOG_BODY_LENGTH).collect();
        format!("{}... [truncated, {} bytes total]", head, body.len())
    } else {
        body.to_string()
    };

    truncated.replace(char::is_control, "")
}

/// HTTP client wrapper for search requests
#[derive(Clone)]
pub struct SearchHttpClient {
    client: Client,
}

impl SearchHttpClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("cloudcate/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }

    /// GET a search URL and interpret the response.
    ///
    /// Non-2xx statuses fail without parsing the body, as do responses not
    /// declared as JSON.
    pub async fn get_results(&self, url: &Url) -> Result<ResultSet, SearchError> {
        tracing::debug!("GET {}", url);

        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Search error: {} - {}", status, sanitize_for_log(&body));
            return Err(SearchError::Status {
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        if !content_type.contains(JSON_CONTENT_TYPE) {
            tracing::error!("Search response is not JSON: '{}'", content_type);
            return Err(SearchError::UnexpectedContentType(content_type));
        }

        let body = response.text().await?;

        parse_results(&body).map_err(|e| {
            tracing::error!("Failed to parse search response: {} - {}", e, sanitize_for_log(&body));
            SearchError::MalformedBody(e.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_truncates_long_bodies() {
        let body = "x".repeat(500);
        let sanitized = sanitize_for_log(&body);
        assert!(sanitized.starts_with(&"x".repeat(MAX_LOG_BODY_LENGTH)));
        assert!(sanitized.contains("[truncated, 500 bytes total]"));
    }

    #[test]
    fn test_sanitize_strips_control_characters() {
        assert_eq!(sanitize_for_log("a\nb\tc d"), "abc d");
    }

    #[test]
    fn test_sanitize_keeps_non_ascii_text() {
        assert_eq!(
            sanitize_for_log("Échec de la recherche: ресурс 未找到\r\n"),
            "Échec de la recherche: ресурс 未找到"
        );
    }
}
