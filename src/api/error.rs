//! Search failure taxonomy

use thiserror::Error;

/// Why a search round trip failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// The request never produced a response (connection, timeout, body read)
    #[error("Failed to send request: {0}")]
    Transport(String),

    /// The backend answered with a non-2xx status
    #[error("Search request failed: {status}")]
    Status { status: u16 },

    /// The response was not declared as JSON
    #[error("Unexpected content type: {0}")]
    UnexpectedContentType(String),

    /// The body could not be parsed as a result collection
    #[error("Malformed response body: {0}")]
    MalformedBody(String),

    /// The task running the request died before reporting
    #[error("Search task aborted: {0}")]
    Aborted(String),
}

impl SearchError {
    /// Network failures and non-2xx statuses
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Status { .. })
    }

    /// Wrong content kind or unparseable body
    pub fn is_malformed_response(&self) -> bool {
        matches!(
            self,
            Self::UnexpectedContentType(_) | Self::MalformedBody(_) | Self::Aborted(_)
        )
    }
}

impl From<reqwest::Error> for SearchError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

/// Short user-facing diagnostic for a failed search
pub fn format_search_error(error: &SearchError) -> String {
    match error {
        SearchError::Status { status: 400 } => {
            "Invalid request. Check the search parameters.".to_string()
        },
        SearchError::Status { status: 404 } => {
            "Search endpoint not found. Check the configured endpoint.".to_string()
        },
        SearchError::Status { status: 429 } => {
            "Rate limit exceeded. Please try again later.".to_string()
        },
        SearchError::Status { status } if *status >= 500 => {
            format!("Search backend error ({}). Please try again.", status)
        },
        SearchError::Status { status } => format!("Search request failed ({}).", status),
        SearchError::Transport(_) => {
            "Request failed. Check your network connection and try again.".to_string()
        },
        SearchError::UnexpectedContentType(_)
        | SearchError::MalformedBody(_)
        | SearchError::Aborted(_) => "Malformed response from the search backend.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classes_are_disjoint() {
        let errors = [
            SearchError::Transport("refused".into()),
            SearchError::Status { status: 502 },
            SearchError::UnexpectedContentType("text/html".into()),
            SearchError::MalformedBody("eof".into()),
            SearchError::Aborted("panic".into()),
        ];
        for err in &errors {
            assert_ne!(err.is_transport(), err.is_malformed_response(), "{:?}", err);
        }
    }

    #[test]
    fn test_format_distinguishes_classes() {
        let transport = format_search_error(&SearchError::Transport("x".into()));
        let malformed = format_search_error(&SearchError::MalformedBody("x".into()));
        assert_ne!(transport, malformed);
        assert!(format_search_error(&SearchError::Status { status: 503 }).contains("503"));
    }
}
