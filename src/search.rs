//! Search Controller
//!
//! Owns the loading state and the current result set. A dispatch yields a
//! [`SearchRequest`]; the round trip runs on a tokio task which reports back
//! with a [`SearchMessage`]. Each dispatch gets a fresh token and only the
//! latest token's outcome is applied, so a slow earlier response can never
//! overwrite a newer one.

use crate::api::{SearchClient, SearchError};
use crate::query::{is_dispatchable, SearchParams, SearchQuery};
use crate::resource::ResultSet;
use chrono::{DateTime, Local};
use std::future::Future;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

/// Monotonically increasing request generation
pub type RequestToken = u64;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SearchState {
    #[default]
    Idle,
    Loading,
    Success,
    Failed(SearchError),
}

/// One outbound search round trip
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub token: RequestToken,
    pub params: SearchParams,
}

/// Outcome of a round trip, posted back to the event loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchMessage {
    ResponseReceived {
        token: RequestToken,
        results: ResultSet,
    },
    ResponseFailed {
        token: RequestToken,
        error: SearchError,
    },
}

impl SearchMessage {
    pub fn from_outcome(token: RequestToken, outcome: Result<ResultSet, SearchError>) -> Self {
        match outcome {
            Ok(results) => Self::ResponseReceived { token, results },
            Err(error) => Self::ResponseFailed { token, error },
        }
    }

    pub fn token(&self) -> RequestToken {
        match self {
            Self::ResponseReceived { token, .. } | Self::ResponseFailed { token, .. } => *token,
        }
    }
}

#[derive(Debug, Default)]
pub struct SearchController {
    state: SearchState,
    results: ResultSet,
    latest_token: RequestToken,
    completed_at: Option<DateTime<Local>>,
}

impl SearchController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    pub fn results(&self) -> &ResultSet {
        &self.results
    }

    pub fn is_loading(&self) -> bool {
        self.state == SearchState::Loading
    }

    pub fn last_error(&self) -> Option<&SearchError> {
        match &self.state {
            SearchState::Failed(err) => Some(err),
            _ => None,
        }
    }

    /// When the last applied response arrived
    pub fn completed_at(&self) -> Option<DateTime<Local>> {
        self.completed_at
    }

    /// Start a search for `query`.
    ///
    /// Returns `None` without touching any state when the term is not
    /// dispatchable. Otherwise the result set is cleared before the request
    /// is handed out.
    pub fn dispatch(&mut self, query: &SearchQuery) -> Option<SearchRequest> {
        if !is_dispatchable(&query.term) {
            tracing::debug!("Ignoring search for blank term");
            return None;
        }

        self.results = ResultSet::NotSearched;
        self.state = SearchState::Loading;
        self.latest_token += 1;

        let request = SearchRequest {
            token: self.latest_token,
            params: query.request_params(),
        };
        tracing::info!("Dispatching search #{}: {:?}", request.token, request.params);
        Some(request)
    }

    /// Apply a round trip outcome. Returns false for stale messages.
    pub fn handle(&mut self, message: SearchMessage) -> bool {
        let token = message.token();
        if token != self.latest_token || !self.is_loading() {
            tracing::warn!(
                "Discarding stale search response #{} (latest #{})",
                token,
                self.latest_token
            );
            return false;
        }

        match message {
            SearchMessage::ResponseReceived { results, .. } => {
                tracing::info!("Search #{} returned {} rows", token, results.len());
                self.results = results;
                self.state = SearchState::Success;
            },
            SearchMessage::ResponseFailed { error, .. } => {
                tracing::error!("Search #{} failed: {}", token, error);
                self.state = SearchState::Failed(error);
            },
        }
        self.completed_at = Some(Local::now());
        true
    }
}

/// Perform one round trip and wrap the outcome as a message
pub async fn run_search(client: &SearchClient, request: &SearchRequest) -> SearchMessage {
    let outcome = client.search(&request.params).await;
    SearchMessage::from_outcome(request.token, outcome)
}

/// Run a search on the tokio runtime and post the outcome to `tx`.
pub fn spawn_search(
    client: SearchClient,
    request: SearchRequest,
    tx: UnboundedSender<SearchMessage>,
) -> JoinHandle<()> {
    let token = request.token;
    supervise(token, async move { run_search(&client, &request).await }, tx)
}

/// Run `work` in its own task and post its message to `tx`.
///
/// If the task panics an `Aborted` failure is posted for `token` instead,
/// so the controller never stays in `Loading`.
pub fn supervise<F>(
    token: RequestToken,
    work: F,
    tx: UnboundedSender<SearchMessage>,
) -> JoinHandle<()>
where
    F: Future<Output = SearchMessage> + Send + 'static,
{
    tokio::spawn(async move {
        let worker = tokio::spawn(work);

        let message = match worker.await {
            Ok(message) => message,
            Err(err) => SearchMessage::ResponseFailed {
                token,
                error: SearchError::Aborted(err.to_string()),
            },
        };

        if tx.send(message).is_err() {
            tracing::debug!("Search #{} finished after the UI closed", token);
        }
    })
}
