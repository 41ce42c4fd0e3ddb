//! Task endpoints.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use serde::Deserialize;
use taskdeck_auth::TokenStore;
use taskdeck_core::{
    ApiError, FilterOptions, MotivationalQuote, SearchResults, Statistics, Task, TaskDraft, TaskId,
    TaskPatch,
};
use taskdeck_settings::ApiSettings;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::events::{EVENT_CAPACITY, SessionEvent};
use crate::transport::{Transport, decode};

/// Remote task operations consumed by the task store.
#[async_trait]
pub trait TaskApi: Send + Sync {
    /// All tasks of the signed-in user, newest first.
    async fn get_all(&self) -> Result<Vec<Task>, ApiError>;

    /// Tasks matching `filters`.
    async fn search(&self, filters: &FilterOptions) -> Result<SearchResults, ApiError>;

    /// Create a task.
    async fn create(&self, draft: &TaskDraft) -> Result<Task, ApiError>;

    /// Apply a partial update.
    async fn update(&self, id: TaskId, patch: &TaskPatch) -> Result<Task, ApiError>;

    /// Delete a task.
    async fn delete(&self, id: TaskId) -> Result<(), ApiError>;

    /// Aggregate counts.
    async fn get_statistics(&self) -> Result<Statistics, ApiError>;

    /// A motivational quote.
    async fn get_motivational_quote(&self) -> Result<MotivationalQuote, ApiError>;

    /// CSV export of all tasks, as served.
    async fn export_csv(&self) -> Result<Bytes, ApiError>;
}

/// The search endpoint answers with an envelope; older deployments answer
/// with a bare list.
#[derive(Deserialize)]
#[serde(untagged)]
enum SearchResponse {
    Envelope {
        results: Vec<Task>,
        #[serde(default)]
        count: Option<usize>,
    },
    Bare(Vec<Task>),
}

impl SearchResponse {
    fn into_results(self, filters: &FilterOptions) -> SearchResults {
        let (results, count) = match self {
            Self::Envelope { results, count } => {
                let count = count.unwrap_or(results.len());
                (results, count)
            }
            Self::Bare(results) => {
                let count = results.len();
                (results, count)
            }
        };
        SearchResults {
            results,
            count,
            filters_applied: filters.clone(),
        }
    }
}

/// [`TaskApi`] over HTTP.
///
/// The bearer token is read from the [`TokenStore`] on every request. A 401
/// clears the store and broadcasts [`SessionEvent::Unauthorized`].
pub struct HttpTaskApi {
    transport: Transport,
    tokens: Arc<dyn TokenStore>,
    events: broadcast::Sender<SessionEvent>,
}

impl HttpTaskApi {
    /// Client for the configured service.
    pub fn new(settings: &ApiSettings, tokens: Arc<dyn TokenStore>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            transport: Transport::new(settings),
            tokens,
            events,
        }
    }

    /// Receiver for session events raised by this client.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let request = match self.tokens.access_token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        let result = self.transport.execute(request).await;
        if let Err(err) = &result {
            if err.is_unauthorized() {
                self.revoke_session();
            }
        }
        result
    }

    fn revoke_session(&self) {
        warn!("server rejected the session, clearing credentials");
        if let Err(err) = self.tokens.clear() {
            warn!(error = %err, "failed to clear stored credentials");
        }
        // No subscribers is fine.
        let _ = self.events.send(SessionEvent::Unauthorized);
    }

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.transport.client().get(self.transport.url(path))
    }
}

#[async_trait]
impl TaskApi for HttpTaskApi {
    async fn get_all(&self) -> Result<Vec<Task>, ApiError> {
        let response = self.send(self.get("/tasks/")).await?;
        decode(response).await
    }

    #[tracing::instrument(skip_all)]
    async fn search(&self, filters: &FilterOptions) -> Result<SearchResults, ApiError> {
        if filters.is_default() {
            let results = self.get_all().await?;
            return Ok(SearchResponse::Bare(results).into_results(filters));
        }
        let query = filters.query_pairs();
        debug!(params = query.len(), "searching tasks");
        let response = self.send(self.get("/tasks/search/").query(&query)).await?;
        let body: SearchResponse = decode(response).await?;
        Ok(body.into_results(filters))
    }

    async fn create(&self, draft: &TaskDraft) -> Result<Task, ApiError> {
        let request = self
            .transport
            .client()
            .post(self.transport.url("/tasks/"))
            .json(draft);
        decode(self.send(request).await?).await
    }

    async fn update(&self, id: TaskId, patch: &TaskPatch) -> Result<Task, ApiError> {
        let request = self
            .transport
            .client()
            .patch(self.transport.url(&format!("/tasks/{id}/")))
            .json(patch);
        decode(self.send(request).await?).await
    }

    async fn delete(&self, id: TaskId) -> Result<(), ApiError> {
        let request = self
            .transport
            .client()
            .delete(self.transport.url(&format!("/tasks/{id}/")));
        let _ = self.send(request).await?;
        Ok(())
    }

    async fn get_statistics(&self) -> Result<Statistics, ApiError> {
        decode(self.send(self.get("/tasks/statistics/")).await?).await
    }

    async fn get_motivational_quote(&self) -> Result<MotivationalQuote, ApiError> {
        decode(self.send(self.get("/tasks/motivacional/")).await?).await
    }

    async fn export_csv(&self) -> Result<Bytes, ApiError> {
        let response = self.send(self.get("/tasks/export_csv/")).await?;
        response
            .bytes()
            .await
            .map_err(crate::transport::network_error)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
