use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

/// Remote job status.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// Submitted, not started.
    #[default]
    Queued,
    /// Provider is working on it.
    Running,
    /// Result URL available.
    Succeeded,
    /// Provider reported failure.
    Failed,
}

impl JobStatus {
    /// Whether no further transitions happen.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }
}

/// State tracked per remote job.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobState {
    /// Current status.
    pub status: JobStatus,
    /// Result URL once succeeded.
    pub result_url: Option<String>,
    /// Failure detail once failed.
    pub error: Option<String>,
}

/// Keyed store of remote job states, injected where needed.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Insert or replace `id`.
    async fn put(&self, id: &str, state: JobState);
    /// Current state of `id`.
    async fn get(&self, id: &str) -> Option<JobState>;
    /// Forget `id`, returning its last state.
    async fn remove(&self, id: &str) -> Option<JobState>;
}

/// Process-local [`JobStore`].
#[derive(Debug, Default)]
pub struct InMemoryJobStore {
    jobs: RwLock<HashMap<String, JobState>>,
}

impl InMemoryJobStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tracked jobs.
    pub async fn len(&self) -> usize {
        self.jobs.read().await.len()
    }

    /// Whether no jobs are tracked.
    pub async fn is_empty(&self) -> bool {
        self.jobs.read().await.is_empty()
    }
}

#[async_trait]
impl JobStore for InMemoryJobStore {
    async fn put(&self, id: &str, state: JobState) {
        self.jobs.write().await.insert(id.to_string(), state);
    }

    async fn get(&self, id: &str) -> Option<JobState> {
        self.jobs.read().await.get(id).cloned()
    }

    async fn remove(&self, id: &str) -> Option<JobState> {
        self.jobs.write().await.remove(id)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/remote/jobs.rs"]
mod tests;
