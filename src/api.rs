//! Tasks service client.
//!
//! Thin async wrapper over the two read operations the daemon needs:
//! listing the authenticated identity's task lists and listing the tasks of
//! one list. The wire format is the Google Tasks v1 REST API; the base URL
//! is overridable so contract tests can point at a mock server.
//!
//! A missing credential is not an error: `list_task_lists` returns `None`
//! ("not signed in") and `list_tasks` returns an empty batch, which renders
//! as "No Tasks" downstream.

use crate::config::ApiConfig;
use crate::credentials::CredentialRef;
use crate::error::{Result, TaskwatchError};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;

/// Identifies one task list of the authenticated identity.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TaskListRef {
    /// Opaque list identifier.
    pub id: String,
    /// Human-readable list title.
    pub title: String,
}

/// One task or subtask record as returned by the service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TaskRecord {
    /// Opaque task identifier.
    pub id: String,
    /// Task title.
    #[serde(default)]
    pub title: String,
    /// Free-form notes, if any.
    #[serde(default)]
    pub notes: Option<String>,
    /// Due timestamp (RFC 3339; the service zeroes the time-of-day part).
    #[serde(default)]
    pub due: Option<DateTime<Utc>>,
    /// Identifier of the parent task for subtasks.
    #[serde(default)]
    pub parent: Option<String>,
    /// Lexically ordered position key within the task's level.
    #[serde(default)]
    pub position: String,
}

#[derive(Debug, Deserialize)]
struct TaskListsResponse {
    #[serde(default)]
    items: Option<Vec<TaskListRef>>,
}

#[derive(Debug, Deserialize)]
struct TasksResponse {
    #[serde(default)]
    items: Option<Vec<TaskRecord>>,
}

/// Async client for the tasks service.
pub struct TasksClient {
    http: reqwest::Client,
    base_url: String,
    token: CredentialRef,
}

impl TasksClient {
    /// Create a client from the API section of the config.
    #[must_use]
    pub fn new(config: &ApiConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            token: config.token.clone(),
        }
    }

    /// Override the base URL (used by contract tests).
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_owned();
        self
    }

    /// List the task lists available to the authenticated identity.
    ///
    /// Returns `Ok(None)` when no credential is available.
    pub async fn list_task_lists(&self) -> Result<Option<Vec<TaskListRef>>> {
        let Some(token) = self.token.resolve()? else {
            debug!("no credential available, skipping task list fetch");
            return Ok(None);
        };

        let url = format!("{}/tasks/v1/users/@me/lists", self.base_url);
        let response = self
            .http
            .get(&url)
            .bearer_auth(&token)
            .send()
            .await
            .map_err(|e| TaskwatchError::Api(format!("task list request failed: {e}")))?;

        let body: TaskListsResponse = Self::read_json(response).await?;
        Ok(Some(body.items.unwrap_or_default()))
    }

    /// List the tasks of one list, excluding completed, deleted, and hidden
    /// items server-side.
    ///
    /// Returns an empty batch when no credential is available.
    pub async fn list_tasks(&self, list_id: &str) -> Result<Vec<TaskRecord>> {
        let Some(token) = self.token.resolve()? else {
            debug!("no credential available, skipping task fetch");
            return Ok(Vec::new());
        };

        let url = format!("{}/tasks/v1/lists/{list_id}/tasks", self.base_url);
        let response = self
            .http
            .get(&url)
            .bearer_auth(&token)
            .query(&[
                ("showCompleted", "false"),
                ("showDeleted", "false"),
                ("showHidden", "false"),
            ])
            .send()
            .await
            .map_err(|e| TaskwatchError::Api(format!("task request failed: {e}")))?;

        let body: TasksResponse = Self::read_json(response).await?;
        Ok(body.items.unwrap_or_default())
    }

    async fn read_json<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TaskwatchError::Api(format!(
                "service returned {status}: {body}"
            )));
        }
        response
            .json()
            .await
            .map_err(|e| TaskwatchError::Api(format!("cannot parse response: {e}")))
    }
}
