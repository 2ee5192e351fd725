//! Application endpoints (`/v2/apps`).
//!
//! App definitions and the documents Marathon returns are opaque JSON: request
//! bodies are serialized verbatim and responses are handed back unchanged.
//!
//! App ids are absolute in Marathon (`/tools/docker/registry`). The leading `/`
//! is dropped and the remainder is sent as a single path segment, so nested ids
//! travel percent-encoded (`tools%2Fdocker%2Fregistry`).
//!
//! Ids are not validated. An empty id (`""` or `"/"`) yields an empty segment,
//! so `get_one("/")` requests `GET /v2/apps/`, which Marathon answers like the
//! app list.

use crate::client::Transport;
use crate::Result;
use marathon_core::QueryParams;
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

const V2: &str = "v2";
const APPS: &str = "apps";

/// Application lifecycle, task and version endpoints.
#[derive(Debug)]
pub struct Apps {
    transport: Arc<Transport>,
}

impl Apps {
    pub(crate) const fn new(transport: Arc<Transport>) -> Self {
        Self { transport }
    }

    /// List apps (`GET /v2/apps`).
    ///
    /// Resolves with `{"apps": [...]}`.
    pub async fn get_list(&self, query: &QueryParams) -> Result<Value> {
        self.transport.get(&[V2, APPS], query).await
    }

    /// Create an app (`POST /v2/apps`) from the given definition.
    pub async fn create<B>(&self, config: &B) -> Result<Value>
    where
        B: Serialize + ?Sized,
    {
        self.transport
            .send_json(Method::POST, &[V2, APPS], &QueryParams::new(), Some(config))
            .await
    }

    /// Fetch one app (`GET /v2/apps/{id}`), e.g. with `embed` parameters.
    ///
    /// Resolves with `{"app": {...}}`.
    pub async fn get_one(&self, id: &str, query: &QueryParams) -> Result<Value> {
        self.transport.get(&[V2, APPS, app_segment(id)], query).await
    }

    /// Replace an app definition (`PUT /v2/apps/{id}`).
    ///
    /// Resolves with `{"deploymentId": ..., "version": ...}`.
    pub async fn update<B>(&self, id: &str, config: &B, force: Option<bool>) -> Result<Value>
    where
        B: Serialize + ?Sized,
    {
        self.transport
            .send_json(
                Method::PUT,
                &[V2, APPS, app_segment(id)],
                &force_query(force),
                Some(config),
            )
            .await
    }

    /// Delete an app (`DELETE /v2/apps/{id}`).
    pub async fn destroy(&self, id: &str, force: Option<bool>) -> Result<Value> {
        self.transport
            .send_json::<()>(
                Method::DELETE,
                &[V2, APPS, app_segment(id)],
                &force_query(force),
                None,
            )
            .await
    }

    /// Restart all tasks of an app (`POST /v2/apps/{id}/restart`).
    pub async fn restart(&self, id: &str, force: Option<bool>) -> Result<Value> {
        self.transport
            .send_json::<()>(
                Method::POST,
                &[V2, APPS, app_segment(id), "restart"],
                &force_query(force),
                None,
            )
            .await
    }

    /// List running tasks of an app (`GET /v2/apps/{id}/tasks`).
    pub async fn get_tasks(&self, id: &str) -> Result<Value> {
        self.transport
            .get(&[V2, APPS, app_segment(id), "tasks"], &QueryParams::new())
            .await
    }

    /// Kill every task of an app (`DELETE /v2/apps/{id}/tasks`).
    pub async fn kill_tasks(&self, id: &str) -> Result<Value> {
        self.transport
            .send_json::<()>(
                Method::DELETE,
                &[V2, APPS, app_segment(id), "tasks"],
                &QueryParams::new(),
                None,
            )
            .await
    }

    /// Kill a single task (`DELETE /v2/apps/{id}/tasks/{task_id}`).
    pub async fn kill_task(&self, id: &str, task_id: &str) -> Result<Value> {
        self.transport
            .send_json::<()>(
                Method::DELETE,
                &[V2, APPS, app_segment(id), "tasks", task_id],
                &QueryParams::new(),
                None,
            )
            .await
    }

    /// List stored versions of an app (`GET /v2/apps/{id}/versions`).
    pub async fn get_versions(&self, id: &str) -> Result<Value> {
        self.transport
            .get(&[V2, APPS, app_segment(id), "versions"], &QueryParams::new())
            .await
    }

    /// Fetch the app definition as of a version (`GET /v2/apps/{id}/versions/{version_id}`).
    pub async fn get_version(&self, id: &str, version_id: &str) -> Result<Value> {
        self.transport
            .get(
                &[V2, APPS, app_segment(id), "versions", version_id],
                &QueryParams::new(),
            )
            .await
    }
}

fn app_segment(id: &str) -> &str {
    id.strip_prefix('/').unwrap_or(id)
}

fn force_query(force: Option<bool>) -> QueryParams {
    let mut query = QueryParams::new();
    query.push_opt("force", force);
    query
}
