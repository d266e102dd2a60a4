use std::sync::{Arc, Weak};

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::task::{Tags, Task, TaskRecord};

use super::{Source, check_params};

const COMMAND_PARAM: &str = "ged";
const TASK_PARAM: &str = "task";
const FETCH_COMMAND: &str = "todoGet";
const ADD_COMMAND: &str = "taskAdd";
const REMOVE_COMMAND: &str = "taskRemo";

// ---------------------------------------------------------------------------
// Client abstraction (for testability)
// ---------------------------------------------------------------------------

pub trait RemoteClient: Send + Sync {
    /// Issue a GET with the given query pairs and return the response body.
    fn get(&self, url: &str, query: &[(&str, &str)]) -> Result<String>;
}

struct DefaultRemoteClient {
    agent: ureq::Agent,
}

impl RemoteClient for DefaultRemoteClient {
    fn get(&self, url: &str, query: &[(&str, &str)]) -> Result<String> {
        let mut request = self.agent.get(url);
        for (key, value) in query {
            request = request.query(key, value);
        }

        let response = request
            .call()
            .map_err(|e| Error::Transport(format!("GET {url} failed: {e}")))?;
        response
            .into_string()
            .map_err(|e| Error::Transport(format!("failed to read response from {url}: {e}")))
    }
}

// ---------------------------------------------------------------------------
// RemoteSource
// ---------------------------------------------------------------------------

/// Task list stored behind a single HTTP endpoint.
///
/// The endpoint takes a command in the `ged` query parameter and stores
/// titles only, so tasks fetched from it never carry tags.
pub struct RemoteSource {
    url: String,
    client: Box<dyn RemoteClient>,
    me: Weak<dyn Source>,
}

impl RemoteSource {
    pub fn new(url: impl Into<String>) -> Arc<Self> {
        Self::with_client(
            url,
            Box::new(DefaultRemoteClient {
                agent: ureq::Agent::new(),
            }),
        )
    }

    pub fn with_client(url: impl Into<String>, client: Box<dyn RemoteClient>) -> Arc<Self> {
        let url = url.into();
        Arc::new_cyclic(|me: &Weak<Self>| Self {
            url,
            client,
            me: me.clone(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn command(&self, command: &str, title: Option<&str>) -> Result<String> {
        let mut query = vec![(COMMAND_PARAM, command)];
        if let Some(title) = title {
            query.push((TASK_PARAM, title));
        }
        self.client.get(&self.url, &query)
    }
}

impl Source for RemoteSource {
    fn fetch(&self) -> Result<Vec<Task>> {
        let body = self.command(FETCH_COMMAND, None)?;
        let tasks: Vec<Task> = body
            .lines()
            .filter(|line| !line.is_empty())
            .map(|title| Task::bound(TaskRecord::from(title), &self.me))
            .collect();

        debug!(count = tasks.len(), url = %self.url, "fetched remote tasks");
        Ok(tasks)
    }

    fn add_task(&self, title: &str, tags: Tags) -> Result<Task> {
        if !tags.is_empty() {
            warn!(title, ?tags, "remote endpoint stores titles only; dropping tags");
        }
        self.command(ADD_COMMAND, Some(title))?;
        debug!(title, "added remote task");
        Ok(Task::bound(TaskRecord::from(title), &self.me))
    }

    fn remove_task(&self, task: &Task) -> Result<()> {
        self.command(REMOVE_COMMAND, Some(task.title()))?;
        debug!(title = task.title(), "removed remote task");
        Ok(())
    }
}

/// `remote` / `google_script` constructor. Requires a `url` parameter.
pub(crate) fn from_params(params: &toml::Table) -> Result<Arc<dyn Source>> {
    check_params("remote", params, &["url"])?;
    let url = params
        .get("url")
        .and_then(|v| v.as_str())
        .filter(|url| !url.is_empty())
        .ok_or_else(|| {
            Error::ConfigValidation("remote source requires a `url` parameter".to_string())
        })?;
    Ok(RemoteSource::new(url))
}
