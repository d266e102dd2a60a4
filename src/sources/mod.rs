pub mod local;
pub mod remote;
pub mod tag;

use std::sync::Arc;

use tracing::debug;

use crate::config::SourceConfig;
use crate::error::{Error, Result};
use crate::task::{Tags, Task, tags};

pub use local::LocalSource;
pub use remote::RemoteSource;
pub use tag::TagSource;

/// A backend capable of listing, creating and deleting tasks.
///
/// Every task a source hands out is bound to the source that should receive
/// its removal. Duplicate policy lives in [`crate::client::TodoList`], not here.
pub trait Source: Send + Sync {
    /// Re-query the backend and return every task currently visible.
    fn fetch(&self) -> Result<Vec<Task>>;

    /// Persist a new task and return it bound to this source.
    fn add_task(&self, title: &str, tags: Tags) -> Result<Task>;

    /// Delete the task with the same identity. Missing tasks are a no-op.
    fn remove_task(&self, task: &Task) -> Result<()>;
}

/// Builds a source from the `params` table of its config section.
pub type Constructor = fn(&toml::Table) -> Result<Arc<dyn Source>>;

const CONSTRUCTORS: &[(&str, Constructor)] = &[
    ("remote", remote::from_params),
    ("google_script", remote::from_params),
    ("local", local::from_params),
];

/// Names accepted in `[source] name = ...`.
pub fn source_names() -> impl Iterator<Item = &'static str> {
    CONSTRUCTORS.iter().map(|(name, _)| *name)
}

pub fn constructor(name: &str) -> Option<Constructor> {
    CONSTRUCTORS
        .iter()
        .find(|(known, _)| *known == name)
        .map(|(_, ctor)| *ctor)
}

/// Construct the configured backend, wrapped in a [`TagSource`] when a scope is set.
pub fn build_source(config: &SourceConfig) -> Result<Arc<dyn Source>> {
    let ctor =
        constructor(&config.name).ok_or_else(|| Error::UnknownSource(config.name.clone()))?;
    let source = ctor(&config.params)?;
    debug!(name = %config.name, "constructed source");

    match &config.scope {
        Some(scope) => {
            let scoped: Arc<dyn Source> = TagSource::new(source, tags(scope.iter().cloned()))?;
            debug!(?scope, "wrapped source in tag scope");
            Ok(scoped)
        }
        None => Ok(source),
    }
}

/// Reject any `params` key a constructor does not understand.
pub(crate) fn check_params(source: &str, params: &toml::Table, allowed: &[&str]) -> Result<()> {
    if let Some(key) = params.keys().find(|k| !allowed.contains(&k.as_str())) {
        return Err(Error::ConfigValidation(format!(
            "unknown parameter for {source} source: {key}"
        )));
    }
    Ok(())
}
