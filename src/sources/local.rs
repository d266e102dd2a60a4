use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tracing::debug;

use crate::error::Result;
use crate::task::{Tags, Task, TaskRecord};

use super::{Source, check_params};

/// In-memory task list.
///
/// Holds title+tags records in insertion order. Mutations take the lock for
/// their whole duration and `fetch` works on a snapshot.
pub struct LocalSource {
    records: Mutex<Vec<TaskRecord>>,
    me: Weak<dyn Source>,
}

impl LocalSource {
    /// Seed the source from titles or full records. Repeated seeds are kept once.
    pub fn new<I, R>(initial: I) -> Arc<Self>
    where
        I: IntoIterator<Item = R>,
        R: Into<TaskRecord>,
    {
        let mut records: Vec<TaskRecord> = Vec::new();
        for record in initial.into_iter().map(Into::into) {
            if !records.contains(&record) {
                records.push(record);
            }
        }

        Arc::new_cyclic(|me: &Weak<Self>| Self {
            records: Mutex::new(records),
            me: me.clone(),
        })
    }

    pub fn empty() -> Arc<Self> {
        Self::new(Vec::<TaskRecord>::new())
    }

    /// Snapshot of the stored records.
    pub fn records(&self) -> Vec<TaskRecord> {
        self.records.lock().clone()
    }
}

impl Source for LocalSource {
    fn fetch(&self) -> Result<Vec<Task>> {
        let snapshot = self.records();
        debug!(count = snapshot.len(), "fetched local tasks");
        Ok(snapshot
            .into_iter()
            .map(|record| Task::bound(record, &self.me))
            .collect())
    }

    fn add_task(&self, title: &str, tags: Tags) -> Result<Task> {
        let record = TaskRecord::new(title, tags);
        let mut records = self.records.lock();
        if records.contains(&record) {
            debug!(title, "local task already present; not inserting");
        } else {
            records.push(record.clone());
            debug!(title, tags = ?record.tags, "added local task");
        }
        Ok(Task::bound(record, &self.me))
    }

    fn remove_task(&self, task: &Task) -> Result<()> {
        let mut records = self.records.lock();
        let before = records.len();
        records.retain(|record| !record.matches(task));
        debug!(
            title = task.title(),
            removed = before - records.len(),
            "removed local task"
        );
        Ok(())
    }
}

/// `local` constructor. Accepts an optional `tasks` seed list.
pub(crate) fn from_params(params: &toml::Table) -> Result<Arc<dyn Source>> {
    check_params("local", params, &["tasks"])?;
    let seed: Vec<TaskRecord> = match params.get("tasks") {
        Some(value) => value.clone().try_into()?,
        None => Vec::new(),
    };
    Ok(LocalSource::new(seed))
}
