use std::sync::{Arc, Weak};

use tracing::debug;

use crate::error::{Error, Result};
use crate::task::{Tags, Task, TaskRecord};

use super::Source;

/// Scoped view over another source.
///
/// Every task created through the view gets the scope tags added, and only
/// tasks carrying all of them are surfaced, with the scope tags stripped.
/// Tasks handed out are bound to the view so that removal restores the
/// scope tags before reaching the inner source. Views nest freely.
pub struct TagSource {
    inner: Arc<dyn Source>,
    scope: Tags,
    me: Weak<dyn Source>,
}

impl TagSource {
    pub fn new(inner: Arc<dyn Source>, scope: Tags) -> Result<Arc<Self>> {
        if scope.is_empty() {
            return Err(Error::EmptyScope);
        }
        Ok(Arc::new_cyclic(|me: &Weak<Self>| Self {
            inner,
            scope,
            me: me.clone(),
        }))
    }

    pub fn scope(&self) -> &Tags {
        &self.scope
    }

    pub fn inner(&self) -> &Arc<dyn Source> {
        &self.inner
    }

    fn in_scope(&self, task: &Task) -> bool {
        self.scope.is_subset(task.tags())
    }

    fn strip(&self, tags: &Tags) -> Tags {
        tags.difference(&self.scope).cloned().collect()
    }

    fn restore(&self, tags: &Tags) -> Tags {
        tags.union(&self.scope).cloned().collect()
    }
}

impl Source for TagSource {
    fn fetch(&self) -> Result<Vec<Task>> {
        let tasks: Vec<Task> = self
            .inner
            .fetch()?
            .into_iter()
            .filter(|task| self.in_scope(task))
            .map(|task| {
                let visible = self.strip(task.tags());
                Task::bound(TaskRecord::new(task.title(), visible), &self.me)
            })
            .collect();

        debug!(count = tasks.len(), scope = ?self.scope, "fetched scoped tasks");
        Ok(tasks)
    }

    fn add_task(&self, title: &str, tags: Tags) -> Result<Task> {
        let created = self.inner.add_task(title, self.restore(&tags))?;
        debug!(title, scope = ?self.scope, "added scoped task");
        let visible = self.strip(created.tags());
        Ok(Task::bound(TaskRecord::new(created.title(), visible), &self.me))
    }

    fn remove_task(&self, task: &Task) -> Result<()> {
        let full = Task::unbound(task.title(), self.restore(task.tags()));
        debug!(title = task.title(), scope = ?self.scope, "removing scoped task");
        self.inner.remove_task(&full)
    }
}
