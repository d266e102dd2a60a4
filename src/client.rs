use std::borrow::Borrow;
use std::sync::Arc;

use tracing::debug;

use crate::error::{Error, Result};
use crate::sources::Source;
use crate::task::{Tags, Task};

/// Duplicate policy for [`TodoList::add_task`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AddOptions {
    /// Create the task even if one with the same title exists.
    pub allow_duplicate: bool,
    /// Return `DuplicateTask` instead of the existing task.
    pub fail: bool,
}

/// Lookup policy for [`TodoList::remove_task`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RemoveOptions {
    pub case_sensitive: bool,
    /// Return `TaskNotFound` when no task matches.
    pub fail: bool,
}

/// Item accepted by [`TodoList::remove_tasks`].
#[derive(Debug, Clone)]
pub enum RemoveTarget {
    Title(String),
    Task(Task),
}

impl From<&str> for RemoveTarget {
    fn from(title: &str) -> Self {
        RemoveTarget::Title(title.to_string())
    }
}

impl From<String> for RemoveTarget {
    fn from(title: String) -> Self {
        RemoveTarget::Title(title)
    }
}

impl From<Task> for RemoveTarget {
    fn from(task: Task) -> Self {
        RemoveTarget::Task(task)
    }
}

/// Todo list client over any [`Source`].
///
/// Holds no task state: every query re-fetches from the source.
#[derive(Clone)]
pub struct TodoList {
    source: Arc<dyn Source>,
}

impl TodoList {
    pub fn new(source: Arc<dyn Source>) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &Arc<dyn Source> {
        &self.source
    }

    pub fn get_tasks(&self) -> Result<Vec<Task>> {
        self.source.fetch()
    }

    pub fn iter(&self) -> Result<impl Iterator<Item = Task>> {
        Ok(self.get_tasks()?.into_iter())
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.get_tasks()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Membership test against a task or a bare title.
    pub fn contains<T>(&self, item: &T) -> Result<bool>
    where
        T: ?Sized,
        Task: PartialEq<T>,
    {
        Ok(self.get_tasks()?.iter().any(|task| task == item))
    }

    /// First task whose title matches, or `None`.
    pub fn find_task_by_title(&self, title: &str, case_sensitive: bool) -> Result<Option<Task>> {
        let lower = title.to_lowercase();
        Ok(self.get_tasks()?.into_iter().find(|task| {
            task.title() == title || (!case_sensitive && task.title().to_lowercase() == lower)
        }))
    }

    /// Tasks carrying `tag`. Nothing is fetched until the returned view is read.
    pub fn find_tasks_by_tag(&self, tag: &str, case_sensitive: bool) -> TaggedTasks<'_> {
        TaggedTasks {
            list: self,
            tag: tag.to_string(),
            case_sensitive,
        }
    }

    pub fn remove_task(&self, title: &str, options: RemoveOptions) -> Result<()> {
        match self.find_task_by_title(title, options.case_sensitive)? {
            Some(task) => {
                debug!(title, "removing task");
                task.remove()
            }
            None if options.fail => Err(Error::TaskNotFound(title.to_string())),
            None => {
                debug!(title, "task not on list; nothing to remove");
                Ok(())
            }
        }
    }

    /// Add a task unless one with the same title (case-insensitive) already exists.
    pub fn add_task<I, S>(&self, title: &str, tags: I, options: AddOptions) -> Result<Task>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if !options.allow_duplicate
            && let Some(existing) = self.find_task_by_title(title, false)?
        {
            if options.fail {
                return Err(Error::DuplicateTask(title.to_string()));
            }
            debug!(title, "task already on list; returning existing");
            return Ok(existing);
        }

        let tags: Tags = tags.into_iter().map(Into::into).collect();
        self.source.add_task(title, tags)
    }

    /// Copy a task, possibly from another list, into this one.
    pub fn import_task(&self, task: &Task, options: AddOptions) -> Result<Task> {
        self.add_task(task.title(), task.tags().iter().cloned(), options)
    }

    pub fn import_tasks<I, T>(&self, tasks: I, options: AddOptions) -> Result<Vec<Task>>
    where
        I: IntoIterator<Item = T>,
        T: Borrow<Task>,
    {
        tasks
            .into_iter()
            .map(|task| self.import_task(task.borrow(), options))
            .collect()
    }

    pub fn add_tasks<I, S>(&self, titles: I, options: AddOptions) -> Result<Vec<Task>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        titles
            .into_iter()
            .map(|title| self.add_task(title.as_ref(), Tags::new(), options))
            .collect()
    }

    /// Remove by title, or directly through already-bound tasks.
    pub fn remove_tasks<I, R>(&self, targets: I, options: RemoveOptions) -> Result<()>
    where
        I: IntoIterator<Item = R>,
        R: Into<RemoveTarget>,
    {
        for target in targets {
            match target.into() {
                RemoveTarget::Task(task) => task.remove()?,
                RemoveTarget::Title(title) => self.remove_task(&title, options)?,
            }
        }
        Ok(())
    }
}

/// Restartable tag query returned by [`TodoList::find_tasks_by_tag`].
///
/// Each read goes back to the source.
pub struct TaggedTasks<'a> {
    list: &'a TodoList,
    tag: String,
    case_sensitive: bool,
}

impl TaggedTasks<'_> {
    pub fn iter(&self) -> Result<impl Iterator<Item = Task> + '_> {
        Ok(self
            .list
            .get_tasks()?
            .into_iter()
            .filter(move |task| task.has_tag(&self.tag, self.case_sensitive)))
    }

    pub fn fetch(&self) -> Result<Vec<Task>> {
        Ok(self.iter()?.collect())
    }

    pub fn count(&self) -> Result<usize> {
        Ok(self.iter()?.count())
    }
}
